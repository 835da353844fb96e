use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Main class of the metadata extractor expected on the configured classpath.
pub const EXTRACTOR_MAIN_CLASS: &str = "JvmMetadataExtractor";

/// Capability to read the raw system properties of a JVM given its `java`
/// executable. Tests substitute an in-memory implementation.
pub trait MetadataExtractor {
    fn extract(&self, java_path: &Path) -> Result<BTreeMap<String, String>>;
}

/// Extracts metadata by running
/// `<java_path> -cp <classpath> JvmMetadataExtractor`.
#[derive(Debug, Clone)]
pub struct JavaCommandExtractor {
    classpath: PathBuf,
}

impl JavaCommandExtractor {
    pub fn new(classpath: PathBuf) -> Self {
        Self { classpath }
    }
}

impl MetadataExtractor for JavaCommandExtractor {
    fn extract(&self, java_path: &Path) -> Result<BTreeMap<String, String>> {
        let output = Command::new(java_path)
            .arg("-cp")
            .arg(&self.classpath)
            .arg(EXTRACTOR_MAIN_CLASS)
            .output()
            .with_context(|| format!("Failed to execute {}", java_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "metadata extraction failed for {}: {}",
                java_path.display(),
                stderr.trim()
            );
        }

        // Some launchers report settings on stderr; accept both streams.
        let mut combined = String::new();
        combined.push_str(&String::from_utf8_lossy(&output.stdout));
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(parse_properties(&combined))
    }
}

/// Parses `key=value` lines into a property map. Lines without `=` are
/// ignored; values are trimmed, keys are kept as-is.
pub fn parse_properties(output: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once('=') {
            properties.insert(key.to_string(), value.trim().to_string());
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_properties_splits_on_first_equals() {
        let properties = parse_properties("java.home=/opt/jdk\njava.class.path=a=b\n");
        assert_eq!(properties["java.home"], "/opt/jdk");
        assert_eq!(properties["java.class.path"], "a=b");
    }

    #[test]
    fn parse_properties_trims_values_and_skips_malformed_lines() {
        let properties = parse_properties("java.vendor=Eclipse Adoptium \nnot a property\n\n");
        assert_eq!(properties.len(), 1);
        assert_eq!(properties["java.vendor"], "Eclipse Adoptium");
    }
}

#[cfg(all(test, unix))]
mod command_tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "jvm_finder_extract_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn write_executable(path: &Path, content: &str) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
        Ok(())
    }

    #[test]
    fn extract_passes_classpath_and_main_class() -> Result<()> {
        let base = temp_dir("extract_args");
        let fake_java = base.join("bin").join("java");
        write_executable(
            &fake_java,
            r#"#!/bin/sh
set -e
if [ "$1" = "-cp" ] && [ "$3" = "JvmMetadataExtractor" ]; then
  echo "java.home=/opt/fake-jdk"
  echo "java.specification.version=21"
  echo "java.vendor=Fake Vendor"
else
  echo "unexpected args" >&2
  exit 1
fi
"#,
        )?;

        let extractor = JavaCommandExtractor::new(PathBuf::from("/opt/extractor"));
        let properties = extractor.extract(&fake_java)?;
        assert_eq!(properties["java.home"], "/opt/fake-jdk");
        assert_eq!(properties["java.specification.version"], "21");

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn extract_reports_failing_launcher_stderr() -> Result<()> {
        let base = temp_dir("extract_failure");
        let fake_java = base.join("bin").join("java");
        write_executable(
            &fake_java,
            r#"#!/bin/sh
echo "boom from fake launcher" >&2
exit 1
"#,
        )?;

        let extractor = JavaCommandExtractor::new(PathBuf::from("/opt/extractor"));
        let err = extractor.extract(&fake_java).unwrap_err().to_string();
        assert!(err.contains("metadata extraction failed"));
        assert!(err.contains("boom from fake launcher"));

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn extract_fails_when_launcher_is_missing() {
        let base = temp_dir("extract_missing");
        let extractor = JavaCommandExtractor::new(PathBuf::from("/opt/extractor"));
        let err = extractor
            .extract(&base.join("bin").join("java"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Failed to execute"));
    }
}
