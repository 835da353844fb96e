use crate::version::{InvalidJavaVersion, parse_java_specification_version};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A JVM installation and the metadata extracted from it.
///
/// `java_home`, `java_vendor`, and `java_specification_version` are always
/// derived from `system_properties`; they are never stored on disk.
#[derive(Debug, Clone)]
pub struct Jvm {
    /// Absolute path to the `java` executable, symlinks resolved.
    pub java_path: PathBuf,
    /// The `java.home` directory.
    pub java_home: PathBuf,
    /// The `java.vendor` value.
    pub java_vendor: String,
    /// The `java.specification.version`, normalized.
    pub java_specification_version: u32,
    /// When the metadata was extracted, in nanoseconds since the Unix epoch.
    pub fetched_at: u64,
    /// Raw system properties reported by the metadata extractor.
    pub system_properties: BTreeMap<String, String>,
}

impl Jvm {
    /// Builds a record and derives its metadata fields. Fails if the
    /// `java.specification.version` property is absent or unparseable.
    pub fn new(
        java_path: PathBuf,
        fetched_at: u64,
        system_properties: BTreeMap<String, String>,
    ) -> Result<Self, InvalidJavaVersion> {
        let mut jvm = Self {
            java_path,
            java_home: PathBuf::new(),
            java_vendor: String::new(),
            java_specification_version: 0,
            fetched_at,
            system_properties,
        };
        jvm.rebuild()?;
        Ok(jvm)
    }

    fn rebuild(&mut self) -> Result<(), InvalidJavaVersion> {
        self.java_home = PathBuf::from(
            self.system_properties
                .get("java.home")
                .cloned()
                .unwrap_or_default(),
        );
        self.java_vendor = self
            .system_properties
            .get("java.vendor")
            .cloned()
            .unwrap_or_default();
        self.java_specification_version = parse_java_specification_version(
            self.system_properties
                .get("java.specification.version")
                .map(String::as_str)
                .unwrap_or(""),
        )?;
        Ok(())
    }
}

impl fmt::Display for Jvm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]\ntimestamp: {}\njava.home: {}\njava.specification.version: {}",
            self.java_path.display(),
            self.fetched_at,
            self.java_home.display(),
            self.java_specification_version
        )
    }
}
