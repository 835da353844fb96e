//! Locates `java` executables under the configured lookup paths.
//!
//! A lookup path may point at an executable itself, at a JVM home (probed
//! via `bin/java`), or at a directory of JVM homes whose direct children
//! are probed the same way. Scanning never descends further than that.

use crate::log::Logger;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// All discovered launchers, keyed by fully resolved executable path so
/// aliased lookup roots collapse into a single entry.
#[derive(Debug, Default)]
pub struct JavaExecutables {
    pub java_paths: BTreeMap<PathBuf, SystemTime>,
}

struct JavaExecutable {
    path: PathBuf,
    timestamp: SystemTime,
}

impl fmt::Display for JavaExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{timestamp: {:?}, path: {}}}",
            self.timestamp,
            self.path.display()
        )
    }
}

pub fn find_all_java_executables(
    lookup_paths: &[PathBuf],
    logger: &Logger,
) -> Result<JavaExecutables> {
    let mut java_paths = BTreeMap::new();
    for lookup_path in lookup_paths {
        logger.debug(format!("Checking {}", lookup_path.display()));
        for java in find_java_executables(lookup_path, logger)? {
            logger.debug(format!("  - Found {java}"));
            java_paths.insert(java.path, java.timestamp);
        }
    }
    Ok(JavaExecutables { java_paths })
}

fn find_java_executables(lookup_path: &Path, logger: &Logger) -> Result<Vec<JavaExecutable>> {
    // Dangling symlinks and missing paths are expected: lookup paths cover
    // locations that exist on some hosts only.
    let Ok(path) = lookup_path.canonicalize() else {
        return Ok(Vec::new());
    };
    let Ok(metadata) = fs::metadata(&path) else {
        return Ok(Vec::new());
    };

    let file_type = metadata.file_type();
    if file_type.is_file() {
        Ok(single_java_executable(path, &metadata, logger))
    } else if file_type.is_dir() {
        executables_for_each_jvm_directory(&path, logger)
    } else {
        bail!(
            "file {} (symlinked from {}) cannot be processed",
            path.display(),
            lookup_path.display()
        );
    }
}

fn single_java_executable(
    path: PathBuf,
    metadata: &fs::Metadata,
    logger: &Logger,
) -> Vec<JavaExecutable> {
    if is_executable(metadata) {
        let timestamp = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        vec![JavaExecutable { path, timestamp }]
    } else {
        logger.debug(format!("  File {} is not executable", path.display()));
        Vec::new()
    }
}

fn executables_for_each_jvm_directory(
    directory: &Path,
    logger: &Logger,
) -> Result<Vec<JavaExecutable>> {
    // A JVM home directory is used as-is; its siblings are never scanned.
    let java = find_java_executables(&directory.join("bin").join("java"), logger)?;
    if java.len() == 1 {
        return Ok(java);
    }

    let entries = fs::read_dir(directory)
        .with_context(|| format!("cannot list directory {}", directory.display()))?;
    let mut java_paths = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("cannot list directory {}", directory.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("cannot inspect {}", entry.path().display()))?;
        if !file_type.is_file() {
            let candidate = entry.path().join("bin").join("java");
            java_paths.extend(find_java_executables(&candidate, logger)?);
        }
    }
    Ok(java_paths)
}

#[cfg(unix)]
pub(crate) fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub(crate) fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}
