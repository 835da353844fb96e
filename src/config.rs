use crate::log::Logger;
use crate::paths::resolve_paths;
use crate::version::{VersionRange, parse_java_specification_version};
use anyhow::{Context, Result, anyhow, bail};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Lookup locations consulted when no configuration file provides any.
const DEFAULT_LOOKUP_PATHS: &[&str] = &[
    "$JAVA_HOME/bin/java",
    "$GRAALVM_HOME/bin/java",
    "/bin/java",
    "/usr/bin/java",
    "/usr/local/bin/java",
    "/usr/lib/jvm",
    "~/.sdkman/candidates/java",
    "$HOMEBREW_CELLAR/openjdk",
];

/// Fully resolved configuration consumed by discovery, the cache, and the
/// selection rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub metadata_extractor_classpath: PathBuf,
    pub metadata_cache_path: PathBuf,
    pub lookup_paths: Vec<PathBuf>,
    pub version_range: VersionRange,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "config:\n\tmetadata extractor classpath: {}\n\tmetadata cache path: {}\n\tlookup paths: {:?}\n\tversion range: {}",
            self.metadata_extractor_classpath.display(),
            self.metadata_cache_path.display(),
            self.lookup_paths,
            self.version_range
        )
    }
}

/// One parsed configuration source; merged field-by-field with
/// first-provider-wins precedence.
#[derive(Debug, Clone, Default)]
struct ConfigEntry {
    path: String,
    lookup_paths: Option<Vec<String>>,
    version_range: Option<VersionRange>,
    extractor_path: Option<PathBuf>,
    cache_path: Option<PathBuf>,
}

fn default_config_entry() -> ConfigEntry {
    ConfigEntry {
        path: "<DEFAULT>".to_string(),
        lookup_paths: Some(
            DEFAULT_LOOKUP_PATHS
                .iter()
                .map(|path| path.to_string())
                .collect(),
        ),
        version_range: Some(VersionRange::default()),
        extractor_path: None,
        cache_path: None,
    }
}

/// Loads and merges configuration: an optional `config.<key>.conf`, then
/// `config.conf`, then built-in defaults. Missing files are skipped.
pub fn load_config(config_key: Option<&str>, logger: &Logger) -> Result<Config> {
    let mut entries = Vec::new();
    for path in config_file_paths(config_key) {
        if path.exists() {
            entries.push(load_config_entry(&path, logger)?);
        } else {
            logger.debug(format!("Config file {} not found", path.display()));
        }
    }
    entries.push(default_config_entry());
    let config = resolve_config(&entries, logger)?;
    logger.debug(format!("Resolved {config}"));
    Ok(config)
}

fn config_file_paths(config_key: Option<&str>) -> Vec<PathBuf> {
    let Some(config_dir) = dirs::config_dir() else {
        return Vec::new();
    };
    let config_dir = config_dir.join("jvm-finder");
    let default_path = config_dir.join("config.conf");
    match config_key {
        Some(key) => vec![config_dir.join(format!("config.{key}.conf")), default_path],
        None => vec![default_path],
    }
}

fn load_config_entry(path: &Path, logger: &Logger) -> Result<ConfigEntry> {
    logger.debug(format!("Loading config from {}", path.display()));
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;

    let mut entry = ConfigEntry {
        path: path.display().to_string(),
        ..ConfigEntry::default()
    };
    for line in raw.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        process_line(&mut entry, key, value).with_context(|| {
            format!(
                "invalid configuration entry in file {} for key '{key}' and value '{value}'",
                path.display()
            )
        })?;
    }
    Ok(entry)
}

fn process_line(entry: &mut ConfigEntry, key: &str, value: &str) -> Result<()> {
    match key {
        "jvm.lookup.paths" => {
            entry.lookup_paths = Some(
                value
                    .split(',')
                    .map(|path| path.trim().to_string())
                    .collect(),
            );
        }
        "java.specification.version.min" => {
            let version = parse_java_specification_version(value)?;
            entry.version_range.get_or_insert_default().min = version;
        }
        "java.specification.version.max" => {
            let version = parse_java_specification_version(value)?;
            entry.version_range.get_or_insert_default().max = version;
        }
        "jvm.metadata.extractor.path" => {
            entry.extractor_path = Some(PathBuf::from(value.trim()));
        }
        "jvm.metadata.cache.path" => {
            entry.cache_path = Some(PathBuf::from(value.trim()));
        }
        _ => bail!("unknown key '{key}'"),
    }
    Ok(())
}

fn resolve_config(entries: &[ConfigEntry], logger: &Logger) -> Result<Config> {
    Ok(Config {
        metadata_extractor_classpath: match entries.iter().find_map(|e| e.extractor_path.clone()) {
            Some(path) => path,
            None => jvm_finder_data_dir()?.join("metadata-extractor"),
        },
        metadata_cache_path: match entries.iter().find_map(|e| e.cache_path.clone()) {
            Some(path) => path,
            None => jvm_finder_cache_dir()?.join("jvms.json"),
        },
        lookup_paths: jvm_lookup_paths(entries, logger)?,
        version_range: jvm_version_range(entries)?,
    })
}

fn jvm_lookup_paths(entries: &[ConfigEntry], logger: &Logger) -> Result<Vec<PathBuf>> {
    for entry in entries {
        if let Some(lookup_paths) = &entry.lookup_paths
            && !lookup_paths.is_empty()
        {
            let resolved = resolve_paths(lookup_paths, logger);
            if !resolved.is_empty() {
                return Ok(resolved);
            }
        }
    }
    bail!(
        "no JVMs lookup path defined in configuration files {:?}",
        entry_paths(entries)
    )
}

fn jvm_version_range(entries: &[ConfigEntry]) -> Result<VersionRange> {
    entries
        .iter()
        .find_map(|entry| entry.version_range)
        .ok_or_else(|| {
            anyhow!(
                "no version range defined in configuration files {:?}",
                entry_paths(entries)
            )
        })
}

fn entry_paths(entries: &[ConfigEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.path.as_str()).collect()
}

fn jvm_finder_cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir()
        .or_else(dirs::data_local_dir)
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("Failed to resolve cache directory"))?;
    Ok(base.join("jvm-finder"))
}

fn jvm_finder_data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("Failed to resolve data directory"))?;
    Ok(base.join("jvm-finder"))
}
