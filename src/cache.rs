//! Persistent cache of JVM metadata.
//!
//! The cache file is a JSON object mapping resolved `java` executable paths
//! to their raw system properties and the time they were fetched. Derived
//! fields are recomputed on every load and never serialized. The file is
//! rewritten only when an insert, replace, or eviction happened this run.

use crate::extract::MetadataExtractor;
use crate::jvm::Jvm;
use crate::log::Logger;
use crate::scan::JavaExecutables;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// All known JVMs, keyed by resolved executable path.
#[derive(Debug)]
pub struct JvmRegistry {
    cache_path: PathBuf,
    dirty: bool,
    /// Paths reconciled against discovery output this run.
    fetched: BTreeSet<PathBuf>,
    pub jvms: BTreeMap<PathBuf, Jvm>,
}

/// The persisted slice of a [`Jvm`] record.
#[derive(Debug, Serialize, Deserialize)]
struct CachedJvm {
    fetched_at: u64,
    system_properties: BTreeMap<String, String>,
}

/// Loads the cached registry, reconciles it against the discovered
/// executables, evicts entries whose executables disappeared from disk, and
/// persists the result if anything changed.
///
/// Cache entries are updated in the following cases:
///   - A discovered JVM absent from the cache is fetched and inserted.
///   - A cached executable with a modification time more recent than the
///     entry's fetch time is fetched again and replaced.
///   - A cached entry whose executable no longer exists on disk is removed.
///     Entries merely outside this run's lookup paths are kept, so
///     alternating between configurations does not thrash the cache.
pub fn load_jvm_registry(
    extractor: &dyn MetadataExtractor,
    cache_path: &Path,
    java_executables: &JavaExecutables,
    logger: &Logger,
) -> Result<JvmRegistry> {
    let mut registry = JvmRegistry::load_from_cache(cache_path, logger);
    for (java_path, mod_time) in &java_executables.java_paths {
        registry.fetch(extractor, java_path, *mod_time, logger)?;
    }
    registry.evict_removed_entries(logger);
    if let Err(err) = registry.save(logger) {
        logger.warn(format!("{err:#}"));
    }
    Ok(registry)
}

impl JvmRegistry {
    fn load_from_cache(cache_path: &Path, logger: &Logger) -> Self {
        let mut registry = Self {
            cache_path: cache_path.to_path_buf(),
            dirty: false,
            fetched: BTreeSet::new(),
            jvms: BTreeMap::new(),
        };
        if !cache_path.exists() {
            return registry;
        }

        logger.debug(format!("Loading cache from {}", cache_path.display()));
        let raw = match fs::read_to_string(cache_path) {
            Ok(raw) => raw,
            Err(err) => {
                logger.warn(format!(
                    "cannot read cache file {}: {err}",
                    cache_path.display()
                ));
                registry.dirty = true;
                return registry;
            }
        };
        let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                logger.warn(format!(
                    "cannot parse cache file {}: {err}",
                    cache_path.display()
                ));
                registry.dirty = true;
                return registry;
            }
        };

        // One bad record must not invalidate the rest of the cache; dropped
        // records are purged from disk on the next save.
        for (java_path, value) in entries {
            let cached: CachedJvm = match serde_json::from_value(value) {
                Ok(cached) => cached,
                Err(err) => {
                    logger.warn(format!("cannot parse cache entry {java_path}: {err}"));
                    registry.dirty = true;
                    continue;
                }
            };
            let java_path = PathBuf::from(java_path);
            match Jvm::new(java_path.clone(), cached.fetched_at, cached.system_properties) {
                Ok(jvm) => {
                    registry.jvms.insert(java_path, jvm);
                }
                Err(err) => {
                    logger.warn(format!(
                        "cannot parse java specification version for JVM {}: {err}",
                        java_path.display()
                    ));
                    registry.dirty = true;
                }
            }
        }
        registry
    }

    fn fetch(
        &mut self,
        extractor: &dyn MetadataExtractor,
        java_path: &Path,
        mod_time: SystemTime,
        logger: &Logger,
    ) -> Result<()> {
        self.fetched.insert(java_path.to_path_buf());
        let needs_fetch = match self.jvms.get(java_path) {
            None => {
                logger.info(format!("[CACHE MISS] {}", java_path.display()));
                true
            }
            Some(jvm) if epoch_nanos(mod_time) > jvm.fetched_at => {
                logger.info(format!("[CACHE OUTDATED] {}", java_path.display()));
                true
            }
            Some(_) => false,
        };
        if needs_fetch {
            self.do_fetch(extractor, java_path, logger)?;
        }
        Ok(())
    }

    fn do_fetch(
        &mut self,
        extractor: &dyn MetadataExtractor,
        java_path: &Path,
        logger: &Logger,
    ) -> Result<()> {
        let system_properties = extractor.extract(java_path)?;
        let jvm = Jvm::new(
            java_path.to_path_buf(),
            epoch_nanos(SystemTime::now()),
            system_properties,
        )
        .with_context(|| format!("cannot derive metadata for JVM {}", java_path.display()))?;
        logger.debug(format!("{}:\n{jvm}", java_path.display()));
        self.jvms.insert(java_path.to_path_buf(), jvm);
        self.dirty = true;
        Ok(())
    }

    /// Removes entries that were not reconciled this run and whose
    /// executable is confirmed gone from disk. Unseen entries whose file
    /// still exists are left untouched.
    fn evict_removed_entries(&mut self, logger: &Logger) {
        let removed: Vec<PathBuf> = self
            .jvms
            .keys()
            .filter(|path| !self.fetched.contains(*path) && !path.exists())
            .cloned()
            .collect();
        for java_path in removed {
            logger.debug(format!(
                "evicting cache entry for JVM {}",
                java_path.display()
            ));
            self.jvms.remove(&java_path);
            self.dirty = true;
        }
    }

    /// Writes the registry back to disk if it changed this run. The caller
    /// treats failures as warnings: the in-memory registry stays usable.
    pub fn save(&self, logger: &Logger) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        logger.debug(format!(
            "Writing JVM metadata cache to {}",
            self.cache_path.display()
        ));

        let entries: BTreeMap<String, CachedJvm> = self
            .jvms
            .iter()
            .map(|(path, jvm)| {
                (
                    path.to_string_lossy().into_owned(),
                    CachedJvm {
                        fetched_at: jvm.fetched_at,
                        system_properties: jvm.system_properties.clone(),
                    },
                )
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("unable to create cache directory {}", parent.display())
                })?;
            }
        }
        fs::write(&self.cache_path, json)
            .with_context(|| format!("unable to write cache file {}", self.cache_path.display()))
    }
}

pub(crate) fn epoch_nanos(time: SystemTime) -> u64 {
    let nanos = time.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    u64::try_from(nanos).unwrap_or(u64::MAX)
}
