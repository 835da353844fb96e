use crate::log::Logger;
use regex::{Captures, Regex};
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)").expect("env var pattern"));

/// Expands configured lookup paths, dropping entries that cannot be
/// resolved (unset environment variable, unknown home directory).
pub fn resolve_paths(paths: &[String], logger: &Logger) -> Vec<PathBuf> {
    paths
        .iter()
        .filter_map(|path| resolve_path(path, logger))
        .collect()
}

fn resolve_path(path: &str, logger: &Logger) -> Option<PathBuf> {
    let mut valid = true;
    let expanded = ENV_VAR.replace_all(path, |caps: &Captures<'_>| match env::var(&caps[1]) {
        Ok(value) => value,
        Err(_) => {
            logger.info(format!(
                "Env var {} not found -> cannot process path {path}",
                &caps[1]
            ));
            valid = false;
            String::new()
        }
    });
    if !valid {
        return None;
    }

    let mut expanded = expanded.into_owned();
    if expanded.starts_with('~') {
        match dirs::home_dir() {
            Some(home) => expanded = format!("{}{}", home.display(), &expanded[1..]),
            None => {
                logger.info(format!(
                    "Unable to resolve user home directory -> cannot process path {path}"
                ));
                return None;
            }
        }
    }
    Some(PathBuf::from(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogLevel;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn substitutes_environment_variables() {
        let _guard = env_lock().lock().expect("env test lock poisoned");
        // SAFETY: Guarded by env_lock and removed before returning.
        unsafe { env::set_var("JVM_FINDER_TEST_HOME", "/opt/test-jdk") };

        let (logger, _) = Logger::in_memory(LogLevel::Error);
        let resolved = resolve_path("$JVM_FINDER_TEST_HOME/bin/java", &logger);
        assert_eq!(resolved, Some(PathBuf::from("/opt/test-jdk/bin/java")));

        // SAFETY: Guarded by env_lock.
        unsafe { env::remove_var("JVM_FINDER_TEST_HOME") };
    }

    #[test]
    fn skips_paths_with_unset_variables() {
        let _guard = env_lock().lock().expect("env test lock poisoned");
        let (logger, buffer) = Logger::in_memory(LogLevel::Info);
        let paths = vec![
            "$JVM_FINDER_TEST_UNSET/bin/java".to_string(),
            "/usr/lib/jvm".to_string(),
        ];

        let resolved = resolve_paths(&paths, &logger);
        assert_eq!(resolved, vec![PathBuf::from("/usr/lib/jvm")]);
        assert!(
            buffer
                .contents()
                .contains("Env var JVM_FINDER_TEST_UNSET not found")
        );
    }

    #[test]
    fn expands_leading_tilde_to_home() {
        let (logger, _) = Logger::in_memory(LogLevel::Error);
        let home = dirs::home_dir().expect("test environment has a home directory");

        let resolved = resolve_path("~/.sdkman/candidates/java", &logger).unwrap();
        assert_eq!(resolved, home.join(".sdkman/candidates/java"));
    }
}
