use crate::log::LogLevel;
use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "jvm-finder", version)]
#[command(about = "Locate installed JVMs and print the one best matching the requested constraints")]
pub struct Cli {
    /// Consult config.<KEY>.conf before the default configuration.
    #[arg(short = 'k', long, value_name = "KEY")]
    pub config_key: Option<String>,

    /// Minimum (inclusive) Java specification version; 0 means unbounded.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub min_java_version: u32,

    /// Maximum (inclusive) Java specification version; 0 means unbounded.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub max_java_version: u32,

    /// Vendors to filter on; no vendor filtering when omitted.
    #[arg(long = "vendors", value_name = "VENDOR", value_delimiter = ',')]
    pub vendors: Vec<String>,

    /// Programs the JVM must provide in its "${java.home}/bin" directory.
    /// Defaults to java.
    #[arg(long = "programs", value_name = "PROGRAM", value_delimiter = ',')]
    pub programs: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputMode::Binary)]
    pub output_mode: OutputMode,

    #[arg(long, value_enum, default_value_t = LogLevel::Error)]
    pub log_level: LogLevel,

    /// Metadata cache file, overriding the configured location.
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Metadata extractor classpath, overriding the configured location.
    #[arg(long, value_name = "PATH")]
    pub extractor: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Print the path of each requested program inside the selected JVM.
    Binary,
    /// Print the home directory of the selected JVM.
    #[value(name = "java.home")]
    JavaHome,
}

impl Cli {
    /// The requested programs, with the implicit `java` default applied.
    pub fn programs(&self) -> Vec<String> {
        if self.programs.is_empty() {
            vec!["java".to_string()]
        } else {
            self.programs.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_mode == OutputMode::Binary && self.programs.len() > 1 {
            bail!(
                "output mode \"binary\" cannot be used when multiple programs are requested. \
                 Use \"java.home\" instead"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unbounded_binary_and_quiet() {
        let cli = Cli::parse_from(["jvm-finder"]);
        assert_eq!(cli.min_java_version, 0);
        assert_eq!(cli.max_java_version, 0);
        assert!(cli.vendors.is_empty());
        assert_eq!(cli.programs(), vec!["java".to_string()]);
        assert_eq!(cli.output_mode, OutputMode::Binary);
        assert_eq!(cli.log_level, LogLevel::Error);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn vendors_accept_commas_and_repetition() {
        let cli = Cli::parse_from([
            "jvm-finder",
            "--vendors",
            "Ubuntu,Eclipse Adoptium",
            "--vendors",
            "GraalVM Community",
        ]);
        assert_eq!(
            cli.vendors,
            vec!["Ubuntu", "Eclipse Adoptium", "GraalVM Community"]
        );
    }

    #[test]
    fn output_mode_accepts_java_home_spelling() {
        let cli = Cli::parse_from(["jvm-finder", "--output-mode", "java.home"]);
        assert_eq!(cli.output_mode, OutputMode::JavaHome);
    }

    #[test]
    fn binary_mode_rejects_multiple_programs() {
        let cli = Cli::parse_from(["jvm-finder", "--programs", "java,javac"]);
        let err = cli.validate().unwrap_err().to_string();
        assert!(err.contains("cannot be used when multiple programs are requested"));

        let cli = Cli::parse_from([
            "jvm-finder",
            "--programs",
            "java,javac",
            "--output-mode",
            "java.home",
        ]);
        assert!(cli.validate().is_ok());
    }
}
