use crate::config::Config;
use crate::jvm::Jvm;
use crate::log::Logger;
use crate::scan::is_executable;
use crate::version::VersionRange;
use std::fmt;
use std::fs;

/// Constraints a JVM must satisfy to be selected.
///
/// The top level carries the hard, command-line-sourced constraints. The
/// optional `preferred` tier carries the configuration's version range and
/// is honored only when it does not eliminate every candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRules {
    pub version_range: VersionRange,
    /// Vendors to filter on; empty means no vendor filtering.
    pub vendors: Vec<String>,
    /// Binaries the JVM must provide in its `${java.home}/bin` directory.
    pub programs: Vec<String>,
    pub preferred: Option<Box<SelectionRules>>,
}

impl SelectionRules {
    /// Builds the selection rules: command-line criteria are hard
    /// constraints, configuration criteria are soft ones.
    pub fn resolve(
        config: &Config,
        min_java_version: u32,
        max_java_version: u32,
        vendors: Vec<String>,
        programs: Vec<String>,
        logger: &Logger,
    ) -> Self {
        let rules = Self {
            version_range: VersionRange {
                min: min_java_version,
                max: max_java_version,
            },
            vendors,
            programs,
            preferred: Some(Box::new(Self {
                version_range: config.version_range,
                ..Self::default()
            })),
        };
        logger.debug(format!("Resolved matching rules {rules}"));
        rules
    }

    pub fn matches(&self, jvm: &Jvm, logger: &Logger) -> bool {
        if !self.version_range.matches(jvm.java_specification_version) {
            return false;
        }
        if !self.match_vendor(jvm) {
            return false;
        }
        self.match_programs(jvm, logger)
    }

    fn match_vendor(&self, jvm: &Jvm) -> bool {
        self.vendors.is_empty() || self.vendors.iter().any(|vendor| jvm.java_vendor == *vendor)
    }

    /// `java` itself is implicitly present and never checked on disk.
    fn match_programs(&self, jvm: &Jvm, logger: &Logger) -> bool {
        for program in &self.programs {
            if program == "java" {
                continue;
            }
            let program_path = jvm.java_home.join("bin").join(program);
            match fs::metadata(&program_path) {
                Ok(metadata) => {
                    if !is_executable(&metadata) {
                        logger.debug(format!(
                            "Program {} is not executable",
                            program_path.display()
                        ));
                        return false;
                    }
                }
                Err(_) => {
                    logger.debug(format!("Program {} not found", program_path.display()));
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for SelectionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{version range: {}, vendors: {:?}, programs: {:?}",
            self.version_range, self.vendors, self.programs
        )?;
        if let Some(preferred) = &self.preferred {
            write!(f, ", preferred: {preferred}")?;
        }
        write!(f, "}}")
    }
}
