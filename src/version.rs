use std::fmt;
use thiserror::Error;

/// Sentinel meaning "no bound on this side of the range".
pub const ALL_VERSIONS: u32 = 0;

/// Inclusive range of Java Language Specification versions. A bound of 0
/// leaves that side of the range open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionRange {
    pub min: u32,
    pub max: u32,
}

impl VersionRange {
    pub fn matches(&self, version: u32) -> bool {
        if self.min != ALL_VERSIONS && self.min > version {
            return false;
        }
        if self.max != ALL_VERSIONS && self.max < version {
            return false;
        }
        true
    }

    pub fn is_bounded(&self) -> bool {
        self.min != ALL_VERSIONS || self.max != ALL_VERSIONS
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", bound(self.min), bound(self.max))
    }
}

fn bound(version: u32) -> String {
    if version == ALL_VERSIONS {
        String::new()
    } else {
        version.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("JVM version '{0}' cannot be parsed as an unsigned int")]
pub struct InvalidJavaVersion(pub String);

/// Parses a `java.specification.version` value. Legacy `1.x` releases up to
/// Java 8 map to their modern single-digit form.
pub fn parse_java_specification_version(version: &str) -> Result<u32, InvalidJavaVersion> {
    match version {
        "1.0" | "1.1" => Ok(1),
        "1.2" => Ok(2),
        "1.3" => Ok(3),
        "1.4" => Ok(4),
        "1.5" => Ok(5),
        "1.6" => Ok(6),
        "1.7" => Ok(7),
        "1.8" => Ok(8),
        _ => version
            .parse::<u32>()
            .map_err(|_| InvalidJavaVersion(version.to_string())),
    }
}
