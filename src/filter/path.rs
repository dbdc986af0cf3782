//! Include/exclude glob filtering.

use crate::error::ConfigError;
use crate::glob::glob_to_regex;
use regex::bytes::Regex;

/// Ordered include and exclude glob sets.
///
/// An empty include set admits every path. Excludes are checked after
/// includes and take precedence: a path matching both is rejected.
#[derive(Debug, Default)]
pub struct GlobFilter {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl GlobFilter {
    /// Compiles `includes` and `excludes` glob patterns.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidGlob`] if any pattern fails to compile.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, ConfigError> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>, ConfigError> {
            patterns
                .iter()
                .map(|pattern| {
                    glob_to_regex(pattern).map_err(|reason| ConfigError::InvalidGlob {
                        pattern: pattern.clone(),
                        reason,
                    })
                })
                .collect()
        };

        Ok(Self { includes: compile(includes)?, excludes: compile(excludes)? })
    }

    /// Whether `path` (as raw bytes) is admitted by this filter.
    #[must_use]
    pub fn admits(&self, path: &[u8]) -> bool {
        let include_ok = self.includes.is_empty() || self.includes.iter().any(|re| re.is_match(path));
        if !include_ok {
            return false;
        }
        !self.excludes.iter().any(|re| re.is_match(path))
    }
}
