use std::path::{Path, PathBuf};

use glob::Pattern;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Paths excluded from the template walk.
///
/// Literal entries match a path and everything below it (relative to the template
/// root); glob entries match the full path string.
#[derive(Debug, Default, Clone)]
pub struct IgnoreMatcher {
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    pub fn new(root: &Path, ignores: &[String]) -> Result<Self, glob::PatternError> {
        let mut matcher = Self::default();

        for ignore in ignores {
            if is_glob_pattern(ignore) {
                matcher.patterns.push(Pattern::new(ignore)?);
            } else {
                matcher.literal_paths.push(root.join(ignore));
            }
        }

        Ok(matcher)
    }

    pub fn is_empty(&self) -> bool {
        self.literal_paths.is_empty() && self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self
            .literal_paths
            .iter()
            .any(|ignored| path.starts_with(ignored))
        {
            return true;
        }

        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|p| p.matches(&path_str))
    }
}
