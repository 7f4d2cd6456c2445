//! Build metadata embedded by `build.rs`.

use std::fmt;

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of the abbreviated commit SHA in version strings.
const SHORT_SHA_LEN: usize = 7;

/// What this binary was built from, as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Git branch, or "unknown" outside a checkout.
    pub branch: &'static str,
    /// Full commit SHA, or "unknown".
    pub sha: &'static str,
    /// Whether the working tree had uncommitted changes.
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata for the running build.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: option_env!("VERGEN_GIT_BRANCH").unwrap_or("unknown"),
            sha: option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// The SHA cut to seven characters.
    pub fn short_sha(&self) -> &'static str {
        self.sha.get(..SHORT_SHA_LEN).unwrap_or(self.sha)
    }
}

/// `{version}+{branch}.{short_sha}`, with `.dirty` appended for dirty trees.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.short_sha())?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Display form of [`BuildInfo::current`].
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
