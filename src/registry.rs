//! Generation registry: which cache sets are current.
//!
//! Exactly two sets are current at any instant — one shell generation
//! and one image generation. Every other set in the store is stale and
//! eligible for deletion during activation. The registry is intentionally
//! simple: two names computed from a prefix and a version, plus set
//! difference. A new deployed version builds a new registry with a
//! bumped version number; membership never changes within one instance.
//!
//! The only structural contract external tooling needs is that set names
//! are monotonically versioned strings ([`parse_version`]) and that
//! exactly two are current at once.

/// The pair of cache set names considered current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRegistry {
    shell: String,
    image: String,
    version: u32,
}

impl GenerationRegistry {
    /// Build the registry for one deployed version.
    ///
    /// Names follow `{prefix}-shell-v{n}` / `{prefix}-images-v{n}`.
    pub fn new(prefix: &str, version: u32) -> Self {
        Self {
            shell: format!("{prefix}-shell-v{version}"),
            image: format!("{prefix}-images-v{version}"),
            version,
        }
    }

    /// Name of the current shell set.
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Name of the current image set.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// The version embedded in both names.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether `name` is one of the two current sets.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.shell || name == self.image
    }

    /// The subset of `existing` that is stale: everything not current.
    pub fn stale<'a>(&self, existing: &'a [String]) -> Vec<&'a str> {
        existing
            .iter()
            .map(String::as_str)
            .filter(|name| !self.is_current(name))
            .collect()
    }
}

/// Extract the version number embedded in a set name (`…-v{n}`).
///
/// Returns `None` for names outside the versioned naming scheme.
pub fn parse_version(name: &str) -> Option<u32> {
    name.rsplit_once("-v")
        .and_then(|(_, version)| version.parse().ok())
}
