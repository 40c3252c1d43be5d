//! Process-wide validation policy shared by every node of a model tree.

/// Global defaults mirrored by the per-node [`Settings`](crate::Settings)
/// flags of the same name. A node flag being set wins over the global being
/// unset; the global being set applies to every node of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// Resolve any node failure to its default value plus a warning instead
    /// of propagating the error upward.
    pub stop_on_error: bool,
    /// Drop invalid array items (demoted to warnings) instead of failing the
    /// whole array.
    pub remove_faulty: bool,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
