//! Matching parameters shared by the clustering and pairwise paths.

use crate::breakpoint::MatchWindow;

/// Configuration passed explicitly into [`crate::consensus::ClusterBuilder`]
/// and [`crate::consensus::PairwiseMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Extension radius applied to each breakend.
    pub window: MatchWindow,
    /// Run per-record queries on the rayon pool.
    pub parallel: bool,
}

impl MatchConfig {
    /// Defaults for multi-way consensus (window 500).
    pub fn multi_way() -> Self {
        Self {
            window: MatchWindow::MULTI_WAY,
            parallel: true,
        }
    }

    /// Defaults for two-way comparison (window 200).
    pub fn pairwise() -> Self {
        Self {
            window: MatchWindow::PAIRWISE,
            parallel: true,
        }
    }

    /// Override the window radius.
    pub fn with_window(mut self, window: impl Into<MatchWindow>) -> Self {
        self.window = window.into();
        self
    }

    /// Enable or disable parallel querying.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::multi_way()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_two_paths() {
        assert_eq!(MatchConfig::multi_way().window.radius(), 500);
        assert_eq!(MatchConfig::pairwise().window.radius(), 200);
        assert_eq!(MatchConfig::default(), MatchConfig::multi_way());
    }

    #[test]
    fn builder_overrides() {
        let config = MatchConfig::pairwise().with_window(50).with_parallel(false);
        assert_eq!(config.window, MatchWindow::new(50));
        assert!(!config.parallel);
    }
}
