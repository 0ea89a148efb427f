/// Symmetric coordinate tolerance applied independently to each breakend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchWindow(u64);

impl MatchWindow {
    /// Default radius for multi-way clustering.
    pub const MULTI_WAY: MatchWindow = MatchWindow(500);
    /// Default radius for pairwise matching.
    pub const PAIRWISE: MatchWindow = MatchWindow(200);

    /// Window with the given extension radius.
    pub const fn new(radius: u64) -> Self {
        Self(radius)
    }

    /// Extension radius in bases.
    pub fn radius(self) -> u64 {
        self.0
    }

    /// Inclusive coordinate bounds `[pos - radius, pos + radius]`, clamped at zero.
    pub fn bounds(self, pos: u64) -> (u64, u64) {
        (pos.saturating_sub(self.0), pos.saturating_add(self.0))
    }

    /// Whether two coordinates lie within the window of each other.
    pub fn contains(self, a: u64, b: u64) -> bool {
        a.abs_diff(b) <= self.0
    }
}

impl Default for MatchWindow {
    fn default() -> Self {
        Self::MULTI_WAY
    }
}

impl From<u64> for MatchWindow {
    fn from(radius: u64) -> Self {
        Self(radius)
    }
}
