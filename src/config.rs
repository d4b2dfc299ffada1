/// Occurrence count at or below which the corridor walker treats a token as
/// "rare" within the remaining window. Counting stops one past the limit, so
/// the walker never scans a window more than it has to.
pub const RARE_OCCURRENCE_LIMIT: usize = 3;

/// Length ratio between the two sides of a gap above which a region is
/// considered too skewed for a diagonal walk.
pub(crate) const SKEW_RATIO_LIMIT: usize = 100;

/// Combined gap size below which a skewed region is still walked normally.
pub(crate) const SKEW_SIZE_LIMIT: usize = 500;

/// How many `jump_step`-spaced offsets the anchor hunt probes when looking
/// for the next matching chunk on the new side.
pub(crate) const HUNT_SCAN_OFFSETS: usize = 4;

/// Classifies anchors by how far they moved between the two sequences.
///
/// An anchor whose `drift` (absolute difference between its old and new
/// position) stays within [`DiffConfig::positional_anchor_max_drift`] is
/// *positional*; one that moved further is *floating*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorSearchMode {
    /// Keep only anchors that stayed near their original position.
    Positional,
    /// Keep only anchors that drifted beyond the positional limit.
    Floating,
    /// Keep both kinds.
    #[default]
    Combo,
}

/// Tuning options for a single diff.
///
/// The configuration is immutable for the duration of one
/// [`DiffEngine::diff`](crate::DiffEngine::diff) call. All length-like fields
/// are measured in tokens. The defaults reproduce the engine's stock
/// behavior; most callers only ever override `strategy_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffConfig {
    /// Registry name of the strategy to run. Defaults to `"commonSES"`.
    pub strategy_name: String,
    /// Minimum length of an accepted anchor.
    pub min_match_length: usize,
    /// Combined window size below which a gap is solved by precise Myers
    /// with a full backtracking trace.
    pub quick_diff_threshold: usize,
    /// Combined gap size above which the corridor heuristic takes over.
    pub huge_diff_threshold: usize,
    /// Maximum forward scan of the corridor walker when looking for the
    /// other side's current token.
    pub lookahead: usize,
    /// Maximum deviation from the starting diagonal before the corridor
    /// walker emits a corrective edit.
    pub corridor_width: usize,
    /// Suppress common prefix/suffix trimming.
    pub skip_trimming: bool,
    /// Stride used when scanning the old window for anchor candidates.
    pub jump_step: usize,
    /// Window size of the rolling hash used by the anchor hunt.
    pub hunt_chunk_size: usize,
    /// Lower bound (inclusive) on both hunt confidence and final anchor
    /// confidence.
    pub min_anchor_confidence: f64,
    /// Toggle the global anchor search.
    pub use_anchors: bool,
    /// Search distance of the local-anchor helper used by the
    /// structure-preserving strategy.
    pub local_lookahead: usize,
    /// Which drift class of anchors to keep.
    pub anchor_search_mode: AnchorSearchMode,
    /// Drift at or below which an anchor counts as positional.
    pub positional_anchor_max_drift: usize,
}

impl Default for DiffConfig {
    fn default() -> DiffConfig {
        DiffConfig {
            strategy_name: "commonSES".to_owned(),
            min_match_length: 30,
            quick_diff_threshold: 64,
            huge_diff_threshold: 256,
            lookahead: 10,
            corridor_width: 10,
            skip_trimming: false,
            jump_step: 30,
            hunt_chunk_size: 10,
            min_anchor_confidence: 0.8,
            use_anchors: true,
            local_lookahead: 50,
            anchor_search_mode: AnchorSearchMode::Combo,
            positional_anchor_max_drift: 20,
        }
    }
}

impl DiffConfig {
    /// A region is pathologically skewed when one side dwarfs the other.
    /// Diagonal walks degenerate there, so such gaps are flushed as plain
    /// removals plus additions instead.
    pub(crate) fn is_pathological(len1: usize, len2: usize) -> bool {
        let min = len1.min(len2);
        let max = len1.max(len2);
        min > 0 && max / min > SKEW_RATIO_LIMIT && len1 + len2 > SKEW_SIZE_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_tuning() {
        let config = DiffConfig::default();
        assert_eq!(config.strategy_name, "commonSES");
        assert_eq!(config.min_match_length, 30);
        assert_eq!(config.quick_diff_threshold, 64);
        assert_eq!(config.huge_diff_threshold, 256);
        assert_eq!(config.anchor_search_mode, AnchorSearchMode::Combo);
        assert!(config.use_anchors);
        assert!(!config.skip_trimming);
    }

    #[test]
    fn skew_needs_both_ratio_and_size() {
        // Ratio above the limit but the region is small.
        assert!(!DiffConfig::is_pathological(300, 2));
        // Large region but a tame ratio.
        assert!(!DiffConfig::is_pathological(400, 300));
        // Both: flush.
        assert!(DiffConfig::is_pathological(600, 3));
        // Empty sides are handled by the pure-run base cases, never here.
        assert!(!DiffConfig::is_pathological(600, 0));
    }
}
