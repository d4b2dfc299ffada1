//! Anchor search: long verified common runs that split a large diff into
//! independent sub-problems.
//!
//! The finder works in two phases. The *index phase* hashes every
//! `hunt_chunk_size` window of the new side into a position table. The *scan
//! phase* strides through the old side, and for each hash hit *hunts* ahead
//! chunk by chunk to build confidence that a long match starts here, then
//! *verifies* the match symbol by symbol. Accepted anchors mark their
//! new-side span as used so later candidates cannot re-claim it.

use ahash::RandomState;
use hashbrown::HashMap;

use crate::config::{AnchorSearchMode, DiffConfig, HUNT_SCAN_OFFSETS};
use crate::hash::{window_hash, RollingHash};
use crate::intern::Token;

/// A verified common run `old[old_pos..old_pos+len) == new[new_pos..new_pos+len)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Start of the run in the old window.
    pub old_pos: usize,
    /// Start of the run in the new window.
    pub new_pos: usize,
    /// Length of the run, at least `min_match_length`.
    pub len: usize,
    /// Absolute distance the run moved between the two windows.
    pub drift: usize,
    /// `drift / len`; reported in diagnostics.
    pub drift_ratio: f64,
    /// Blend of drift and length confidence, in `[0, 1]`.
    pub confidence: f64,
}

impl Anchor {
    fn matches_mode(&self, config: &DiffConfig) -> bool {
        match config.anchor_search_mode {
            AnchorSearchMode::Positional => self.drift <= config.positional_anchor_max_drift,
            AnchorSearchMode::Floating => self.drift > config.positional_anchor_max_drift,
            AnchorSearchMode::Combo => true,
        }
    }
}

/// Finds anchors between two windows.
///
/// Returns an empty list for parameter combinations the search cannot work
/// with (`hunt_chunk_size == 0` or `min_match_length < hunt_chunk_size`);
/// these are treated as "no anchors", not as an error.
pub(crate) fn find_anchors(
    before: &[Token],
    after: &[Token],
    config: &DiffConfig,
    debug: bool,
) -> Vec<Anchor> {
    let chunk = config.hunt_chunk_size;
    if chunk == 0 || config.min_match_length < chunk {
        return Vec::new();
    }
    if before.len() < chunk || after.len() < chunk {
        return Vec::new();
    }

    let index = index_new_windows(after, chunk);
    let mut used = vec![false; after.len()];
    let mut anchors = Vec::new();

    let mut old_pos = 0;
    while old_pos + chunk <= before.len() {
        let hash = window_hash(&before[old_pos..old_pos + chunk]);
        let accepted = index
            .get(&hash)
            .into_iter()
            .flatten()
            .map(|&new_pos| new_pos as usize)
            .find_map(|new_pos| {
                if !span_unused(&used, new_pos, chunk) {
                    return None;
                }
                try_anchor(before, after, old_pos, new_pos, &used, config)
            });

        match accepted {
            Some(anchor) => {
                if debug {
                    tracing::trace!(
                        old_pos = anchor.old_pos,
                        new_pos = anchor.new_pos,
                        len = anchor.len,
                        confidence = anchor.confidence,
                        drift_ratio = anchor.drift_ratio,
                        "accepted anchor"
                    );
                }
                used[anchor.new_pos..anchor.new_pos + anchor.len].fill(true);
                old_pos = anchor.old_pos + anchor.len;
                anchors.push(anchor);
            }
            None => old_pos += config.jump_step.max(1),
        }
    }

    anchors.retain(|anchor| {
        anchor.matches_mode(config) && anchor.confidence >= config.min_anchor_confidence
    });
    anchors
}

/// Hashes every `chunk`-wide window of the new side into a position table.
/// Positions are pushed in ascending order, so candidate lists stay sorted
/// and lookups are deterministic.
fn index_new_windows(after: &[Token], chunk: usize) -> HashMap<u64, Vec<u32>, RandomState> {
    let mut index: HashMap<u64, Vec<u32>, RandomState> =
        HashMap::with_capacity_and_hasher(after.len(), RandomState::new());
    let mut rolling = RollingHash::new(&after[..chunk]);
    index.entry(rolling.value()).or_default().push(0);
    for start in 1..=after.len() - chunk {
        rolling.slide(after[start - 1], after[start + chunk - 1]);
        index.entry(rolling.value()).or_default().push(start as u32);
    }
    index
}

fn span_unused(used: &[bool], start: usize, len: usize) -> bool {
    used[start..start + len].iter().all(|&flag| !flag)
}

/// Hunts ahead from a candidate start, then verifies and scores the match.
fn try_anchor(
    before: &[Token],
    after: &[Token],
    old_pos: usize,
    new_pos: usize,
    used: &[bool],
    config: &DiffConfig,
) -> Option<Anchor> {
    let hunt_confidence = hunt(before, after, old_pos, new_pos, used, config);
    if hunt_confidence < config.min_anchor_confidence {
        return None;
    }

    // Verify symbol by symbol from the first fragment. The hunt only proved
    // that chunk hashes line up; the extension is the ground truth and also
    // resolves hash collisions.
    let mut len = 0;
    while old_pos + len < before.len()
        && new_pos + len < after.len()
        && before[old_pos + len] == after[new_pos + len]
        && !used[new_pos + len]
    {
        len += 1;
    }
    if len < config.min_match_length {
        return None;
    }

    let drift = old_pos.abs_diff(new_pos);
    let max_expected_drift = 100.0_f64.max(0.1 * before.len().min(after.len()) as f64);
    let drift_conf = (1.0 - drift as f64 / max_expected_drift).max(0.0);
    let length_conf = (len as f64 / (2 * config.min_match_length) as f64).min(1.0);
    Some(Anchor {
        old_pos,
        new_pos,
        len,
        drift,
        drift_ratio: drift as f64 / len as f64,
        confidence: 0.3 * drift_conf + 0.7 * length_conf,
    })
}

/// Chunk-wise confidence pass. Starting from an initial hash hit, repeatedly
/// advances a full chunk on the old side and probes a bounded set of
/// `jump_step`-spaced offsets on the new side for a chunk with the same hash,
/// strictly beyond the previous fragment and not yet consumed. Stops once the
/// confirmed coverage reaches `min_match_length` or a probe fails.
///
/// The returned ratio divides confirmed coverage by the *expected* minimum
/// length, so a partially confirmed hunt can still clear the confidence bar;
/// the verifier's extension decides the final length either way.
fn hunt(
    before: &[Token],
    after: &[Token],
    old_start: usize,
    new_start: usize,
    used: &[bool],
    config: &DiffConfig,
) -> f64 {
    let chunk = config.hunt_chunk_size;
    let mut confirmed_chunks = 1;
    let mut old_pos = old_start;
    let mut new_pos = new_start;

    while confirmed_chunks * chunk < config.min_match_length {
        old_pos += chunk;
        if old_pos + chunk > before.len() {
            break;
        }
        let target = window_hash(&before[old_pos..old_pos + chunk]);
        let base = new_pos + chunk;
        let found = (0..HUNT_SCAN_OFFSETS)
            .map(|step| base + step * config.jump_step.max(1))
            .find(|&candidate| {
                candidate + chunk <= after.len()
                    && span_unused(used, candidate, chunk)
                    && window_hash(&after[candidate..candidate + chunk]) == target
            });
        match found {
            Some(candidate) => {
                new_pos = candidate;
                confirmed_chunks += 1;
            }
            None => break,
        }
    }

    (confirmed_chunks * chunk) as f64 / config.min_match_length as f64
}

/// Selects the non-overlapping monotone chain of anchors with the greatest
/// total covered length.
///
/// Classic weighted-LIS dynamic program over anchors sorted by old position:
/// `best[i]` is the best total length of a valid chain ending at `i`, with
/// predecessor pointers for reconstruction. The reconstructed chain is
/// re-validated pairwise; a chain that fails validation is discarded
/// entirely, since no anchors beat a corrupt chain.
pub(crate) fn select_chain(mut anchors: Vec<Anchor>) -> Vec<Anchor> {
    if anchors.is_empty() {
        return anchors;
    }
    anchors.sort_by_key(|anchor| anchor.old_pos);

    let mut best = vec![0usize; anchors.len()];
    let mut prev = vec![usize::MAX; anchors.len()];
    let mut chain_end = 0;
    for i in 0..anchors.len() {
        best[i] = anchors[i].len;
        for j in 0..i {
            let fits = anchors[i].old_pos >= anchors[j].old_pos + anchors[j].len
                && anchors[i].new_pos >= anchors[j].new_pos + anchors[j].len;
            if fits && best[j] + anchors[i].len > best[i] {
                best[i] = best[j] + anchors[i].len;
                prev[i] = j;
            }
        }
        if best[i] > best[chain_end] {
            chain_end = i;
        }
    }

    let mut order = Vec::new();
    let mut at = chain_end;
    loop {
        order.push(at);
        if prev[at] == usize::MAX {
            break;
        }
        at = prev[at];
    }
    order.reverse();

    let chain: Vec<Anchor> = order.into_iter().map(|i| anchors[i].clone()).collect();
    if validate_chain(&chain) {
        chain
    } else {
        Vec::new()
    }
}

fn validate_chain(chain: &[Anchor]) -> bool {
    chain.windows(2).all(|pair| {
        pair[1].old_pos >= pair[0].old_pos + pair[0].len
            && pair[1].new_pos >= pair[0].new_pos + pair[0].len
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(ids: impl IntoIterator<Item = u32>) -> Vec<Token> {
        ids.into_iter().map(Token).collect()
    }

    fn small_config() -> DiffConfig {
        DiffConfig {
            min_match_length: 4,
            hunt_chunk_size: 2,
            jump_step: 2,
            ..DiffConfig::default()
        }
    }

    #[test]
    fn finds_a_shifted_common_run() {
        // A 6-token run moved right by three positions amid unique noise.
        let run = 100..106;
        let before: Vec<_> = tokens((0..4).chain(run.clone()).chain(10..16));
        let after: Vec<_> = tokens((20..27).chain(run).chain(30..33));
        let anchors = find_anchors(&before, &after, &small_config(), false);
        assert_eq!(anchors.len(), 1);
        let anchor = &anchors[0];
        assert_eq!((anchor.old_pos, anchor.new_pos, anchor.len), (4, 7, 6));
        assert_eq!(anchor.drift, 3);
        assert!(anchor.confidence >= 0.8);
    }

    #[test]
    fn rejects_runs_shorter_than_min_match() {
        let before = tokens([1, 2, 3, 9, 9, 9]);
        let after = tokens([7, 1, 2, 3, 8, 8]);
        // Shared run "1 2 3" is below min_match_length = 4.
        assert!(find_anchors(&before, &after, &small_config(), false).is_empty());
    }

    #[test]
    fn invalid_parameters_yield_no_anchors() {
        let before = tokens(0..40);
        let after = tokens(0..40);
        let config = DiffConfig {
            hunt_chunk_size: 8,
            min_match_length: 4,
            ..DiffConfig::default()
        };
        assert!(find_anchors(&before, &after, &config, false).is_empty());
    }

    #[test]
    fn mode_filter_splits_by_drift() {
        let mut config = small_config();
        config.positional_anchor_max_drift = 1;
        let run = 100..106;
        let before: Vec<_> = tokens((0..4).chain(run.clone()).chain(10..16));
        let after: Vec<_> = tokens((20..27).chain(run).chain(30..33));

        config.anchor_search_mode = AnchorSearchMode::Positional;
        assert!(find_anchors(&before, &after, &config, false).is_empty());
        config.anchor_search_mode = AnchorSearchMode::Floating;
        assert_eq!(find_anchors(&before, &after, &config, false).len(), 1);
    }

    fn anchor(old_pos: usize, new_pos: usize, len: usize) -> Anchor {
        Anchor {
            old_pos,
            new_pos,
            len,
            drift: old_pos.abs_diff(new_pos),
            drift_ratio: 0.0,
            confidence: 1.0,
        }
    }

    #[test]
    fn chain_prefers_total_length_over_count() {
        // One long anchor conflicts with two short ones on the new side.
        let anchors = vec![anchor(0, 10, 8), anchor(10, 0, 3), anchor(20, 4, 3)];
        let chain = select_chain(anchors);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].len, 8);
    }

    #[test]
    fn chain_is_monotone_in_both_coordinates() {
        let anchors = vec![
            anchor(0, 0, 4),
            anchor(6, 2, 4), // overlaps the first on the new side
            anchor(10, 8, 4),
            anchor(20, 20, 4),
        ];
        let chain = select_chain(anchors);
        assert!(validate_chain(&chain));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].old_pos, 0);
        assert_eq!(chain[1].old_pos, 10);
        assert_eq!(chain[2].old_pos, 20);
    }
}
