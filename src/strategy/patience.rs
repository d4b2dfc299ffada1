//! Patience diff: anchor on tokens that are unique on both sides, chain them
//! with a longest increasing subsequence, recurse between the matches.
//!
//! Produces more readable scripts than a raw shortest edit script when the
//! inputs carry distinctive landmarks. Regions without any usable unique
//! token fall back to the structure-preserving local gap handler.

use ahash::RandomState;
use hashbrown::HashMap;

use crate::error::DiffError;
use crate::intern::Token;
use crate::script::{push_all_added, push_all_removed};
use crate::strategy::{EngineHandle, Strategy};
use crate::{EditKind, TokenScript};

pub(crate) struct PatienceDiff;

impl Strategy for PatienceDiff {
    fn run(
        &self,
        handle: &mut EngineHandle<'_>,
        before: &[Token],
        after: &[Token],
    ) -> Result<TokenScript, DiffError> {
        let mut script = TokenScript::new();
        recurse(handle, before, after, &mut script)?;
        Ok(script)
    }
}

fn recurse(
    handle: &mut EngineHandle<'_>,
    before: &[Token],
    after: &[Token],
    script: &mut TokenScript,
) -> Result<(), DiffError> {
    if before.is_empty() && after.is_empty() {
        return Ok(());
    }
    if before.is_empty() {
        push_all_added(script, after);
        return Ok(());
    }
    if after.is_empty() {
        push_all_removed(script, before);
        return Ok(());
    }

    let anchors = longest_increasing(&unique_pairs(before, after));
    if anchors.is_empty() {
        return handle.local_gap(before, after, script);
    }

    let mut old_pos = 0;
    let mut new_pos = 0;
    for &(anchor_old, anchor_new) in &anchors {
        recurse(
            handle,
            &before[old_pos..anchor_old],
            &after[new_pos..anchor_new],
            script,
        )?;
        script.push((EditKind::Equal, before[anchor_old]));
        old_pos = anchor_old + 1;
        new_pos = anchor_new + 1;
    }
    recurse(handle, &before[old_pos..], &after[new_pos..], script)
}

#[derive(Default)]
struct Occurrences {
    before: u32,
    after: u32,
    after_pos: usize,
}

/// Position pairs of tokens occurring exactly once on each side, in old-side
/// order. The map is only probed, never iterated, so the result does not
/// depend on hash order.
fn unique_pairs(before: &[Token], after: &[Token]) -> Vec<(usize, usize)> {
    let mut counts: HashMap<Token, Occurrences, RandomState> =
        HashMap::with_capacity_and_hasher(before.len() + after.len(), RandomState::new());
    for &token in before {
        counts.entry(token).or_default().before += 1;
    }
    for (pos, &token) in after.iter().enumerate() {
        let entry = counts.entry(token).or_default();
        entry.after += 1;
        entry.after_pos = pos;
    }
    before
        .iter()
        .enumerate()
        .filter_map(|(pos, token)| {
            let entry = &counts[token];
            (entry.before == 1 && entry.after == 1).then_some((pos, entry.after_pos))
        })
        .collect()
}

/// Longest strictly-increasing subsequence by new-side position, computed by
/// patience sorting with predecessor pointers.
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut pile_tops: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; pairs.len()];
    for (i, &(_, new_pos)) in pairs.iter().enumerate() {
        let pile = pile_tops.partition_point(|&top| pairs[top].1 < new_pos);
        if pile > 0 {
            prev[i] = Some(pile_tops[pile - 1]);
        }
        if pile == pile_tops.len() {
            pile_tops.push(i);
        } else {
            pile_tops[pile] = i;
        }
    }

    let mut chain = Vec::with_capacity(pile_tops.len());
    let mut at = pile_tops.last().copied();
    while let Some(i) = at {
        chain.push(pairs[i]);
        at = prev[i];
    }
    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lis_picks_the_longest_monotone_chain() {
        // new positions: 3 1 2 4 0 -> best chain is 1 2 4.
        let pairs = vec![(0, 3), (1, 1), (2, 2), (3, 4), (4, 0)];
        assert_eq!(longest_increasing(&pairs), vec![(1, 1), (2, 2), (3, 4)]);
    }

    #[test]
    fn lis_is_strictly_increasing() {
        let pairs = vec![(0, 2), (1, 2), (2, 2)];
        assert_eq!(longest_increasing(&pairs).len(), 1);
    }

    #[test]
    fn unique_pairs_ignores_repeated_tokens() {
        let before: Vec<_> = [5, 1, 5, 2].into_iter().map(Token).collect();
        let after: Vec<_> = [2, 5, 1].into_iter().map(Token).collect();
        // 5 repeats in before; 1 and 2 are unique on both sides.
        assert_eq!(unique_pairs(&before, &after), vec![(1, 2), (3, 0)]);
    }
}
