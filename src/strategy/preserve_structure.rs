//! Structure-preserving strategy: a four-level hybrid that favors keeping
//! aligned regions aligned over squeezing out the last edit.
//!
//! L1 carves the window at long floating anchors; L2 walks each gap
//! positionally, re-synchronizing through the local-anchor probe; L3 solves
//! the micro-gaps between probe hits with a fine-grained anchor pass; L4 is
//! the corridor walker for whatever resists all of the above.

use ahash::RandomState;
use hashbrown::HashSet;

use crate::config::{AnchorSearchMode, DiffConfig};
use crate::error::DiffError;
use crate::intern::Token;
use crate::script::{push_all_added, push_all_removed, push_equal_run};
use crate::strategy::{EngineHandle, Strategy};
use crate::{EditKind, TokenScript};

pub(crate) struct PreserveStructure;

impl Strategy for PreserveStructure {
    fn run(
        &self,
        handle: &mut EngineHandle<'_>,
        before: &[Token],
        after: &[Token],
    ) -> Result<TokenScript, DiffError> {
        let mut script = TokenScript::new();
        global_pass(handle, before, after, &mut script)?;
        Ok(script)
    }
}

/// L1: split the window at long floating anchors, then scan the gaps.
fn global_pass(
    handle: &mut EngineHandle<'_>,
    before: &[Token],
    after: &[Token],
    script: &mut TokenScript,
) -> Result<(), DiffError> {
    let config = handle.config();
    if config.use_anchors && before.len() + after.len() >= config.quick_diff_threshold {
        let overlay = DiffConfig {
            min_match_length: config.min_match_length * 2,
            anchor_search_mode: AnchorSearchMode::Floating,
            ..config.clone()
        };
        let chain = handle.select_chain(handle.find_anchors_with(before, after, &overlay));
        if !chain.is_empty() {
            if handle.debug() {
                tracing::debug!(anchors = chain.len(), "global structure anchors");
            }
            let mut old_pos = 0;
            let mut new_pos = 0;
            for anchor in &chain {
                positional_scan(
                    handle,
                    &before[old_pos..anchor.old_pos],
                    &after[new_pos..anchor.new_pos],
                    script,
                )?;
                push_equal_run(script, &before[anchor.old_pos..anchor.old_pos + anchor.len]);
                old_pos = anchor.old_pos + anchor.len;
                new_pos = anchor.new_pos + anchor.len;
            }
            return positional_scan(handle, &before[old_pos..], &after[new_pos..], script);
        }
    }
    positional_scan(handle, before, after, script)
}

/// L2: walk both cursors forward, bridging mismatches with the local-anchor
/// probe and handing the micro-gaps in between to L3.
pub(crate) fn positional_scan(
    handle: &mut EngineHandle<'_>,
    before: &[Token],
    after: &[Token],
    script: &mut TokenScript,
) -> Result<(), DiffError> {
    let lookahead = handle.config().local_lookahead;
    let mut old_pos = 0;
    let mut new_pos = 0;
    while old_pos < before.len() && new_pos < after.len() {
        if before[old_pos] == after[new_pos] {
            script.push((EditKind::Equal, before[old_pos]));
            old_pos += 1;
            new_pos += 1;
            continue;
        }
        match handle.local_anchor(before, after, old_pos, new_pos, lookahead) {
            Some((anchor_old, anchor_new)) => {
                micro_gap(
                    handle,
                    &before[old_pos..anchor_old],
                    &after[new_pos..anchor_new],
                    script,
                )?;
                script.push((EditKind::Equal, before[anchor_old]));
                old_pos = anchor_old + 1;
                new_pos = anchor_new + 1;
            }
            None => break,
        }
    }
    push_all_removed(script, &before[old_pos..]);
    push_all_added(script, &after[new_pos..]);
    Ok(())
}

/// L3: a micro-gap either shares no symbols at all (solved by the corridor
/// walker right away, cheap over quality), or gets a fine-grained anchor pass
/// whose sub-gaps recurse here; L4 catches the rest.
fn micro_gap(
    handle: &mut EngineHandle<'_>,
    before: &[Token],
    after: &[Token],
    script: &mut TokenScript,
) -> Result<(), DiffError> {
    if before.is_empty() && after.is_empty() {
        return Ok(());
    }
    if !shares_any_symbol(before, after) {
        handle.corridor(before, after, script);
        return Ok(());
    }

    let config = handle.config();
    if before.len() + after.len() >= config.quick_diff_threshold / 2 {
        let overlay = DiffConfig {
            min_match_length: 2,
            hunt_chunk_size: 2,
            jump_step: 2,
            ..config.clone()
        };
        let chain = handle.select_chain(handle.find_anchors_with(before, after, &overlay));
        if !chain.is_empty() {
            let mut old_pos = 0;
            let mut new_pos = 0;
            for anchor in &chain {
                micro_gap(
                    handle,
                    &before[old_pos..anchor.old_pos],
                    &after[new_pos..anchor.new_pos],
                    script,
                )?;
                push_equal_run(script, &before[anchor.old_pos..anchor.old_pos + anchor.len]);
                old_pos = anchor.old_pos + anchor.len;
                new_pos = anchor.new_pos + anchor.len;
            }
            return micro_gap(handle, &before[old_pos..], &after[new_pos..], script);
        }
    }

    handle.corridor(before, after, script);
    Ok(())
}

fn shares_any_symbol(before: &[Token], after: &[Token]) -> bool {
    let (small, large) = if before.len() <= after.len() {
        (before, after)
    } else {
        (after, before)
    };
    let symbols: HashSet<Token, RandomState> = small.iter().copied().collect();
    large.iter().any(|token| symbols.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_windows_share_nothing() {
        let before: Vec<_> = (0..4).map(Token).collect();
        let after: Vec<_> = (10..13).map(Token).collect();
        assert!(!shares_any_symbol(&before, &after));
        assert!(shares_any_symbol(&before, &[Token(2)]));
        assert!(!shares_any_symbol(&before, &[]));
    }
}
