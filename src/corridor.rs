//! Bounded-corridor greedy walker.
//!
//! A linear-time fallback for gaps where the precise algorithms would
//! explode. Two cursors walk the region, kept inside a band of diagonals
//! around the starting one; a small lookahead and a rarity test decide which
//! side to consume when the symbols disagree. The output is valid but not
//! guaranteed minimal.

use crate::config::{DiffConfig, RARE_OCCURRENCE_LIMIT};
use crate::intern::Token;
use crate::script::{flush_replaced, Script};
use crate::EditKind;

/// Appends a heuristic edit script for the region to `script`.
///
/// Terminates in at most `N + M + 100` iterations. Regions with a
/// pathological length ratio are flushed as a removal run followed by an
/// addition run without walking at all.
pub(crate) fn diff(
    before: &[Token],
    after: &[Token],
    config: &DiffConfig,
    script: &mut Script,
    debug: bool,
) {
    let n = before.len();
    let m = after.len();
    if DiffConfig::is_pathological(n, m) {
        if debug {
            tracing::debug!(n, m, "skew bailout, flushing region");
        }
        flush_replaced(script, before, after);
        return;
    }

    let size = n + m;
    let corridor = config.corridor_width.min(10.max(size / 100)) as isize;
    let lookahead = config.lookahead.min(5.max(size / 200));
    let max_iterations = size + 100;
    let stall_window = 50.max(max_iterations / 10);

    let mut old_pos = 0;
    let mut new_pos = 0;
    let mut iterations = 0;
    let mut last_progress = 0;

    loop {
        if old_pos >= n && new_pos >= m {
            return;
        }
        iterations += 1;
        if iterations > max_iterations || iterations - last_progress > stall_window {
            // Stalled or over budget: flush whatever is left and bail.
            if debug {
                tracing::trace!(old_pos, new_pos, iterations, "corridor walker stalled");
            }
            flush_replaced(script, &before[old_pos.min(n)..], &after[new_pos.min(m)..]);
            return;
        }
        let progress_mark = (old_pos, new_pos);

        if old_pos >= n {
            script.push((EditKind::Add, after[new_pos]));
            new_pos += 1;
        } else if new_pos >= m {
            script.push((EditKind::Remove, before[old_pos]));
            old_pos += 1;
        } else if before[old_pos] == after[new_pos] {
            script.push((EditKind::Equal, before[old_pos]));
            old_pos += 1;
            new_pos += 1;
        } else {
            let diagonal = new_pos as isize - old_pos as isize;
            if diagonal.abs() > corridor {
                // Out of the corridor: force a corrective edit back towards
                // the starting diagonal.
                if diagonal > 0 {
                    script.push((EditKind::Remove, before[old_pos]));
                    old_pos += 1;
                } else {
                    script.push((EditKind::Add, after[new_pos]));
                    new_pos += 1;
                }
            } else {
                step(before, after, &mut old_pos, &mut new_pos, lookahead, script);
            }
        }

        if (old_pos, new_pos) != progress_mark {
            last_progress = iterations;
        }
    }
}

/// One mismatch step: lookahead for each side's symbol on the other side,
/// then the rarity rule, then consume from the longer remainder.
fn step(
    before: &[Token],
    after: &[Token],
    old_pos: &mut usize,
    new_pos: &mut usize,
    lookahead: usize,
    script: &mut Script,
) {
    let old_token = before[*old_pos];
    let new_token = after[*new_pos];
    let old_found_at = find_within(&after[*new_pos..], old_token, lookahead);
    let new_found_at = find_within(&before[*old_pos..], new_token, lookahead);

    let add = match (old_found_at, new_found_at) {
        // The old symbol reappears soon on the new side: the tokens in
        // between are insertions.
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (Some(near_new), Some(near_old)) => near_new <= near_old,
        (None, None) => {
            let old_rare = is_rare(&before[*old_pos..], old_token);
            let new_rare = is_rare(&after[*new_pos..], new_token);
            if old_rare != new_rare {
                // Keep the rare symbol in play, consume its common
                // counterpart.
                old_rare
            } else {
                n_remaining(after, *new_pos) > n_remaining(before, *old_pos)
            }
        }
    };

    if add {
        script.push((EditKind::Add, after[*new_pos]));
        *new_pos += 1;
    } else {
        script.push((EditKind::Remove, before[*old_pos]));
        *old_pos += 1;
    }
}

fn n_remaining(side: &[Token], pos: usize) -> usize {
    side.len() - pos
}

fn find_within(window: &[Token], token: Token, lookahead: usize) -> Option<usize> {
    window
        .iter()
        .take(lookahead)
        .position(|&candidate| candidate == token)
}

/// A token is rare when it occurs at most [`RARE_OCCURRENCE_LIMIT`] times in
/// the remaining window. Counting stops one past the limit.
fn is_rare(window: &[Token], token: Token) -> bool {
    let mut count = 0;
    for &candidate in window {
        if candidate == token {
            count += 1;
            if count > RARE_OCCURRENCE_LIMIT {
                return false;
            }
        }
    }
    count <= RARE_OCCURRENCE_LIMIT
}
