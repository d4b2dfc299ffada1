//! Precise Myers search with a full backtracking trace.
//!
//! The classic forward O(ND) algorithm, keeping a snapshot of the
//! furthest-reaching frontier for every `d`. Once the far corner is reached
//! the snapshots are walked backwards to reconstruct the exact shortest edit
//! script. Memory is O((N+M)^2) in the worst case, which is why the driver
//! only sends windows below `quick_diff_threshold` here.

use crate::intern::Token;
use crate::script::{push_all_added, push_all_removed, Script};
use crate::EditKind;

/// Appends the shortest edit script for `before -> after` to `script`.
pub(crate) fn diff(before: &[Token], after: &[Token], script: &mut Script) {
    let n = before.len();
    let m = after.len();
    if n == 0 {
        push_all_added(script, after);
        return;
    }
    if m == 0 {
        push_all_removed(script, before);
        return;
    }

    let max = n + m;
    let offset = max as isize;
    // frontier[k + offset] is the furthest x on diagonal k.
    let mut frontier = vec![0usize; 2 * max + 1];
    let mut snapshots: Vec<Vec<usize>> = Vec::new();
    let mut reached = 0;

    'search: for d in 0..=max as isize {
        // The snapshot taken before round d is what the backtrack needs to
        // undo round d's single edit.
        snapshots.push(frontier.clone());
        for k in (-d..=d).step_by(2) {
            let down = k == -d
                || (k != d && frontier[(k - 1 + offset) as usize] < frontier[(k + 1 + offset) as usize]);
            let mut x = if down {
                frontier[(k + 1 + offset) as usize]
            } else {
                frontier[(k - 1 + offset) as usize] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && before[x] == after[y] {
                x += 1;
                y += 1;
            }
            frontier[(k + offset) as usize] = x;
            if x >= n && y >= m {
                reached = d;
                break 'search;
            }
        }
    }

    // Backtrack from (n, m) through the snapshots, emitting in reverse.
    let mut rev: Vec<(EditKind, Token)> = Vec::new();
    let mut x = n;
    let mut y = m;
    for d in (1..=reached).rev() {
        let snapshot = &snapshots[d as usize];
        let k = x as isize - y as isize;
        let down = k == -d
            || (k != d && snapshot[(k - 1 + offset) as usize] < snapshot[(k + 1 + offset) as usize]);
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_x = snapshot[(prev_k + offset) as usize];
        let prev_y = (prev_x as isize - prev_k) as usize;

        // Matching run between the previous edit and (x, y).
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            rev.push((EditKind::Equal, before[x]));
        }
        if down {
            y -= 1;
            rev.push((EditKind::Add, after[y]));
        } else {
            x -= 1;
            rev.push((EditKind::Remove, before[x]));
        }
    }
    while x > 0 {
        x -= 1;
        y -= 1;
        rev.push((EditKind::Equal, before[x]));
    }
    debug_assert_eq!(y, 0);

    script.extend(rev.into_iter().rev());
}
