//! Divide-and-conquer Myers driver.
//!
//! Splits a region around a middle snake and recurses on both halves,
//! delegating small windows to the precise traced search and hopeless ones
//! to the corridor heuristic.

use crate::config::DiffConfig;
use crate::corridor;
use crate::error::DiffError;
use crate::intern::Token;
use crate::script::{push_all_added, push_all_removed, push_equal_run, Script};

pub(crate) mod middle_snake;
pub(crate) mod trace;

pub use middle_snake::MiddleSnake;
pub(crate) use middle_snake::SnakeScratch;

/// Appends an edit script for the region to `script`.
///
/// The recursion tree alternates middle-snake splits with base cases:
/// empty sides become pure runs, windows below `quick_diff_threshold` go to
/// the precise traced search, and regions where the snake search comes back
/// empty fall through to the corridor walker. A snake that fails the
/// defensive symbol check is discarded and the region re-run through the
/// precise search instead.
pub(crate) fn diff(
    before: &[Token],
    after: &[Token],
    config: &DiffConfig,
    scratch: &mut SnakeScratch,
    script: &mut Script,
    debug: bool,
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
    if before.len() + after.len() < config.quick_diff_threshold {
        trace::diff(before, after, script);
        return Ok(());
    }

    let snake = match middle_snake::search(before, after, scratch) {
        Some(snake) if !snake.is_empty() => snake,
        _ => {
            corridor::diff(before, after, config, script, debug);
            return Ok(());
        }
    };

    if snake.u > before.len() || snake.x > snake.u {
        return Err(DiffError::InvalidRange {
            start: snake.x,
            end: snake.u,
            len: before.len(),
        });
    }
    if snake.v > after.len() || snake.y > snake.v {
        return Err(DiffError::InvalidRange {
            start: snake.y,
            end: snake.v,
            len: after.len(),
        });
    }
    if !validate_snake(&snake, before, after) {
        // Should be impossible; recover by solving the region precisely.
        if debug {
            tracing::debug!(?snake, "middle snake failed validation, re-running precise search");
        }
        trace::diff(before, after, script);
        return Ok(());
    }

    diff(
        &before[..snake.x],
        &after[..snake.y],
        config,
        scratch,
        script,
        debug,
    )?;
    push_equal_run(script, &before[snake.x..snake.u]);
    diff(
        &before[snake.u..],
        &after[snake.v..],
        config,
        scratch,
        script,
        debug,
    )
}

fn validate_snake(snake: &MiddleSnake, before: &[Token], after: &[Token]) -> bool {
    snake.u - snake.x == snake.v - snake.y
        && before[snake.x..snake.u] == after[snake.y..snake.v]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditKind;

    fn tokens(ids: impl IntoIterator<Item = u32>) -> Vec<Token> {
        ids.into_iter().map(Token).collect()
    }

    fn run(before: &[Token], after: &[Token]) -> Script {
        let mut script = Script::new();
        let mut scratch = SnakeScratch::default();
        diff(
            before,
            after,
            &DiffConfig::default(),
            &mut scratch,
            &mut script,
            false,
        )
        .unwrap();
        script
    }

    fn check_round_trip(before: &[Token], after: &[Token], script: &Script) {
        let mut old = before.iter();
        let mut new = after.iter();
        for &(kind, token) in script {
            match kind {
                EditKind::Equal => {
                    assert_eq!(old.next(), Some(&token));
                    assert_eq!(new.next(), Some(&token));
                }
                EditKind::Remove => assert_eq!(old.next(), Some(&token)),
                EditKind::Add => assert_eq!(new.next(), Some(&token)),
            }
        }
        assert_eq!(old.next(), None);
        assert_eq!(new.next(), None);
    }

    #[test]
    fn large_window_splits_and_round_trips() {
        // 120 tokens with an insertion and a replacement, well above the
        // quick threshold so the snake split actually runs.
        let before = tokens(0..120);
        let after = tokens((0..50).chain(200..210).chain(50..90).chain(95..120));
        let script = run(&before, &after);
        check_round_trip(&before, &after, &script);
        let removed = script
            .iter()
            .filter(|(kind, _)| *kind == EditKind::Remove)
            .count();
        assert_eq!(removed, 5);
    }

    #[test]
    fn small_window_is_solved_precisely() {
        let before = tokens([1, 2, 3, 4]);
        let after = tokens([1, 9, 3, 4]);
        let script = run(&before, &after);
        check_round_trip(&before, &after, &script);
        assert_eq!(script.len(), 5);
    }

    #[test]
    fn disjoint_windows_round_trip() {
        let before = tokens(0..100);
        let after = tokens(1000..1100);
        let script = run(&before, &after);
        check_round_trip(&before, &after, &script);
        assert_eq!(script.len(), 200);
    }
}
