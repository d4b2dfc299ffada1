use expect_test::{expect, Expect};
use pretty_assertions::assert_eq;

use crate::{DiffConfig, DiffEngine, DiffError, EditKind, EditScript, EngineHandle, Token, TokenScript};

const STRATEGIES: [&str; 3] = ["commonSES", "patienceDiff", "preserveStructure"];

fn config_for(strategy: &str) -> DiffConfig {
    DiffConfig {
        strategy_name: strategy.to_owned(),
        ..DiffConfig::default()
    }
}

/// Applies `script` to `before`, checking the typing invariant along the
/// way: EQUAL/REMOVE must name the next unconsumed old symbol, ADD the next
/// new one (which the returned sequence itself verifies).
fn apply(before: &[&str], script: &EditScript) -> Vec<String> {
    let mut old = before.iter();
    let mut out = Vec::new();
    for op in script {
        match op.kind {
            EditKind::Equal => {
                assert_eq!(*old.next().expect("EQUAL past end of old"), op.text);
                out.push(op.text.clone());
            }
            EditKind::Remove => {
                assert_eq!(*old.next().expect("REMOVE past end of old"), op.text);
            }
            EditKind::Add => out.push(op.text.clone()),
        }
    }
    assert_eq!(old.next(), None, "script did not consume all of old");
    out
}

fn check_all_strategies(before: &[&str], after: &[&str]) {
    let engine = DiffEngine::new();
    for strategy in STRATEGIES {
        let script = engine
            .diff(before, after, false, Some(config_for(strategy)))
            .unwrap();
        assert_eq!(apply(before, &script), after, "strategy {strategy}");
    }
}

fn fmt_script(script: &EditScript) -> String {
    script
        .iter()
        .map(|op| format!("{} {}\n", op.kind, op.text))
        .collect()
}

fn assert_script(before: &[&str], after: &[&str], config: Option<DiffConfig>, expected: Expect) {
    let engine = DiffEngine::new();
    let script = engine.diff(before, after, false, config).unwrap();
    assert_eq!(apply(before, &script), after);
    expected.assert_eq(&fmt_script(&script));
}

#[test]
fn replacement_and_insertion_in_context() {
    assert_script(
        &["a", "b", "c", "d", "e"],
        &["a", "X", "c", "d", "Y", "e"],
        None,
        expect![[r#"
            = a
            - b
            + X
            = c
            = d
            + Y
            = e
        "#]],
    );
}

#[test]
fn pure_insertion_between_context() {
    assert_script(
        &["line 1", "line 3"],
        &["line 1", "line 2", "line 3"],
        None,
        expect![[r#"
            = line 1
            + line 2
            = line 3
        "#]],
    );
}

#[test]
fn patience_anchors_on_unique_landmarks() {
    assert_script(
        &["noise 1", "A", "noise 2", "noise 3", "B", "noise 4"],
        &["noise 5", "A", "noise 6", "B", "noise 7"],
        Some(config_for("patienceDiff")),
        expect![[r#"
            - noise 1
            + noise 5
            = A
            - noise 2
            - noise 3
            + noise 6
            = B
            - noise 4
            + noise 7
        "#]],
    );
}

#[test]
fn block_swap_under_all_strategies() {
    let before = ["A", "B", "C", "D"];
    let after = ["A", "C", "D", "B"];
    check_all_strategies(&before, &after);
    for strategy in STRATEGIES {
        assert_script(
            &before,
            &after,
            Some(config_for(strategy)),
            expect![[r#"
                = A
                - B
                = C
                = D
                + B
            "#]],
        );
    }
}

#[test]
fn large_replacement_touches_every_token() {
    let before = vec!["a"; 400];
    let after = vec!["b"; 450];
    let engine = DiffEngine::new();
    let script = engine.diff(&before, &after, false, None).unwrap();
    assert_eq!(apply(&before, &script), after);
    assert_eq!(script.len(), 400 + 450);
    assert!(script.iter().all(|op| op.kind != EditKind::Equal));
}

#[test]
fn moved_context_stays_equal_outside_the_change() {
    // Unique prefix and suffix, replaced middle: the prefix and suffix must
    // come out exclusively as EQUAL (trimming plus anchors), the middle as
    // the only edited region.
    let prefix: Vec<String> = (0..200).map(|i| format!("ctx head {i}")).collect();
    let suffix: Vec<String> = (0..200).map(|i| format!("ctx tail {i}")).collect();
    let old_mid: Vec<String> = (0..100).map(|i| format!("old {i}")).collect();
    let new_mid: Vec<String> = (0..120).map(|i| format!("new {i}")).collect();

    let before: Vec<&str> = prefix.iter().chain(&old_mid).chain(&suffix).map(String::as_str).collect();
    let after: Vec<&str> = prefix.iter().chain(&new_mid).chain(&suffix).map(String::as_str).collect();

    let engine = DiffEngine::new();
    let script = engine.diff(&before, &after, false, None).unwrap();
    assert_eq!(apply(&before, &script), after);
    for op in &script {
        if op.text.starts_with("ctx") {
            assert_eq!(op.kind, EditKind::Equal);
        } else {
            assert_ne!(op.kind, EditKind::Equal);
        }
    }
}

#[test]
fn anchor_chain_splits_a_large_window() {
    // Disjoint noise around a long shared block that drifted forward: the
    // block must come out as one EQUAL run and nothing else may match.
    let before: Vec<String> = (0..90)
        .map(|i| format!("left {i}"))
        .chain((0..100).map(|i| format!("block {i}")))
        .chain((0..30).map(|i| format!("mid {i}")))
        .collect();
    let after: Vec<String> = (0..100)
        .map(|i| format!("right {i}"))
        .chain((0..100).map(|i| format!("block {i}")))
        .chain((0..20).map(|i| format!("end {i}")))
        .collect();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    let engine = DiffEngine::new();
    let script = engine.diff(&before, &after, false, None).unwrap();
    assert_eq!(apply(&before, &script), after);
    let equal_count = script
        .iter()
        .filter(|op| op.kind == EditKind::Equal)
        .count();
    assert_eq!(equal_count, 100);
}

#[test]
fn identity_diff_is_all_equal() {
    let input: Vec<String> = (0..80).map(|i| format!("line {i}")).collect();
    let input: Vec<&str> = input.iter().map(String::as_str).collect();
    let engine = DiffEngine::new();
    for strategy in STRATEGIES {
        let script = engine
            .diff(&input, &input, false, Some(config_for(strategy)))
            .unwrap();
        assert!(script.iter().all(|op| op.kind == EditKind::Equal));
        assert_eq!(apply(&input, &script), input);
    }
}

#[test]
fn empty_inputs() {
    let side = ["a", "b", "c"];
    let engine = DiffEngine::new();

    let script = engine.diff::<&str>(&[], &side, false, None).unwrap();
    assert!(script.iter().all(|op| op.kind == EditKind::Add));
    assert_eq!(apply(&[], &script), side);

    let script = engine.diff::<&str>(&side, &[], false, None).unwrap();
    assert!(script.iter().all(|op| op.kind == EditKind::Remove));
    assert!(apply(&side, &script).is_empty());

    assert!(engine.diff::<&str>(&[], &[], false, None).unwrap().is_empty());
}

#[test]
fn reversed_input_round_trips() {
    let before: Vec<String> = (0..120).map(|i| format!("line {i}")).collect();
    let mut after = before.clone();
    after.reverse();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();
    check_all_strategies(&before, &after);
}

#[test]
fn no_common_symbols_round_trips() {
    let before: Vec<String> = (0..70).map(|i| format!("old {i}")).collect();
    let after: Vec<String> = (0..70).map(|i| format!("new {i}")).collect();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();
    check_all_strategies(&before, &after);
}

#[test]
fn windows_around_the_quick_threshold() {
    // Interior sizes 0, 1 and exactly quick_diff_threshold.
    check_all_strategies(&["x"], &["y"]);
    check_all_strategies(&["x"], &[]);
    let before: Vec<String> = (0..32).map(|i| format!("a {i}")).collect();
    let after: Vec<String> = (0..32).map(|i| format!("b {i}")).collect();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();
    check_all_strategies(&before, &after);
}

#[test]
fn skip_trimming_still_round_trips() {
    let before: Vec<String> = (0..60).map(|i| format!("shared {i}")).collect();
    let mut after = before.clone();
    after[30] = "edited".to_owned();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    let engine = DiffEngine::new();
    for strategy in STRATEGIES {
        let config = DiffConfig {
            skip_trimming: true,
            ..config_for(strategy)
        };
        let script = engine.diff(&before, &after, false, Some(config)).unwrap();
        assert_eq!(apply(&before, &script), after, "strategy {strategy}");
    }
}

#[test]
fn debug_flag_does_not_change_the_script() {
    let before: Vec<String> = (0..150).map(|i| format!("line {i}")).collect();
    let after: Vec<String> = (0..150)
        .map(|i| {
            if i % 7 == 0 {
                format!("edited {i}")
            } else {
                format!("line {i}")
            }
        })
        .collect();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    let engine = DiffEngine::new();
    for strategy in STRATEGIES {
        let quiet = engine
            .diff(&before, &after, false, Some(config_for(strategy)))
            .unwrap();
        let traced = engine
            .diff(&before, &after, true, Some(config_for(strategy)))
            .unwrap();
        assert_eq!(quiet, traced, "strategy {strategy}");
    }
}

#[test]
fn deterministic_across_engines() {
    let before: Vec<String> = (0..200).map(|i| format!("token {}", i * 7 % 13)).collect();
    let after: Vec<String> = (0..210).map(|i| format!("token {}", i * 5 % 11)).collect();
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    for strategy in STRATEGIES {
        let first = DiffEngine::new()
            .diff(&before, &after, false, Some(config_for(strategy)))
            .unwrap();
        let second = DiffEngine::new()
            .diff(&before, &after, false, Some(config_for(strategy)))
            .unwrap();
        assert_eq!(first, second, "strategy {strategy}");
        assert_eq!(apply(&before, &first), after);
    }
}

#[test]
fn unknown_strategy_is_rejected() {
    let engine = DiffEngine::new();
    let config = config_for("does-not-exist");
    assert_eq!(
        engine.diff(&["a"], &["b"], false, Some(config)),
        Err(DiffError::UnknownStrategy("does-not-exist".to_owned()))
    );
}

#[test]
fn registered_closures_are_dispatched() {
    let mut engine = DiffEngine::new();
    engine.register(
        "replaceAll",
        |handle: &mut EngineHandle<'_>,
         before: &[Token],
         after: &[Token]|
         -> Result<TokenScript, DiffError> {
            let mut script = TokenScript::new();
            handle.push_removed(before, &mut script);
            handle.push_added(after, &mut script);
            Ok(script)
        },
    );
    let script = engine
        .diff(
            &["same", "old", "same"],
            &["same", "new", "same"],
            false,
            Some(config_for("replaceAll")),
        )
        .unwrap();
    // Trimming still wraps the plugin's body.
    assert_eq!(
        fmt_script(&script),
        "= same\n- old\n+ new\n= same\n"
    );
}

#[test]
fn toolbox_primitives_compose() {
    // A minimal strategy built only from handle primitives: one snake split
    // with precise searches on both halves.
    let mut engine = DiffEngine::new();
    engine.register(
        "snakeSplit",
        |handle: &mut EngineHandle<'_>,
         before: &[Token],
         after: &[Token]|
         -> Result<TokenScript, DiffError> {
            let mut script = TokenScript::new();
            match handle.middle_snake(before, after) {
                Some(snake) if !snake.is_empty() => {
                    handle.precise_myers(&before[..snake.x], &after[..snake.y], &mut script);
                    script.extend(
                        before[snake.x..snake.u].iter().map(|&t| (EditKind::Equal, t)),
                    );
                    handle.precise_myers(&before[snake.u..], &after[snake.v..], &mut script);
                }
                _ => handle.precise_myers(before, after, &mut script),
            }
            Ok(script)
        },
    );

    let before: Vec<String> = (0..40).map(|i| format!("line {i}")).collect();
    let mut after = before.clone();
    after[7] = "edited".to_owned();
    after.insert(20, "inserted".to_owned());
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    let config = DiffConfig {
        strategy_name: "snakeSplit".to_owned(),
        skip_trimming: true,
        ..DiffConfig::default()
    };
    let script = engine.diff(&before, &after, false, Some(config)).unwrap();
    assert_eq!(apply(&before, &script), after);
}

#[test]
fn anchors_can_be_disabled() {
    let before: Vec<String> = (0..300).map(|i| format!("line {i}")).collect();
    let mut after = before.clone();
    after.insert(150, "inserted".to_owned());
    let before: Vec<&str> = before.iter().map(String::as_str).collect();
    let after: Vec<&str> = after.iter().map(String::as_str).collect();

    let engine = DiffEngine::new();
    let config = DiffConfig {
        use_anchors: false,
        skip_trimming: true,
        ..DiffConfig::default()
    };
    let script = engine.diff(&before, &after, false, Some(config)).unwrap();
    assert_eq!(apply(&before, &script), after);
    assert_eq!(
        script.iter().filter(|op| op.kind == EditKind::Add).count(),
        1
    );
}
