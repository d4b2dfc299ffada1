#![no_main]

use libfuzzer_sys::arbitrary;
use libfuzzer_sys::fuzz_target;
use nanga_diff::{DiffConfig, DiffEngine, EditKind};

#[derive(arbitrary::Arbitrary, Debug)]
struct Input<'a> {
    before: Vec<&'a str>,
    after: Vec<&'a str>,
    skip_trimming: bool,
}

/// Applies every built-in strategy to arbitrary inputs and checks that the
/// resulting script replays the old sequence into the new one, consuming
/// symbols in order.
fn do_fuzz(input: Input<'_>) {
    let engine = DiffEngine::new();
    for strategy in ["commonSES", "patienceDiff", "preserveStructure"] {
        let config = DiffConfig {
            strategy_name: strategy.to_owned(),
            skip_trimming: input.skip_trimming,
            ..DiffConfig::default()
        };
        let script = engine
            .diff(&input.before, &input.after, false, Some(config))
            .expect("built-in strategy must not fail");

        let mut old = input.before.iter();
        let mut replayed = Vec::new();
        for op in &script {
            match op.kind {
                EditKind::Equal => {
                    assert_eq!(*old.next().unwrap(), op.text);
                    replayed.push(op.text.as_str());
                }
                EditKind::Remove => assert_eq!(*old.next().unwrap(), op.text),
                EditKind::Add => replayed.push(op.text.as_str()),
            }
        }
        assert_eq!(old.next(), None);
        assert_eq!(replayed, input.after);
    }
}

fuzz_target!(|input: Input<'_>| {
    do_fuzz(input);
});
