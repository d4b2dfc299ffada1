#![deny(missing_docs)]
//! Nanga-diff is an anchor-guided (nanga means anchor in Swahili) diff
//! library for Rust. It computes an ordered edit program over two sequences
//! of opaque symbols: applying the program to the old sequence reproduces the
//! new one, operation by operation. Instead of committing to one algorithm,
//! the engine composes a small toolbox (a divide-and-conquer Myers search
//! with a linear-memory middle snake, a rolling-hash anchor finder that
//! splits huge problems at long verified matches, and a bounded-corridor
//! heuristic that keeps pathological inputs linear) behind pluggable,
//! name-registered strategies.
//!
//! # API Overview
//!
//! ## Computing a diff
//!
//! A [`DiffEngine`] holds the strategy registry. [`DiffEngine::diff`] takes
//! the two inputs as string slices, a debug flag, and an optional
//! [`DiffConfig`]; it interns both inputs into integer [`Token`]s, strips the
//! common prefix and suffix, runs the configured strategy on the interior
//! window, and returns the assembled [`EditScript`].
//!
//! ```
//! # use nanga_diff::{DiffEngine, EditKind};
//! #
//! let engine = DiffEngine::new();
//! let script = engine
//!     .diff(&["a", "b", "c"], &["a", "x", "c"], false, None)
//!     .unwrap();
//! let kinds: Vec<_> = script.iter().map(|op| op.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [EditKind::Equal, EditKind::Remove, EditKind::Add, EditKind::Equal]
//! );
//! assert_eq!(script[2].text, "x");
//! ```
//!
//! ## Choosing a strategy
//!
//! Three strategies are built in:
//!
//! * `"commonSES"` (default): a true shortest edit script wherever
//!   affordable; large windows are split at anchors first.
//! * `"patienceDiff"`: anchors on tokens unique to both sides, which often
//!   reads better around moved blocks.
//! * `"preserveStructure"`: a layered positional scan that favors keeping
//!   aligned regions aligned.
//!
//! Select one through [`DiffConfig::strategy_name`]; all other knobs (anchor
//! lengths, thresholds, corridor width) live in the same struct and default
//! to the stock tuning.
//!
//! ```
//! # use nanga_diff::{DiffConfig, DiffEngine};
//! #
//! let engine = DiffEngine::new();
//! let config = DiffConfig {
//!     strategy_name: "patienceDiff".to_owned(),
//!     ..DiffConfig::default()
//! };
//! let script = engine
//!     .diff(&["x", "a", "y"], &["z", "a", "w"], false, Some(config))
//!     .unwrap();
//! assert_eq!(script.len(), 5);
//! ```
//!
//! ## Plugging in a strategy
//!
//! A strategy is anything implementing [`Strategy`], including plain
//! closures. It receives the [`EngineHandle`] toolbox plus the trimmed token
//! windows and returns a [`TokenScript`] for exactly that window; the engine
//! wraps it with the trimmed prefix and suffix and resolves tokens back to
//! strings.
//!
//! ```
//! # use nanga_diff::{DiffEngine, DiffError, EngineHandle, Token, TokenScript};
//! #
//! let mut engine = DiffEngine::new();
//! engine.register(
//!     "replaceAll",
//!     |handle: &mut EngineHandle<'_>,
//!      before: &[Token],
//!      after: &[Token]|
//!      -> Result<TokenScript, DiffError> {
//!         let mut script = TokenScript::new();
//!         handle.push_removed(before, &mut script);
//!         handle.push_added(after, &mut script);
//!         Ok(script)
//!     },
//! );
//! ```
//!
//! The engine itself is stateless between calls and freely shareable across
//! threads; scratch memory lives in the per-call handle.

use std::fmt;

use crate::script::push_equal_run;
use crate::strategy::{builtin_strategies, StrategyTable};
use crate::util::strip_common_edges;

pub use crate::anchor::Anchor;
pub use crate::config::{AnchorSearchMode, DiffConfig, RARE_OCCURRENCE_LIMIT};
pub use crate::error::DiffError;
pub use crate::intern::{InternedInput, Interner, Token};
pub use crate::myers::MiddleSnake;
pub use crate::strategy::{EngineHandle, Strategy};

mod anchor;
mod config;
mod corridor;
mod error;
mod hash;
mod intern;
mod myers;
mod script;
mod strategy;
mod util;

#[cfg(test)]
mod tests;

/// The kind of one edit operation.
///
/// `Equal` and `Remove` consume one symbol from the old sequence; `Equal` and
/// `Add` emit one symbol to the new sequence. The three tags are totally
/// ordered so callers can sort or bucket operations by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditKind {
    /// The symbol is present in both sequences at this point.
    Equal,
    /// The symbol is inserted from the new sequence.
    Add,
    /// The symbol is removed from the old sequence.
    Remove,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditKind::Equal => "=",
            EditKind::Add => "+",
            EditKind::Remove => "-",
        })
    }
}

/// One edit operation, carrying the affected symbol's original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditOp {
    /// What this operation does.
    pub kind: EditKind,
    /// The symbol it does it to.
    pub text: String,
}

/// An ordered edit program. Applying it to the old input yields the new one.
pub type EditScript = Vec<EditOp>;

/// An edit program over interned tokens, as produced by strategies before
/// the engine resolves tokens back to strings.
pub type TokenScript = Vec<(EditKind, Token)>;

/// The diff engine: a registry of named strategies plus the dispatcher that
/// tokenizes, trims, and assembles the final script.
///
/// Engines are cheap to create and hold no per-call state; one engine can
/// serve any number of concurrent diffs.
pub struct DiffEngine {
    strategies: StrategyTable,
}

impl Default for DiffEngine {
    fn default() -> DiffEngine {
        DiffEngine::new()
    }
}

impl DiffEngine {
    /// Creates an engine with the built-in strategies (`commonSES`,
    /// `patienceDiff`, `preserveStructure`) registered.
    pub fn new() -> DiffEngine {
        DiffEngine {
            strategies: builtin_strategies(),
        }
    }

    /// Registers `strategy` under `name`, replacing any previous entry with
    /// that name.
    pub fn register(&mut self, name: impl Into<String>, strategy: impl Strategy + 'static) {
        self.strategies.insert(name.into(), Box::new(strategy));
    }

    /// Computes the edit script that transforms `before` into `after`.
    ///
    /// `options` defaults to [`DiffConfig::default`]. The `debug` flag only
    /// enables diagnostic [`tracing`] events and never changes the result.
    ///
    /// # Errors
    ///
    /// [`DiffError::UnknownStrategy`] if the configured strategy name is not
    /// registered; [`DiffError::InvalidRange`] if an internal range
    /// computation goes wrong (a bug, not bad input). No partial script is
    /// returned in either case.
    pub fn diff<S: AsRef<str>>(
        &self,
        before: &[S],
        after: &[S],
        debug: bool,
        options: Option<DiffConfig>,
    ) -> Result<EditScript, DiffError> {
        let config = options.unwrap_or_default();
        let input: InternedInput<&str> = InternedInput::new(
            before.iter().map(|token| token.as_ref()),
            after.iter().map(|token| token.as_ref()),
        );

        let mut old_window: &[Token] = &input.before;
        let mut new_window: &[Token] = &input.after;
        let (prefix, postfix) = if config.skip_trimming {
            (0, 0)
        } else {
            strip_common_edges(&mut old_window, &mut new_window)
        };

        let strategy = self
            .strategies
            .get(&config.strategy_name)
            .ok_or_else(|| DiffError::UnknownStrategy(config.strategy_name.clone()))?;
        if debug {
            tracing::debug!(
                strategy = %config.strategy_name,
                before = old_window.len(),
                after = new_window.len(),
                prefix,
                postfix,
                "computing diff"
            );
        }

        let mut handle = EngineHandle::new(&config, &input.interner, debug);
        let body = strategy.run(&mut handle, old_window, new_window)?;

        let mut script = TokenScript::with_capacity(prefix + body.len() + postfix);
        push_equal_run(&mut script, &input.before[..prefix]);
        script.extend(body);
        push_equal_run(&mut script, &input.before[input.before.len() - postfix..]);

        Ok(script
            .into_iter()
            .map(|(kind, token)| EditOp {
                kind,
                text: input.interner[token].to_owned(),
            })
            .collect())
    }
}
