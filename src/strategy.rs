//! Strategy registry, dispatcher plumbing and the toolbox handle passed to
//! every strategy.

use ahash::RandomState;
use hashbrown::HashMap;

use crate::anchor::{self, Anchor};
use crate::config::DiffConfig;
use crate::corridor;
use crate::error::DiffError;
use crate::intern::{Interner, Token};
use crate::myers::{self, middle_snake, trace, MiddleSnake, SnakeScratch};
use crate::script::{push_all_added, push_all_removed};
use crate::TokenScript;

pub(crate) mod common_ses;
pub(crate) mod patience;
pub(crate) mod preserve_structure;

/// A pluggable diff strategy.
///
/// A strategy receives the toolbox [`EngineHandle`] and the two trimmed token
/// windows and returns an edit script for exactly that window; the dispatcher
/// wraps it with the trimmed prefix and suffix. Any `Fn` with the matching
/// signature is a strategy, so closures can be registered directly.
pub trait Strategy: Send + Sync {
    /// Computes the edit script for the window.
    fn run(
        &self,
        handle: &mut EngineHandle<'_>,
        before: &[Token],
        after: &[Token],
    ) -> Result<TokenScript, DiffError>;
}

impl<F> Strategy for F
where
    F: Fn(&mut EngineHandle<'_>, &[Token], &[Token]) -> Result<TokenScript, DiffError>
        + Send
        + Sync,
{
    fn run(
        &self,
        handle: &mut EngineHandle<'_>,
        before: &[Token],
        after: &[Token],
    ) -> Result<TokenScript, DiffError> {
        self(handle, before, after)
    }
}

/// Name-keyed strategy table used by the dispatcher.
pub(crate) type StrategyTable = HashMap<String, Box<dyn Strategy>, RandomState>;

pub(crate) fn builtin_strategies() -> StrategyTable {
    let mut table = StrategyTable::with_capacity_and_hasher(3, RandomState::new());
    table.insert(
        "commonSES".to_owned(),
        Box::new(common_ses::CommonSes) as Box<dyn Strategy>,
    );
    table.insert(
        "patienceDiff".to_owned(),
        Box::new(patience::PatienceDiff) as Box<dyn Strategy>,
    );
    table.insert(
        "preserveStructure".to_owned(),
        Box::new(preserve_structure::PreserveStructure) as Box<dyn Strategy>,
    );
    table
}

/// The toolbox a strategy composes its behavior from.
///
/// The handle is scoped to one `diff` call: it borrows the resolved
/// configuration and the id map, and owns the middle-snake scratch buffers
/// that are reused across the recursion of this diff only. Nothing here is
/// shared between calls, so engines stay freely shareable across threads.
pub struct EngineHandle<'a> {
    config: &'a DiffConfig,
    interner: &'a Interner<&'a str>,
    debug: bool,
    scratch: SnakeScratch,
}

impl<'a> EngineHandle<'a> {
    pub(crate) fn new(
        config: &'a DiffConfig,
        interner: &'a Interner<&'a str>,
        debug: bool,
    ) -> EngineHandle<'a> {
        EngineHandle {
            config,
            interner,
            debug,
            scratch: SnakeScratch::default(),
        }
    }

    /// The fully resolved configuration of this diff.
    pub fn config(&self) -> &'a DiffConfig {
        self.config
    }

    /// The id map of this diff, for diagnostics.
    pub fn interner(&self) -> &'a Interner<&'a str> {
        self.interner
    }

    /// Whether diagnostic tracing was requested. Never changes the script.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Runs the anchor search with this diff's configuration.
    pub fn find_anchors(&self, before: &[Token], after: &[Token]) -> Vec<Anchor> {
        anchor::find_anchors(before, after, self.config, self.debug)
    }

    /// Runs the anchor search with an overlay configuration, as the layered
    /// strategies do for their global and micro passes.
    pub fn find_anchors_with(
        &self,
        before: &[Token],
        after: &[Token],
        config: &DiffConfig,
    ) -> Vec<Anchor> {
        anchor::find_anchors(before, after, config, self.debug)
    }

    /// Selects the best non-overlapping monotone chain from `anchors`.
    pub fn select_chain(&self, anchors: Vec<Anchor>) -> Vec<Anchor> {
        anchor::select_chain(anchors)
    }

    /// Searches a middle snake for the region using the shared scratch.
    pub fn middle_snake(&mut self, before: &[Token], after: &[Token]) -> Option<MiddleSnake> {
        middle_snake::search(before, after, &mut self.scratch)
    }

    /// Divide-and-conquer Myers over the region.
    pub fn recursive_myers(
        &mut self,
        before: &[Token],
        after: &[Token],
        script: &mut TokenScript,
    ) -> Result<(), DiffError> {
        myers::diff(before, after, self.config, &mut self.scratch, script, self.debug)
    }

    /// Precise traced Myers over the region; intended for small windows.
    pub fn precise_myers(&self, before: &[Token], after: &[Token], script: &mut TokenScript) {
        trace::diff(before, after, script);
    }

    /// Linear-time corridor walk over the region.
    pub fn corridor(&self, before: &[Token], after: &[Token], script: &mut TokenScript) {
        corridor::diff(before, after, self.config, script, self.debug);
    }

    /// Finds the next nearby matching position at or after
    /// `(old_start, new_start)`: first along the main diagonal for offsets in
    /// `[1, lookahead]`, then in a small off-diagonal neighborhood.
    pub fn local_anchor(
        &self,
        before: &[Token],
        after: &[Token],
        old_start: usize,
        new_start: usize,
        lookahead: usize,
    ) -> Option<(usize, usize)> {
        for offset in 1..=lookahead {
            let (i, j) = (old_start + offset, new_start + offset);
            if i >= before.len() || j >= after.len() {
                break;
            }
            if before[i] == after[j] {
                return Some((i, j));
            }
        }
        let max_radius = (lookahead / 2).min(10);
        for radius in 1..=max_radius {
            for delta in -(radius as isize)..=radius as isize {
                let i = old_start + radius;
                let j = new_start + (radius as isize + delta) as usize;
                if i >= before.len() || j >= after.len() {
                    continue;
                }
                if before[i] == after[j] {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Structure-preserving local gap handler (positional scan with micro
    /// anchors); also the fallback used by the patience strategy when no
    /// unique tokens line up.
    pub fn local_gap(
        &mut self,
        before: &[Token],
        after: &[Token],
        script: &mut TokenScript,
    ) -> Result<(), DiffError> {
        preserve_structure::positional_scan(self, before, after, script)
    }

    /// Emits the whole window as additions.
    pub fn push_added(&self, window: &[Token], script: &mut TokenScript) {
        push_all_added(script, window);
    }

    /// Emits the whole window as removals.
    pub fn push_removed(&self, window: &[Token], script: &mut TokenScript) {
        push_all_removed(script, window);
    }
}
