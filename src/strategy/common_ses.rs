//! The default strategy: a true shortest edit script wherever affordable.
//!
//! Large windows are first broken at anchors; each remaining gap is then
//! dispatched by size, so the expensive precise search only ever sees small
//! regions.

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::intern::Token;
use crate::script::{flush_replaced, push_equal_run};
use crate::strategy::{EngineHandle, Strategy};
use crate::TokenScript;

pub(crate) struct CommonSes;

impl Strategy for CommonSes {
    fn run(
        &self,
        handle: &mut EngineHandle<'_>,
        before: &[Token],
        after: &[Token],
    ) -> Result<TokenScript, DiffError> {
        let config = handle.config();
        let mut script = TokenScript::new();

        if before.len() + after.len() < config.quick_diff_threshold || !config.use_anchors {
            handle.recursive_myers(before, after, &mut script)?;
            return Ok(script);
        }

        let chain = handle.select_chain(handle.find_anchors(before, after));
        if handle.debug() {
            tracing::debug!(anchors = chain.len(), "anchor chain selected");
        }
        if chain.is_empty() {
            handle.recursive_myers(before, after, &mut script)?;
            return Ok(script);
        }

        let mut old_pos = 0;
        let mut new_pos = 0;
        for anchor in &chain {
            fill_gap(
                handle,
                &before[old_pos..anchor.old_pos],
                &after[new_pos..anchor.new_pos],
                &mut script,
            )?;
            push_equal_run(&mut script, &before[anchor.old_pos..anchor.old_pos + anchor.len]);
            old_pos = anchor.old_pos + anchor.len;
            new_pos = anchor.new_pos + anchor.len;
        }
        fill_gap(handle, &before[old_pos..], &after[new_pos..], &mut script)?;
        Ok(script)
    }
}

/// Dispatches one gap by size: nothing, skew flush, corridor, or the
/// recursive search (which itself hands small windows to the precise one).
fn fill_gap(
    handle: &mut EngineHandle<'_>,
    before: &[Token],
    after: &[Token],
    script: &mut TokenScript,
) -> Result<(), DiffError> {
    let size = before.len() + after.len();
    if size == 0 {
        return Ok(());
    }
    if DiffConfig::is_pathological(before.len(), after.len()) {
        if handle.debug() {
            tracing::debug!(
                before = before.len(),
                after = after.len(),
                "pathological gap flushed"
            );
        }
        flush_replaced(script, before, after);
        return Ok(());
    }
    if size > handle.config().huge_diff_threshold {
        handle.corridor(before, after, script);
        return Ok(());
    }
    handle.recursive_myers(before, after, script)
}
