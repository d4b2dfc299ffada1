//! Internal edit-script representation.
//!
//! Strategies build scripts as `(EditKind, Token)` pairs; the dispatcher
//! resolves tokens to their original data through the interner only once the
//! whole script is assembled.

use crate::intern::Token;
use crate::EditKind;

/// An ordered edit program over interned tokens.
pub(crate) type Script = Vec<(EditKind, Token)>;

/// Emits the whole window as additions.
pub(crate) fn push_all_added(script: &mut Script, window: &[Token]) {
    script.extend(window.iter().map(|&token| (EditKind::Add, token)));
}

/// Emits the whole window as removals.
pub(crate) fn push_all_removed(script: &mut Script, window: &[Token]) {
    script.extend(window.iter().map(|&token| (EditKind::Remove, token)));
}

/// Emits the whole window as an unchanged run.
pub(crate) fn push_equal_run(script: &mut Script, window: &[Token]) {
    script.extend(window.iter().map(|&token| (EditKind::Equal, token)));
}

/// Flushes a whole region as removals followed by additions. Used by the
/// skew bailout and the corridor walker's stall recovery.
pub(crate) fn flush_replaced(script: &mut Script, before: &[Token], after: &[Token]) {
    push_all_removed(script, before);
    push_all_added(script, after);
}
