use std::hash::Hash;
use std::ops::Index;

use ahash::RandomState;
use hashbrown::raw::RawTable;

/// A token represented as an interned integer.
///
/// A token is the smallest unit of change during a diff. The engine never
/// inspects the underlying data while diffing; tokens are compared by integer
/// equality only, which amortizes the cost of hashing and comparison to a
/// single pass over the inputs.
///
/// Identifiers are stable across both sides of one [`InternedInput`] (equal
/// data always receives the same id) but their numeric order is arbitrary.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Token(pub u32);

/// Two jointly interned token sequences plus the id map that translates
/// tokens back to their original data.
///
/// Both inputs are walked once; the first occurrence of a value assigns the
/// next id and appends to the table, so `before` and `after` share ids for
/// shared values. Strategies operate on the token vectors; the interner is
/// only consulted to reconstruct output.
#[derive(Default)]
pub struct InternedInput<T: Hash + Eq> {
    /// The old sequence as tokens.
    pub before: Vec<Token>,
    /// The new sequence as tokens.
    pub after: Vec<Token>,
    /// Maps tokens back to the interned values.
    pub interner: Interner<T>,
}

impl<T: Hash + Eq> InternedInput<T> {
    /// Interns `before` and `after` jointly.
    pub fn new<I, J>(before: I, after: J) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = T>,
        J::IntoIter: ExactSizeIterator,
    {
        let before = before.into_iter();
        let after = after.into_iter();
        let mut res = Self {
            before: Vec::with_capacity(before.len()),
            after: Vec::with_capacity(after.len()),
            interner: Interner::new(before.len() + after.len()),
        };
        res.update_before(before);
        res.update_after(after);
        res
    }

    /// Replaces the old sequence, reusing ids already handed out.
    pub fn update_before(&mut self, tokens: impl Iterator<Item = T>) {
        self.before.clear();
        self.before
            .extend(tokens.map(|token| self.interner.intern(token)));
    }

    /// Replaces the new sequence, reusing ids already handed out.
    pub fn update_after(&mut self, tokens: impl Iterator<Item = T>) {
        self.after.clear();
        self.after
            .extend(tokens.map(|token| self.interner.intern(token)));
    }
}

/// A hashtable based interner mapping values to [`Token`]s and back.
#[derive(Default)]
pub struct Interner<T: Hash + Eq> {
    tokens: Vec<T>,
    table: RawTable<Token>,
    hasher: RandomState,
}

impl<T: Hash + Eq> Interner<T> {
    /// Creates an interner with capacity for `num_tokens` values.
    pub fn new(num_tokens: usize) -> Self {
        Interner {
            tokens: Vec::with_capacity(num_tokens),
            table: RawTable::with_capacity(num_tokens),
            hasher: RandomState::new(),
        }
    }

    /// Interns `token`, returning the id it already has or assigning the
    /// next free one.
    pub fn intern(&mut self, token: T) -> Token {
        let hash = self.hasher.hash_one(&token);
        if let Some(&token) = self
            .table
            .get(hash, |&it| self.tokens[it.0 as usize] == token)
        {
            token
        } else {
            let interned = Token(self.tokens.len() as u32);
            self.table.insert(hash, interned, |&token| {
                self.hasher.hash_one(&self.tokens[token.0 as usize])
            });
            self.tokens.push(token);
            interned
        }
    }

    /// Number of distinct values interned so far.
    pub fn num_tokens(&self) -> u32 {
        self.tokens.len() as u32
    }
}

impl<T: Hash + Eq> Index<Token> for Interner<T> {
    type Output = T;
    fn index(&self, index: Token) -> &Self::Output {
        &self.tokens[index.0 as usize]
    }
}
