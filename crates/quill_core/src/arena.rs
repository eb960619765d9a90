//! Arena allocation for syntax trees.
//!
//! Syntax nodes reference their children by `&'a` borrows into one bump
//! arena. Dropping the arena frees a whole compilation unit at once.

use bumpalo::Bump;

/// Owns the bump allocator a syntax tree lives in.
pub struct SyntaxArena {
    bump: Bump,
}

impl SyntaxArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create an arena with the specified initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Move the items of a `Vec` into an arena slice.
    #[inline]
    pub fn alloc_slice<T>(&self, items: Vec<T>) -> &[T] {
        self.bump.alloc_slice_fill_iter(items)
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for SyntaxArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_slice_keeps_order() {
        let arena = SyntaxArena::new();
        let slice = arena.alloc_slice(vec![3, 1, 2]);
        assert_eq!(slice, &[3, 1, 2]);
        assert!(arena.allocated_bytes() > 0);
    }
}
