//! String interner backing [`super::Symbol`].
//!
//! HKSL compiles one source file, on one thread, per run. A `thread_local!`
//! `RefCell`-guarded table gives O(1) interning without the lock-free
//! machinery a concurrent compiler needs.
//!
//! # Memory layout
//!
//! Strings are allocated on the heap and leaked to obtain `'static`
//! references: the table lives for the whole run and entries are never
//! removed, so there's nothing to reclaim.

use rustc_hash::FxHashMap;
use std::cell::RefCell;

use super::{InternerStats, Symbol, KNOWN_SYMBOLS};

pub(crate) struct StringTable {
    strings: Vec<&'static str>,
    map: FxHashMap<&'static str, u32>,
    hits: usize,
    misses: usize,
}

impl StringTable {
    fn new() -> Self {
        let mut table = Self {
            strings: Vec::with_capacity(KNOWN_SYMBOLS.len()),
            map: FxHashMap::default(),
            hits: 0,
            misses: 0,
        };
        for (idx, keyword) in KNOWN_SYMBOLS.iter().enumerate() {
            let symbol = table.intern_new(keyword);
            debug_assert_eq!(symbol.index as usize, idx);
        }
        table
    }

    fn intern_new(&mut self, s: &str) -> Symbol {
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = self.strings.len() as u32;
        self.strings.push(leaked);
        self.map.insert(leaked, index);
        Symbol { index }
    }

    pub(crate) fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&index) = self.map.get(s) {
            self.hits += 1;
            return Symbol { index };
        }
        self.misses += 1;
        self.intern_new(s)
    }

    pub(crate) fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.strings.get(symbol.index as usize).copied()
    }

    pub(crate) fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.strings.len(),
            capacity: self.map.capacity(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

thread_local! {
    static TABLE: RefCell<StringTable> = RefCell::new(StringTable::new());
}

pub(crate) fn with_table<R>(f: impl FnOnce(&mut StringTable) -> R) -> R {
    TABLE.with(|table| f(&mut table.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::super::Symbol;

    #[test]
    fn interning_same_string_returns_same_symbol() {
        let a = Symbol::intern("shade");
        let b = Symbol::intern("shade");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_different_strings_returns_different_symbols() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("my_variable_123");
        assert_eq!(sym.as_str(), "my_variable_123");
    }

    #[test]
    fn known_keywords_are_pre_interned_with_stable_indices() {
        assert_eq!(Symbol::intern("fn"), super::super::KW_FN);
        assert_eq!(Symbol::intern("let"), super::super::KW_LET);
        assert_eq!(Symbol::intern("float2"), super::super::TY_FLOAT2);
    }

    #[test]
    fn handles_empty_and_unicode_strings() {
        let empty = Symbol::intern("");
        assert_eq!(empty.as_str(), "");

        let unicode = Symbol::intern("こんにちは");
        assert_eq!(unicode.as_str(), "こんにちは");
    }
}
