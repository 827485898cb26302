//! Thread-safe string interner for namespace-qualified grammar identifiers.
//!
//! Identifiers are canonicalized to `namespace:local` form before interning, so
//! two [`Symbol`] values compare equal iff the qualified names are identical.
//! Lookup/insert goes through a [`DashMap`] keyed by hash, matching the
//! lock-free, read-heavy design used for symbol interning elsewhere in this
//! codebase.

use ahash::AHasher;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

static STRING_TABLE: Lazy<StringTable> = Lazy::new(StringTable::new);

struct StringTable {
    map: DashMap<u64, Vec<(&'static str, u32)>>,
    strings: DashMap<u32, &'static str>,
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(256),
            strings: DashMap::with_capacity(256),
            next_index: AtomicU32::new(0),
        }
    }

    fn hash_of(s: &str) -> u64 {
        let mut hasher = AHasher::default();
        s.hash(&mut hasher);
        hasher.finish()
    }

    fn intern(&self, s: &str) -> u32 {
        let hash = Self::hash_of(s);
        if let Some(bucket) = self.map.get(&hash) {
            if let Some((_, idx)) = bucket.iter().find(|(existing, _)| *existing == s) {
                return *idx;
            }
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.map.entry(hash).or_default().push((leaked, idx));
        self.strings.insert(idx, leaked);
        idx
    }

    fn resolve(&self, idx: u32) -> &'static str {
        *self
            .strings
            .get(&idx)
            .expect("symbol index never outlives its interned string")
    }
}

/// An interned, namespace-qualified identifier.
///
/// Cheap to copy and compare; the backing string lives for the life of the
/// process once interned.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s` verbatim. Callers that hold an unqualified local name should
    /// use [`Symbol::qualified`] instead.
    pub fn intern(s: &str) -> Self {
        Symbol(STRING_TABLE.intern(s))
    }

    /// Intern `namespace:local`, the canonical form every grammar identifier
    /// is reduced to before it is stored in a rule table or cross-reference
    /// set.
    pub fn qualified(namespace: &str, local: &str) -> Self {
        if local.contains(':') {
            return Self::intern(local);
        }
        Self::intern(&format!("{namespace}:{local}"))
    }

    /// Split a string that already looks like `namespace:local` and intern it
    /// as-is, falling back to `default_namespace` when no namespace prefix is
    /// present.
    pub fn from_reference(reference: &str, default_namespace: &str) -> Self {
        match reference.split_once(':') {
            Some(_) => Self::intern(reference),
            None => Self::qualified(default_namespace, reference),
        }
    }

    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(self.0)
    }

    /// The `namespace` half of a qualified symbol.
    pub fn namespace(&self) -> &'static str {
        self.as_str().split_once(':').map(|(ns, _)| ns).unwrap_or("")
    }

    /// The `local` half of a qualified symbol.
    pub fn local(&self) -> &'static str {
        self.as_str().split_once(':').map(|(_, l)| l).unwrap_or(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
