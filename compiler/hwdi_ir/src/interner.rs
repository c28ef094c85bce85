//! String interner for names appearing in a design.
//!
//! Interning happens while a design is constructed; debug-info extraction
//! and its consumers only read. Reads take a shared lock, so a finished
//! `DebugInfo` can be queried from several threads.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

impl InternTable {
    fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, Name::EMPTY);
        Self {
            map,
            strings: vec![empty],
        }
    }
}

/// Thread-safe string interner.
///
/// Strings are leaked on first insertion so lookups can hand out plain
/// `&str` without holding the lock.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner holding only the empty string.
    pub fn new() -> Self {
        let interner = Self {
            table: RwLock::new(InternTable::new()),
        };
        interner.pre_intern_dialect_names();
        interner
    }

    /// Try to intern a string, returning an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        {
            let table = self.table.read();
            if let Some(&name) = table.map.get(s) {
                return Ok(name);
            }
        }

        let mut table = self.table.write();
        // Another writer may have won the race.
        if let Some(&name) = table.map.get(s) {
            return Ok(name);
        }

        let raw = u32::try_from(table.strings.len()).map_err(|_| InternError::Overflow {
            count: table.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(raw);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics past `u32::MAX` distinct strings. Use `try_intern` to handle it.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Find an already interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied()
    }

    /// Look up the string for a name.
    ///
    /// # Panics
    /// Panics if `name` came from a different interner and is out of range.
    pub fn lookup(&self, name: Name) -> &str {
        let table = self.table.read();
        table.strings[name.index()]
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Returns `true` when only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Names every design mentions: port directions and the ops' dialect
    /// mnemonics used in diagnostics.
    fn pre_intern_dialect_names(&self) {
        const NAMES: &[&str] = &[
            "input",
            "output",
            "inout",
            "hw.module",
            "hw.module.extern",
            "hw.instance",
            "hw.wire",
            "hw.output",
            "dbg.variable",
            "dbg.scope",
            "dbg.moduleinfo",
            "dbg.enumdef",
        ];

        for name in NAMES {
            self.intern(name);
        }
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only access to interned names.
///
/// Lets reporting code accept either a borrowed interner or a shared one.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Interner shared between a design and everything built from it.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }

    /// Returns `true` if both handles point at the same interner.
    pub fn same_as(&self, other: &SharedInterner) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}
