//! Reserved-word tables
//!
//! The lexer classifies identifier-shaped spellings by probing a set of
//! small fixed hash tables: one for keywords, one for type names, one for
//! storage classes, and one for type qualifiers. Each table is an
//! independent [`SymbolTable`] built once per lexer and immutable afterwards.

use super::lexer::TokenKind;

/// Number of buckets in each table. Chains stay short at this scale.
pub const HASH_SIZE: usize = 10;

/// Keywords recognized by the language subset.
pub const KEYWORDS: [&str; 4] = ["if", "else", "while", "return"];

/// Type-name specifiers.
pub const TYPE_NAMES: [&str; 2] = ["int", "char"];

/// Storage-class specifiers.
pub const STORAGE_CLASSES: [&str; 2] = ["static", "extern"];

/// Type qualifiers.
pub const TYPE_QUALIFIERS: [&str; 1] = ["const"];

/// One reserved word.
///
/// The `definition` field is a placeholder for preprocessor macro bodies;
/// nothing reads it yet, but `install` keeps the update path alive so a
/// redefinition replaces it.
#[derive(Debug)]
pub struct Entry {
    spelling: String,
    definition: Option<String>,
    next: Option<Box<Entry>>,
}

impl Entry {
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }
}

/// Fixed-size hash table with separate chaining.
///
/// Uses a djb2-style hash (`hash * 33 XOR byte`) reduced modulo
/// [`HASH_SIZE`]. New entries go to the head of their bucket's chain, so
/// lookup finds the newest entry for a spelling first.
#[derive(Debug, Default)]
pub struct SymbolTable {
    buckets: [Option<Box<Entry>>; HASH_SIZE],
}

fn hash(spelling: &str) -> u64 {
    let mut value: u64 = 5831;
    for byte in spelling.bytes() {
        value = value.wrapping_mul(33) ^ u64::from(byte);
    }
    value
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(spelling: &str) -> usize {
        (hash(spelling) % HASH_SIZE as u64) as usize
    }

    /// Insert a spelling, or update the definition of an existing entry.
    /// Returns the installed entry.
    pub fn install(&mut self, spelling: &str, definition: Option<&str>) -> &Entry {
        let slot = Self::bucket(spelling);
        if let Some(found) = chain_position(&self.buckets[slot], spelling) {
            let mut entry = self.buckets[slot].as_deref_mut();
            for _ in 0..found {
                entry = entry.and_then(|e| e.next.as_deref_mut());
            }
            // The walk retraces a position that was just found, so the
            // chain cannot end early.
            match entry {
                Some(entry) => {
                    entry.definition = definition.map(str::to_owned);
                    entry
                }
                None => unreachable!("chain shortened during install"),
            }
        } else {
            let next = self.buckets[slot].take();
            let entry = Box::new(Entry {
                spelling: spelling.to_owned(),
                definition: definition.map(str::to_owned),
                next,
            });
            &*self.buckets[slot].insert(entry)
        }
    }

    /// Look up a spelling. Never mutates the table.
    pub fn lookup(&self, spelling: &str) -> Option<&Entry> {
        let mut head = self.buckets[Self::bucket(spelling)].as_deref();
        while let Some(entry) = head {
            if entry.spelling == spelling {
                return Some(entry);
            }
            head = entry.next.as_deref();
        }
        None
    }
}

/// Index of the entry for `spelling` within its chain, if present.
fn chain_position(head: &Option<Box<Entry>>, spelling: &str) -> Option<usize> {
    let mut cursor = head.as_deref();
    let mut index = 0;
    while let Some(entry) = cursor {
        if entry.spelling == spelling {
            return Some(index);
        }
        cursor = entry.next.as_deref();
        index += 1;
    }
    None
}

/// The full set of reserved-word tables consulted by the lexer.
#[derive(Debug)]
pub struct ReservedWords {
    keywords: SymbolTable,
    type_names: SymbolTable,
    storage_classes: SymbolTable,
    type_qualifiers: SymbolTable,
}

impl ReservedWords {
    /// Build all four tables from the fixed word lists.
    pub fn new() -> Self {
        let mut keywords = SymbolTable::new();
        for word in KEYWORDS {
            keywords.install(word, None);
        }
        let mut type_names = SymbolTable::new();
        for word in TYPE_NAMES {
            type_names.install(word, None);
        }
        let mut storage_classes = SymbolTable::new();
        for word in STORAGE_CLASSES {
            storage_classes.install(word, None);
        }
        let mut type_qualifiers = SymbolTable::new();
        for word in TYPE_QUALIFIERS {
            type_qualifiers.install(word, None);
        }
        Self {
            keywords,
            type_names,
            storage_classes,
            type_qualifiers,
        }
    }

    /// Classify an identifier-shaped spelling. Type names win over
    /// keywords; anything not reserved is an identifier.
    pub fn classify(&self, spelling: &str) -> TokenKind {
        if self.type_names.lookup(spelling).is_some() {
            TokenKind::DType
        } else if self.keywords.lookup(spelling).is_some() {
            TokenKind::Keyword
        } else if self.storage_classes.lookup(spelling).is_some() {
            TokenKind::StorageClass
        } else if self.type_qualifiers.lookup(spelling).is_some() {
            TokenKind::TypeQual
        } else {
            TokenKind::Ident
        }
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::new()
    }
}
