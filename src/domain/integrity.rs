use serde::Serialize;

/// Row whose foreign key does not resolve.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DanglingReference {
    /// Table holding the foreign key.
    pub table: &'static str,
    /// Primary key of the offending row, composite keys joined with `/`.
    pub row: String,
    /// Foreign key column that points nowhere.
    pub column: &'static str,
    /// Value found in that column.
    pub value: i32,
}

/// Composite key present more than once.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DuplicateKey {
    pub table: &'static str,
    pub key: (i32, i32),
    pub occurrences: usize,
}

/// Result of checking the referential invariants of the whole database.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct IntegrityReport {
    pub dangling_references: Vec<DanglingReference>,
    pub duplicate_keys: Vec<DuplicateKey>,
    /// Staff members whose manager chain loops back on itself, sorted.
    pub manager_cycles: Vec<i32>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty()
            && self.duplicate_keys.is_empty()
            && self.manager_cycles.is_empty()
    }
}
