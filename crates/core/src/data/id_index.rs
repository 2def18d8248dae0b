use indexmap::IndexMap;

use super::table::Id;

/// Dense index over identifiers, in order of first appearance.
///
/// Every distinct identifier is assigned a consecutive 0-based code. This is
/// the lookup behind both the pedigree graph arena and recoding.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    codes: IndexMap<Id, usize>,
}

impl IdIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from identifiers, skipping nulls.
    ///
    /// # Examples
    /// ```
    /// use pedigree_integrity_core::data::{Id, IdIndex};
    ///
    /// let idx = IdIndex::from_ids([Some(Id::from("B")), None, Some(Id::from("A")), Some(Id::from("B"))]);
    /// assert_eq!(idx.len(), 2);
    /// assert_eq!(idx.code(&Id::from("A")), Some(1));
    /// ```
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Option<Id>>,
    {
        let mut idx = Self::new();
        for id in ids.into_iter().flatten() {
            idx.insert(id);
        }
        idx
    }

    /// Insert an identifier, returning its code (existing or new).
    pub fn insert(&mut self, id: Id) -> usize {
        let next = self.codes.len();
        *self.codes.entry(id).or_insert(next)
    }

    /// Code of an identifier, or `None` if it was never inserted.
    pub fn code(&self, id: &Id) -> Option<usize> {
        self.codes.get(id).copied()
    }

    /// Identifier for a code, or `None` if the code is out of range.
    pub fn id(&self, code: usize) -> Option<&Id> {
        self.codes.get_index(code).map(|(id, _)| id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.codes.contains_key(id)
    }

    /// Identifiers in code order.
    pub fn ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.codes.keys()
    }

    /// Returns the number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no identifiers have been inserted.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
