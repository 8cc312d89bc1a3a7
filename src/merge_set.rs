//! Merge set: the ordered selection of documents pending a merge
//!
//! Owned by a client session and passed around explicitly. The server keeps
//! no counterpart. Because a listing refresh may invalidate identifiers of
//! renamed or moved documents, the owner clears the set on every refresh.

use crate::types::{DocumentEntry, DocumentId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSet {
    ids: Vec<DocumentId>,
}

impl MergeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id`. Duplicates are allowed and merge the document twice.
    pub fn add(&mut self, id: DocumentId) {
        self.ids.push(id);
    }

    /// Remove the first occurrence of `id`; returns whether anything was removed
    pub fn remove(&mut self, id: &DocumentId) -> bool {
        match self.position(id) {
            Some(ix) => {
                self.ids.remove(ix);
                true
            }
            None => false,
        }
    }

    /// Shift the first occurrence of `id` by `offset` places
    ///
    /// The new position is clamped to the ends of the list. Returns whether
    /// `id` was present.
    pub fn reorder(&mut self, id: &DocumentId, offset: isize) -> bool {
        let Some(ix) = self.position(id) else {
            return false;
        };
        let item = self.ids.remove(ix);
        let target = (ix as isize)
            .saturating_add(offset)
            .clamp(0, self.ids.len() as isize) as usize;
        self.ids.insert(target, item);
        true
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// The selection in merge order
    pub fn snapshot(&self) -> Vec<DocumentId> {
        self.ids.clone()
    }

    /// Full entries for the selection, in merge order, looked up in `listing`
    ///
    /// Identifiers missing from the listing are left out.
    pub fn resolve(&self, listing: &[DocumentEntry]) -> Vec<DocumentEntry> {
        crate::document::resolver::select_ordered(listing, &self.ids)
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }
}
