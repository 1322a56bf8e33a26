//! Per-caret engine state.
//!
//! The host owns carets; the engine keeps a `CaretContext` next to each one
//! for the Vim bookkeeping the host knows nothing about. Entries follow the
//! host's caret set: created when a caret appears, dropped when it goes.

use std::collections::BTreeMap;

/// Host-assigned caret identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaretId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretContext {
    pub offset: usize,
    /// Fixed end of a Visual/Select selection (the head is `offset`).
    pub selection_start: Option<usize>,
    /// Intended visual column for vertical motions; `usize::MAX` sticks to line end.
    pub last_column: Option<usize>,
    /// Where the current Insert session began.
    pub insert_start: Option<usize>,
}

impl CaretContext {
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaretTable {
    entries: BTreeMap<CaretId, CaretContext>,
}

impl CaretTable {
    /// Create the entry for `id` unless it already exists.
    pub fn add(&mut self, id: CaretId, offset: usize) -> &mut CaretContext {
        self.entries.entry(id).or_insert_with(|| CaretContext::at(offset))
    }

    pub fn remove(&mut self, id: CaretId) -> Option<CaretContext> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: CaretId) -> Option<&CaretContext> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: CaretId) -> Option<&mut CaretContext> {
        self.entries.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<CaretId> {
        self.entries.keys().copied().collect()
    }

    /// Make the table mirror the host's carets, refreshing offsets.
    pub fn sync(&mut self, live: &[(CaretId, usize)]) {
        self.entries.retain(|id, _| live.iter().any(|(l, _)| l == id));
        for &(id, offset) in live {
            self.add(id, offset).offset = offset;
        }
    }

    /// Caret ids sorted by ascending offset (ties by id).
    pub fn ordered_by_offset(&self) -> Vec<CaretId> {
        let mut ids: Vec<(usize, CaretId)> =
            self.entries.iter().map(|(id, c)| (c.offset, *id)).collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn clear_selections(&mut self) {
        for ctx in self.entries.values_mut() {
            ctx.selection_start = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_adds_updates_and_drops() {
        let mut t = CaretTable::default();
        t.add(CaretId(1), 4).last_column = Some(3);
        t.add(CaretId(2), 9);
        t.sync(&[(CaretId(1), 6), (CaretId(3), 0)]);
        assert_eq!(t.len(), 2);
        let c1 = t.get(CaretId(1)).unwrap();
        assert_eq!((c1.offset, c1.last_column), (6, Some(3)));
        assert!(t.get(CaretId(2)).is_none());
        assert_eq!(t.ordered_by_offset(), vec![CaretId(3), CaretId(1)]);
    }
}
