//! Offset-stable marks.
//!
//! A mark is a character offset that follows the text it points at across
//! edits. Multi-caret commands resolve every caret's range up front and pin
//! both ends with marks, so later carets see offsets already translated by
//! earlier carets' mutations.

/// Handle to a live mark. Handles are never reused within one `MarkSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(u64);

#[derive(Debug, Clone, Default)]
pub struct MarkSet {
    next: u64,
    slots: Vec<(MarkId, usize)>,
}

impl MarkSet {
    pub fn create(&mut self, offset: usize) -> MarkId {
        let id = MarkId(self.next);
        self.next += 1;
        self.slots.push((id, offset));
        id
    }

    pub fn get(&self, id: MarkId) -> Option<usize> {
        self.slots.iter().find(|(m, _)| *m == id).map(|(_, off)| *off)
    }

    pub fn set(&mut self, id: MarkId, offset: usize) {
        if let Some(slot) = self.slots.iter_mut().find(|(m, _)| *m == id) {
            slot.1 = offset;
        }
    }

    /// Releasing an unknown or already released mark is a no-op.
    pub fn release(&mut self, id: MarkId) {
        self.slots.retain(|(m, _)| *m != id);
    }

    pub fn live(&self) -> usize {
        self.slots.len()
    }

    /// `len` characters were inserted at `at`; marks strictly after `at` move right.
    pub fn on_insert(&mut self, at: usize, len: usize) {
        for (_, off) in self.slots.iter_mut() {
            if *off > at {
                *off += len;
            }
        }
    }

    /// `[start, end)` was removed; marks inside collapse to `start`, later marks move left.
    pub fn on_remove(&mut self, start: usize, end: usize) {
        let len = end - start;
        for (_, off) in self.slots.iter_mut() {
            if *off >= end {
                *off -= len;
            } else if *off > start {
                *off = start;
            }
        }
    }
}
