//! Host editing surface and the in-memory reference host.
//!
//! The engine never talks to a concrete editor. Everything it needs from the
//! host is the `HostSurface` trait: character access, enumerable carets with
//! optional selections, offset-stable marks, text edits, registers and a bell.
//! `EditorModel` implements it over a `core_text::Buffer` and is the host used
//! by the CLI and the test-suite.
//!
//! Notifications:
//! * Every caret or selection change on `EditorModel` raises a `HostEvent`,
//!   whether it came from a `user_*` call or from the engine through the
//!   trait. Events go synchronously into the attached `SelectionListener`,
//!   exactly like editor callbacks fire from inside the mutating call.
//! * The listener consults the engine's suppression guard, so the engine's own
//!   mutations never come back as input. Without an attached listener events
//!   are dropped.
//!
//! Invariants (hold after every public call):
//! * At least one caret exists; removing the last caret is refused.
//! * Caret and selection offsets are marks in the buffer, so edits made for
//!   one caret translate every other caret.
//! * Stored selections are ordered (`start <= end`).

use anyhow::Result;
use core_state::{CaretId, Registers, SuppressionGuard};
use core_text::{Buffer, MarkId, TextSource};
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub mod events;
pub mod listener;
pub mod marked;

pub use events::{EventSource, HostEvent};
pub use listener::SelectionListener;
pub use marked::{MarkedText, MarkedTextError, parse_marked, render_marked};

/// What the engine consumes from the host editor.
pub trait HostSurface {
    /// Read-only character access and offset/line conversion.
    fn text(&self) -> &dyn TextSource;

    fn caret_ids(&self) -> Vec<CaretId>;
    fn caret_offset(&self, caret: CaretId) -> Option<usize>;
    /// Move a caret programmatically. Does not touch its selection.
    fn move_caret(&mut self, caret: CaretId, offset: usize);
    /// Half-open selection `[start, end)` of `caret`, if any.
    fn selection(&self, caret: CaretId) -> Option<(usize, usize)>;
    fn set_selection(&mut self, caret: CaretId, start: usize, end: usize);
    fn remove_selection(&mut self, caret: CaretId);

    fn create_mark(&mut self, offset: usize) -> MarkId;
    fn mark_offset(&self, mark: MarkId) -> Option<usize>;
    fn release_mark(&mut self, mark: MarkId);

    /// Remove `[start, end)` and return the removed text.
    fn delete_range(&mut self, start: usize, end: usize) -> String;
    fn insert_text(&mut self, offset: usize, text: &str);

    fn registers(&self) -> &Registers;
    fn registers_mut(&mut self) -> &mut Registers;

    /// Audible feedback for failed motions and unmapped keys.
    fn bell(&mut self);

    /// Notifications that passed the listener, oldest first.
    fn take_events(&mut self) -> Vec<HostEvent>;
}

#[derive(Debug, Clone, Copy)]
struct CaretSlot {
    head: MarkId,
    selection: Option<(MarkId, MarkId)>,
}

#[derive(Debug)]
pub struct EditorModel {
    buffer: Buffer,
    carets: BTreeMap<CaretId, CaretSlot>,
    next_caret: u64,
    registers: Registers,
    listener: Option<SelectionListener>,
    bells: usize,
}

impl EditorModel {
    /// Model over `text` with a single caret at offset 0.
    pub fn new(text: &str) -> Result<Self> {
        let mut model = Self::empty(Buffer::from_str("[scratch]", text)?);
        model.spawn_caret(0);
        Ok(model)
    }

    /// Model from `{caret}` / `{selection}` notation. The n-th selection
    /// belongs to the n-th caret; a selection without a caret gets one at its end.
    pub fn from_marked(input: &str) -> Result<Self> {
        let marked = parse_marked(input)?;
        let mut model = Self::empty(Buffer::from_str("[scratch]", &marked.text)?);
        for &offset in &marked.carets {
            model.spawn_caret(offset);
        }
        for (i, &(start, end)) in marked.selections.iter().enumerate() {
            let id = match model.carets.keys().nth(i) {
                Some(id) => *id,
                None => model.spawn_caret(end),
            };
            model.store_selection(id, start, end);
        }
        if model.carets.is_empty() {
            model.spawn_caret(0);
        }
        Ok(model)
    }

    fn empty(buffer: Buffer) -> Self {
        Self {
            buffer,
            carets: BTreeMap::new(),
            next_caret: 0,
            registers: Registers::new(),
            listener: None,
            bells: 0,
        }
    }

    fn spawn_caret(&mut self, offset: usize) -> CaretId {
        let id = CaretId(self.next_caret);
        self.next_caret += 1;
        let head = self.buffer.create_mark(offset);
        self.carets.insert(
            id,
            CaretSlot {
                head,
                selection: None,
            },
        );
        id
    }

    /// Route notifications into a listener gated by `guard`.
    pub fn attach_listener(&mut self, guard: SuppressionGuard) {
        self.listener = Some(SelectionListener::new(guard));
    }

    fn emit(&mut self, event: HostEvent) {
        match self.listener.as_mut() {
            Some(listener) => listener.notify(event),
            None => trace!(target: "model.listener", ?event, "no_listener"),
        }
    }

    pub fn suppressed_events(&self) -> usize {
        self.listener.as_ref().map_or(0, SelectionListener::suppressed)
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn contents(&self) -> String {
        self.buffer.text()
    }

    pub fn bells(&self) -> usize {
        self.bells
    }

    /// Lowest caret id; the caret user gestures act on by default.
    pub fn primary_caret(&self) -> Option<CaretId> {
        self.carets.keys().next().copied()
    }

    /// Render the document with `{caret}` and `{selection}` markers.
    pub fn to_marked(&self) -> String {
        let carets: Vec<usize> = self
            .carets
            .keys()
            .filter_map(|id| self.caret_offset(*id))
            .collect();
        let selections: Vec<(usize, usize)> = self
            .carets
            .keys()
            .filter_map(|id| self.selection(*id))
            .filter(|(s, e)| s < e)
            .collect();
        render_marked(&self.buffer.text(), &carets, &selections)
    }

    fn store_selection(&mut self, caret: CaretId, start: usize, end: usize) {
        let (start, end) = (start.min(end), start.max(end));
        let Some(slot) = self.carets.get(&caret).copied() else {
            return;
        };
        let marks = match slot.selection {
            Some((s, e)) => {
                self.buffer.set_mark(s, start);
                self.buffer.set_mark(e, end);
                (s, e)
            }
            None => (self.buffer.create_mark(start), self.buffer.create_mark(end)),
        };
        if let Some(slot) = self.carets.get_mut(&caret) {
            slot.selection = Some(marks);
        }
    }

    /// Drop the selection marks; returns true when a selection existed.
    fn clear_selection(&mut self, caret: CaretId) -> bool {
        let Some((s, e)) = self.carets.get_mut(&caret).and_then(|slot| slot.selection.take())
        else {
            return false;
        };
        self.buffer.release_mark(s);
        self.buffer.release_mark(e);
        true
    }

    fn set_head(&mut self, caret: CaretId, offset: usize) -> Option<usize> {
        let head = self.carets.get(&caret)?.head;
        self.buffer.set_mark(head, offset);
        self.buffer.mark_offset(head)
    }

    // ---------------------------------------------------------------------------------------------
    // User gestures. These are what a real editor reports through its callbacks.
    // ---------------------------------------------------------------------------------------------

    /// Keyboard navigation outside the engine: collapses the selection.
    pub fn user_move_caret(&mut self, caret: CaretId, offset: usize) {
        let Some(offset) = self.set_head(caret, offset) else {
            return;
        };
        if self.clear_selection(caret) {
            self.emit(HostEvent::SelectionChanged {
                caret,
                start: offset,
                end: offset,
                source: EventSource::Keyboard,
            });
        }
        self.emit(HostEvent::CaretMoved { caret, offset });
    }

    /// Select `[anchor, head)` (either order) with the caret at `head`.
    pub fn user_select(&mut self, caret: CaretId, anchor: usize, head: usize, source: EventSource) {
        if self.set_head(caret, head).is_none() {
            return;
        }
        self.store_selection(caret, anchor, head);
        let (start, end) = (anchor.min(head), anchor.max(head));
        debug!(target: "model.listener", caret = caret.0, start, end, ?source, "user_select");
        self.emit(HostEvent::SelectionChanged {
            caret,
            start,
            end,
            source,
        });
    }

    pub fn user_click(&mut self, caret: CaretId, offset: usize, clicks: u8) {
        let Some(offset) = self.set_head(caret, offset) else {
            return;
        };
        if self.clear_selection(caret) {
            self.emit(HostEvent::SelectionChanged {
                caret,
                start: offset,
                end: offset,
                source: EventSource::Mouse,
            });
        }
        self.emit(HostEvent::MouseClicked {
            caret,
            offset,
            clicks,
        });
    }

    pub fn user_drag_start(&mut self, caret: CaretId) {
        self.emit(HostEvent::MouseDragStarted { caret });
    }

    /// Extend a drag selection; reported like any mouse selection.
    pub fn user_drag_to(&mut self, caret: CaretId, anchor: usize, head: usize) {
        self.user_select(caret, anchor, head, EventSource::Mouse);
    }

    pub fn user_release(&mut self, caret: CaretId) {
        self.emit(HostEvent::MouseReleased { caret });
    }

    pub fn add_caret(&mut self, offset: usize) -> CaretId {
        let id = self.spawn_caret(offset);
        let offset = self.caret_offset(id).unwrap_or(offset);
        self.emit(HostEvent::CaretAdded { caret: id, offset });
        id
    }

    /// Remove a secondary caret. The last remaining caret cannot be removed.
    pub fn remove_caret(&mut self, caret: CaretId) -> bool {
        if self.carets.len() <= 1 || !self.carets.contains_key(&caret) {
            return false;
        }
        self.clear_selection(caret);
        if let Some(slot) = self.carets.remove(&caret) {
            self.buffer.release_mark(slot.head);
        }
        self.emit(HostEvent::CaretRemoved { caret });
        true
    }
}

impl HostSurface for EditorModel {
    fn text(&self) -> &dyn TextSource {
        &self.buffer
    }

    fn caret_ids(&self) -> Vec<CaretId> {
        self.carets.keys().copied().collect()
    }

    fn caret_offset(&self, caret: CaretId) -> Option<usize> {
        self.carets
            .get(&caret)
            .and_then(|slot| self.buffer.mark_offset(slot.head))
    }

    fn move_caret(&mut self, caret: CaretId, offset: usize) {
        if let Some(offset) = self.set_head(caret, offset) {
            self.emit(HostEvent::CaretMoved { caret, offset });
        }
    }

    fn selection(&self, caret: CaretId) -> Option<(usize, usize)> {
        let (s, e) = self.carets.get(&caret)?.selection?;
        Some((self.buffer.mark_offset(s)?, self.buffer.mark_offset(e)?))
    }

    fn set_selection(&mut self, caret: CaretId, start: usize, end: usize) {
        if !self.carets.contains_key(&caret) {
            return;
        }
        self.store_selection(caret, start, end);
        if let Some((start, end)) = self.selection(caret) {
            self.emit(HostEvent::SelectionChanged {
                caret,
                start,
                end,
                source: EventSource::Other,
            });
        }
    }

    fn remove_selection(&mut self, caret: CaretId) {
        if self.clear_selection(caret) {
            let offset = self.caret_offset(caret).unwrap_or(0);
            self.emit(HostEvent::SelectionChanged {
                caret,
                start: offset,
                end: offset,
                source: EventSource::Other,
            });
        }
    }

    fn create_mark(&mut self, offset: usize) -> MarkId {
        self.buffer.create_mark(offset)
    }

    fn mark_offset(&self, mark: MarkId) -> Option<usize> {
        self.buffer.mark_offset(mark)
    }

    fn release_mark(&mut self, mark: MarkId) {
        self.buffer.release_mark(mark);
    }

    fn delete_range(&mut self, start: usize, end: usize) -> String {
        self.buffer.remove(start, end)
    }

    fn insert_text(&mut self, offset: usize, text: &str) {
        self.buffer.insert(offset, text);
    }

    fn registers(&self) -> &Registers {
        &self.registers
    }

    fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    fn bell(&mut self) {
        self.bells += 1;
        debug!(target: "model.listener", bells = self.bells, "bell");
    }

    fn take_events(&mut self) -> Vec<HostEvent> {
        self.listener
            .as_mut()
            .map(SelectionListener::drain)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_round_trip_with_two_carets() {
        let m = EditorModel::from_marked("a{caret}bc\nd{caret}e\n").unwrap();
        assert_eq!(m.caret_ids().len(), 2);
        assert_eq!(m.contents(), "abc\nde\n");
        assert_eq!(m.to_marked(), "a{caret}bc\nd{caret}e\n");
    }

    #[test]
    fn caret_marks_follow_edits() {
        let mut m = EditorModel::from_marked("one {caret}two {caret}three").unwrap();
        let ids = m.caret_ids();
        m.delete_range(0, 4);
        assert_eq!(m.caret_offset(ids[0]), Some(0));
        assert_eq!(m.caret_offset(ids[1]), Some(4));
        // Marks keep left gravity at the insertion point.
        m.insert_text(0, "xx");
        assert_eq!(m.to_marked(), "{caret}xxtwo {caret}three");
    }

    #[test]
    fn selection_notation_attaches_to_caret() {
        let m = EditorModel::from_marked("{selection}fo{caret}o{/selection} bar").unwrap();
        let id = m.primary_caret().unwrap();
        assert_eq!(m.selection(id), Some((0, 3)));
        assert_eq!(m.caret_offset(id), Some(2));
    }

    #[test]
    fn engine_side_mutations_are_suppressed_while_locked() {
        let guard = SuppressionGuard::new();
        let mut m = EditorModel::new("hello world\n").unwrap();
        m.attach_listener(guard.clone());
        let id = m.primary_caret().unwrap();
        {
            let _token = guard.lock();
            m.move_caret(id, 3);
            m.set_selection(id, 0, 4);
            m.remove_selection(id);
        }
        assert!(m.take_events().is_empty());
        assert_eq!(m.suppressed_events(), 3);
        m.user_select(id, 6, 11, EventSource::Mouse);
        assert_eq!(
            m.take_events(),
            vec![HostEvent::SelectionChanged {
                caret: id,
                start: 6,
                end: 11,
                source: EventSource::Mouse
            }]
        );
    }

    #[test]
    fn click_clears_selection_before_reporting() {
        let mut m = EditorModel::new("abc def\n").unwrap();
        m.attach_listener(SuppressionGuard::new());
        let id = m.primary_caret().unwrap();
        m.user_select(id, 0, 3, EventSource::Keyboard);
        m.take_events();
        m.user_click(id, 5, 1);
        let events = m.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            HostEvent::SelectionChanged { start: 5, end: 5, .. }
        ));
        assert!(matches!(events[1], HostEvent::MouseClicked { offset: 5, clicks: 1, .. }));
        assert_eq!(m.selection(id), None);
    }

    #[test]
    fn last_caret_is_never_removed() {
        let mut m = EditorModel::new("x\n").unwrap();
        let first = m.primary_caret().unwrap();
        let second = m.add_caret(1);
        assert!(m.remove_caret(second));
        assert!(!m.remove_caret(first));
        assert_eq!(m.caret_ids(), vec![first]);
    }
}
