//! core-keymap: per-mode key mapping tries.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the buffered strokes
//!   and the mapping mode.
//! - One compressed trie per mapping mode for cache locality; a binding valid
//!   in several modes is inserted into each of their tries.
//! - Ambiguity surfaced explicitly: a complete binding that is also a strict
//!   prefix of a longer one reports `ambiguous` so the caller can wait.
//! - Registration is idempotent. A key sequence that already has a terminal
//!   keeps it; re-binding is a no-op.
//! - No side effects: logging only at TRACE for traversal steps.

use core_events::KeyStroke;
use core_state::Mode;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

pub mod pending;

pub use pending::PendingInput;

bitflags::bitflags! {
    /// Set of modes a binding is active in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MappingMode: u8 {
        const NORMAL     = 0b0000_0001;
        const VISUAL     = 0b0000_0010;
        const SELECT     = 0b0000_0100;
        const OP_PENDING = 0b0000_1000;
        const INSERT     = 0b0001_0000;
        const CMD_LINE   = 0b0010_0000;

        const N   = Self::NORMAL.bits();
        const V   = Self::VISUAL.bits();
        const S   = Self::SELECT.bits();
        const O   = Self::OP_PENDING.bits();
        const I   = Self::INSERT.bits();
        const C   = Self::CMD_LINE.bits();
        const NV  = Self::NORMAL.bits() | Self::VISUAL.bits();
        const VO  = Self::VISUAL.bits() | Self::OP_PENDING.bits();
        const NVO = Self::NORMAL.bits() | Self::VISUAL.bits() | Self::OP_PENDING.bits();
        const NVS = Self::NORMAL.bits() | Self::VISUAL.bits() | Self::SELECT.bits();
        const NO  = Self::NORMAL.bits() | Self::OP_PENDING.bits();
    }
}

impl MappingMode {
    /// The single mapping mode consulted while `mode` is active.
    pub fn for_mode(mode: Mode) -> MappingMode {
        match mode {
            Mode::Normal => MappingMode::NORMAL,
            Mode::Insert | Mode::Replace => MappingMode::INSERT,
            Mode::Visual(_) => MappingMode::VISUAL,
            Mode::Select(_) => MappingMode::SELECT,
            Mode::OperatorPending => MappingMode::OP_PENDING,
            Mode::CommandLine => MappingMode::CMD_LINE,
        }
    }

    fn slot(self) -> usize {
        self.bits().trailing_zeros() as usize
    }

    /// The individual modes contained in this set.
    pub fn singles(self) -> impl Iterator<Item = MappingMode> {
        SINGLE_MODES.into_iter().filter(move |m| self.contains(*m))
    }
}

const SINGLE_MODES: [MappingMode; 6] = [
    MappingMode::NORMAL,
    MappingMode::VISUAL,
    MappingMode::SELECT,
    MappingMode::OP_PENDING,
    MappingMode::INSERT,
    MappingMode::CMD_LINE,
];

const MODE_SLOTS: usize = SINGLE_MODES.len();

/// Stable identifier of a registered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub &'static str);

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// What a complete key sequence stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MappingTarget {
    Action(ActionId),
    /// Replay these strokes through the resolver.
    Remap(Vec<KeyStroke>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Added,
    /// Identical binding already present; table unchanged.
    AlreadyBound,
    /// A different target owns the sequence; table unchanged.
    Conflict,
}

// -------------------------------------------------------------------------------------------------
// Trie Representation
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    key: KeyStroke,
    next: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    terminal: Option<MappingTarget>,
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTrie {
    nodes: Vec<Node>,
    bindings: usize,
}

impl Default for MappingTrie {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new()],
            bindings: 0,
        }
    }
}

impl MappingTrie {
    pub fn insert(&mut self, seq: &[KeyStroke], target: MappingTarget) -> BindOutcome {
        if seq.is_empty() {
            return BindOutcome::Conflict;
        }
        let mut cur = 0usize;
        for key in seq {
            let next = if let Some(e) = self.nodes[cur].edges.iter().find(|e| e.key == *key) {
                e.next
            } else {
                let new_idx = self.nodes.len();
                self.nodes.push(Node::new());
                self.nodes[cur].edges.push(Edge {
                    key: *key,
                    next: new_idx,
                });
                new_idx
            };
            cur = next;
        }
        match &self.nodes[cur].terminal {
            Some(existing) if *existing == target => BindOutcome::AlreadyBound,
            Some(_) => BindOutcome::Conflict,
            None => {
                self.nodes[cur].terminal = Some(target);
                self.bindings += 1;
                BindOutcome::Added
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings == 0
    }

    /// Exact lookup of a complete binding.
    pub fn get(&self, seq: &[KeyStroke]) -> Option<&MappingTarget> {
        let mut node_idx = 0usize;
        for key in seq {
            node_idx = self.nodes[node_idx]
                .edges
                .iter()
                .find(|e| e.key == *key)?
                .next;
        }
        self.nodes[node_idx].terminal.as_ref()
    }

    pub fn resolve(&self, buffer: &[KeyStroke]) -> Resolution {
        let mut node_idx = 0usize;
        let mut walked = 0usize;
        let mut last_terminal: Option<(usize, usize)> = None; // (consumed, node)
        for (i, key) in buffer.iter().enumerate() {
            let Some(edge) = self.nodes[node_idx].edges.iter().find(|e| e.key == *key) else {
                break;
            };
            node_idx = edge.next;
            walked = i + 1;
            trace!(target: "input.map", step = i, key = %key, node = node_idx, "advance");
            if self.nodes[node_idx].terminal.is_some() {
                last_terminal = Some((i + 1, node_idx));
            }
        }
        // Only a fully walked buffer can still be extended by the next stroke.
        let extendable = walked == buffer.len() && !self.nodes[node_idx].edges.is_empty();
        match last_terminal {
            Some((consumed, node)) => match &self.nodes[node].terminal {
                Some(target) => Resolution::Matched {
                    consumed,
                    target: target.clone(),
                    ambiguous: extendable,
                },
                None => Resolution::Unmapped,
            },
            None if extendable && !buffer.is_empty() => Resolution::NeedMore,
            None => Resolution::Unmapped,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Resolution Result
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first `consumed` strokes form a binding. `ambiguous` when the whole
    /// buffer is also a strict prefix of a longer binding.
    Matched {
        consumed: usize,
        target: MappingTarget,
        ambiguous: bool,
    },
    /// Strict prefix of one or more bindings, no complete binding yet.
    NeedMore,
    /// No binding and no prefix.
    Unmapped,
}

// -------------------------------------------------------------------------------------------------
// Keymap: one trie per mapping mode
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    tries: [MappingTrie; MODE_SLOTS],
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `seq` in every mode of `modes`. Reports `Added` when at least one
    /// mode gained the binding, otherwise the strongest reason it did not.
    pub fn bind(&mut self, modes: MappingMode, seq: &[KeyStroke], target: MappingTarget) -> BindOutcome {
        let mut outcome = BindOutcome::AlreadyBound;
        for single in modes.singles() {
            match self.tries[single.slot()].insert(seq, target.clone()) {
                BindOutcome::Added => outcome = BindOutcome::Added,
                BindOutcome::Conflict if outcome != BindOutcome::Added => {
                    outcome = BindOutcome::Conflict
                }
                _ => {}
            }
        }
        match outcome {
            BindOutcome::Added => {
                debug!(target: "input.map", ?modes, keys = %core_events::format_keys(seq), mapped = ?target, "bind")
            }
            BindOutcome::Conflict => {
                warn!(target: "input.map", ?modes, keys = %core_events::format_keys(seq), mapped = ?target, "bind_conflict_ignored")
            }
            BindOutcome::AlreadyBound => {}
        }
        outcome
    }

    pub fn trie(&self, mode: MappingMode) -> &MappingTrie {
        &self.tries[mode.slot()]
    }

    pub fn get(&self, mode: MappingMode, seq: &[KeyStroke]) -> Option<&MappingTarget> {
        self.trie(mode).get(seq)
    }

    /// Resolve against the trie of a single mapping mode.
    pub fn resolve(&self, mode: MappingMode, buffer: &[KeyStroke]) -> Resolution {
        self.trie(mode).resolve(buffer)
    }
}
