//! Engine-owned editing state: modes, caret contexts, ranges, registers and
//! the listener suppression guard.
//!
//! Nothing in this crate is process-global. Every value here is owned by one
//! editing session so independent sessions never observe each other.

pub mod caret;
pub mod mode;
pub mod range;
pub mod registers;
pub mod suppress;

pub use caret::{CaretContext, CaretId, CaretTable};
pub use mode::{Mode, ModeChange, ModeError, ModeStateMachine, SelectionKind, SubscriptionId};
pub use range::{RangeKind, TextRange};
pub use registers::{RegisterContent, Registers};
pub use suppress::{SuppressionGuard, SuppressionToken};
