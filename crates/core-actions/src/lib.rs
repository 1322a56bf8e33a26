//! Vim key resolution and motion/operator composition.
//!
//! Layers, bottom up:
//! * `motion`, `text_object` - pure resolvers from a caret to a target offset
//!   or range.
//! * `span_resolver` - turns an operator's motion into the range the operator
//!   acts on (exclusive/inclusive/linewise rules, `cw` and `dw` special cases).
//! * `operators` - operator bodies applied through `core_model::HostSurface`.
//! * `resolver` - keystrokes to `Command`s (counts, registers, operator
//!   pending, remaps).
//! * `dispatcher` - executes commands per caret.
//! * `engine` - one editing session tying the above to a host.

pub mod action;
pub mod builtin;
pub mod command;
pub mod dispatcher;
pub mod engine;
pub mod motion;
pub mod operators;
pub mod resolver;
pub mod span_resolver;
pub mod text_object;

pub use action::{
    ActionHandler, ActionRegistry, ActionSpec, MotionContext, MotionFn, OperatorArgs,
    OperatorEffect, OperatorFn, OtherFn, TextObjectFn,
};
pub use command::{Command, CommandFlags, CommandKind};
pub use dispatcher::{Dispatch, ExecContext};
pub use engine::{Engine, KeyOutcome};
pub use resolver::{CommandResolver, MAX_MAP_DEPTH, Outcome};
