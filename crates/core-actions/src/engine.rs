//! Editing session: the keymap, resolver, mode machine and caret table of one
//! host document, plus the glue between host notifications and Vim modes.
//!
//! Keys flow `handle_key` -> `CommandResolver::feed` -> `dispatcher::execute`.
//! Host notifications flow `pump` -> `handle_host_event`. Every engine-side
//! mutation of the host runs while the session's `SuppressionGuard` is locked,
//! so the listener drops the caret and selection echoes it causes.

use crate::action::{ActionRegistry, ActionSpec};
use crate::builtin;
use crate::dispatcher::{self, Dispatch, ExecContext};
use crate::resolver::{CommandResolver, Outcome};
use anyhow::Result;
use core_config::{Options, SelectModeOption};
use core_events::{KeyStroke, parse_keys};
use core_keymap::{BindOutcome, Keymap, MappingMode, MappingTarget};
use core_model::{EventSource, HostEvent, HostSurface};
use core_state::{
    CaretContext, CaretId, CaretTable, Mode, ModeChange, ModeStateMachine, SelectionKind,
    SubscriptionId, SuppressionGuard, SuppressionToken,
};
use core_text::TextSource;
use tracing::{debug, info, trace, warn};

/// What one external key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Buffered: more keys are needed.
    Pending,
    Executed,
    /// A motion failed, an operator had no range, or `<Esc>` dropped pending input.
    Cancelled,
    /// No binding outside a text-entry mode.
    Unmapped,
    /// Entered as text.
    Typed,
}

pub struct Engine {
    keymap: Keymap,
    actions: ActionRegistry,
    resolver: CommandResolver,
    modes: ModeStateMachine,
    carets: CaretTable,
    guard: SuppressionGuard,
    options: Options,
    /// Held from mouse-drag start to release.
    drag_token: Option<SuppressionToken>,
    cmdline: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("mode", &self.modes.current())
            .field("carets", &self.carets.len())
            .field("actions", &self.actions.len())
            .field("dragging", &self.drag_token.is_some())
            .finish()
    }
}

impl Engine {
    /// Session with the built-in actions and bindings.
    pub fn new(options: Options) -> Self {
        let (keymap, actions) = builtin::defaults();
        Self::with_bindings(keymap, actions, options)
    }

    pub fn with_bindings(keymap: Keymap, actions: ActionRegistry, options: Options) -> Self {
        info!(target: "actions.engine", actions = actions.len(), "engine_created");
        Self {
            keymap,
            actions,
            resolver: CommandResolver::new(),
            modes: ModeStateMachine::new(),
            carets: CaretTable::default(),
            guard: SuppressionGuard::new(),
            options,
            drag_token: None,
            cmdline: String::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// The guard the host's listener must consult.
    pub fn guard(&self) -> &SuppressionGuard {
        &self.guard
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn caret(&self, id: CaretId) -> Option<&CaretContext> {
        self.carets.get(id)
    }

    /// Text typed so far on the command line.
    pub fn cmdline(&self) -> &str {
        &self.cmdline
    }

    pub fn has_pending(&self) -> bool {
        self.resolver.has_pending()
    }

    pub fn subscribe_mode_changes(
        &mut self,
        listener: impl FnMut(&ModeChange) + 'static,
    ) -> SubscriptionId {
        self.modes.subscribe(listener)
    }

    pub fn unsubscribe_mode_changes(&mut self, id: SubscriptionId) {
        self.modes.unsubscribe(id);
    }

    pub fn register_action(&mut self, spec: ActionSpec) -> bool {
        self.actions.register(spec)
    }

    pub fn bind(&mut self, modes: MappingMode, keys: &[KeyStroke], target: MappingTarget) -> BindOutcome {
        self.keymap.bind(modes, keys, target)
    }

    /// Bind `lhs` to replay `rhs`, both in key notation.
    pub fn bind_keys(&mut self, modes: MappingMode, lhs: &str, rhs: &str) -> Result<BindOutcome> {
        let from = parse_keys(lhs)?;
        let to = parse_keys(rhs)?;
        Ok(self.keymap.bind(modes, &from, MappingTarget::Remap(to)))
    }

    fn context<'a>(&'a mut self, host: &'a mut dyn HostSurface) -> ExecContext<'a> {
        ExecContext {
            host,
            modes: &mut self.modes,
            carets: &mut self.carets,
            options: &self.options,
            actions: &self.actions,
            cmdline: &mut self.cmdline,
        }
    }

    /// Run `f` with the listener suppressed.
    fn with_context<R>(
        &mut self,
        host: &mut dyn HostSurface,
        f: impl FnOnce(&mut ExecContext<'_>) -> R,
    ) -> R {
        let _token = self.guard.lock();
        let mut ctx = self.context(host);
        ctx.sync_carets();
        f(&mut ctx)
    }

    // ---------------------------------------------------------------------------------------------
    // Keys
    // ---------------------------------------------------------------------------------------------

    /// Feed one external key. Remap expansions and leftover strokes are
    /// resolved before this returns.
    pub fn handle_key(&mut self, host: &mut dyn HostSurface, stroke: KeyStroke) -> KeyOutcome {
        self.pump(host);
        self.resolver.enqueue(stroke);
        self.drain_input(host, KeyOutcome::Pending)
    }

    /// Feed every key of `notation` (e.g. `"c2w"`, `"d<Esc>"`).
    pub fn handle_keys(&mut self, host: &mut dyn HostSurface, notation: &str) -> Result<KeyOutcome> {
        let keys = parse_keys(notation)?;
        let mut last = KeyOutcome::Pending;
        for key in keys {
            last = self.handle_key(host, key);
        }
        Ok(last)
    }

    /// Resolve an ambiguous buffered sequence as if `timeoutlen` elapsed.
    pub fn flush_pending(&mut self, host: &mut dyn HostSurface) -> KeyOutcome {
        let outcome = self
            .resolver
            .flush(self.modes.current(), &self.keymap, &self.actions);
        let last = self.apply(host, outcome);
        self.drain_input(host, last)
    }

    fn drain_input(&mut self, host: &mut dyn HostSurface, mut last: KeyOutcome) -> KeyOutcome {
        while let Some(stroke) = self.resolver.next_input() {
            let mode = self.modes.current();
            let outcome = self.resolver.feed(stroke, mode, &self.keymap, &self.actions);
            last = self.apply(host, outcome);
        }
        last
    }

    fn apply(&mut self, host: &mut dyn HostSurface, outcome: Outcome) -> KeyOutcome {
        self.sync_operator_mode();
        match outcome {
            Outcome::Pending => KeyOutcome::Pending,
            Outcome::Resolved(cmd) => {
                match self.with_context(host, |ctx| dispatcher::execute(ctx, &cmd)) {
                    Dispatch::Executed => KeyOutcome::Executed,
                    Dispatch::Cancelled => KeyOutcome::Cancelled,
                }
            }
            Outcome::Cancelled => {
                self.with_context(host, dispatcher::cancel);
                KeyOutcome::Cancelled
            }
            Outcome::Unmapped(keys) => {
                if self.modes.current().is_text_entry() {
                    match self.with_context(host, |ctx| dispatcher::type_keys(ctx, &keys)) {
                        Dispatch::Executed => KeyOutcome::Typed,
                        Dispatch::Cancelled => KeyOutcome::Cancelled,
                    }
                } else {
                    debug!(target: "actions.engine", keys = %core_events::format_keys(&keys), mode = %self.modes.current(), "unmapped_bell");
                    host.bell();
                    KeyOutcome::Unmapped
                }
            }
        }
    }

    /// Mirror the resolver's operator state in the mode machine.
    fn sync_operator_mode(&mut self) {
        let current = self.modes.current();
        let target = if self.resolver.operator_pending() {
            (current != Mode::OperatorPending).then_some(Mode::OperatorPending)
        } else if current == Mode::OperatorPending {
            self.modes.parent()
        } else {
            None
        };
        if let Some(to) = target
            && let Err(err) = self.modes.transition(to)
        {
            warn!(target: "state.mode", %err, "illegal_transition_ignored");
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Host notifications
    // ---------------------------------------------------------------------------------------------

    /// Process every notification the host queued since the last call.
    pub fn pump(&mut self, host: &mut dyn HostSurface) {
        for event in host.take_events() {
            self.handle_host_event(host, event);
        }
    }

    pub fn handle_host_event(&mut self, host: &mut dyn HostSurface, event: HostEvent) {
        trace!(target: "actions.engine", ?event, "host_event");
        match event {
            HostEvent::CaretAdded { caret, offset } => {
                self.carets.add(caret, offset);
            }
            HostEvent::CaretRemoved { caret } => {
                self.carets.remove(caret);
            }
            HostEvent::CaretMoved { caret, offset } => {
                if let Some(ctx) = self.carets.get_mut(caret) {
                    ctx.offset = offset;
                    ctx.last_column = None;
                }
            }
            HostEvent::MouseDragStarted { .. } => {
                if self.drag_token.is_none() {
                    debug!(target: "actions.engine", "drag_started");
                    self.drag_token = Some(self.guard.lock());
                }
            }
            HostEvent::MouseReleased { caret } => {
                let Some(mut token) = self.drag_token.take() else {
                    return;
                };
                self.control_selection(host, caret, EventSource::Mouse);
                token.release();
                debug!(target: "actions.engine", mode = %self.modes.current(), "drag_released");
            }
            HostEvent::MouseClicked {
                caret,
                offset,
                clicks,
            } => {
                if clicks == 1 {
                    self.single_click(host, caret, offset);
                }
            }
            HostEvent::SelectionChanged { caret, source, .. } => {
                self.control_selection(host, caret, source);
            }
        }
    }

    fn single_click(&mut self, host: &mut dyn HostSurface, caret: CaretId, offset: usize) {
        self.with_context(host, |ctx| {
            let mode = ctx.mode();
            if mode.is_visual() || mode.is_select() {
                ctx.exit_to_normal();
            }
            if matches!(ctx.mode(), Mode::Insert | Mode::Replace) {
                return;
            }
            let text = ctx.host.text();
            let line = text.line_of_offset(offset);
            let at_end = offset == text.line_end(line) && offset > text.line_start(line);
            if at_end {
                ctx.move_caret(caret, offset - 1);
            }
        });
    }

    /// Follow a selection made outside the engine into the matching mode.
    fn control_selection(&mut self, host: &mut dyn HostSurface, caret: CaretId, source: EventSource) {
        self.with_context(host, |ctx| {
            let mode = ctx.mode();
            let selection = ctx.host.selection(caret).filter(|(s, e)| s < e);
            let Some((start, end)) = selection else {
                if mode.is_visual() || mode.is_select() {
                    debug!(target: "actions.engine", %mode, "selection_removed");
                    ctx.exit_to_normal();
                }
                return;
            };
            let select = match source {
                EventSource::Mouse => ctx.options.has_selectmode(SelectModeOption::Mouse),
                EventSource::Other => ctx.options.has_selectmode(SelectModeOption::IdeaSelection),
                EventSource::Keyboard => false,
            };
            let target = if select {
                Mode::Select(SelectionKind::Character)
            } else {
                Mode::Visual(SelectionKind::Character)
            };
            // Visual selections include the caret, so a caret resting just past
            // the selected text steps back onto its last character.
            let head = ctx.caret_offset(caret).unwrap_or(end);
            let (anchor, head) = match (select, head == start) {
                (true, true) => (end, start),
                (true, false) => (start, end),
                (false, true) => (end - 1, start),
                (false, false) => (start, end - 1),
            };
            if let Some(state) = ctx.carets.get_mut(caret) {
                state.selection_start = Some(anchor);
            }
            if mode != target && !ctx.enter_mode(target) {
                return;
            }
            debug!(target: "actions.engine", ?source, %target, start, end, "selection_adopted");
            ctx.move_caret(caret, head);
            ctx.update_selection(caret);
        });
    }
}
