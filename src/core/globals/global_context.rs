//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container handed to every view and input hook.
//
// Contains state that hooks read and requests that hooks write:
// - frame timing and application focus
// - whether the layer stack is transitioning or shows a popup
// - identity of the view / listener whose hook is running
// - command queue for view-manager requests
// - listener self-removal requests made during dispatch
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::ListenerId;
use crate::core::view::{CommandQueue, View, ViewCommand, ViewId};

//=== GlobalContext =======================================================

/// Shared context passed to hooks.
///
/// Hooks cannot reach the [`ViewManager`](crate::core::view::ViewManager)
/// while it is running them, so everything they may ask of it goes
/// through here and is applied once the hook returns.
///
/// # Example
///
/// ```no_run
/// # use strata::prelude::*;
/// struct Menu;
/// struct Game;
/// # impl InputListener for Game {}
/// # impl View for Game { fn draw(&mut self, _canvas: &mut dyn Canvas) {} }
///
/// impl InputListener for Menu {
///     fn input_interests(&self) -> &[InputEventType] {
///         &[InputEventType::KeyPressed]
///     }
///
///     fn on_input(&mut self, event: &InputEvent, ctx: &mut GlobalContext) {
///         if let InputEvent::KeyPressed { key: KeyCode::Enter, .. } = event {
///             ctx.transition_to(Game, 0);
///         }
///     }
/// }
/// # impl View for Menu { fn draw(&mut self, _canvas: &mut dyn Canvas) {} }
/// ```
#[derive(Debug)]
pub struct GlobalContext {
    has_focus: bool,
    delta_time: f32,
    elapsed: Duration,
    current_view: Option<ViewId>,
    current_listener: Option<ListenerId>,
    transitioning: bool,
    popup_open: bool,
    commands: CommandQueue,
    stop_requests: Vec<ListenerId>,
}

impl GlobalContext {
    /// Creates a focused context at time zero.
    pub fn new() -> Self {
        Self {
            has_focus: true,
            delta_time: 0.0,
            elapsed: Duration::ZERO,
            current_view: None,
            current_listener: None,
            transitioning: false,
            popup_open: false,
            commands: CommandQueue::new(),
            stop_requests: Vec::new(),
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Whether the application window currently has focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Seconds elapsed since the previous frame.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Accumulated frame time since the manager started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The view whose hook is currently running, if any.
    pub fn current_view(&self) -> Option<ViewId> {
        self.current_view
    }

    /// Whether a transition is in flight anywhere in the layer stack, or
    /// one has already been requested during this batch of hooks.
    ///
    /// `transition_to` and `open_popup` panic when applied while this is
    /// `true`.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
            || self.commands.any(|command| {
                matches!(command, ViewCommand::TransitionTo { .. } | ViewCommand::OpenPopup { .. })
            })
    }

    /// Whether a popup is open or has been requested during this batch of
    /// hooks.
    pub fn popup_is_open(&self) -> bool {
        self.popup_open || self.commands.any(|command| matches!(command, ViewCommand::OpenPopup { .. }))
    }

    //--- View Requests ----------------------------------------------------

    /// Requests a transition of `layer` to `view`.
    ///
    /// Returns the id the view will carry once the request is applied.
    pub fn transition_to<V>(&mut self, view: V, layer: usize) -> ViewId
    where
        V: View + 'static,
    {
        let id = ViewId::next();
        self.commands.push(ViewCommand::TransitionTo {
            id,
            view: Rc::new(RefCell::new(view)),
            layer,
        });
        id
    }

    /// Requests that `view` exit its layer.
    pub fn exit_view(&mut self, view: ViewId) {
        self.commands.push(ViewCommand::ExitView(view));
    }

    /// Requests that the view whose hook or input handler is running exit
    /// its layer.
    ///
    /// # Panics
    ///
    /// Panics if called outside a view hook.
    pub fn exit_current(&mut self) {
        let listener = self.current_listener.map(|id| ViewId::from_raw(id.raw()));
        let Some(id) = self.current_view.or(listener) else {
            panic!("exit_current called outside of a view hook");
        };
        self.exit_view(id);
    }

    /// Requests that whatever occupies `layer` exit.
    pub fn clear_layer(&mut self, layer: usize) {
        self.commands.push(ViewCommand::ClearLayer(layer));
    }

    /// Requests a popup above the top-most layer.
    pub fn open_popup<V>(&mut self, view: V) -> ViewId
    where
        V: View + 'static,
    {
        let id = ViewId::next();
        self.commands.push(ViewCommand::OpenPopup {
            id,
            view: Rc::new(RefCell::new(view)),
        });
        id
    }

    /// Requests that the open popup close.
    pub fn close_popup(&mut self) {
        self.commands.push(ViewCommand::ClosePopup);
    }

    //--- Listener Requests ------------------------------------------------

    /// Unregisters the listener currently being dispatched to.
    ///
    /// Takes effect before the next listener in the same dispatch runs.
    /// Has no effect outside of input dispatch.
    pub fn stop_listening(&mut self) {
        if let Some(id) = self.current_listener {
            self.stop_requests.push(id);
        }
    }

    //--- Engine-Side Access -----------------------------------------------

    pub(crate) fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Mirrors the manager's stack state for hooks to read.
    pub(crate) fn set_stack_state(&mut self, transitioning: bool, popup_open: bool) {
        self.transitioning = transitioning;
        self.popup_open = popup_open;
    }

    pub(crate) fn advance(&mut self, delta: Duration) {
        self.delta_time = delta.as_secs_f32();
        self.elapsed += delta;
    }

    pub(crate) fn enter_view(&mut self, id: Option<ViewId>) -> Option<ViewId> {
        std::mem::replace(&mut self.current_view, id)
    }

    pub(crate) fn enter_listener(&mut self, id: Option<ListenerId>) -> Option<ListenerId> {
        std::mem::replace(&mut self.current_listener, id)
    }

    pub(crate) fn take_stop_requests(&mut self) -> Vec<ListenerId> {
        std::mem::take(&mut self.stop_requests)
    }

    pub(crate) fn take_commands(&mut self) -> Vec<ViewCommand> {
        self.commands.take()
    }

    pub(crate) fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
