//=========================================================================
// View Manager
//
// Owns the layer stack and drives it frame by frame.
//
// Responsibilities:
// - Route transition / exit / clear requests to the addressed layer
// - Allow only one transition in flight across the whole stack
// - Update and draw every layer in index order
// - Keep exactly the front-most active view enabled (the cascade)
// - Forward application focus and visibility changes
// - Apply the commands hooks queue on the shared context
//
// Notes:
// Layer 0 is the background by convention; higher indices overlay lower
// ones. Layer indices may be sparse.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

//=== External Crates =====================================================

use log::{debug, info, warn};

//=== Internal Imports ====================================================

use super::view_layer::{ViewEntry, ViewLayer};
use super::{View, ViewCommand, ViewId, ViewState};
use crate::core::error::ViewError;
use crate::core::globals::GlobalContext;
use crate::core::input::{Dispatch, InputEvent, InputManager};
use crate::core::render::Canvas;

//=== Constants ===========================================================

/// Frame time substituted for the first frame after the application
/// becomes visible again.
pub const DEFAULT_NOMINAL_FRAME_TIME: Duration = Duration::from_nanos(16_666_667);

/// Application-wide loading indicator; receives the fade in `[0, 1]`.
pub type LoadingIndicatorFn = Box<dyn FnMut(&mut dyn Canvas, f32)>;

//=== ViewManager =========================================================

/// Layered view lifecycle orchestrator.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use strata::prelude::*;
///
/// struct Splash;
/// impl InputListener for Splash {}
/// impl View for Splash {
///     fn transition(&self) -> TransitionConfig {
///         TransitionConfig::INSTANT
///     }
///     fn draw(&mut self, _canvas: &mut dyn Canvas) {}
/// }
///
/// let mut manager = ViewManager::new();
/// let splash = manager.transition_to(Splash, 0);
/// manager.update(Duration::ZERO).unwrap();
///
/// assert_eq!(manager.view_state(splash), Some(ViewState::Active));
/// assert!(manager.is_enabled(splash));
/// ```
pub struct ViewManager {
    layers: BTreeMap<usize, ViewLayer>,
    input: InputManager<dyn View>,
    ctx: GlobalContext,
    visible: bool,
    resumed_from_hidden: bool,
    nominal_frame_time: Duration,
    loading_indicator: Option<LoadingIndicatorFn>,
    popup: Option<ViewId>,
}

impl ViewManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty, focused and visible manager.
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
            input: InputManager::new(),
            ctx: GlobalContext::new(),
            visible: true,
            resumed_from_hidden: false,
            nominal_frame_time: DEFAULT_NOMINAL_FRAME_TIME,
            loading_indicator: None,
            popup: None,
        }
    }

    /// Sets the frame time used after visibility recovery.
    ///
    /// # Panics
    ///
    /// Panics if `frame_time` is zero.
    pub fn with_nominal_frame_time(mut self, frame_time: Duration) -> Self {
        assert!(!frame_time.is_zero(), "Nominal frame time must be positive, got {:?}", frame_time);
        self.nominal_frame_time = frame_time;
        self
    }

    /// Installs (or with `None`, removes) the application-wide loading
    /// indicator, drawn for loading views that have none of their own.
    pub fn set_loading_indicator(&mut self, indicator: Option<LoadingIndicatorFn>) {
        self.loading_indicator = indicator;
    }

    //--- Queries ----------------------------------------------------------

    /// Views of all non-empty layers, in layer order.
    pub fn views(&self) -> Vec<ViewId> {
        self.layers.values().filter_map(ViewLayer::current).collect()
    }

    pub fn layer(&self, index: usize) -> Option<&ViewLayer> {
        self.layers.get(&index)
    }

    /// Index of the layer owning `id` (as current or pending view).
    pub fn layer_of(&self, id: ViewId) -> Option<usize> {
        self.owner(id).map(ViewLayer::index)
    }

    pub fn view_state(&self, id: ViewId) -> Option<ViewState> {
        self.owner(id).and_then(|layer| layer.state_of(id))
    }

    pub fn is_enabled(&self, id: ViewId) -> bool {
        self.owner(id).is_some_and(|layer| layer.is_enabled(id))
    }

    /// Whether any layer has a view that is not `Active`.
    pub fn is_transitioning(&self) -> bool {
        self.layers.values().any(ViewLayer::is_transitioning)
    }

    pub fn popup_is_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn has_focus(&self) -> bool {
        self.ctx.has_focus()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn context(&self) -> &GlobalContext {
        &self.ctx
    }

    pub fn input(&self) -> &InputManager<dyn View> {
        &self.input
    }

    /// Input manager, for global handlers and pointer-lock opt-in.
    pub fn input_mut(&mut self) -> &mut InputManager<dyn View> {
        &mut self.input
    }

    fn owner(&self, id: ViewId) -> Option<&ViewLayer> {
        self.layers.values().find(|layer| layer.owns(id))
    }

    //--- Transitions ------------------------------------------------------

    /// Transitions `layer` to `view`, exiting its current view first.
    ///
    /// # Panics
    ///
    /// Panics if any layer is mid-transition.
    pub fn transition_to<V>(&mut self, view: V, layer: usize) -> ViewId
    where
        V: View + 'static,
    {
        let id = ViewId::next();
        self.start_transition(id, Rc::new(RefCell::new(view)), layer);
        self.process_commands();
        id
    }

    /// Exits `id` if it is `Active`; otherwise logs and does nothing.
    ///
    /// # Panics
    ///
    /// Panics if no layer owns `id`.
    pub fn exit_view(&mut self, id: ViewId) {
        self.apply_exit(id);
        self.process_commands();
    }

    /// Exits whatever view occupies `layer`. Does nothing if it is empty
    /// or its view is mid-transition.
    pub fn clear_layer(&mut self, layer: usize) {
        self.apply_clear(layer);
        self.process_commands();
    }

    /// Opens `view` on the layer above the top-most occupied one.
    ///
    /// # Panics
    ///
    /// Panics if a popup is already open, if no layer holds a view, or if
    /// any layer is mid-transition.
    pub fn open_popup<V>(&mut self, view: V) -> ViewId
    where
        V: View + 'static,
    {
        let id = ViewId::next();
        self.apply_open_popup(id, Rc::new(RefCell::new(view)));
        self.process_commands();
        id
    }

    /// Exits the open popup.
    ///
    /// # Panics
    ///
    /// Panics if no popup is open or it has not finished entering.
    pub fn close_popup(&mut self) {
        self.apply_close_popup();
        self.process_commands();
    }

    //--- Frame ------------------------------------------------------------

    /// Advances every layer by `delta`, in index order.
    ///
    /// On the first frame after the application becomes visible again the
    /// nominal frame time replaces `delta`.
    ///
    /// # Errors
    ///
    /// Returns the first asset-load failure of the frame. Every layer is
    /// still updated; the failed view has been disposed.
    pub fn update(&mut self, delta: Duration) -> Result<(), ViewError> {
        let delta = if self.resumed_from_hidden {
            self.resumed_from_hidden = false;
            debug!(target: "view", "Resumed from hidden, using nominal frame time");
            self.nominal_frame_time
        } else {
            delta
        };
        self.ctx.advance(delta);
        self.sync_context();

        let mut cascade = false;
        let mut first_error = None;
        for layer in self.layers.values_mut() {
            match layer.update(&mut self.input, &mut self.ctx) {
                Ok(activated) => cascade |= activated,
                Err(err) => {
                    cascade = true;
                    first_error.get_or_insert(err);
                }
            }
        }

        self.forget_closed_popup();
        if cascade {
            self.update_enabled_states();
        }
        self.process_commands();

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Draws every layer in index order, each between `push` / `pop`.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        for layer in self.layers.values_mut().filter(|layer| !layer.is_empty()) {
            canvas.push();
            layer.draw(canvas, &mut self.loading_indicator);
            canvas.pop();
        }
    }

    //--- Application State ------------------------------------------------

    /// Forwards an application focus change.
    ///
    /// Every view that is not loading receives `on_focus` / `on_blur`,
    /// then the cascade is recomputed. Repeated reports are ignored.
    pub fn set_focus(&mut self, has_focus: bool) {
        if self.ctx.has_focus() == has_focus {
            return;
        }
        info!(target: "view", "Application {}", if has_focus { "focused" } else { "blurred" });

        self.ctx.set_focus(has_focus);
        self.sync_context();
        for layer in self.layers.values_mut() {
            layer.notify_focus(has_focus, &mut self.ctx);
        }
        self.update_enabled_states();
        self.process_commands();
    }

    /// Records whether the application is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        debug!(target: "view", "Application {}", if visible { "visible" } else { "hidden" });

        if visible {
            self.resumed_from_hidden = true;
        }
        self.visible = visible;
    }

    //--- Input ------------------------------------------------------------

    /// Dispatches `event` to the enabled view.
    pub fn handle_input(&mut self, event: &InputEvent) -> Dispatch {
        self.sync_context();
        let outcome = self.input.dispatch(event, &mut self.ctx);
        self.process_commands();
        outcome
    }

    /// Opts in to pointer-lock gating of input.
    pub fn require_pointer_lock(&mut self) {
        self.input.require_pointer_lock();
    }

    //--- Commands ---------------------------------------------------------

    /// Applies commands queued by hooks until none remain.
    pub fn process_commands(&mut self) {
        while self.ctx.has_commands() {
            for command in self.ctx.take_commands() {
                debug!(target: "view", "Applying {:?}", command);
                self.sync_context();
                match command {
                    ViewCommand::TransitionTo { id, view, layer } => self.start_transition(id, view, layer),
                    ViewCommand::ExitView(id) => self.apply_exit(id),
                    ViewCommand::ClearLayer(layer) => self.apply_clear(layer),
                    ViewCommand::OpenPopup { id, view } => self.apply_open_popup(id, view),
                    ViewCommand::ClosePopup => self.apply_close_popup(),
                }
            }
        }
        self.sync_context();
    }

    //--- Internal Helpers -------------------------------------------------

    /// Mirrors the stack state onto the context before hooks run.
    fn sync_context(&mut self) {
        let transitioning = self.is_transitioning();
        self.ctx.set_stack_state(transitioning, self.popup.is_some());
    }

    fn start_transition(&mut self, id: ViewId, view: Rc<RefCell<dyn View>>, layer: usize) {
        assert!(
            !self.is_transitioning(),
            "cannot transition layer {} to {}: another transition is in flight",
            layer,
            id
        );
        self.ctx.set_stack_state(true, self.popup.is_some());

        let entry = ViewEntry::new(id, view);
        let slot = self.layers.entry(layer).or_insert_with(|| ViewLayer::new(layer));
        if slot.transition_to(entry, &mut self.input, &mut self.ctx) {
            self.update_enabled_states();
        }
    }

    fn apply_exit(&mut self, id: ViewId) {
        let Some(layer) = self.layers.values_mut().find(|layer| layer.owns(id)) else {
            panic!("cannot exit {}: it is not owned by any layer", id);
        };
        // Either it starts exiting, or its layer is already mid-transition.
        self.ctx.set_stack_state(true, self.popup.is_some());

        if layer.current() != Some(id) || !layer.exit(&mut self.input, &mut self.ctx) {
            warn!(target: "view", "Ignoring exit of {}: it is not active", id);
            return;
        }
        self.update_enabled_states();
    }

    fn apply_clear(&mut self, index: usize) {
        let Some(layer) = self.layers.get_mut(&index) else {
            return;
        };
        if !layer.is_empty() {
            self.ctx.set_stack_state(true, self.popup.is_some());
        }

        if layer.exit(&mut self.input, &mut self.ctx) {
            self.update_enabled_states();
        } else if !layer.is_empty() {
            debug!(target: "view", "Layer {} is mid-transition, not cleared", index);
        }
    }

    fn apply_open_popup(&mut self, id: ViewId, view: Rc<RefCell<dyn View>>) {
        assert!(self.popup.is_none(), "cannot open popup {}: one is already open", id);

        let Some(top) = self
            .layers
            .values()
            .rev()
            .find(|layer| !layer.is_empty())
            .map(ViewLayer::index)
        else {
            panic!("cannot open popup {}: no view is open beneath it", id);
        };

        self.popup = Some(id);
        self.start_transition(id, view, top + 1);
    }

    fn apply_close_popup(&mut self) {
        let Some(id) = self.popup else {
            panic!("cannot close popup: none is open");
        };

        let state = self.view_state(id);
        assert!(
            state == Some(ViewState::Active),
            "cannot close popup {}: it is {:?}, not active",
            id,
            state
        );

        self.popup = None;
        self.apply_exit(id);
    }

    /// Drops the popup record once its view has left the stack.
    fn forget_closed_popup(&mut self) {
        if let Some(id) = self.popup {
            if self.owner(id).is_none() {
                self.popup = None;
            }
        }
    }

    /// Enables the front-most active view (when focused) and disables
    /// every other view.
    fn update_enabled_states(&mut self) {
        self.sync_context();
        let has_focus = self.ctx.has_focus();
        let mut front_found = false;

        for layer in self.layers.values_mut().rev() {
            let active = layer.current_state() == Some(ViewState::Active);
            let enable = active && has_focus && !front_found;
            front_found |= active;
            layer.set_enabled(enable, &mut self.input, &mut self.ctx);
        }
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait ==========================================================

impl fmt::Debug for ViewManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewManager")
            .field("layers", &self.layers)
            .field("input", &self.input)
            .field("has_focus", &self.ctx.has_focus())
            .field("visible", &self.visible)
            .field("popup", &self.popup)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
