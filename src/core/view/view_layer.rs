//=========================================================================
// View Layer
//
// One slot of the layer stack.
//
// Responsibilities:
// - Own at most one current view and one pending replacement
// - Advance the current view's lifecycle each frame
// - Poll asset loads and fade transitions in / out
// - Draw the view, its fade overlay, or a loading indicator
//
// Lifecycle (per frame, in order):
// ```text
//   Exiting  ── pos -= dt / exit_time ──► 0: dispose, promote pending
//   Loading  ── poll AssetLoad ─────────► done: Entering + init()
//   Entering ── pos += dt / enter_time ─► 1: Active (cascade)
//   update() hook while Entering / Active / Exiting
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

//=== External Crates =====================================================

use log::{debug, error};

//=== Internal Imports ====================================================

use super::view_manager::LoadingIndicatorFn;
use super::{AssetLoad, LoadStatus, LoadingIndicator, TransitionConfig, View, ViewId, ViewState};
use crate::core::error::ViewError;
use crate::core::globals::GlobalContext;
use crate::core::input::InputManager;
use crate::core::render::{draw_default_loading_indicator, Canvas, Color, Rect, LOADING_FADE_TIME};

//=== ViewEntry ===========================================================

/// A view together with the runtime state its layer tracks for it.
pub(crate) struct ViewEntry {
    id: ViewId,
    view: Rc<RefCell<dyn View>>,
    state: ViewState,
    enabled: bool,
    transition_pos: f32,
    config: TransitionConfig,
    load: Option<AssetLoad>,
    loading_fade: f32,
}

impl ViewEntry {
    /// Wraps a view handed to the manager.
    ///
    /// # Panics
    ///
    /// Panics if the view's transition times are negative or NaN.
    pub(crate) fn new(id: ViewId, view: Rc<RefCell<dyn View>>) -> Self {
        let config = view.borrow().transition();
        assert!(
            config.enter_time >= 0.0 && config.exit_time >= 0.0,
            "{} has invalid transition times: {:?}",
            id,
            config
        );

        Self {
            id,
            view,
            state: ViewState::Pending,
            enabled: false,
            transition_pos: 0.0,
            config,
            load: None,
            loading_fade: 0.0,
        }
    }

    //--- Hooks ------------------------------------------------------------

    /// Runs a hook with the context pointing at this view.
    fn run_hook(&self, ctx: &mut GlobalContext, hook: impl FnOnce(&mut dyn View, &mut GlobalContext)) {
        let previous = ctx.enter_view(Some(self.id));
        hook(&mut *self.view.borrow_mut(), ctx);
        ctx.enter_view(previous);
    }

    /// Enables or disables the view. Returns `false` if nothing changed.
    fn set_enabled(&mut self, enabled: bool, input: &mut InputManager<dyn View>, ctx: &mut GlobalContext) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;

        if enabled {
            input.add_listener(self.id.into(), Rc::clone(&self.view));
            self.run_hook(ctx, |view, ctx| view.on_enable(ctx));
        } else {
            input.remove_listener(self.id.into());
            self.run_hook(ctx, |view, ctx| view.on_disable(ctx));
        }

        debug!(target: "view", "{} {}", self.id, if enabled { "enabled" } else { "disabled" });
        true
    }

    fn dispose(mut self, input: &mut InputManager<dyn View>, ctx: &mut GlobalContext) {
        self.set_enabled(false, input, ctx);
        self.run_hook(ctx, |view, ctx| view.on_dispose(ctx));
        debug!(target: "view", "{} disposed", self.id);
    }

    //--- Loading ----------------------------------------------------------

    fn begin_loading(&mut self) {
        self.state = ViewState::Loading;
        self.transition_pos = 0.0;
        self.loading_fade = 0.0;
        self.load = self.view.borrow_mut().load_assets();
    }

    fn poll_load(&mut self) -> LoadStatus {
        let status = match &self.load {
            Some(load) => load.poll(),
            None => LoadStatus::Done,
        };
        if status != LoadStatus::Pending {
            self.load = None;
        }
        status
    }

    fn finish_loading(&mut self, ctx: &mut GlobalContext) {
        self.state = ViewState::Entering;
        self.transition_pos = 0.0;
        self.run_hook(ctx, |view, ctx| view.init(ctx));
        if !ctx.has_focus() {
            self.run_hook(ctx, |view, ctx| view.on_blur(ctx));
        }
    }

    //--- Drawing ----------------------------------------------------------

    fn fade_overlay(&self) -> Option<f32> {
        let fading = match self.state {
            ViewState::Entering => self.config.enter_fade,
            ViewState::Exiting => self.config.exit_fade,
            _ => false,
        };
        fading.then(|| 1.0 - self.transition_pos)
    }
}

impl fmt::Debug for ViewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEntry")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("transition_pos", &self.transition_pos)
            .finish_non_exhaustive()
    }
}

/// Moves `pos` one frame toward 1 (`rising`) or 0, over `duration` seconds.
fn step_transition(pos: f32, dt: f32, duration: f32, rising: bool) -> f32 {
    if duration <= 0.0 {
        return if rising { 1.0 } else { 0.0 };
    }
    let step = dt / duration;
    if rising {
        (pos + step).min(1.0)
    } else {
        (pos - step).max(0.0)
    }
}

//=== ViewLayer ===========================================================

/// A slot in the layer stack holding a current and a pending view.
///
/// Layers are created by the [`ViewManager`](super::ViewManager) on first
/// use and are only mutated through it.
#[derive(Debug)]
pub struct ViewLayer {
    index: usize,
    view: Option<ViewEntry>,
    pending: Option<ViewEntry>,
}

impl ViewLayer {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            view: None,
            pending: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_none()
    }

    /// Id of the view currently occupying the layer.
    pub fn current(&self) -> Option<ViewId> {
        self.view.as_ref().map(|entry| entry.id)
    }

    /// Id of the view queued behind the current one.
    pub fn pending(&self) -> Option<ViewId> {
        self.pending.as_ref().map(|entry| entry.id)
    }

    pub fn current_state(&self) -> Option<ViewState> {
        self.view.as_ref().map(|entry| entry.state)
    }

    /// Progress of the current view's enter / exit transition.
    pub fn transition_pos(&self) -> Option<f32> {
        self.view.as_ref().map(|entry| entry.transition_pos)
    }

    /// Whether a view on this layer is anywhere but `Active`.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some() || self.current_state().is_some_and(|state| state != ViewState::Active)
    }

    pub fn owns(&self, id: ViewId) -> bool {
        self.entry(id).is_some()
    }

    pub fn state_of(&self, id: ViewId) -> Option<ViewState> {
        self.entry(id).map(|entry| entry.state)
    }

    pub fn is_enabled(&self, id: ViewId) -> bool {
        self.entry(id).is_some_and(|entry| entry.enabled)
    }

    fn entry(&self, id: ViewId) -> Option<&ViewEntry> {
        self.view
            .iter()
            .chain(self.pending.iter())
            .find(|entry| entry.id == id)
    }

    //--- Transitions ------------------------------------------------------

    /// Hands `entry` to the layer.
    ///
    /// An empty layer starts loading it at once; an occupied one queues it
    /// and starts exiting the current view. Returns `true` if an active
    /// view left the `Active` state.
    ///
    /// # Panics
    ///
    /// Panics if the current view is not `Active`.
    pub(crate) fn transition_to(
        &mut self,
        mut entry: ViewEntry,
        input: &mut InputManager<dyn View>,
        ctx: &mut GlobalContext,
    ) -> bool {
        let Some(current) = &self.view else {
            entry.begin_loading();
            debug!(target: "view", "{} loading on layer {}", entry.id, self.index);
            self.view = Some(entry);
            return false;
        };

        assert!(
            current.state == ViewState::Active && self.pending.is_none(),
            "layer {} is mid-transition ({} is {:?}), cannot queue {}",
            self.index,
            current.id,
            current.state,
            entry.id
        );

        debug!(target: "view", "{} queued on layer {} behind {}", entry.id, self.index, current.id);
        self.pending = Some(entry);
        self.begin_exit(input, ctx);
        true
    }

    /// Starts exiting the current view if it is `Active`.
    ///
    /// Returns `true` if a view started exiting.
    pub(crate) fn exit(&mut self, input: &mut InputManager<dyn View>, ctx: &mut GlobalContext) -> bool {
        match self.current_state() {
            Some(ViewState::Active) => {
                self.begin_exit(input, ctx);
                true
            }
            _ => false,
        }
    }

    fn begin_exit(&mut self, input: &mut InputManager<dyn View>, ctx: &mut GlobalContext) {
        if let Some(entry) = self.view.as_mut() {
            entry.set_enabled(false, input, ctx);
            entry.state = ViewState::Exiting;
            debug!(target: "view", "{} exiting layer {}", entry.id, self.index);
        }
    }

    fn finish_exit(&mut self, input: &mut InputManager<dyn View>, ctx: &mut GlobalContext) {
        if let Some(entry) = self.view.take() {
            entry.dispose(input, ctx);
        }

        self.view = self.pending.take();
        if let Some(next) = self.view.as_mut() {
            next.begin_loading();
            debug!(target: "view", "{} loading on layer {}", next.id, self.index);
        }
    }

    //--- Enable / Focus ---------------------------------------------------

    /// Enables or disables the current view. Returns `true` on change.
    pub(crate) fn set_enabled(
        &mut self,
        enabled: bool,
        input: &mut InputManager<dyn View>,
        ctx: &mut GlobalContext,
    ) -> bool {
        match self.view.as_mut() {
            Some(entry) => {
                debug_assert!(!enabled || entry.state == ViewState::Active);
                entry.set_enabled(enabled, input, ctx)
            }
            None => false,
        }
    }

    /// Forwards an application focus change to the current view.
    ///
    /// A view that is still loading is not told; it checks focus itself
    /// once loaded.
    pub(crate) fn notify_focus(&mut self, has_focus: bool, ctx: &mut GlobalContext) {
        let Some(entry) = &self.view else {
            return;
        };
        if entry.state == ViewState::Loading {
            return;
        }

        if has_focus {
            entry.run_hook(ctx, |view, ctx| view.on_focus(ctx));
        } else {
            entry.run_hook(ctx, |view, ctx| view.on_blur(ctx));
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Advances the layer by one frame (`ctx.delta_time()` seconds).
    ///
    /// Returns `true` if a view became `Active`. If the current view's
    /// assets failed to load, it is disposed, the layer is left empty and
    /// the failure is returned.
    pub(crate) fn update(
        &mut self,
        input: &mut InputManager<dyn View>,
        ctx: &mut GlobalContext,
    ) -> Result<bool, ViewError> {
        let dt = ctx.delta_time();

        //--- Exiting ------------------------------------------------------
        let exited = match self.view.as_mut() {
            Some(entry) if entry.state == ViewState::Exiting => {
                entry.transition_pos = step_transition(entry.transition_pos, dt, entry.config.exit_time, false);
                entry.transition_pos <= 0.0
            }
            _ => false,
        };
        if exited {
            self.finish_exit(input, ctx);
        }

        //--- Loading ------------------------------------------------------
        let mut failure = None;
        if let Some(entry) = self.view.as_mut() {
            if entry.state == ViewState::Loading {
                entry.loading_fade = step_transition(entry.loading_fade, dt, LOADING_FADE_TIME, true);
                match entry.poll_load() {
                    LoadStatus::Pending => {}
                    LoadStatus::Done => {
                        debug!(target: "view", "{} loaded on layer {}", entry.id, self.index);
                        entry.finish_loading(ctx);
                    }
                    LoadStatus::Failed(source) => failure = Some((entry.id, source)),
                }
            }
        }
        if let Some((view, source)) = failure {
            error!(target: "view", "{} on layer {} failed to load: {}", view, self.index, source);
            for entry in self.view.take().into_iter().chain(self.pending.take()) {
                entry.dispose(input, ctx);
            }
            return Err(ViewError::AssetLoad {
                view,
                layer: self.index,
                source,
            });
        }

        //--- Entering -----------------------------------------------------
        let mut activated = false;
        if let Some(entry) = self.view.as_mut() {
            if entry.state == ViewState::Entering {
                entry.transition_pos = step_transition(entry.transition_pos, dt, entry.config.enter_time, true);
                if entry.transition_pos >= 1.0 {
                    entry.state = ViewState::Active;
                    activated = true;
                    debug!(target: "view", "{} active on layer {}", entry.id, self.index);
                }
            }
        }

        //--- Update Hook --------------------------------------------------
        if let Some(entry) = &self.view {
            if entry.state.runs_update() {
                entry.run_hook(ctx, |view, ctx| view.update(ctx));
            }
        }

        Ok(activated)
    }

    /// Draws the current view, its fade overlay or its loading indicator.
    pub(crate) fn draw(&mut self, canvas: &mut dyn Canvas, fallback: &mut Option<LoadingIndicatorFn>) {
        let Some(entry) = &self.view else {
            return;
        };

        match entry.state {
            ViewState::Pending | ViewState::Loading => {
                let fade = entry.loading_fade;
                let drawn = entry.view.borrow_mut().draw_loading_indicator(canvas, fade);
                if drawn == LoadingIndicator::UseDefault {
                    match fallback {
                        Some(indicator) => indicator(canvas, fade),
                        None => draw_default_loading_indicator(canvas, fade),
                    }
                }
            }
            _ => {
                entry.view.borrow_mut().draw(canvas);
                if let Some(opacity) = entry.fade_overlay() {
                    let full = Rect::covering(canvas.size());
                    canvas.fill_rect(full, Color::BLACK.with_opacity(opacity));
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AssetError;
    use crate::core::render::{DrawCommand, DrawList};
    use crate::core::view::test_support::{journal, Journal, Probe};
    use std::time::Duration;

    //--- Test Helpers -----------------------------------------------------

    struct Rig {
        layer: ViewLayer,
        input: InputManager<dyn View>,
        ctx: GlobalContext,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                layer: ViewLayer::new(0),
                input: InputManager::new(),
                ctx: GlobalContext::new(),
            }
        }

        fn give(&mut self, probe: Probe) -> ViewId {
            let id = ViewId::next();
            let entry = ViewEntry::new(id, Rc::new(RefCell::new(probe)));
            self.layer.transition_to(entry, &mut self.input, &mut self.ctx);
            id
        }

        fn tick(&mut self, millis: u64) -> Result<bool, ViewError> {
            self.ctx.advance(Duration::from_millis(millis));
            self.layer.update(&mut self.input, &mut self.ctx)
        }
    }

    fn timed(name: &'static str, log: &Journal, enter: f32, exit: f32) -> Probe {
        Probe::new(name, log).with_config(
            TransitionConfig::default()
                .with_enter_time(enter)
                .with_exit_time(exit),
        )
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn empty_layer_loads_immediately() {
        let log = journal();
        let mut rig = Rig::new();
        let id = rig.give(Probe::new("a", &log).instant());

        assert_eq!(rig.layer.current(), Some(id));
        assert_eq!(rig.layer.current_state(), Some(ViewState::Loading));
        assert!(rig.layer.is_transitioning());
    }

    #[test]
    fn instant_view_becomes_active_in_one_update() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(Probe::new("a", &log).instant());

        assert_eq!(rig.tick(0), Ok(true));
        assert_eq!(rig.layer.current_state(), Some(ViewState::Active));
        assert_eq!(log.take(), vec!["a:init", "a:update"]);
    }

    #[test]
    fn enter_progress_is_monotonic_and_clamped() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(timed("a", &log, 0.25, 0.25));

        rig.tick(0).unwrap();
        assert_eq!(rig.layer.transition_pos(), Some(0.0));

        rig.tick(125).unwrap();
        assert_eq!(rig.layer.transition_pos(), Some(0.5));
        assert_eq!(rig.layer.current_state(), Some(ViewState::Entering));

        assert_eq!(rig.tick(500), Ok(true));
        assert_eq!(rig.layer.transition_pos(), Some(1.0));
        assert_eq!(rig.layer.current_state(), Some(ViewState::Active));
    }

    #[test]
    fn replacement_waits_for_exit() {
        let log = journal();
        let mut rig = Rig::new();
        let a = rig.give(timed("a", &log, 0.0, 0.25));
        rig.tick(0).unwrap();

        let b = rig.give(Probe::new("b", &log).instant());
        assert_eq!(rig.layer.state_of(a), Some(ViewState::Exiting));
        assert_eq!(rig.layer.state_of(b), Some(ViewState::Pending));

        rig.tick(125).unwrap();
        assert_eq!(rig.layer.current(), Some(a));

        rig.tick(125).unwrap();
        assert_eq!(rig.layer.current(), Some(b));
        assert_eq!(rig.layer.pending(), None);
        assert!(!rig.layer.owns(a));
        assert!(log.take().contains(&"a:dispose".to_string()));
    }

    #[test]
    #[should_panic(expected = "mid-transition")]
    fn transition_while_loading_panics() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(Probe::new("a", &log).instant());
        rig.give(Probe::new("b", &log).instant());
    }

    #[test]
    fn exit_ignores_non_active_view() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(Probe::new("a", &log).instant());

        assert!(!rig.layer.exit(&mut rig.input, &mut rig.ctx));
        assert_eq!(rig.layer.current_state(), Some(ViewState::Loading));
    }

    #[test]
    fn exiting_disables_enabled_view() {
        let log = journal();
        let mut rig = Rig::new();
        let id = rig.give(Probe::new("a", &log).instant());
        rig.tick(0).unwrap();
        rig.layer.set_enabled(true, &mut rig.input, &mut rig.ctx);
        assert!(rig.layer.is_enabled(id));
        log.take();

        assert!(rig.layer.exit(&mut rig.input, &mut rig.ctx));
        assert!(!rig.layer.is_enabled(id));
        assert!(!rig.input.is_registered(id.into()));
        assert_eq!(log.take(), vec!["a:disable"]);
    }

    //--- Loading ----------------------------------------------------------

    #[test]
    fn update_hook_skipped_while_loading() {
        let log = journal();
        let mut rig = Rig::new();
        let (signal, load) = AssetLoad::pair();
        rig.give(Probe::new("a", &log).instant().with_load(load));

        rig.tick(16).unwrap();
        rig.tick(16).unwrap();
        assert_eq!(rig.layer.current_state(), Some(ViewState::Loading));
        assert!(log.take().is_empty());

        signal.complete();
        rig.tick(16).unwrap();
        assert_eq!(log.take(), vec!["a:init", "a:update"]);
    }

    #[test]
    fn load_failure_empties_layer() {
        let log = journal();
        let mut rig = Rig::new();
        let id = rig.give(Probe::new("a", &log).with_load(AssetLoad::failed(AssetError::Abandoned)));

        let err = rig.tick(16).unwrap_err();
        assert_eq!(
            err,
            ViewError::AssetLoad {
                view: id,
                layer: 0,
                source: AssetError::Abandoned
            }
        );
        assert!(rig.layer.is_empty());
        assert!(!rig.layer.is_transitioning());
        assert_eq!(log.take(), vec!["a:dispose"]);
    }

    #[test]
    fn unfocused_view_is_blurred_on_init() {
        let log = journal();
        let mut rig = Rig::new();
        rig.ctx.set_focus(false);
        rig.give(Probe::new("a", &log).instant());

        rig.tick(0).unwrap();
        assert_eq!(log.take(), vec!["a:init", "a:blur", "a:update"]);
    }

    #[test]
    fn loading_view_is_not_told_about_focus() {
        let log = journal();
        let mut rig = Rig::new();
        let (_signal, load) = AssetLoad::pair();
        rig.give(Probe::new("a", &log).with_load(load));

        rig.layer.notify_focus(false, &mut rig.ctx);
        assert!(log.take().is_empty());
    }

    //--- Drawing ----------------------------------------------------------

    #[test]
    fn loading_layer_draws_default_indicator() {
        let log = journal();
        let mut rig = Rig::new();
        let (_signal, load) = AssetLoad::pair();
        rig.give(Probe::new("a", &log).with_load(load));

        let mut canvas = DrawList::new(800.0, 600.0);
        rig.layer.draw(&mut canvas, &mut None);
        assert_eq!(canvas.texts().collect::<Vec<_>>(), vec!["Loading..."]);
    }

    #[test]
    fn entering_view_gets_fade_overlay() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(timed("a", &log, 0.25, 0.25));
        rig.tick(0).unwrap();
        rig.tick(125).unwrap();

        let mut canvas = DrawList::new(100.0, 100.0);
        rig.layer.draw(&mut canvas, &mut None);

        assert_eq!(canvas.texts().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(
            canvas.commands().last(),
            Some(&DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                color: Color::rgba(0, 0, 0, 128),
            })
        );
    }

    #[test]
    fn exiting_view_gets_fade_overlay() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(timed("a", &log, 0.25, 0.25));
        rig.tick(0).unwrap();
        assert!(rig.tick(250).unwrap());

        assert!(rig.layer.exit(&mut rig.input, &mut rig.ctx));
        rig.tick(125).unwrap();
        assert_eq!(rig.layer.current_state(), Some(ViewState::Exiting));

        let mut canvas = DrawList::new(100.0, 100.0);
        rig.layer.draw(&mut canvas, &mut None);
        assert_eq!(
            canvas.commands().last(),
            Some(&DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                color: Color::rgba(0, 0, 0, 128),
            })
        );
    }

    #[test]
    fn disabled_fades_draw_no_overlay() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(Probe::new("a", &log).with_config(
            TransitionConfig::default()
                .with_enter_time(0.25)
                .with_exit_time(0.25)
                .with_fades(false, false),
        ));
        let no_fill = |canvas: &DrawList| {
            canvas
                .commands()
                .iter()
                .all(|command| !matches!(command, DrawCommand::FillRect { .. }))
        };

        rig.tick(0).unwrap();
        rig.tick(125).unwrap();
        assert_eq!(rig.layer.current_state(), Some(ViewState::Entering));
        let mut canvas = DrawList::new(100.0, 100.0);
        rig.layer.draw(&mut canvas, &mut None);
        assert!(no_fill(&canvas));

        rig.tick(125).unwrap();
        rig.layer.exit(&mut rig.input, &mut rig.ctx);
        rig.tick(125).unwrap();
        assert_eq!(rig.layer.current_state(), Some(ViewState::Exiting));
        let mut canvas = DrawList::new(100.0, 100.0);
        rig.layer.draw(&mut canvas, &mut None);
        assert_eq!(canvas.texts().collect::<Vec<_>>(), vec!["a"]);
        assert!(no_fill(&canvas));
    }

    #[test]
    fn active_view_has_no_overlay() {
        let log = journal();
        let mut rig = Rig::new();
        rig.give(Probe::new("a", &log).instant());
        rig.tick(0).unwrap();

        let mut canvas = DrawList::new(100.0, 100.0);
        rig.layer.draw(&mut canvas, &mut None);
        assert!(canvas
            .commands()
            .iter()
            .all(|command| !matches!(command, DrawCommand::FillRect { .. })));
    }
}
