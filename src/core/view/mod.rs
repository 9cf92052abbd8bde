//=========================================================================
// View System
//
// Layered view lifecycle orchestration.
//
// Responsibilities:
// - Define the `View` capability set (lifecycle hooks + draw)
// - Drive each view through Pending → Loading → Entering → Active → Exiting
// - Stack views on sparse, independently transitioning layers
// - Keep exactly the front-most active view enabled for input
//
// Architecture:
// ```text
//   ViewManager
//     ├─ layers: BTreeMap<usize, ViewLayer>   (0 = background)
//     │    └─ ViewLayer { view, pending }      (ViewEntry each)
//     ├─ input: InputManager<dyn View>         (enabled view only)
//     └─ ctx: GlobalContext                    (handed to every hook)
// ```
//
// Notes:
// Hooks never call the manager directly; they queue `ViewCommand`s on
// the context, which the manager applies once the hook has returned.
//
//=========================================================================

//=== Submodules ==========================================================

mod asset_load;
mod command_queue;
mod view_layer;
mod view_manager;

#[cfg(test)]
mod test_support;

//=== Public API ==========================================================

pub use asset_load::{AssetLoad, LoadSignal, LoadStatus};
pub use command_queue::{CommandQueue, ViewCommand};
pub use view_layer::ViewLayer;
pub use view_manager::{LoadingIndicatorFn, ViewManager};

//=== Standard Library Imports ============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Internal Imports ====================================================

use crate::core::globals::GlobalContext;
use crate::core::input::{InputListener, ListenerId};
use crate::core::render::Canvas;

//=== Constants ===========================================================

/// Default enter / exit fade duration, in seconds.
pub const DEFAULT_TRANSITION_TIME: f32 = 0.25;

//=== ViewId ==============================================================

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a view handed to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub(crate) fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

impl From<ViewId> for ListenerId {
    fn from(id: ViewId) -> Self {
        ListenerId::new(id.0)
    }
}

//=== ViewState ===========================================================

/// Lifecycle state of a view owned by a layer.
///
/// Disposal is not a state: a disposed view is simply gone from its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    /// Queued behind an exiting view.
    Pending,

    /// Waiting for its assets; the loading indicator is drawn instead.
    Loading,

    /// Fading in.
    Entering,

    /// Fully shown; the only state in which a view can be enabled.
    Active,

    /// Fading out; disposed once the fade completes.
    Exiting,
}

impl ViewState {
    /// Whether the view's `update` hook runs in this state.
    pub fn runs_update(self) -> bool {
        matches!(self, Self::Entering | Self::Active | Self::Exiting)
    }
}

//=== TransitionConfig ====================================================

/// Timing and fade parameters for a view's enter / exit transitions.
///
/// Times are in seconds; `0.0` makes the transition instantaneous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub enter_time: f32,
    pub exit_time: f32,
    pub enter_fade: bool,
    pub exit_fade: bool,
}

impl TransitionConfig {
    /// No transition time and no fade overlay.
    pub const INSTANT: Self = Self {
        enter_time: 0.0,
        exit_time: 0.0,
        enter_fade: false,
        exit_fade: false,
    };

    pub fn with_enter_time(mut self, seconds: f32) -> Self {
        self.enter_time = seconds;
        self
    }

    pub fn with_exit_time(mut self, seconds: f32) -> Self {
        self.exit_time = seconds;
        self
    }

    pub fn with_fades(mut self, enter_fade: bool, exit_fade: bool) -> Self {
        self.enter_fade = enter_fade;
        self.exit_fade = exit_fade;
        self
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enter_time: DEFAULT_TRANSITION_TIME,
            exit_time: DEFAULT_TRANSITION_TIME,
            enter_fade: true,
            exit_fade: true,
        }
    }
}

//=== LoadingIndicator ====================================================

/// What a view did when asked to draw its loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingIndicator {
    /// The view drew its own indicator.
    Custom,

    /// The view has none; the manager-wide or built-in one is drawn.
    UseDefault,
}

//=== View ================================================================

/// One screen or overlay with a managed lifecycle.
///
/// Every hook except [`draw`](Self::draw) is optional. Hooks receive the
/// shared [`GlobalContext`], through which they may request transitions.
///
/// Input arrives through the [`InputListener`] supertrait, and only while
/// the view is enabled (front-most active view, application focused).
///
/// # Example
///
/// ```
/// use strata::prelude::*;
///
/// struct Title;
///
/// impl InputListener for Title {}
///
/// impl View for Title {
///     fn transition(&self) -> TransitionConfig {
///         TransitionConfig::default().with_enter_time(0.5)
///     }
///
///     fn draw(&mut self, canvas: &mut dyn Canvas) {
///         let (w, h) = canvas.size();
///         canvas.fill_rect(Rect::new(0.0, 0.0, w, h), Color::rgb(20, 20, 40));
///     }
/// }
///
/// let mut manager = ViewManager::new();
/// let title = manager.transition_to(Title, 0);
/// assert_eq!(manager.view_state(title), Some(ViewState::Loading));
/// ```
pub trait View: InputListener {
    /// Transition timing, read once when the view is handed to a layer.
    fn transition(&self) -> TransitionConfig {
        TransitionConfig::default()
    }

    /// Starts loading the view's assets.
    ///
    /// Called once, when the view enters `Loading`. `None` means there is
    /// nothing to wait for.
    fn load_assets(&mut self) -> Option<AssetLoad> {
        None
    }

    /// Draws a custom loading indicator. `fade` rises from 0 to 1.
    fn draw_loading_indicator(&mut self, _canvas: &mut dyn Canvas, _fade: f32) -> LoadingIndicator {
        LoadingIndicator::UseDefault
    }

    /// Called once the assets are loaded, as the view starts entering.
    fn init(&mut self, _ctx: &mut GlobalContext) {}

    /// Called once the view has left its layer for good.
    fn on_dispose(&mut self, _ctx: &mut GlobalContext) {}

    /// Called when the view starts receiving input.
    fn on_enable(&mut self, _ctx: &mut GlobalContext) {}

    /// Called when the view stops receiving input.
    fn on_disable(&mut self, _ctx: &mut GlobalContext) {}

    fn on_focus(&mut self, _ctx: &mut GlobalContext) {}

    fn on_blur(&mut self, _ctx: &mut GlobalContext) {}

    /// Per-frame logic. Runs while entering, active or exiting.
    fn update(&mut self, _ctx: &mut GlobalContext) {}

    fn draw(&mut self, canvas: &mut dyn Canvas);
}
