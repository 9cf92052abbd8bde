//=========================================================================
// Input System
//
// Listener-based input routing.
//
// Responsibilities:
// - Define the listener capability (`InputListener`)
// - Route portable input events to interested listeners (`InputManager`)
// - Gate dispatch on the pointer-lock policy (`PointerLock`)
//
// Notes:
// The view manager owns one `InputManager<dyn View>` and registers
// exactly the enabled view with it; standalone users can own an
// `InputManager` of any listener type.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod input_manager;
mod pointer_lock;

//=== Public API ==========================================================

pub use event::{InputEvent, InputEventType, KeyCode, Modifiers, MouseButton};
pub use input_manager::{Dispatch, GlobalHandler, InputManager, ListenerId};
pub use pointer_lock::{PointerLock, POINTER_LOCK_COOLDOWN};

//=== Internal Imports ====================================================

use crate::core::globals::GlobalContext;

//=== InputListener =======================================================

/// Something that can receive input events.
///
/// A listener names the event types it handles through
/// [`input_interests`](Self::input_interests); the manager only delivers
/// those types. Interests are read once, at registration.
///
/// Both methods have defaults, so a listener that takes no input is just
/// `impl InputListener for MyView {}`.
pub trait InputListener {
    /// Event types this listener wants delivered.
    fn input_interests(&self) -> &[InputEventType] {
        &[]
    }

    /// Handles one event of a type listed in `input_interests`.
    fn on_input(&mut self, _event: &InputEvent, _ctx: &mut GlobalContext) {}
}
