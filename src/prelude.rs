//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use strata::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Hook context
pub use crate::core::globals::GlobalContext;

// Input system
pub use crate::core::input::{
    Dispatch, InputEvent, InputEventType, InputListener, InputManager, KeyCode, ListenerId, Modifiers,
    MouseButton,
};

// View system
pub use crate::core::view::{
    AssetLoad, LoadSignal, LoadingIndicator, TransitionConfig, View, ViewId, ViewManager, ViewState,
};

// Rendering
pub use crate::core::render::{Canvas, Color, DrawList, Rect, TextAlign, TextStyle};

// Errors
pub use crate::core::error::{AssetError, PlatformError, ViewError};
