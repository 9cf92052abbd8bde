//=========================================================================
// Core Systems
//
// Everything that runs independently of the windowing platform.
//
// Modules:
// - `view`    : layered view lifecycle (View, ViewLayer, ViewManager)
// - `input`   : listener registry and event dispatch (InputManager)
// - `globals` : context shared with every hook (GlobalContext)
// - `render`  : drawing surface abstraction (Canvas, DrawList)
// - `error`   : recoverable failures
//
// Notes:
// Nothing here touches Winit; the whole core can be driven by hand,
// which is how the unit tests exercise it.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod globals;
pub mod input;
pub mod render;
pub mod view;

//=== Re-exports ==========================================================

pub use error::{AssetError, PlatformError, ViewError};
pub use globals::GlobalContext;
pub use input::{InputEvent, InputEventType, InputListener, InputManager};
pub use view::{View, ViewId, ViewManager, ViewState};
