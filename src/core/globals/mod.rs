//=========================================================================
// Global State
//=========================================================================
//
// Shared context handed to every view and input hook.
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
