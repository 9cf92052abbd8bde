//=========================================================================
// Error Types
//=========================================================================
//
// Recoverable failures surfaced by the crate.
//
// Precondition violations (transitioning a layer mid-transition, exiting
// a view no layer owns, opening a second popup) are programmer errors and
// panic instead.
//
//=========================================================================

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Imports ====================================================

use crate::core::view::ViewId;

//=== AssetError ==========================================================

/// Failure reported by a view's asset load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// A required asset does not exist.
    #[error("asset not found: {path}")]
    NotFound { path: String },

    /// The loader reported a failure.
    #[error("asset load failed: {0}")]
    Failed(String),

    /// The load signal was dropped without completing.
    #[error("asset load abandoned before completion")]
    Abandoned,
}

//=== ViewError ===========================================================

/// Failure surfaced from [`ViewManager::update`](crate::core::view::ViewManager::update).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A view's assets failed to load; the view was disposed and its
    /// layer emptied.
    #[error("{view} on layer {layer} failed to load")]
    AssetLoad {
        view: ViewId,
        layer: usize,
        #[source]
        source: AssetError,
    },
}

//=== PlatformError =======================================================

/// Failure starting or running the windowed platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Result alias for platform entry points.
pub type PlatformResult<T> = Result<T, PlatformError>;

//=========================================================================
// Unit Tests
//=========================================================================
