//=========================================================================
// Strata Engine
//
// Main entry point: configures the window and the view manager, then
// hands both to the platform event loop.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(canvas)──>  [Event Loop]
//         │                          │
//         ├─ with_title()            ├─ init(|manager| ..)
//         ├─ with_size()             └─ runs platform on this thread,
//         ├─ with_frame_rate()          blocks until the window closes
//         └─ with_pointer_lock()
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::PlatformResult;
use crate::core::render::Canvas;
use crate::core::view::ViewManager;
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Strata"
/// - **Size**: 800 x 600
/// - **Frame rate**: 60.0 (nominal; sets the frame time used after the
///   window becomes visible again)
/// - **Pointer lock**: not required
///
/// # Examples
///
/// ```no_run
/// use strata::prelude::*;
///
/// struct Title;
/// impl InputListener for Title {}
/// impl View for Title {
///     fn draw(&mut self, _canvas: &mut dyn Canvas) {}
/// }
///
/// EngineBuilder::new()
///     .with_title("Demo")
///     .with_frame_rate(120.0)
///     .build()
///     .init(|manager| {
///         manager.transition_to(Title, 0);
///     })
///     .run(DrawList::new(800.0, 600.0))
///     .expect("event loop failed");
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    frame_rate: f64,
    pointer_lock: bool,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Strata".to_string(),
            width: 800,
            height: 600,
            frame_rate: 60.0,
            pointer_lock: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the nominal frame rate.
    ///
    /// Frames are paced by the display; this rate only defines the frame
    /// time substituted on the first frame after the window is shown
    /// again, so views do not jump by the whole hidden duration.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `frame_rate <= 0.0`.
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        assert!(frame_rate > 0.0, "Frame rate must be positive, got {}", frame_rate);
        self.frame_rate = frame_rate;
        self
    }

    /// Requires pointer lock before any input is dispatched.
    pub fn with_pointer_lock(mut self, required: bool) -> Self {
        self.pointer_lock = required;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!(
            "Building engine ({}x{}, {} fps, pointer lock: {})",
            self.width, self.height, self.frame_rate, self.pointer_lock
        );

        let mut manager =
            ViewManager::new().with_nominal_frame_time(Duration::from_secs_f64(1.0 / self.frame_rate));
        if self.pointer_lock {
            manager.require_pointer_lock();
        }

        Engine {
            manager,
            window: WindowConfig {
                title: self.title,
                width: self.width,
                height: self.height,
            },
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Strata runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit Event Loop)
///         ├─► ViewManager (update / draw per redraw)
///         └─► Canvas (backend supplied to `run`)
/// ```
pub struct Engine {
    manager: ViewManager,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures the view manager before the event loop starts.
    ///
    /// Typically used to open the first view and install a loading
    /// indicator or global input handlers.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut ViewManager),
    {
        info!("Initializing view manager");
        init_fn(&mut self.manager);
        self
    }

    pub fn manager(&self) -> &ViewManager {
        &self.manager
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and runs until it is closed.
    ///
    /// `canvas` receives every frame's draw calls between `begin_frame`
    /// and `end_frame`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`](crate::core::error::PlatformError) if the
    /// event loop or the window cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run<C: Canvas>(self, canvas: C) -> PlatformResult<()> {
        info!("Starting engine runtime ({:?})", self.window.title);

        let platform = Platform::new(self.window, self.manager, canvas);
        let result = platform.run();

        match &result {
            Ok(()) => info!("Engine shutdown complete"),
            Err(e) => log::error!("Platform error: {}", e),
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputListener;
    use crate::core::view::View;

    struct Blank;

    impl InputListener for Blank {}

    impl View for Blank {
        fn draw(&mut self, _canvas: &mut dyn Canvas) {}
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.title, "Strata");
        assert_eq!((builder.width, builder.height), (800, 600));
        assert_eq!(builder.frame_rate, 60.0);
        assert!(!builder.pointer_lock);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_title("Layers")
            .with_size(1280, 720)
            .with_frame_rate(120.0)
            .build();

        assert_eq!(
            engine.window,
            WindowConfig {
                title: "Layers".into(),
                width: 1280,
                height: 720,
            }
        );
    }

    #[test]
    #[should_panic(expected = "Frame rate must be positive")]
    fn builder_with_frame_rate_panics_on_zero() {
        EngineBuilder::new().with_frame_rate(0.0);
    }

    #[test]
    #[should_panic(expected = "Frame rate must be positive")]
    fn builder_with_frame_rate_panics_on_negative() {
        EngineBuilder::new().with_frame_rate(-60.0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_size_panics_on_zero() {
        EngineBuilder::new().with_size(0, 600);
    }

    #[test]
    fn pointer_lock_option_reaches_input_manager() {
        let engine = EngineBuilder::new().with_pointer_lock(true).build();
        assert!(engine.manager().input().pointer_lock().is_required());

        let engine = EngineBuilder::new().build();
        assert!(!engine.manager().input().pointer_lock().is_required());
    }

    #[test]
    fn init_configures_manager() {
        let engine = EngineBuilder::new().build().init(|manager| {
            manager.transition_to(Blank, 2);
        });

        assert_eq!(engine.manager().views().len(), 1);
        assert!(engine.manager().layer(2).is_some());
    }
}
