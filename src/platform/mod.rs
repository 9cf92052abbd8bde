//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the view manager.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ├─ input events ─► InputProcessor          │
//  │   │                    └─► ViewManager::handle_input
//  │   ├─ Focused      ───► ViewManager::set_focus│
//  │   ├─ Occluded     ───► ViewManager::set_visible
//  │   └─ RedrawRequested (frame boundary)        │
//  │        ├─► ViewManager::update(delta)        │
//  │        └─► ViewManager::draw(canvas)         │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: the measured time since the
//   previous redraw is the frame delta
// - **Input dispatched immediately**: events reach the enabled view as
//   Winit reports them, between frames
// - **Sticky modifiers**: Modifier state persists across events until
//   explicitly changed (matches platform behavior)
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== Standard Library Imports ============================================

use std::time::{Duration, Instant};

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::error::{PlatformError, PlatformResult};
use crate::core::input::InputEvent;
use crate::core::render::Canvas;
use crate::core::view::ViewManager;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Window parameters chosen on the engine builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(..)` - no window yet
/// 2. **Execution**: `platform.run()` - blocks in the Winit event loop
/// 3. **Window creation**: lazily, in `resumed()`
/// 4. **Shutdown**: User closes window → event loop exits → `run()` returns
///
/// # Thread Safety
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform<C: Canvas> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    config: WindowConfig,
    manager: ViewManager,
    canvas: C,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    started: Instant,
    last_frame: Option<Instant>,

    /// Fatal error raised inside a Winit callback, returned by `run()`.
    failure: Option<PlatformError>,
}

impl<C: Canvas> Platform<C> {
    //--- Construction -----------------------------------------------------

    /// Creates a platform around a configured manager.
    ///
    /// Does not create the window yet - that happens lazily in `resumed()`.
    pub fn new(config: WindowConfig, manager: ViewManager, canvas: C) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            manager,
            canvas,
            input_processor: InputProcessor::new(),
            started: Instant::now(),
            last_frame: None,
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> PlatformResult<()> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Updates and draws one frame.
    ///
    /// Asset-load failures are logged; the failed view is already gone
    /// from its layer and the application keeps running.
    fn frame(&mut self, now: Instant) {
        let delta = self
            .last_frame
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        if let Err(err) = self.manager.update(delta) {
            error!(target: "platform", "Frame update failed: {}", err);
        }

        let (width, height) = self.surface_size();
        self.canvas.begin_frame(width, height);
        self.manager.draw(&mut self.canvas);
        self.canvas.end_frame();
    }

    fn surface_size(&self) -> (f32, f32) {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width as f32, size.height as f32)
            }
            None => (self.config.width as f32, self.config.height as f32),
        }
    }

    //--- Input ------------------------------------------------------------

    fn dispatch(&mut self, events: Vec<InputEvent>) {
        for event in events {
            trace!(target: "platform", "Dispatching {:?}", event);
            self.manager.handle_input(&event);
        }
    }

    fn since_start(&self) -> Duration {
        self.started.elapsed()
    }

    /// Tries to grab the cursor if the pointer-lock policy asks for it.
    fn request_pointer_lock(&mut self) {
        let now = self.since_start();
        if !self.manager.input().on_pointer_down(now) {
            return;
        }

        let Some(window) = &self.window else {
            return;
        };

        let held = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

        match held {
            Ok(()) => {
                window.set_cursor_visible(false);
                info!(target: "platform", "Pointer lock acquired");
                self.manager.input_mut().pointer_lock_changed(true, now);
            }
            Err(e) => {
                warn!(target: "platform", "Pointer lock request failed: {}", e);
                self.manager.input_mut().pointer_lock_changed(false, now);
            }
        }
    }

    fn release_pointer_lock(&mut self) {
        if !self.manager.input().pointer_lock().is_held() {
            return;
        }

        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!(target: "platform", "Pointer release failed: {}", e);
            }
            window.set_cursor_visible(true);
        }

        let now = self.since_start();
        self.manager.input_mut().pointer_lock_changed(false, now);
        info!(target: "platform", "Pointer lock released");
    }
}

//=== Winit Integration ===================================================

impl<C: Canvas> ApplicationHandler for Platform<C> {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(PlatformError::from(e));
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                if !focused {
                    self.input_processor.reset_buttons();
                    self.release_pointer_lock();
                }
                self.manager.set_focus(focused);
            }

            WindowEvent::Occluded(occluded) => {
                self.manager.set_visible(!occluded);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.dispatch(vec![event]);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.input_processor.process_wheel(delta);
                self.dispatch(vec![event]);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let events = self.input_processor.process_key(
                    key_event.physical_key,
                    key_event.state,
                    key_event.text.as_deref(),
                );
                self.dispatch(events);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let now = self.since_start();
                let events = self.input_processor.process_mouse_button(button, state, now);
                self.dispatch(events);

                if state == ElementState::Pressed {
                    self.request_pointer_lock();
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame(Instant::now());

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
