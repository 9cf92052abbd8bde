//=========================================================================
// Strata — Library Root
//
// Layered view lifecycle orchestration with focus-aware input routing.
//
// Responsibilities:
// - Expose the view system (`View`, `ViewManager`) and input routing
// - Expose the engine facade (`Engine`, `EngineBuilder`) that drives
//   a `ViewManager` from a Winit window
// - Keep the platform layer hidden from end users
//
// Typical usage:
// ```no_run
// use strata::prelude::*;
//
// struct Title;
// impl InputListener for Title {}
// impl View for Title {
//     fn draw(&mut self, _canvas: &mut dyn Canvas) {}
// }
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::new()
//         .build()
//         .init(|manager| { manager.transition_to(Title, 0); })
//         .run(DrawList::new(800.0, 600.0))
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the view system, input routing, the hook context and
// the render abstraction. It can be driven without a window.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit integration (window, event loop, input
// translation) and is kept private, as it is not part of the public API
// surface.
//
// `engine` defines the main entry point and its builder.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
