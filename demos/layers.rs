//=========================================================================
// Layers Demo
//
// A background, a menu that loads its assets on a worker thread, and a
// help popup above both.
//
// Keys:
//   Enter   open the help popup (from the menu)
//   Escape  close the popup, or leave the menu
//   any     typed characters are echoed by the popup
//
// Run with `RUST_LOG=debug cargo run --example layers` to watch the
// lifecycle transitions.
//
//=========================================================================

use std::thread;
use std::time::Duration;

use log::{info, trace};
use strata::prelude::*;

//=== Backdrop ============================================================

/// Base layer; opens the menu the first time it is enabled.
struct Backdrop {
    opened_menu: bool,
}

impl InputListener for Backdrop {}

impl View for Backdrop {
    fn transition(&self) -> TransitionConfig {
        TransitionConfig::INSTANT
    }

    fn on_enable(&mut self, ctx: &mut GlobalContext) {
        if !self.opened_menu {
            self.opened_menu = true;
            ctx.transition_to(Menu { selected: 0 }, 1);
        }
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        let (w, h) = canvas.size();
        canvas.fill_rect(Rect::new(0.0, 0.0, w, h), Color::rgb(16, 24, 48));
    }
}

//=== Menu ================================================================

const ENTRIES: [&str; 3] = ["Start", "Options", "Help"];

struct Menu {
    selected: usize,
}

impl InputListener for Menu {
    fn input_interests(&self) -> &[InputEventType] {
        &[InputEventType::KeyPressed, InputEventType::MouseWheel]
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut GlobalContext) {
        match event {
            InputEvent::KeyPressed { key: KeyCode::ArrowDown, .. } => {
                self.selected = (self.selected + 1) % ENTRIES.len();
            }
            InputEvent::KeyPressed { key: KeyCode::ArrowUp, .. } => {
                self.selected = (self.selected + ENTRIES.len() - 1) % ENTRIES.len();
            }
            // The menu stays enabled while the popup fades in above it.
            InputEvent::KeyPressed { key: KeyCode::Enter, .. }
                if !ctx.is_transitioning() && !ctx.popup_is_open() =>
            {
                ctx.open_popup(Help { typed: String::new() });
            }
            InputEvent::KeyPressed { key: KeyCode::Escape, .. } if !ctx.is_transitioning() => {
                ctx.exit_current()
            }
            InputEvent::MouseWheel { delta_y, .. } if *delta_y < 0.0 => {
                self.selected = (self.selected + 1) % ENTRIES.len();
            }
            _ => {}
        }
    }
}

impl View for Menu {
    fn load_assets(&mut self) -> Option<AssetLoad> {
        Some(AssetLoad::spawn(|| {
            thread::sleep(Duration::from_millis(750));
            Ok(())
        }))
    }

    fn init(&mut self, _ctx: &mut GlobalContext) {
        info!("Menu ready");
    }

    fn on_dispose(&mut self, _ctx: &mut GlobalContext) {
        info!("Menu closed");
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        let (w, h) = canvas.size();
        for (i, entry) in ENTRIES.iter().enumerate() {
            let style = TextStyle {
                size: h / 16.0,
                bold: i == self.selected,
                align: TextAlign::Center,
                ..TextStyle::default()
            };
            canvas.text(entry, w / 2.0, h / 3.0 + i as f32 * h / 10.0, &style);
        }
    }
}

//=== Help Popup ==========================================================

struct Help {
    typed: String,
}

impl InputListener for Help {
    fn input_interests(&self) -> &[InputEventType] {
        &[InputEventType::KeyPressed, InputEventType::KeyTyped]
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut GlobalContext) {
        match event {
            InputEvent::KeyPressed { key: KeyCode::Escape, .. } => ctx.close_popup(),
            InputEvent::KeyTyped { character } => self.typed.push(*character),
            _ => {}
        }
    }
}

impl View for Help {
    fn transition(&self) -> TransitionConfig {
        TransitionConfig::default().with_enter_time(0.1).with_exit_time(0.1)
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        let (w, h) = canvas.size();
        canvas.fill_rect(Rect::new(w * 0.2, h * 0.2, w * 0.6, h * 0.6), Color::rgba(0, 0, 0, 200));
        canvas.text(&self.typed, w / 2.0, h / 2.0, &TextStyle::default());
    }
}

//=== Console Canvas ======================================================

/// Records each frame and reports its size instead of rasterizing it.
struct ConsoleCanvas {
    frame: DrawList,
}

impl Canvas for ConsoleCanvas {
    fn push(&mut self) {
        self.frame.push();
    }

    fn pop(&mut self) {
        self.frame.pop();
    }

    fn size(&self) -> (f32, f32) {
        self.frame.size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.frame.fill_rect(rect, color);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.frame.text(text, x, y, style);
    }

    fn begin_frame(&mut self, width: f32, height: f32) {
        self.frame.begin_frame(width, height);
    }

    fn end_frame(&mut self) {
        trace!("Frame recorded {} draw commands", self.frame.commands().len());
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), PlatformError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::new()
        .with_title("Strata Layers")
        .with_size(960, 540)
        .build()
        .init(|manager| {
            manager.input_mut().set_global_handler(InputEventType::KeyTyped, |event| {
                trace!("Typed: {:?}", event);
            });
            manager.transition_to(Backdrop { opened_menu: false }, 0);
        })
        .run(ConsoleCanvas {
            frame: DrawList::new(960.0, 540.0),
        })
}
