//=========================================================================
// Render Collaborator
//
// The drawing surface views paint onto.
//
// Responsibilities:
// - Define the `Canvas` trait views draw through
// - Provide portable value types (`Color`, `Rect`, `TextStyle`)
// - Provide a recording canvas (`DrawList`) backends can replay
// - Draw the built-in loading indicator
//
// Notes:
// The view system never inspects what a view drew. It only sequences
// draw calls and brackets each layer with `push` / `pop`.
//
//=========================================================================

//=== Submodules ==========================================================

mod draw_list;
mod loading;

//=== Public API ==========================================================

pub use draw_list::{DrawCommand, DrawList};
pub use loading::{draw_default_loading_indicator, LOADING_FADE_TIME};

//=== Color ===============================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Grey level `v` with the given alpha.
    pub const fn grey(v: u8, a: u8) -> Self {
        Self { r: v, g: v, b: v, a }
    }

    /// Returns this color with alpha taken from `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: unit_to_byte(opacity),
            ..self
        }
    }
}

/// Maps `[0, 1]` onto `0..=255`, clamping out-of-range input.
pub(crate) fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

//=== Rect ================================================================

/// Axis-aligned rectangle in canvas pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a canvas of the given size.
    pub fn covering((width, height): (f32, f32)) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

//=== TextStyle ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a run of text is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: Color::WHITE,
            bold: false,
            align: TextAlign::Left,
        }
    }
}

//=== Canvas ==============================================================

/// Drawing surface handed to views.
///
/// `push` / `pop` save and restore drawing state; the view manager wraps
/// every layer in a pair so one layer cannot leak state into the next.
pub trait Canvas {
    /// Saves the current drawing state.
    fn push(&mut self);

    /// Restores the most recently pushed drawing state.
    fn pop(&mut self);

    /// Canvas size in pixels, `(width, height)`.
    fn size(&self) -> (f32, f32);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` anchored at `(x, y)` (vertical centre of the line).
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Called by the platform before a frame is drawn.
    fn begin_frame(&mut self, _width: f32, _height: f32) {}

    /// Called by the platform after a frame is drawn.
    fn end_frame(&mut self) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_maps_to_byte_alpha() {
        assert_eq!(Color::BLACK.with_opacity(1.0).a, 255);
        assert_eq!(Color::BLACK.with_opacity(0.0).a, 0);
        assert_eq!(Color::BLACK.with_opacity(0.5).a, 128);
        assert_eq!(Color::BLACK.with_opacity(7.0).a, 255);
    }

    #[test]
    fn covering_rect_starts_at_origin() {
        let rect = Rect::covering((640.0, 480.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 640.0, 480.0));
    }
}
