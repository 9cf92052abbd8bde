//=========================================================================
// Default Loading Indicator
//=========================================================================

//=== Internal Imports ====================================================

use super::{unit_to_byte, Canvas, Color, TextAlign, TextStyle};

//=== Constants ===========================================================

/// Seconds for a loading indicator to fade in fully.
pub const LOADING_FADE_TIME: f32 = 0.25;

/// Draws the built-in "Loading..." indicator.
///
/// Centred bold text, one twentieth of the canvas height, light grey
/// with its alpha scaled by `fade` (`0` hidden, `1` fully shown).
pub fn draw_default_loading_indicator(canvas: &mut dyn Canvas, fade: f32) {
    let (width, height) = canvas.size();
    let style = TextStyle {
        size: height / 20.0,
        color: Color::grey(200, unit_to_byte(fade)),
        bold: true,
        align: TextAlign::Center,
    };
    canvas.text("Loading...", width / 2.0, height / 2.0, &style);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, DrawList};

    #[test]
    fn indicator_is_centred_and_scaled() {
        let mut list = DrawList::new(800.0, 600.0);
        draw_default_loading_indicator(&mut list, 1.0);

        let DrawCommand::Text { text, x, y, style } = &list.commands()[0] else {
            panic!("expected a text command");
        };
        assert_eq!(text, "Loading...");
        assert_eq!((*x, *y), (400.0, 300.0));
        assert_eq!(style.size, 30.0);
        assert!(style.bold);
        assert_eq!(style.color, Color::grey(200, 255));
    }

    #[test]
    fn fade_controls_alpha() {
        let mut list = DrawList::new(800.0, 600.0);
        draw_default_loading_indicator(&mut list, 0.0);

        let DrawCommand::Text { style, .. } = &list.commands()[0] else {
            panic!("expected a text command");
        };
        assert_eq!(style.color.a, 0);
    }
}
