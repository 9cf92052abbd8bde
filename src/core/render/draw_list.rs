//=========================================================================
// Draw List
//=========================================================================
//
// Recording canvas.
//
// Stores every draw call of a frame as a `DrawCommand` so a rendering
// backend can replay it, and so tests can inspect what was drawn.
//
//=========================================================================

//=== External Crates =====================================================

use log::warn;

//=== Internal Imports ====================================================

use super::{Canvas, Color, Rect, TextStyle};

//=== DrawCommand =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Push,
    Pop,
    FillRect { rect: Rect, color: Color },
    Text { text: String, x: f32, y: f32, style: TextStyle },
}

//=== DrawList ============================================================

/// A [`Canvas`] that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct DrawList {
    width: f32,
    height: f32,
    depth: usize,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            depth: 0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        self.depth = 0;
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.depth = 0;
        self.commands.clear();
    }

    /// Current push depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Recorded text runs, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn push(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Push);
    }

    fn pop(&mut self) {
        if self.depth == 0 {
            warn!(target: "view", "Canvas pop without matching push (ignored)");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Pop);
    }

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            style: style.clone(),
        });
    }

    fn begin_frame(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut list = DrawList::new(100.0, 50.0);
        list.push();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        list.text("hi", 1.0, 2.0, &TextStyle::default());
        list.pop();

        assert_eq!(list.commands().len(), 4);
        assert_eq!(list.commands()[0], DrawCommand::Push);
        assert_eq!(list.commands()[3], DrawCommand::Pop);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hi"]);
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn unmatched_pop_is_ignored() {
        let mut list = DrawList::new(10.0, 10.0);
        list.pop();
        assert!(list.commands().is_empty());
    }

    #[test]
    fn begin_frame_resizes_and_clears() {
        let mut list = DrawList::new(10.0, 10.0);
        list.push();
        list.begin_frame(320.0, 240.0);
        assert!(list.commands().is_empty());
        assert_eq!(list.size(), (320.0, 240.0));
        assert_eq!(list.depth(), 0);
    }
}
