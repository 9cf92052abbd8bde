//=========================================================================
// Input Event Types
//
// Defines the engine-side representation of user input.
//
// This module abstracts away platform-specific input (e.g. Winit) into
// the ten interaction kinds views can listen for.
//
// Responsibilities:
// - Represent keyboard and mouse inputs in a stable, portable way
// - Name the fixed set of dispatchable event kinds (`InputEventType`)
// - Carry per-kind payloads (`InputEvent`)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputProcessor (click / drag / typed synthesis)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputManager (gating + ordered dispatch)
//         ↓
//    InputListener::on_input (views)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Characters arrive separately through [`InputEvent::KeyTyped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// The system does not distinguish between left/right variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== InputEventType ======================================================

/// The fixed set of input interactions a listener can subscribe to.
///
/// A listener declares its interests through
/// [`InputListener::input_interests`](super::InputListener::input_interests);
/// the [`InputManager`](super::InputManager) keeps one ordered listener
/// chain per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputEventType {
    MouseClicked,
    MousePressed,
    MouseReleased,
    DoubleClicked,
    MouseMoved,
    MouseDragged,
    MouseWheel,
    KeyPressed,
    KeyReleased,
    KeyTyped,
}

impl InputEventType {
    /// Every dispatchable event type, in declaration order.
    pub const ALL: [InputEventType; 10] = [
        Self::MouseClicked,
        Self::MousePressed,
        Self::MouseReleased,
        Self::DoubleClicked,
        Self::MouseMoved,
        Self::MouseDragged,
        Self::MouseWheel,
        Self::KeyPressed,
        Self::KeyReleased,
        Self::KeyTyped,
    ];

    /// Handler name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            Self::MouseClicked => "mouse_clicked",
            Self::MousePressed => "mouse_pressed",
            Self::MouseReleased => "mouse_released",
            Self::DoubleClicked => "double_clicked",
            Self::MouseMoved => "mouse_moved",
            Self::MouseDragged => "mouse_dragged",
            Self::MouseWheel => "mouse_wheel",
            Self::KeyPressed => "key_pressed",
            Self::KeyReleased => "key_released",
            Self::KeyTyped => "key_typed",
        }
    }

    /// Returns `true` for the pointer-driven event types.
    pub fn is_mouse(self) -> bool {
        !matches!(self, Self::KeyPressed | Self::KeyReleased | Self::KeyTyped)
    }
}

impl fmt::Display for InputEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== InputEvent ==========================================================

/// A single input interaction, as delivered to listeners.
///
/// Positions are in window space (pixels, top-left origin).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button pressed and released (fires after `MouseReleased`).
    MouseClicked {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Button pressed down.
    MousePressed {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Button released.
    MouseReleased {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Second click of the same button in quick succession.
    DoubleClicked {
        button: MouseButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Cursor moved with no button held.
    MouseMoved { x: f32, y: f32 },

    /// Cursor moved while at least one button is held.
    MouseDragged { x: f32, y: f32 },

    /// Scroll wheel or touchpad scroll, in lines.
    MouseWheel { delta_x: f32, delta_y: f32 },

    /// Key pressed down (repeats while held).
    KeyPressed { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyReleased { key: KeyCode, modifiers: Modifiers },

    /// A character produced by the keyboard.
    KeyTyped { character: char },
}

impl InputEvent {
    /// Returns the dispatch type of this event.
    pub fn kind(&self) -> InputEventType {
        match self {
            Self::MouseClicked { .. } => InputEventType::MouseClicked,
            Self::MousePressed { .. } => InputEventType::MousePressed,
            Self::MouseReleased { .. } => InputEventType::MouseReleased,
            Self::DoubleClicked { .. } => InputEventType::DoubleClicked,
            Self::MouseMoved { .. } => InputEventType::MouseMoved,
            Self::MouseDragged { .. } => InputEventType::MouseDragged,
            Self::MouseWheel { .. } => InputEventType::MouseWheel,
            Self::KeyPressed { .. } => InputEventType::KeyPressed,
            Self::KeyReleased { .. } => InputEventType::KeyReleased,
            Self::KeyTyped { .. } => InputEventType::KeyTyped,
        }
    }

    /// Cursor position carried by the event, if any.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::MouseClicked { x, y, .. }
            | Self::MousePressed { x, y, .. }
            | Self::MouseReleased { x, y, .. }
            | Self::DoubleClicked { x, y, .. }
            | Self::MouseMoved { x, y }
            | Self::MouseDragged { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let press = InputEvent::KeyPressed {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(press.kind(), InputEventType::KeyPressed);

        let wheel = InputEvent::MouseWheel { delta_x: 0.0, delta_y: -1.0 };
        assert_eq!(wheel.kind(), InputEventType::MouseWheel);

        let typed = InputEvent::KeyTyped { character: 'q' };
        assert_eq!(typed.kind(), InputEventType::KeyTyped);
    }

    #[test]
    fn all_lists_each_type_once() {
        let mut seen = InputEventType::ALL.to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), InputEventType::ALL.len());
    }

    #[test]
    fn keyboard_types_are_not_mouse() {
        assert!(InputEventType::MouseDragged.is_mouse());
        assert!(InputEventType::DoubleClicked.is_mouse());
        assert!(!InputEventType::KeyTyped.is_mouse());
        assert!(!InputEventType::KeyReleased.is_mouse());
    }

    #[test]
    fn position_only_for_pointer_events() {
        let click = InputEvent::MouseClicked {
            button: MouseButton::Left,
            x: 4.0,
            y: 8.0,
            modifiers: Modifiers::SHIFT,
        };
        assert_eq!(click.position(), Some((4.0, 8.0)));

        let key = InputEvent::KeyReleased {
            key: KeyCode::KeyA,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(key.position(), None);
    }

    #[test]
    fn display_uses_handler_name() {
        assert_eq!(InputEventType::KeyPressed.to_string(), "key_pressed");
        assert_eq!(format!("{}", InputEventType::MouseWheel), "mouse_wheel");
    }

    #[test]
    fn modifiers_default_to_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(Modifiers::CTRL.ctrl && !Modifiers::CTRL.shift);
    }
}
