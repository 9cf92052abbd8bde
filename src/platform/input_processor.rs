//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → ViewManager
//
// Stateful tracking: caches modifier state from ModifiersChanged events,
// the last cursor position, the held mouse buttons and the last click,
// so it can synthesize the events Winit does not report directly:
// clicks, double clicks, drags and typed characters.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Constants ===========================================================

/// Maximum time between two clicks of the same button for a double click.
pub(crate) const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Pixels per scroll line when the OS reports pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents.
///
/// One platform interaction may produce several engine events (a release
/// is followed by a click, a key press by its typed characters); they are
/// returned in dispatch order.
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
    cursor: (f32, f32),
    held_buttons: Vec<MouseButton>,
    last_click: Option<(MouseButton, Duration)>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
            cursor: (0.0, 0.0),
            held_buttons: Vec::new(),
            last_click: None,
        }
    }

    //--- State Management -------------------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    /// Forgets held buttons; their releases are lost while unfocused.
    pub(crate) fn reset_buttons(&mut self) {
        self.held_buttons.clear();
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a key press / release, plus the characters it typed.
    ///
    /// Keys without an engine key code still produce their characters.
    pub(crate) fn process_key(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        text: Option<&str>,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => KeyCode::Unidentified,
        };

        if key != KeyCode::Unidentified {
            events.push(self.create_key_input_event(key, state));
        }

        if state == ElementState::Pressed {
            let typed = text.unwrap_or_default().chars().filter(|c| !c.is_control());
            events.extend(typed.map(|character| InputEvent::KeyTyped { character }));
        }

        events
    }

    /// Converts a mouse button press / release.
    ///
    /// A release of a held button is followed by a click, and by a double
    /// click when the previous click of that button is recent enough.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
        now: Duration,
    ) -> Vec<InputEvent> {
        let button = MouseButton::from(button);
        let (x, y) = self.cursor;
        let modifiers = self.current_modifiers;

        match state {
            ElementState::Pressed => {
                if !self.held_buttons.contains(&button) {
                    self.held_buttons.push(button);
                }
                vec![InputEvent::MousePressed { button, x, y, modifiers }]
            }
            ElementState::Released => {
                let mut events = vec![InputEvent::MouseReleased { button, x, y, modifiers }];

                let was_held = self.held_buttons.contains(&button);
                self.held_buttons.retain(|held| *held != button);
                if !was_held {
                    return events;
                }

                events.push(InputEvent::MouseClicked { button, x, y, modifiers });

                let double = matches!(
                    self.last_click,
                    Some((previous, at)) if previous == button && now.saturating_sub(at) <= DOUBLE_CLICK_WINDOW
                );
                if double {
                    events.push(InputEvent::DoubleClicked { button, x, y, modifiers });
                    self.last_click = None;
                } else {
                    self.last_click = Some((button, now));
                }

                events
            }
        }
    }

    /// Converts cursor movement: a drag while any button is held.
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = (x, y);
        if self.held_buttons.is_empty() {
            InputEvent::MouseMoved { x, y }
        } else {
            InputEvent::MouseDragged { x, y }
        }
    }

    /// Converts scrolling into line deltas.
    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let (delta_x, delta_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(position) => (
                position.x as f32 / PIXELS_PER_LINE,
                position.y as f32 / PIXELS_PER_LINE,
            ),
        };
        InputEvent::MouseWheel { delta_x, delta_y }
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_input_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyPressed {
                key,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::KeyReleased {
                key,
                modifiers: self.current_modifiers,
            },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Anything else is
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputEventType;
    use winit::dpi::PhysicalPosition;

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    fn kinds(events: &[InputEvent]) -> Vec<InputEventType> {
        events.iter().map(InputEvent::kind).collect()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn click(processor: &mut InputProcessor, at: u64) -> Vec<InputEvent> {
        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed, ms(at));
        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released, ms(at))
    }

    //--- Modifiers --------------------------------------------------------

    #[test]
    fn starts_with_no_modifiers() {
        let processor = InputProcessor::new();
        assert_eq!(processor.current_modifiers(), Modifiers::NONE);
    }

    #[test]
    fn modifiers_persist_across_events() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, true));

        let press = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed, ms(0));
        let key = processor.process_key(PhysicalKey::Code(WinitKeyCode::Space), ElementState::Pressed, None);

        assert!(matches!(press[0], InputEvent::MousePressed { modifiers, .. } if modifiers.shift && modifiers.alt));
        assert!(matches!(key[0], InputEvent::KeyPressed { modifiers, .. } if modifiers.shift && !modifiers.ctrl));
    }

    //--- Keyboard ---------------------------------------------------------

    #[test]
    fn key_press_emits_typed_characters() {
        let processor = InputProcessor::new();
        let events = processor.process_key(PhysicalKey::Code(WinitKeyCode::KeyA), ElementState::Pressed, Some("a"));

        assert_eq!(kinds(&events), vec![InputEventType::KeyPressed, InputEventType::KeyTyped]);
        assert_eq!(events[1], InputEvent::KeyTyped { character: 'a' });
    }

    #[test]
    fn key_release_types_nothing() {
        let processor = InputProcessor::new();
        let events = processor.process_key(PhysicalKey::Code(WinitKeyCode::KeyA), ElementState::Released, Some("a"));
        assert_eq!(kinds(&events), vec![InputEventType::KeyReleased]);
    }

    #[test]
    fn unmapped_key_still_types() {
        let processor = InputProcessor::new();
        let events = processor.process_key(PhysicalKey::Code(WinitKeyCode::F13), ElementState::Pressed, Some("é"));
        assert_eq!(events, vec![InputEvent::KeyTyped { character: 'é' }]);
    }

    #[test]
    fn control_characters_are_not_typed() {
        let processor = InputProcessor::new();
        let events = processor.process_key(PhysicalKey::Code(WinitKeyCode::Enter), ElementState::Pressed, Some("\r"));
        assert_eq!(kinds(&events), vec![InputEventType::KeyPressed]);
    }

    //--- Mouse ------------------------------------------------------------

    #[test]
    fn release_after_press_clicks_at_cursor() {
        let mut processor = InputProcessor::new();
        processor.process_mouse_move(10.0, 20.0);

        let events = click(&mut processor, 0);
        assert_eq!(kinds(&events), vec![InputEventType::MouseReleased, InputEventType::MouseClicked]);
        assert_eq!(events[1].position(), Some((10.0, 20.0)));
    }

    #[test]
    fn release_without_press_does_not_click() {
        let mut processor = InputProcessor::new();
        let events = processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released, ms(0));
        assert_eq!(kinds(&events), vec![InputEventType::MouseReleased]);
    }

    #[test]
    fn second_quick_click_is_double() {
        let mut processor = InputProcessor::new();
        click(&mut processor, 1_000);

        let events = click(&mut processor, 1_400);
        assert_eq!(kinds(&events).last(), Some(&InputEventType::DoubleClicked));

        let third = click(&mut processor, 1_600);
        assert_eq!(kinds(&third).last(), Some(&InputEventType::MouseClicked));
    }

    #[test]
    fn slow_clicks_are_not_double() {
        let mut processor = InputProcessor::new();
        click(&mut processor, 0);
        let events = click(&mut processor, 501);
        assert_eq!(kinds(&events).last(), Some(&InputEventType::MouseClicked));
    }

    #[test]
    fn movement_while_held_is_drag() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_mouse_move(1.0, 1.0).kind(), InputEventType::MouseMoved);

        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed, ms(0));
        assert_eq!(processor.process_mouse_move(2.0, 2.0).kind(), InputEventType::MouseDragged);

        processor.reset_buttons();
        assert_eq!(processor.process_mouse_move(3.0, 3.0).kind(), InputEventType::MouseMoved);
    }

    #[test]
    fn pixel_scroll_becomes_lines() {
        let processor = InputProcessor::new();
        let event = processor.process_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0)));
        assert_eq!(event, InputEvent::MouseWheel { delta_x: 0.0, delta_y: -2.0 });
    }

    //--- Conversions ------------------------------------------------------

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
