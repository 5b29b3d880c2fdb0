//! Input event model
//!
//! Raw input events as delivered by the host surface. Events are immutable
//! values; the interaction layer only ever reads them.

use std::ops::BitOr;

use crate::geometry::Point;

/// Kind of a raw input event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerUp,
    PointerMove,
    KeyDown,
    /// Scroll wheel rotation
    Wheel,
    GestureStart,
    GestureUpdate,
    GestureFinish,
    GestureCancel,
}

/// A pointer button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    const fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0b001,
            MouseButton::Right => 0b010,
            MouseButton::Middle => 0b100,
        }
    }
}

/// Set of pointer buttons currently held down
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons {
    bits: u8,
}

impl MouseButtons {
    pub const NONE: MouseButtons = MouseButtons { bits: 0 };

    pub const fn with(self, button: MouseButton) -> Self {
        Self {
            bits: self.bits | button.bit(),
        }
    }

    pub const fn contains(&self, button: MouseButton) -> bool {
        self.bits & button.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        MouseButtons::NONE.with(button)
    }
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    // Letters used by standard shortcuts
    pub const A: KeyCode = KeyCode(0x41);
    pub const C: KeyCode = KeyCode(0x43);
    pub const V: KeyCode = KeyCode(0x56);
    pub const Y: KeyCode = KeyCode(0x59);
    pub const Z: KeyCode = KeyCode(0x5A);

    // Special keys
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    /// Enter on the numeric keypad
    pub const KEYPAD_ENTER: KeyCode = KeyCode(0x6C);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const DELETE: KeyCode = KeyCode(0x7F);

    // Arrow keys
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: Modifiers = Modifiers { bits: 0b0001 };
    pub const CTRL: Modifiers = Modifiers { bits: 0b0010 };
    pub const ALT: Modifiers = Modifiers { bits: 0b0100 };
    pub const META: Modifiers = Modifiers { bits: 0b1000 }; // Cmd on macOS, Win on Windows

    /// The platform's shortcut modifier
    #[cfg(target_os = "macos")]
    pub const COMMAND: Modifiers = Modifiers::META;
    /// The platform's shortcut modifier
    #[cfg(not(target_os = "macos"))]
    pub const COMMAND: Modifiers = Modifiers::CTRL;

    /// Create new modifiers from flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT.bits;
        }
        if ctrl {
            bits |= Self::CTRL.bits;
        }
        if alt {
            bits |= Self::ALT.bits;
        }
        if meta {
            bits |= Self::META.bits;
        }
        Self { bits }
    }

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits: bits & 0b1111 }
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn union(self, other: Modifiers) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Every flag of `other` is also set here
    pub const fn contains(&self, other: Modifiers) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub const fn ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub const fn alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub const fn meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Check if command key is pressed (Ctrl on non-macOS, Meta on macOS)
    pub const fn command(&self) -> bool {
        self.contains(Self::COMMAND)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.union(rhs)
    }
}

/// Platform-standard keyboard shortcuts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardKey {
    Copy,
    Paste,
    Undo,
    Redo,
    SelectAll,
}

impl StandardKey {
    /// Resolve a key press to the standard shortcut it triggers, if any.
    ///
    /// Redo accepts both `Cmd+Y` and `Cmd+Shift+Z`.
    pub fn from_key(key: KeyCode, modifiers: Modifiers) -> Option<StandardKey> {
        let command = Modifiers::COMMAND;
        if modifiers == command {
            return match key {
                KeyCode::C => Some(StandardKey::Copy),
                KeyCode::V => Some(StandardKey::Paste),
                KeyCode::Z => Some(StandardKey::Undo),
                KeyCode::Y => Some(StandardKey::Redo),
                KeyCode::A => Some(StandardKey::SelectAll),
                _ => None,
            };
        }
        if modifiers == command | Modifiers::SHIFT && key == KeyCode::Z {
            return Some(StandardKey::Redo);
        }
        None
    }
}

/// Kind of a touch/trackpad gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pinch,
    Pan,
}

/// Lifecycle phase of a gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Started,
    Updated,
    Finished,
    Canceled,
}

impl GesturePhase {
    /// Event kind carrying a gesture in this phase
    pub const fn event_kind(self) -> EventKind {
        match self {
            GesturePhase::Started => EventKind::GestureStart,
            GesturePhase::Updated => EventKind::GestureUpdate,
            GesturePhase::Finished => EventKind::GestureFinish,
            GesturePhase::Canceled => EventKind::GestureCancel,
        }
    }
}

/// Gesture payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureData {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    /// Gesture focus point in surface coordinates
    pub hotspot: Point,
    /// Scale change since the previous update (1.0 = unchanged)
    pub scale_factor: f32,
}

/// A raw input event
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Pointer position in surface coordinates
    pub pos: Point,
    /// Button that changed state (press/release only)
    pub button: Option<MouseButton>,
    /// Buttons held while the event was produced
    pub buttons: MouseButtons,
    pub modifiers: Modifiers,
    pub key: KeyCode,
    /// Wheel rotation in eighths of a degree (120 per notch)
    pub wheel_delta: f32,
    pub gesture: Option<GestureData>,
}

impl Event {
    fn base(kind: EventKind, pos: Point) -> Self {
        Self {
            kind,
            pos,
            button: None,
            buttons: MouseButtons::NONE,
            modifiers: Modifiers::NONE,
            key: KeyCode::UNKNOWN,
            wheel_delta: 0.0,
            gesture: None,
        }
    }

    pub fn pointer_down(pos: Point, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            buttons: button.into(),
            ..Self::base(EventKind::PointerDown, pos)
        }
    }

    pub fn pointer_up(pos: Point, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            ..Self::base(EventKind::PointerUp, pos)
        }
    }

    pub fn pointer_move(pos: Point, buttons: MouseButtons) -> Self {
        Self {
            buttons,
            ..Self::base(EventKind::PointerMove, pos)
        }
    }

    pub fn key_down(key: KeyCode) -> Self {
        Self {
            key,
            ..Self::base(EventKind::KeyDown, Point::ZERO)
        }
    }

    pub fn wheel(pos: Point, delta: f32) -> Self {
        Self {
            wheel_delta: delta,
            ..Self::base(EventKind::Wheel, pos)
        }
    }

    pub fn gesture(data: GestureData) -> Self {
        Self {
            gesture: Some(data),
            ..Self::base(data.phase.event_kind(), data.hotspot)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Standard shortcut triggered by this key press, if any
    pub fn standard_key(&self) -> Option<StandardKey> {
        if self.kind != EventKind::KeyDown {
            return None;
        }
        StandardKey::from_key(self.key, self.modifiers)
    }
}
