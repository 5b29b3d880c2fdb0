//! Event predicates
//!
//! An [`EventMatch`] decides whether a raw [`Event`] fits a pattern. Predicates
//! are plain values: two predicates built from the same arguments compare and
//! hash equal, so independently constructed handlers that ask for the same
//! pattern in the same state share one transition entry.

use smallvec::SmallVec;

use crate::events::{
    Event, EventKind, GestureKind, GesturePhase, KeyCode, Modifiers, MouseButton, StandardKey,
};

/// A key paired with the modifiers that must be held with it.
///
/// `Modifiers::NONE` means no requirement; any held modifiers are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyBinding {
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    fn matches(&self, key: KeyCode, held: Modifiers) -> bool {
        self.key == key && held.contains(self.modifiers)
    }
}

impl From<KeyCode> for KeyBinding {
    fn from(key: KeyCode) -> Self {
        KeyBinding::new(key, Modifiers::NONE)
    }
}

/// Pattern over raw input events
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventMatch {
    /// Key press whose key is in the set
    Keys(SmallVec<[KeyBinding; 4]>),
    /// Key press resolving to a platform shortcut
    Standard(StandardKey),
    Press {
        button: MouseButton,
        modifiers: Modifiers,
    },
    Release {
        button: MouseButton,
        modifiers: Modifiers,
    },
    /// Pointer motion with `button` held, or with no button held at all
    Move {
        button: Option<MouseButton>,
        modifiers: Modifiers,
    },
    Gesture {
        kind: GestureKind,
        phase: GesturePhase,
    },
    /// Wheel rotation with exactly these modifiers
    Wheel { modifiers: Modifiers },
}

/// Button predicates: a declared requirement must be held, an empty one
/// rejects any held modifier.
fn button_modifiers_match(required: Modifiers, held: Modifiers) -> bool {
    if required.is_empty() {
        held.is_empty()
    } else {
        held.contains(required)
    }
}

impl EventMatch {
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyBinding>,
    {
        EventMatch::Keys(keys.into_iter().map(Into::into).collect())
    }

    pub fn standard(key: StandardKey) -> Self {
        EventMatch::Standard(key)
    }

    pub fn press(button: MouseButton, modifiers: Modifiers) -> Self {
        EventMatch::Press { button, modifiers }
    }

    pub fn release(button: MouseButton, modifiers: Modifiers) -> Self {
        EventMatch::Release { button, modifiers }
    }

    pub fn moved(button: Option<MouseButton>, modifiers: Modifiers) -> Self {
        EventMatch::Move { button, modifiers }
    }

    pub fn gesture(kind: GestureKind, phase: GesturePhase) -> Self {
        EventMatch::Gesture { kind, phase }
    }

    pub fn wheel(modifiers: Modifiers) -> Self {
        EventMatch::Wheel { modifiers }
    }

    /// Check whether `event` fits this pattern
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventMatch::Keys(bindings) => {
                event.kind == EventKind::KeyDown
                    && bindings
                        .iter()
                        .any(|b| b.matches(event.key, event.modifiers))
            }
            EventMatch::Standard(key) => event.standard_key() == Some(*key),
            EventMatch::Press { button, modifiers } => {
                event.kind == EventKind::PointerDown
                    && event.button == Some(*button)
                    && button_modifiers_match(*modifiers, event.modifiers)
            }
            EventMatch::Release { button, modifiers } => {
                event.kind == EventKind::PointerUp
                    && event.button == Some(*button)
                    && button_modifiers_match(*modifiers, event.modifiers)
            }
            EventMatch::Move { button, modifiers } => {
                let held = match button {
                    Some(b) => event.buttons.contains(*b),
                    None => false,
                };
                event.kind == EventKind::PointerMove
                    && (held || event.buttons.is_empty())
                    && button_modifiers_match(*modifiers, event.modifiers)
            }
            EventMatch::Gesture { kind, phase } => event
                .gesture
                .is_some_and(|g| g.kind == *kind && g.phase == *phase),
            EventMatch::Wheel { modifiers } => {
                event.kind == EventKind::Wheel && event.modifiers == *modifiers
            }
        }
    }

    /// Event kinds this pattern can ever match
    pub fn relevant_kinds(&self) -> SmallVec<[EventKind; 2]> {
        let kind = match self {
            EventMatch::Keys(_) | EventMatch::Standard(_) => EventKind::KeyDown,
            EventMatch::Press { .. } => EventKind::PointerDown,
            EventMatch::Release { .. } => EventKind::PointerUp,
            EventMatch::Move { .. } => EventKind::PointerMove,
            EventMatch::Gesture { phase, .. } => phase.event_kind(),
            EventMatch::Wheel { .. } => EventKind::Wheel,
        };
        smallvec::smallvec![kind]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GestureData, MouseButtons};
    use crate::geometry::Point;

    fn at(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn press_without_requirement_rejects_held_modifiers() {
        let m = EventMatch::press(MouseButton::Left, Modifiers::NONE);
        let plain = Event::pointer_down(at(0.0, 0.0), MouseButton::Left);
        assert!(m.matches(&plain));
        assert!(!m.matches(&plain.clone().with_modifiers(Modifiers::CTRL)));
        assert!(!m.matches(&Event::pointer_down(at(0.0, 0.0), MouseButton::Right)));
    }

    #[test]
    fn press_with_requirement_accepts_superset() {
        let m = EventMatch::press(MouseButton::Left, Modifiers::CTRL);
        let ev = Event::pointer_down(at(0.0, 0.0), MouseButton::Left);
        assert!(!m.matches(&ev));
        assert!(m.matches(&ev.clone().with_modifiers(Modifiers::CTRL)));
        assert!(m.matches(&ev.with_modifiers(Modifiers::CTRL | Modifiers::SHIFT)));
    }

    #[test]
    fn move_matches_hover_and_held_button() {
        let m = EventMatch::moved(Some(MouseButton::Left), Modifiers::NONE);
        assert!(m.matches(&Event::pointer_move(at(1.0, 1.0), MouseButtons::NONE)));
        assert!(m.matches(&Event::pointer_move(
            at(1.0, 1.0),
            MouseButton::Left.into()
        )));
        assert!(!m.matches(&Event::pointer_move(
            at(1.0, 1.0),
            MouseButton::Right.into()
        )));

        let hover = EventMatch::moved(None, Modifiers::NONE);
        assert!(hover.matches(&Event::pointer_move(at(1.0, 1.0), MouseButtons::NONE)));
        assert!(!hover.matches(&Event::pointer_move(
            at(1.0, 1.0),
            MouseButton::Left.into()
        )));
    }

    #[test]
    fn key_set_accepts_superset_of_paired_modifiers() {
        let m = EventMatch::keys([
            KeyBinding::new(KeyCode::LEFT, Modifiers::SHIFT),
            KeyBinding::from(KeyCode::ENTER),
        ]);
        assert!(m.matches(&Event::key_down(KeyCode::ENTER).with_modifiers(Modifiers::ALT)));
        assert!(!m.matches(&Event::key_down(KeyCode::LEFT)));
        assert!(m.matches(
            &Event::key_down(KeyCode::LEFT).with_modifiers(Modifiers::SHIFT | Modifiers::CTRL)
        ));
    }

    #[test]
    fn gesture_and_wheel_predicates() {
        let g = EventMatch::gesture(GestureKind::Pinch, GesturePhase::Updated);
        let ev = Event::gesture(GestureData {
            kind: GestureKind::Pinch,
            phase: GesturePhase::Updated,
            hotspot: at(3.0, 4.0),
            scale_factor: 1.02,
        });
        assert!(g.matches(&ev));
        assert_eq!(g.relevant_kinds().as_slice(), &[EventKind::GestureUpdate]);

        let w = EventMatch::wheel(Modifiers::CTRL);
        let wheel = Event::wheel(at(0.0, 0.0), 120.0);
        assert!(!w.matches(&wheel));
        assert!(w.matches(&wheel.clone().with_modifiers(Modifiers::CTRL)));
        assert!(!w.matches(&wheel.with_modifiers(Modifiers::CTRL | Modifiers::SHIFT)));
    }

    #[test]
    fn equal_predicates_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |m: &EventMatch| {
            let mut h = DefaultHasher::new();
            m.hash(&mut h);
            h.finish()
        };
        let a = EventMatch::press(MouseButton::Middle, Modifiers::NONE);
        let b = EventMatch::press(MouseButton::Middle, Modifiers::NONE);
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }
}
