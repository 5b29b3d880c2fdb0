//! Plume Core Runtime
//!
//! This crate provides the foundational primitives for Plume's interactive
//! plots:
//!
//! - **Events**: Pointer, keyboard, wheel and gesture input as plain values
//! - **Predicates**: Hashable patterns deciding which events a transition wants
//! - **Event Filters**: Per-surface state machines driving gesture handlers
//!
//! # Example
//!
//! ```rust
//! use plume_core::{
//!     CursorShape, Event, EventFilter, EventMatch, FilterHost, Modifiers, MouseButton, Point,
//!     START_STATE,
//! };
//!
//! struct Surface;
//!
//! impl FilterHost for Surface {
//!     fn set_cursor(&mut self, _cursor: CursorShape) {}
//! }
//!
//! let mut filter: EventFilter<Surface> = EventFilter::new();
//! let pressed = filter.register_transition(
//!     START_STATE,
//!     EventMatch::press(MouseButton::Left, Modifiers::NONE),
//!     |_, _, ev| println!("pressed at {:?}", ev.pos),
//!     None,
//! );
//! filter.register_transition(
//!     pressed,
//!     EventMatch::release(MouseButton::Left, Modifiers::NONE),
//!     |_, _, _| {},
//!     Some(START_STATE),
//! );
//!
//! let mut surface = Surface;
//! filter.dispatch(&mut surface, &Event::pointer_down(Point::new(4.0, 2.0), MouseButton::Left));
//! assert_eq!(filter.current_state(), pressed);
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod predicate;

pub use error::FilterError;
pub use events::{
    Event, EventKind, GestureData, GestureKind, GesturePhase, KeyCode, Modifiers, MouseButton,
    MouseButtons, StandardKey,
};
pub use fsm::{Callback, CursorShape, EventFilter, FilterHost, StateId, START_STATE};
pub use geometry::{Point, Rect, Size};
pub use predicate::{EventMatch, KeyBinding};
