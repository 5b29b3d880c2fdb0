//! Gesture handlers
//!
//! Each handler wires a few transitions into a [`PlotFilter`] from a given
//! start state. Handlers own their tracking state and refer to plot items
//! only through [`ItemId`](crate::surface::ItemId).

pub mod click;
pub mod drag;
pub mod gesture;
pub mod multiline;
pub mod object;
pub mod pointer;
pub mod selection;

pub use click::ClickHandler;
pub use drag::{Drag, DragBehavior, DragHandler, PanDrag, PanHandler, ZoomDrag, ZoomHandler};
pub use gesture::{GestureBehavior, GestureHandler, PinchPan, PinchPanHandler};
pub use multiline::{MultilineSelection, MultilineSelectionHandler};
pub use object::{bind_undo_keys, Grab, History, ObjectHandler};
pub use selection::{RectangularSelection, RectangularSelectionHandler};

use plume_core::{Modifiers, MouseButton, StateId};

use crate::config::InteractionConfig;
use crate::surface::PlotFilter;

/// Navigation shared by every interactive tool.
///
/// | input                  | action             |
/// |------------------------|--------------------|
/// | middle drag            | pan                |
/// | middle click           | autoscale          |
/// | right drag             | zoom               |
/// | right click            | context menu       |
/// | pinch                  | pan and zoom       |
/// | hover (none/Shift/Alt) | move marker        |
/// | Ctrl + wheel           | zoom about pointer |
///
/// Returns `start_state`.
pub fn setup_standard_tool_filter(
    filter: &mut PlotFilter,
    start_state: StateId,
    config: &InteractionConfig,
) -> StateId {
    PanHandler::install(filter, MouseButton::Middle, Modifiers::NONE, start_state, PanDrag);
    click::install_auto_zoom(filter, MouseButton::Middle, Modifiers::NONE, start_state);

    ZoomHandler::install(filter, MouseButton::Right, Modifiers::NONE, start_state, ZoomDrag);
    click::install_menu(filter, MouseButton::Right, Modifiers::NONE, start_state);

    PinchPanHandler::install(filter, start_state, PinchPan::new(config));

    for modifiers in [Modifiers::NONE, Modifiers::SHIFT, Modifiers::ALT] {
        pointer::install_move(filter, modifiers, start_state);
    }
    pointer::install_wheel_zoom(filter, Modifiers::CTRL, start_state, config.wheel_zoom_step);

    start_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::surface::PlotNotification;
    use plume_core::{Event, EventKind, MouseButtons, Point, Size, START_STATE};

    #[test]
    fn standard_filter_covers_navigation_inputs() {
        let mut filter = PlotFilter::new();
        setup_standard_tool_filter(&mut filter, START_STATE, &InteractionConfig::default());
        for kind in [
            EventKind::PointerDown,
            EventKind::PointerUp,
            EventKind::PointerMove,
            EventKind::Wheel,
            EventKind::GestureStart,
            EventKind::GestureUpdate,
        ] {
            assert!(filter.is_relevant(kind), "{kind:?}");
        }
        assert!(!filter.is_relevant(EventKind::KeyDown));
    }

    #[test]
    fn middle_click_autoscales_and_right_click_opens_menu() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        setup_standard_tool_filter(&mut filter, START_STATE, &InteractionConfig::default());

        let at = Point::new(40.0, 40.0);
        filter.dispatch(&mut canvas, &Event::pointer_down(at, MouseButton::Right));
        filter.dispatch(&mut canvas, &Event::pointer_up(at, MouseButton::Right));
        assert!(canvas
            .take_notifications()
            .contains(&PlotNotification::ContextMenuRequested { x: 40, y: 40 }));

        // Middle drag pans, and the click branch stays silent.
        let held: MouseButtons = MouseButton::Middle.into();
        filter.dispatch(&mut canvas, &Event::pointer_down(at, MouseButton::Middle));
        filter.dispatch(&mut canvas, &Event::pointer_move(Point::new(50.0, 40.0), held));
        filter.dispatch(&mut canvas, &Event::pointer_up(Point::new(50.0, 40.0), MouseButton::Middle));
        assert!((canvas.view().domain.x.min + 10.0).abs() < 1e-3);
        assert!(filter.is_in(START_STATE));
    }
}
