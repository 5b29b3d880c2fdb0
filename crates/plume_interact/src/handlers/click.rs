//! Click handlers
//!
//! A click is a press followed by a release of the same button with no
//! move in between. A move sends the gesture to the drag branch, whose
//! release never fires the click. The branch states are shared with any
//! drag handler on the same button.
//!
//! The click callback receives the press position, not the release one.

use std::cell::Cell;
use std::rc::Rc;

use plume_core::{Event, EventMatch, Modifiers, MouseButton, Point, StateId};

use crate::surface::{Plot, PlotFilter};

#[derive(Clone, Copy, Debug)]
pub struct ClickHandler {
    pub start_state: StateId,
    /// Pending state entered on press
    pub state0: StateId,
    /// Entered once the pointer moves; releasing here is not a click
    pub state1: StateId,
}

impl ClickHandler {
    pub fn install<F>(
        filter: &mut PlotFilter,
        button: MouseButton,
        modifiers: Modifiers,
        start_state: StateId,
        on_click: F,
    ) -> Self
    where
        F: Fn(&mut PlotFilter, &mut Plot, Point) + 'static,
    {
        let pressed_at = Rc::new(Cell::new(Point::ZERO));
        let record = Rc::clone(&pressed_at);
        let state0 = filter.register_transition(
            start_state,
            EventMatch::press(button, modifiers),
            move |_: &mut PlotFilter, _: &mut Plot, event: &Event| record.set(event.pos),
            None,
        );
        let state1 = filter.register_transition(
            state0,
            EventMatch::moved(Some(button), modifiers),
            nothing,
            None,
        );
        filter.register_transition(
            state1,
            EventMatch::moved(Some(button), modifiers),
            nothing,
            Some(state1),
        );
        filter.register_transition(
            state0,
            EventMatch::release(button, modifiers),
            move |filter: &mut PlotFilter, plot: &mut Plot, _: &Event| {
                on_click(filter, plot, pressed_at.get())
            },
            Some(start_state),
        );
        filter.register_transition(
            state1,
            EventMatch::release(button, modifiers),
            nothing,
            Some(start_state),
        );
        Self {
            start_state,
            state0,
            state1,
        }
    }
}

fn nothing(_: &mut PlotFilter, _: &mut Plot, _: &Event) {}

/// Click opens the context menu where the button went down
pub fn install_menu(
    filter: &mut PlotFilter,
    button: MouseButton,
    modifiers: Modifiers,
    start_state: StateId,
) -> ClickHandler {
    ClickHandler::install(filter, button, modifiers, start_state, |_, plot, pos| {
        plot.context_menu(pos);
    })
}

/// Click fits the axes to the visible items
pub fn install_auto_zoom(
    filter: &mut PlotFilter,
    button: MouseButton,
    modifiers: Modifiers,
    start_state: StateId,
) -> ClickHandler {
    ClickHandler::install(filter, button, modifiers, start_state, |_, plot, _| {
        plot.autoscale();
        plot.replot();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::handlers::drag::{PanDrag, PanHandler};
    use crate::surface::PlotNotification;
    use plume_core::{Size, START_STATE};

    fn counter(filter: &mut PlotFilter, button: MouseButton) -> Rc<Cell<u32>> {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        ClickHandler::install(filter, button, Modifiers::NONE, START_STATE, move |_, _, _| {
            c.set(c.get() + 1)
        });
        clicks
    }

    #[test]
    fn press_release_fires_one_click() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        let clicks = counter(&mut filter, MouseButton::Left);

        let at = Point::new(3.0, 4.0);
        filter.dispatch(&mut canvas, &Event::pointer_down(at, MouseButton::Left));
        filter.dispatch(&mut canvas, &Event::pointer_up(at, MouseButton::Left));
        assert_eq!(clicks.get(), 1);
        assert!(filter.is_in(START_STATE));
    }

    #[test]
    fn press_move_release_is_not_a_click() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        let clicks = counter(&mut filter, MouseButton::Left);

        filter.dispatch(&mut canvas, &Event::pointer_down(Point::ZERO, MouseButton::Left));
        filter.dispatch(
            &mut canvas,
            &Event::pointer_move(Point::new(5.0, 0.0), MouseButton::Left.into()),
        );
        filter.dispatch(&mut canvas, &Event::pointer_up(Point::new(5.0, 0.0), MouseButton::Left));
        assert_eq!(clicks.get(), 0);
        assert!(filter.is_in(START_STATE));
    }

    #[test]
    fn shares_states_with_drag_on_same_button() {
        let mut filter = PlotFilter::new();
        let pan = PanHandler::install(
            &mut filter,
            MouseButton::Middle,
            Modifiers::NONE,
            START_STATE,
            PanDrag,
        );
        let click =
            install_auto_zoom(&mut filter, MouseButton::Middle, Modifiers::NONE, START_STATE);

        let drag = *pan.borrow().drag();
        assert_eq!((click.state0, click.state1), (drag.state0, drag.state1));
        let press = EventMatch::press(MouseButton::Middle, Modifiers::NONE);
        assert_eq!(filter.callback_count(START_STATE, &press), 2);
    }

    #[test]
    fn menu_click_requests_context_menu() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        install_menu(&mut filter, MouseButton::Right, Modifiers::NONE, START_STATE);

        let at = Point::new(12.0, 30.0);
        filter.dispatch(&mut canvas, &Event::pointer_down(at, MouseButton::Right));
        filter.dispatch(&mut canvas, &Event::pointer_up(at, MouseButton::Right));
        assert_eq!(
            canvas.take_notifications(),
            vec![PlotNotification::ContextMenuRequested { x: 12, y: 30 }]
        );
    }

    #[test]
    fn click_reports_press_position() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        ClickHandler::install(
            &mut filter,
            MouseButton::Left,
            Modifiers::NONE,
            START_STATE,
            move |_, _, pos| sink.set(Some(pos)),
        );

        filter.dispatch(&mut canvas, &Event::pointer_down(Point::new(3.0, 4.0), MouseButton::Left));
        filter.dispatch(&mut canvas, &Event::pointer_up(Point::new(5.0, 6.0), MouseButton::Left));
        assert_eq!(seen.get(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn menu_opens_at_press_position() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let mut filter = PlotFilter::new();
        install_menu(&mut filter, MouseButton::Right, Modifiers::NONE, START_STATE);

        filter.dispatch(&mut canvas, &Event::pointer_down(Point::new(20.0, 10.0), MouseButton::Right));
        filter.dispatch(&mut canvas, &Event::pointer_up(Point::new(22.0, 11.0), MouseButton::Right));
        assert_eq!(
            canvas.take_notifications(),
            vec![PlotNotification::ContextMenuRequested { x: 20, y: 10 }]
        );
    }
}
