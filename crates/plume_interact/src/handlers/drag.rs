//! Press / move / release sub-machine shared by pan, zoom and rubber-band
//! handlers.
//!
//! ```text
//!           press                 move
//! start ───────────▶ state0 ───────────▶ state1 ◀─┐ move
//!   ▲                  │                   │  ────┘
//!   │     release      │      release      │
//!   └──────────────────┴───────────────────┘
//!   (stop_not_moving)     (stop_moving)
//! ```
//!
//! Handlers installed on the same button, modifiers and start state share
//! `state0` and `state1`, so a click handler and a drag handler on the middle
//! button both observe one gesture.

use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{CursorShape, Event, EventMatch, Modifiers, MouseButton, Point, Size, StateId};

use crate::surface::{Plot, PlotFilter};
use crate::view::AxisDrag;

/// Tracking state of one drag gesture, in surface pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct Drag {
    pub start_state: StateId,
    pub state0: StateId,
    pub state1: StateId,
    start: Option<Point>,
    last: Option<Point>,
}

impl Drag {
    /// Start tracking at `pos`
    pub fn begin(&mut self, pos: Point) {
        self.start = Some(pos);
        self.last = Some(pos);
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn last(&self) -> Option<Point> {
        self.last
    }

    pub fn set_start(&mut self, pos: Point) {
        self.start = Some(pos);
    }

    /// Per-axis `(current, last, start, extent)` for a move to `pos`.
    ///
    /// Advances `last` to `pos`. `None` if the gesture was never started.
    pub fn move_state(&mut self, pos: Point, extent: Size) -> Option<(AxisDrag, AxisDrag)> {
        let (start, last) = (self.start?, self.last?);
        self.last = Some(pos);
        Some((
            AxisDrag::new(pos.x, last.x, start.x, extent.width),
            AxisDrag::new(pos.y, last.y, start.y, extent.height),
        ))
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.last = None;
    }
}

/// Hooks a [`DragHandler`] calls at each step of its gesture.
///
/// Only [`drag_move`](Self::drag_move) is required. The tracking fields are
/// reset after either stop hook returns.
pub trait DragBehavior: 'static {
    /// Cursor shown while the gesture is in progress
    fn cursor(&self) -> Option<CursorShape> {
        None
    }

    fn start_tracking(
        &mut self,
        drag: &mut Drag,
        _filter: &mut PlotFilter,
        _plot: &mut Plot,
        event: &Event,
    ) {
        drag.begin(event.pos);
    }

    /// First move after the press
    fn start_moving(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        self.drag_move(drag, filter, plot, event);
    }

    fn drag_move(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    );

    /// Release without any move in between
    fn stop_not_moving(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        self.stop_tracking(drag, filter, plot, event);
    }

    fn stop_moving(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        self.stop_tracking(drag, filter, plot, event);
    }

    fn stop_tracking(&mut self, _: &mut Drag, _: &mut PlotFilter, _: &mut Plot, _: &Event) {}
}

type Step<B> = fn(&mut B, &mut Drag, &mut PlotFilter, &mut Plot, &Event);

/// A drag gesture bound to one button on one dispatcher
pub struct DragHandler<B> {
    drag: Drag,
    behavior: B,
}

impl<B: DragBehavior> DragHandler<B> {
    /// Wire the gesture into `filter` starting from `start_state`.
    pub fn install(
        filter: &mut PlotFilter,
        button: MouseButton,
        modifiers: Modifiers,
        start_state: StateId,
        behavior: B,
    ) -> Rc<RefCell<Self>> {
        let cursor = behavior.cursor();
        let handler = Rc::new(RefCell::new(Self {
            drag: Drag {
                start_state,
                ..Drag::default()
            },
            behavior,
        }));

        let state0 = filter.register_transition(
            start_state,
            EventMatch::press(button, modifiers),
            Self::hook(&handler, B::start_tracking, false),
            None,
        );
        let state1 = filter.register_transition(
            state0,
            EventMatch::moved(Some(button), modifiers),
            Self::hook(&handler, B::start_moving, false),
            None,
        );
        filter.register_transition(
            state1,
            EventMatch::moved(Some(button), modifiers),
            Self::hook(&handler, B::drag_move, false),
            Some(state1),
        );
        filter.register_transition(
            state0,
            EventMatch::release(button, modifiers),
            Self::hook(&handler, B::stop_not_moving, true),
            Some(start_state),
        );
        filter.register_transition(
            state1,
            EventMatch::release(button, modifiers),
            Self::hook(&handler, B::stop_moving, true),
            Some(start_state),
        );
        if let Some(cursor) = cursor {
            filter.bind_cursor(cursor, [state0, state1]);
        }

        {
            let mut h = handler.borrow_mut();
            h.drag.state0 = state0;
            h.drag.state1 = state1;
        }
        handler
    }

    fn hook(
        handler: &Rc<RefCell<Self>>,
        step: Step<B>,
        finish: bool,
    ) -> impl Fn(&mut PlotFilter, &mut Plot, &Event) + 'static {
        let handler = Rc::clone(handler);
        move |filter: &mut PlotFilter, plot: &mut Plot, event: &Event| {
            let mut guard = handler.borrow_mut();
            let Self { drag, behavior } = &mut *guard;
            step(behavior, drag, filter, plot, event);
            if finish {
                drag.reset();
            }
        }
    }

    pub fn drag(&self) -> &Drag {
        &self.drag
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }
}

/// Middle-drag panning
#[derive(Clone, Copy, Debug, Default)]
pub struct PanDrag;

impl DragBehavior for PanDrag {
    fn cursor(&self) -> Option<CursorShape> {
        Some(CursorShape::ClosedHand)
    }

    fn drag_move(&mut self, drag: &mut Drag, _: &mut PlotFilter, plot: &mut Plot, event: &Event) {
        if let Some((dx, dy)) = drag.move_state(event.pos, plot.contents_size()) {
            plot.pan_view(dx, dy);
            plot.replot();
        }
    }
}

/// Right-drag zooming about the press position
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoomDrag;

impl DragBehavior for ZoomDrag {
    fn cursor(&self) -> Option<CursorShape> {
        Some(CursorShape::SizeAll)
    }

    fn drag_move(&mut self, drag: &mut Drag, _: &mut PlotFilter, plot: &mut Plot, event: &Event) {
        if let Some((dx, dy)) = drag.move_state(event.pos, plot.contents_size()) {
            plot.zoom_view(dx, dy, None);
            plot.replot();
        }
    }
}

pub type PanHandler = DragHandler<PanDrag>;
pub type ZoomHandler = DragHandler<ZoomDrag>;
