//! Point-by-point polyline entry
//!
//! Every click appends a vertex to an in-progress polyline item. Backspace
//! or Escape drops the last vertex, or the whole shape once it is down to two
//! vertices. Enter, keypad Enter or Space hands the vertices (data
//! coordinates) to the completion callback and removes the preview item.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use plume_core::{Event, EventMatch, KeyCode, Modifiers, MouseButton, Point, StateId};

use crate::handlers::drag::{Drag, DragBehavior, DragHandler};
use crate::shape::{Capabilities, Shape};
use crate::surface::{ItemId, Plot, PlotFilter};

/// Receives the finished vertex list in data coordinates
pub type PolylineCallback = Box<dyn Fn(&mut PlotFilter, &mut Plot, &[Point])>;

pub struct MultilineSelection {
    closed: bool,
    shape: Option<ItemId>,
    on_finish: PolylineCallback,
}

impl fmt::Debug for MultilineSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultilineSelection")
            .field("closed", &self.closed)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

pub type MultilineSelectionHandler = DragHandler<MultilineSelection>;

impl MultilineSelection {
    pub fn new<F>(closed: bool, on_finish: F) -> Self
    where
        F: Fn(&mut PlotFilter, &mut Plot, &[Point]) + 'static,
    {
        Self {
            closed,
            shape: None,
            on_finish: Box::new(on_finish),
        }
    }

    /// Wire click entry on `button` plus the accept and cancel keys on
    /// `start_state`.
    pub fn install(
        self,
        filter: &mut PlotFilter,
        button: MouseButton,
        modifiers: Modifiers,
        start_state: StateId,
    ) -> Rc<RefCell<MultilineSelectionHandler>> {
        let handler = DragHandler::install(filter, button, modifiers, start_state, self);

        let h = Rc::clone(&handler);
        filter.register_transition(
            start_state,
            EventMatch::keys([KeyCode::ENTER, KeyCode::KEYPAD_ENTER, KeyCode::SPACE]),
            move |filter: &mut PlotFilter, plot: &mut Plot, _: &Event| {
                h.borrow_mut().behavior_mut().accept(filter, plot)
            },
            Some(start_state),
        );
        let h = Rc::clone(&handler);
        filter.register_transition(
            start_state,
            EventMatch::keys([KeyCode::BACKSPACE, KeyCode::ESCAPE]),
            move |_: &mut PlotFilter, plot: &mut Plot, _: &Event| {
                h.borrow_mut().behavior_mut().cancel_point(plot)
            },
            Some(start_state),
        );
        handler
    }

    /// Preview item of the polyline being entered
    pub fn shape(&self) -> Option<ItemId> {
        self.shape
    }

    /// Vertices entered so far, in data coordinates
    pub fn vertices(&self, plot: &Plot) -> Vec<Point> {
        self.shape
            .and_then(|id| plot.item(id))
            .map(|s| s.points().to_vec())
            .unwrap_or_default()
    }

    fn add_vertex(&mut self, plot: &mut Plot, pos: Point) {
        let at = plot.canvas_to_axes(pos);
        if let Some(shape) = self.shape.and_then(|id| plot.item_mut(id)) {
            shape.add_point(at);
        } else {
            let preview = Shape::polygon(vec![at], self.closed)
                .with_caps(Capabilities::LOCKED)
                .with_z(plot.max_z() + 1);
            self.shape = Some(plot.add_item(preview));
        }
        plot.replot();
    }

    /// Finish entry, emitting the polyline if it has at least two vertices
    pub fn accept(&mut self, filter: &mut PlotFilter, plot: &mut Plot) {
        let Some(id) = self.shape.take() else {
            return;
        };
        let Some(shape) = plot.remove_item(id) else {
            tracing::debug!(?id, "polyline preview removed before completion");
            return;
        };
        plot.replot();
        if shape.points().len() >= 2 {
            (self.on_finish)(filter, plot, shape.points());
        }
    }

    /// Drop the last vertex, or the whole polyline once two or fewer remain
    pub fn cancel_point(&mut self, plot: &mut Plot) {
        let Some(id) = self.shape else {
            return;
        };
        let Some(count) = plot.item(id).map(|s| s.points().len()) else {
            self.shape = None;
            return;
        };
        if count <= 2 {
            plot.remove_item(id);
            self.shape = None;
        } else if let Some(shape) = plot.item_mut(id) {
            shape.remove_last_point();
        }
        plot.replot();
    }
}

impl DragBehavior for MultilineSelection {
    fn drag_move(&mut self, _: &mut Drag, _: &mut PlotFilter, _: &mut Plot, _: &Event) {}

    fn stop_not_moving(
        &mut self,
        _: &mut Drag,
        _: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        self.add_vertex(plot, event.pos);
    }
}
