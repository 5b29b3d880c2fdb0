//! Rubber-band selections
//!
//! A rectangle item follows the pointer while the button is held and is
//! removed on release; the two corners are then handed to a completion
//! callback. Point selection and zoom-to-rectangle are configurations of the
//! same behavior.

use std::fmt;

use plume_core::{Event, Point};

use crate::handlers::drag::{Drag, DragBehavior, DragHandler};
use crate::shape::{Capabilities, Shape};
use crate::surface::{ItemId, Plot, PlotFilter};

/// Receives the two rectangle corners in surface pixels
pub type RectCallback = Box<dyn Fn(&mut PlotFilter, &mut Plot, Point, Point)>;

pub struct RectangularSelection {
    band: Option<ItemId>,
    /// Offset the anchor by one pixel when it would coincide with the
    /// pointer, so the emitted rectangle always has an area
    pub avoid_null_shape: bool,
    /// A release without any move still completes the selection
    pub finish_on_click: bool,
    on_end: RectCallback,
}

impl fmt::Debug for RectangularSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectangularSelection")
            .field("band", &self.band)
            .field("avoid_null_shape", &self.avoid_null_shape)
            .field("finish_on_click", &self.finish_on_click)
            .finish_non_exhaustive()
    }
}

impl RectangularSelection {
    pub fn new<F>(on_end: F) -> Self
    where
        F: Fn(&mut PlotFilter, &mut Plot, Point, Point) + 'static,
    {
        Self {
            band: None,
            avoid_null_shape: false,
            finish_on_click: false,
            on_end: Box::new(on_end),
        }
    }

    pub fn with_avoid_null_shape(mut self, avoid: bool) -> Self {
        self.avoid_null_shape = avoid;
        self
    }

    /// Completes on a plain click as well as on a drag
    pub fn point_selection<F>(on_end: F) -> Self
    where
        F: Fn(&mut PlotFilter, &mut Plot, Point, Point) + 'static,
    {
        Self {
            finish_on_click: true,
            ..Self::new(on_end)
        }
    }

    /// Zooms the view to the selected rectangle
    pub fn zoom_rect() -> Self {
        Self::new(|_, plot, p0, p1| {
            plot.zoom_rect_view(p0, p1);
            plot.replot();
        })
    }

    /// Rubber-band item while a drag is in progress
    pub fn band(&self) -> Option<ItemId> {
        self.band
    }

    fn nudge_anchor(&self, drag: &mut Drag, pos: Point) {
        if let Some(start) = drag.start() {
            if self.avoid_null_shape && start == pos {
                drag.set_start(start - Point::new(1.0, 1.0));
            }
        }
    }

    fn remove_band(&mut self, plot: &mut Plot) {
        if let Some(band) = self.band.take() {
            plot.remove_item(band);
        }
    }

    fn finish(&mut self, drag: &Drag, filter: &mut PlotFilter, plot: &mut Plot, pos: Point) {
        self.remove_band(plot);
        if let Some(start) = drag.start() {
            (self.on_end)(filter, plot, start, pos);
        }
        plot.replot();
    }
}

impl DragBehavior for RectangularSelection {
    fn start_moving(
        &mut self,
        drag: &mut Drag,
        _: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        let Some(start) = drag.start() else {
            return;
        };
        let pos = event.pos;
        self.nudge_anchor(drag, pos);
        let anchor = drag.start().unwrap_or(start);
        self.remove_band(plot);
        let band = Shape::rectangle(plot.canvas_to_axes(anchor), plot.canvas_to_axes(pos))
            .with_caps(Capabilities::LOCKED)
            .with_z(plot.max_z() + 1);
        self.band = Some(plot.add_item(band));
        plot.replot();
    }

    fn drag_move(&mut self, _: &mut Drag, _: &mut PlotFilter, plot: &mut Plot, event: &Event) {
        if let Some(band) = self.band {
            plot.move_point(band, 2, event.pos, false);
            plot.replot();
        }
    }

    fn stop_not_moving(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        if self.finish_on_click || self.avoid_null_shape {
            self.nudge_anchor(drag, event.pos);
            self.finish(drag, filter, plot, event.pos);
        }
    }

    fn stop_moving(
        &mut self,
        drag: &mut Drag,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        event: &Event,
    ) {
        self.finish(drag, filter, plot, event.pos);
    }
}

pub type RectangularSelectionHandler = DragHandler<RectangularSelection>;
