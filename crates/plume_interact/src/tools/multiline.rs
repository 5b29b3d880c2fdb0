//! Polyline and polygon drawing

use std::fmt;
use std::rc::Rc;

use plume_core::{CursorShape, Modifiers, MouseButton, Point, StateId};

use crate::handlers::{setup_standard_tool_filter, MultilineSelection};
use crate::shape::Shape;
use crate::surface::{ItemId, Plot, PlotFilter};
use crate::tools::{InteractiveTool, ToolContext};

/// Called with each shape the tool leaves on the plot
pub type FinalShapeCallback = Rc<dyn Fn(&mut Plot, ItemId)>;

/// Point-by-point polyline drawing.
///
/// Accepting the entry adds a polyline (or, when closed, a polygon) item,
/// makes it the active item and finishes the tool's job.
pub struct MultiLineTool {
    title: String,
    closed: bool,
    switch_to_default: bool,
    on_final_shape: Option<FinalShapeCallback>,
}

impl fmt::Debug for MultiLineTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLineTool")
            .field("title", &self.title)
            .field("closed", &self.closed)
            .field("switch_to_default", &self.switch_to_default)
            .finish_non_exhaustive()
    }
}

impl Default for MultiLineTool {
    fn default() -> Self {
        Self::new("Polyline", false)
    }
}

impl MultiLineTool {
    pub fn new(title: impl Into<String>, closed: bool) -> Self {
        Self {
            title: title.into(),
            closed,
            switch_to_default: true,
            on_final_shape: None,
        }
    }

    /// Closed variant drawing free-form polygons
    pub fn free_form() -> Self {
        Self::new("Free form", true)
    }

    pub fn with_switch_to_default(mut self, switch: bool) -> Self {
        self.switch_to_default = switch;
        self
    }

    pub fn on_final_shape<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Plot, ItemId) + 'static,
    {
        self.on_final_shape = Some(Rc::new(callback));
        self
    }
}

impl InteractiveTool for MultiLineTool {
    fn title(&self) -> &str {
        &self.title
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::Cross
    }

    fn switch_to_default_on_finish(&self) -> bool {
        self.switch_to_default
    }

    fn setup_filter(&mut self, filter: &mut PlotFilter, ctx: &ToolContext) -> StateId {
        let start = filter.new_state();
        let closed = self.closed;
        let callback = self.on_final_shape.clone();
        let job = ctx.clone();
        let selection = MultilineSelection::new(
            closed,
            move |_: &mut PlotFilter, plot: &mut Plot, points: &[Point]| {
                let shape = Shape::polygon(points.to_vec(), closed).with_z(plot.max_z() + 1);
                let id = plot.add_item(shape);
                plot.set_active_item(Some(id));
                if let Some(callback) = &callback {
                    callback(plot, id);
                }
                plot.replot();
                job.job_finished();
            },
        );
        selection.install(filter, MouseButton::Left, Modifiers::NONE, start);
        setup_standard_tool_filter(filter, start, ctx.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::config::InteractionConfig;
    use crate::shape::ShapeKind;
    use crate::surface::PlotSurface;
    use crate::tools::{PlotId, ToolId, ToolSignal};
    use plume_core::{Event, KeyCode, Size};
    use std::cell::Cell;

    fn click(filter: &mut PlotFilter, canvas: &mut Canvas, x: f32, y: f32) {
        let at = Point::new(x, y);
        filter.dispatch(canvas, &Event::pointer_down(at, MouseButton::Left));
        filter.dispatch(canvas, &Event::pointer_up(at, MouseButton::Left));
    }

    #[test]
    fn accepted_polygon_becomes_active_item() {
        let ctx = ToolContext::new(
            ToolId::default(),
            PlotId::default(),
            Rc::new(InteractionConfig::default()),
            Rc::default(),
        );
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let mut tool = MultiLineTool::free_form().on_final_shape(move |_, _| counter.set(counter.get() + 1));

        let mut filter = PlotFilter::new();
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let start = tool.setup_filter(&mut filter, &ctx);
        filter.transition_to(start, &mut canvas);

        click(&mut filter, &mut canvas, 10.0, 10.0);
        click(&mut filter, &mut canvas, 50.0, 10.0);
        click(&mut filter, &mut canvas, 30.0, 40.0);
        filter.dispatch(&mut canvas, &Event::key_down(KeyCode::ENTER));

        assert_eq!(canvas.len(), 1);
        let id = canvas.active_item().unwrap();
        let shape = canvas.item(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Polygon { closed: true });
        assert_eq!(shape.points().len(), 3);
        assert!(shape.caps.selectable);
        assert_eq!(seen.get(), 1);
        assert_eq!(
            ctx.signals.borrow().back(),
            Some(&ToolSignal::JobFinished(ToolId::default()))
        );
    }
}
