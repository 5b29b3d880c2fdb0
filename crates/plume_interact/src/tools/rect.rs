//! Rectangle-driven tools

use std::fmt;
use std::rc::Rc;

use plume_core::{CursorShape, Modifiers, MouseButton, Point, StateId};

use crate::handlers::{
    setup_standard_tool_filter, RectangularSelection, RectangularSelectionHandler,
};
use crate::shape::Shape;
use crate::surface::{Plot, PlotFilter};
use crate::tools::{InteractiveTool, ToolContext};

/// Zoom to a rectangle dragged with the left button
#[derive(Clone, Debug)]
pub struct RectZoomTool {
    title: String,
}

impl Default for RectZoomTool {
    fn default() -> Self {
        Self {
            title: "Rectangle zoom".to_string(),
        }
    }
}

impl InteractiveTool for RectZoomTool {
    fn title(&self) -> &str {
        &self.title
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::Cross
    }

    fn setup_filter(&mut self, filter: &mut PlotFilter, ctx: &ToolContext) -> StateId {
        let start = filter.new_state();
        RectangularSelectionHandler::install(
            filter,
            MouseButton::Left,
            Modifiers::NONE,
            start,
            RectangularSelection::zoom_rect(),
        );
        setup_standard_tool_filter(filter, start, ctx.config())
    }
}

/// Receives the plot and the rectangle corners in surface pixels
pub type RectAction = Rc<dyn Fn(&mut Plot, Point, Point)>;

/// Item left on the plot once the rectangle is complete
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalShape {
    Rectangle,
    /// From the press corner to the release corner
    Segment,
    /// At the release corner
    Marker,
}

impl FinalShape {
    fn build(self, p0: Point, p1: Point) -> Shape {
        match self {
            FinalShape::Rectangle => Shape::rectangle(p0, p1),
            FinalShape::Segment => Shape::segment(p0, p1),
            FinalShape::Marker => Shape::marker(p1),
        }
    }
}

/// Runs an action on each rectangle the user draws
pub struct RectangularActionTool {
    title: String,
    action: RectAction,
    /// Pass the corners as (top-left, bottom-right)
    pub fix_orientation: bool,
    pub avoid_null_shape: bool,
    /// A plain click counts as a rectangle
    pub point_selection: bool,
    /// Leave an item on the plot and make it the active selection
    pub final_shape: Option<FinalShape>,
    pub switch_to_default: bool,
}

impl fmt::Debug for RectangularActionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectangularActionTool")
            .field("title", &self.title)
            .field("fix_orientation", &self.fix_orientation)
            .field("avoid_null_shape", &self.avoid_null_shape)
            .field("point_selection", &self.point_selection)
            .field("final_shape", &self.final_shape)
            .field("switch_to_default", &self.switch_to_default)
            .finish_non_exhaustive()
    }
}

impl RectangularActionTool {
    pub fn new<F>(title: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Plot, Point, Point) + 'static,
    {
        Self {
            title: title.into(),
            action: Rc::new(action),
            fix_orientation: false,
            avoid_null_shape: false,
            point_selection: false,
            final_shape: None,
            switch_to_default: true,
        }
    }

    pub fn with_fix_orientation(mut self, fix: bool) -> Self {
        self.fix_orientation = fix;
        self
    }

    pub fn with_avoid_null_shape(mut self, avoid: bool) -> Self {
        self.avoid_null_shape = avoid;
        self
    }

    pub fn with_point_selection(mut self, point: bool) -> Self {
        self.point_selection = point;
        self
    }

    /// Draws rectangle items
    pub fn rectangle() -> Self {
        Self::new("Rectangle", |_, _, _| {}).with_final_shape(FinalShape::Rectangle)
    }

    /// Draws segment items
    pub fn segment() -> Self {
        Self::new("Segment", |_, _, _| {}).with_final_shape(FinalShape::Segment)
    }

    /// Drops a marker where the button is released, with or without a drag
    pub fn point() -> Self {
        Self::new("Point", |_, _, _| {})
            .with_point_selection(true)
            .with_final_shape(FinalShape::Marker)
    }

    pub fn with_final_shape(mut self, shape: FinalShape) -> Self {
        self.final_shape = Some(shape);
        self
    }

    pub fn with_switch_to_default(mut self, switch: bool) -> Self {
        self.switch_to_default = switch;
        self
    }
}

fn oriented(p0: Point, p1: Point) -> (Point, Point) {
    (
        Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
        Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
    )
}

impl InteractiveTool for RectangularActionTool {
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
        let action = Rc::clone(&self.action);
        let fix_orientation = self.fix_orientation;
        let final_shape = self.final_shape;
        let job = ctx.clone();
        let on_end = move |_: &mut PlotFilter, plot: &mut Plot, p0: Point, p1: Point| {
            let (p0, p1) = if fix_orientation { oriented(p0, p1) } else { (p0, p1) };
            if let Some(kind) = final_shape {
                let shape = kind
                    .build(plot.canvas_to_axes(p0), plot.canvas_to_axes(p1))
                    .with_z(plot.max_z() + 1);
                let id = plot.add_item(shape);
                plot.unselect_all();
                plot.select_item(id);
                plot.set_active_item(Some(id));
            }
            action(plot, p0, p1);
            plot.replot();
            job.job_finished();
        };

        let selection = if self.point_selection {
            RectangularSelection::point_selection(on_end)
        } else {
            RectangularSelection::new(on_end)
        };
        RectangularSelectionHandler::install(
            filter,
            MouseButton::Left,
            Modifiers::NONE,
            start,
            selection.with_avoid_null_shape(self.avoid_null_shape),
        );
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
    use plume_core::{Event, MouseButtons, Size};
    use std::cell::RefCell;

    type Rects = Rc<RefCell<Vec<(Point, Point)>>>;

    fn context() -> ToolContext {
        ToolContext::new(
            ToolId::default(),
            PlotId::default(),
            Rc::new(InteractionConfig::default()),
            Rc::default(),
        )
    }

    fn drag(filter: &mut PlotFilter, canvas: &mut Canvas, from: Point, to: Point) {
        let held: MouseButtons = MouseButton::Left.into();
        filter.dispatch(canvas, &Event::pointer_down(from, MouseButton::Left));
        if from != to {
            filter.dispatch(canvas, &Event::pointer_move(to, held));
        }
        filter.dispatch(canvas, &Event::pointer_up(to, MouseButton::Left));
    }

    fn install(tool: &mut RectangularActionTool, ctx: &ToolContext) -> (PlotFilter, Canvas) {
        let mut filter = PlotFilter::new();
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let start = tool.setup_filter(&mut filter, ctx);
        filter.transition_to(start, &mut canvas);
        (filter, canvas)
    }

    fn recording(rects: &Rects) -> impl Fn(&mut Plot, Point, Point) + 'static {
        let sink = Rc::clone(rects);
        move |_, p0, p1| sink.borrow_mut().push((p0, p1))
    }

    #[test]
    fn zoom_tool_zooms_to_dragged_rectangle() {
        let ctx = context();
        let mut filter = PlotFilter::new();
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let start = RectZoomTool::default().setup_filter(&mut filter, &ctx);
        filter.transition_to(start, &mut canvas);

        drag(&mut filter, &mut canvas, Point::new(20.0, 20.0), Point::new(60.0, 40.0));
        let d = canvas.view().domain;
        assert!((d.x.min - 20.0).abs() < 1e-3 && (d.x.max - 60.0).abs() < 1e-3, "{d:?}");
        assert!(canvas.is_empty());
        assert!(filter.is_in(start));
    }

    #[test]
    fn action_receives_oriented_corners_and_finishes_job() {
        let rects: Rects = Rc::default();
        let ctx = context();
        let mut tool = RectangularActionTool::new("measure", recording(&rects)).with_fix_orientation(true);
        let (mut filter, mut canvas) = install(&mut tool, &ctx);

        drag(&mut filter, &mut canvas, Point::new(60.0, 40.0), Point::new(20.0, 10.0));
        assert_eq!(*rects.borrow(), vec![(Point::new(20.0, 10.0), Point::new(60.0, 40.0))]);
        assert_eq!(
            ctx.signals.borrow().front(),
            Some(&ToolSignal::JobFinished(ToolId::default()))
        );
        assert!(tool.switch_to_default_on_finish());
    }

    #[test]
    fn click_only_counts_with_point_selection() {
        let rects: Rects = Rc::default();
        let ctx = context();
        let at = Point::new(30.0, 30.0);

        let mut plain = RectangularActionTool::new("plain", recording(&rects));
        let (mut filter, mut canvas) = install(&mut plain, &ctx);
        drag(&mut filter, &mut canvas, at, at);
        assert!(rects.borrow().is_empty());

        let mut point = RectangularActionTool::new("point", recording(&rects)).with_point_selection(true);
        let (mut filter, mut canvas) = install(&mut point, &ctx);
        drag(&mut filter, &mut canvas, at, at);
        assert_eq!(*rects.borrow(), vec![(at, at)]);
    }

    #[test]
    fn final_shape_stays_selected() {
        let ctx = context();
        let mut tool = RectangularActionTool::rectangle();
        let (mut filter, mut canvas) = install(&mut tool, &ctx);

        drag(&mut filter, &mut canvas, Point::new(10.0, 10.0), Point::new(50.0, 30.0));
        assert_eq!(canvas.len(), 1);
        let id = canvas.active_item().unwrap();
        assert_eq!(canvas.selected_items(), vec![id]);
        let center = canvas.item(id).unwrap().center();
        assert!(center.distance(Point::new(30.0, 80.0)) < 1e-3, "{center:?}");
    }

    #[test]
    fn segment_tool_leaves_a_segment_between_the_corners() {
        let ctx = context();
        let mut tool = RectangularActionTool::segment();
        let (mut filter, mut canvas) = install(&mut tool, &ctx);

        drag(&mut filter, &mut canvas, Point::new(10.0, 90.0), Point::new(40.0, 50.0));
        let id = canvas.active_item().unwrap();
        let shape = canvas.item(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Segment);
        let ends = shape.points();
        assert_eq!(ends.len(), 2);
        assert!(ends[0].distance(Point::new(10.0, 10.0)) < 1e-3, "{ends:?}");
        assert!(ends[1].distance(Point::new(40.0, 50.0)) < 1e-3, "{ends:?}");
        assert_eq!(canvas.selected_items(), vec![id]);
        assert_eq!(tool.title(), "Segment");
    }

    #[test]
    fn point_tool_drops_a_marker_on_click() {
        let ctx = context();
        let mut tool = RectangularActionTool::point();
        let (mut filter, mut canvas) = install(&mut tool, &ctx);

        let at = Point::new(25.0, 75.0);
        drag(&mut filter, &mut canvas, at, at);
        assert_eq!(canvas.len(), 1);
        let id = canvas.active_item().unwrap();
        let shape = canvas.item(id).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Marker);
        assert_eq!(shape.points().len(), 1);
        assert!(shape.points()[0].distance(Point::new(25.0, 25.0)) < 1e-3);
        assert_eq!(
            ctx.signals.borrow().front(),
            Some(&ToolSignal::JobFinished(ToolId::default()))
        );
    }
}
