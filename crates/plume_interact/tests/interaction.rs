use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{Event, KeyCode, Modifiers, MouseButton, MouseButtons, Point, Size};
use plume_interact::{
    Canvas, DeleteItemTool, InteractionConfig, MultiLineTool, PlotId, PlotManager, PlotSurface,
    RectZoomTool, RectangularActionTool, SelectTool, Shape, ShapeKind, ToolEvent,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn left() -> MouseButtons {
    MouseButton::Left.into()
}

fn drag(manager: &mut PlotManager, plot: PlotId, button: MouseButton, from: Point, to: Point) {
    let held: MouseButtons = button.into();
    manager.dispatch(plot, &Event::pointer_down(from, button)).unwrap();
    manager.dispatch(plot, &Event::pointer_move(to, held)).unwrap();
    manager.dispatch(plot, &Event::pointer_up(to, button)).unwrap();
}

fn click(manager: &mut PlotManager, plot: PlotId, at: Point) {
    manager.dispatch(plot, &Event::pointer_down(at, MouseButton::Left)).unwrap();
    manager.dispatch(plot, &Event::pointer_up(at, MouseButton::Left)).unwrap();
}

fn key(manager: &mut PlotManager, plot: PlotId, key: KeyCode, modifiers: Modifiers) {
    let event = Event::key_down(key).with_modifiers(modifiers);
    manager.dispatch(plot, &event).unwrap();
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-3
}

/// 100x100 canvas whose data coordinates equal pixels with y flipped
fn canvas() -> Canvas {
    Canvas::new(Size::new(100.0, 100.0))
}

#[test]
fn drag_edit_undo_and_redo() {
    init_tracing();
    let mut canvas = canvas();
    let square = canvas.add_item(Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0)));
    let mut manager = PlotManager::default();
    manager.add_tool(SelectTool::default());
    let plot = manager.add_plot(Box::new(canvas));

    drag(&mut manager, plot, MouseButton::Left, Point::new(20.0, 80.0), Point::new(40.0, 70.0));
    let center = |m: &PlotManager| m.plot(plot).unwrap().item(square).unwrap().center();
    assert!(close(center(&manager), Point::new(40.0, 30.0)), "{:?}", center(&manager));

    key(&mut manager, plot, KeyCode::Z, Modifiers::COMMAND);
    assert!(close(center(&manager), Point::new(20.0, 20.0)));

    key(&mut manager, plot, KeyCode::Z, Modifiers::COMMAND | Modifiers::SHIFT);
    assert!(close(center(&manager), Point::new(40.0, 30.0)));

    // Nothing left to redo
    key(&mut manager, plot, KeyCode::Y, Modifiers::COMMAND);
    assert!(close(center(&manager), Point::new(40.0, 30.0)));
}

#[test]
fn handle_drag_resizes_rectangle_corner() {
    init_tracing();
    let mut canvas = canvas();
    let square = canvas.add_item(Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0)));
    let mut manager = PlotManager::default();
    manager.add_tool(SelectTool::default());
    let plot = manager.add_plot(Box::new(canvas));

    // Corner 2 is data (30, 30), pixel (30, 70)
    drag(&mut manager, plot, MouseButton::Left, Point::new(31.0, 70.0), Point::new(50.0, 60.0));
    let shape = manager.plot(plot).unwrap().item(square).unwrap().clone();
    assert!(close(shape.points()[2], Point::new(50.0, 40.0)), "{:?}", shape.points());
    assert!(close(shape.points()[0], Point::new(10.0, 10.0)));
}

#[test]
fn drawing_tool_returns_to_selection_when_done() {
    init_tracing();
    let mut manager = PlotManager::default();
    let select = manager.add_tool(SelectTool::default());
    let draw = manager.add_tool(MultiLineTool::free_form());
    let plot = manager.add_plot(Box::new(canvas()));
    manager.take_events();

    manager.activate(draw).unwrap();
    assert!(manager.is_active(draw) && !manager.is_active(select));
    for (x, y) in [(10.0, 10.0), (50.0, 10.0), (30.0, 40.0)] {
        click(&mut manager, plot, Point::new(x, y));
    }
    key(&mut manager, plot, KeyCode::ENTER, Modifiers::NONE);

    assert_eq!(manager.active_tool(), Some(select));
    let events = manager.take_events();
    assert_eq!(
        events,
        vec![
            ToolEvent::Deactivated(select),
            ToolEvent::Activated(draw),
            ToolEvent::JobFinished(draw),
            ToolEvent::Deactivated(draw),
            ToolEvent::Activated(select),
        ]
    );

    let surface = manager.plot(plot).unwrap();
    let polygon = surface.active_item().unwrap();
    assert_eq!(
        surface.item(polygon).unwrap().kind(),
        ShapeKind::Polygon { closed: true }
    );

    // The selection tool now edits the new polygon
    drag(&mut manager, plot, MouseButton::Left, Point::new(30.0, 20.0), Point::new(30.0, 30.0));
    let first = manager.plot(plot).unwrap().item(polygon).unwrap().points()[0];
    assert!(close(first, Point::new(10.0, 80.0)), "{first:?}");
}

#[test]
fn middle_drag_pans_under_every_tool() {
    init_tracing();
    let mut manager = PlotManager::default();
    manager.add_tool(SelectTool::default());
    let zoom = manager.add_tool(RectZoomTool::default());
    let plot = manager.add_plot(Box::new(canvas()));

    let origin = |m: &PlotManager| m.plot(plot).unwrap().canvas_to_axes(Point::new(0.0, 100.0));
    drag(&mut manager, plot, MouseButton::Middle, Point::new(50.0, 50.0), Point::new(60.0, 50.0));
    assert!(close(origin(&manager), Point::new(-10.0, 0.0)), "{:?}", origin(&manager));

    manager.activate(zoom).unwrap();
    drag(&mut manager, plot, MouseButton::Middle, Point::new(50.0, 50.0), Point::new(60.0, 50.0));
    assert!(close(origin(&manager), Point::new(-20.0, 0.0)), "{:?}", origin(&manager));

    // Left drag zooms to the band under the zoom tool
    drag(&mut manager, plot, MouseButton::Left, Point::new(0.0, 0.0), Point::new(50.0, 50.0));
    let far = manager.plot(plot).unwrap().canvas_to_axes(Point::new(100.0, 0.0));
    assert!(close(origin(&manager), Point::new(-20.0, 50.0)), "{:?}", origin(&manager));
    assert!(close(far, Point::new(30.0, 100.0)), "{far:?}");
}

#[test]
fn avoid_null_click_reports_a_one_pixel_rectangle() {
    init_tracing();
    let rects = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&rects);
    let action = RectangularActionTool::new("pick", move |_, p0, p1| sink.borrow_mut().push((p0, p1)))
        .with_avoid_null_shape(true)
        .with_switch_to_default(false);

    let mut manager = PlotManager::default();
    let tool = manager.add_tool(action);
    let plot = manager.add_plot(Box::new(canvas()));

    click(&mut manager, plot, Point::new(40.0, 40.0));
    assert_eq!(
        *rects.borrow(),
        vec![(Point::new(39.0, 39.0), Point::new(40.0, 40.0))]
    );
    assert!(manager.is_active(tool));
    assert!(manager.plot(plot).unwrap().items_z_sorted().is_empty());
}

#[test]
fn configured_arrow_step_and_delete_command() {
    init_tracing();
    let config = InteractionConfig::from_toml_str("arrow_step = 5.0\n").unwrap();
    let mut canvas = canvas();
    let a = canvas.add_item(Shape::marker(Point::new(50.0, 50.0)));
    let b = canvas.add_item(Shape::marker(Point::new(80.0, 80.0)));

    let mut manager = PlotManager::new(config);
    manager.add_tool(SelectTool::default());
    let delete = manager.add_command(DeleteItemTool);
    let plot = manager.add_plot(Box::new(canvas));

    manager.plot_mut(plot).unwrap().select_item(a);
    key(&mut manager, plot, KeyCode::RIGHT, Modifiers::NONE);
    let moved = manager.plot(plot).unwrap().item(a).unwrap().points()[0];
    assert!(close(moved, Point::new(55.0, 50.0)), "{moved:?}");

    manager.trigger_command(delete).unwrap();
    let surface = manager.plot(plot).unwrap();
    assert!(!surface.contains_item(a));
    assert!(surface.contains_item(b));
}

#[test]
fn item_removed_mid_drag_is_ignored() {
    init_tracing();
    let mut canvas = canvas();
    let square = canvas.add_item(Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0)));
    let mut manager = PlotManager::default();
    manager.add_tool(SelectTool::default());
    let plot = manager.add_plot(Box::new(canvas));

    manager
        .dispatch(plot, &Event::pointer_down(Point::new(20.0, 80.0), MouseButton::Left))
        .unwrap();
    manager.plot_mut(plot).unwrap().remove_item(square);
    manager
        .dispatch(plot, &Event::pointer_move(Point::new(30.0, 80.0), left()))
        .unwrap();
    manager
        .dispatch(plot, &Event::pointer_up(Point::new(30.0, 80.0), MouseButton::Left))
        .unwrap();

    let select = manager.active_tool().unwrap();
    assert_eq!(
        manager.filter(plot).unwrap().current_state(),
        manager.start_state(select, plot).unwrap()
    );
    // Undo has nothing to replay
    key(&mut manager, plot, KeyCode::Z, Modifiers::COMMAND);
    assert!(manager.plot(plot).unwrap().items_z_sorted().is_empty());
}
