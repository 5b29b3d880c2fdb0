//! Selection tool

use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{Event, EventMatch, KeyCode, Modifiers, MouseButton, Point, StandardKey, StateId};

use crate::config::InteractionConfig;
use crate::handlers::{bind_undo_keys, setup_standard_tool_filter, History, ObjectHandler};
use crate::surface::{Plot, PlotFilter};
use crate::tools::{InteractiveTool, ToolContext};
use crate::undo::UndoStack;

/// Object selection and editing.
///
/// Left button picks and edits single items, Ctrl+left adds to the
/// selection. Both record into one undo history per plot. Enter, keypad
/// Enter or Space validates the selection.
///
/// Arrow keys nudge the selected items: a full step alone, a fine step with
/// Ctrl. Shift+Left/Right rotates them, finely with Ctrl+Shift.
#[derive(Clone, Debug)]
pub struct SelectTool {
    title: String,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new("Selection")
    }
}

impl SelectTool {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl InteractiveTool for SelectTool {
    fn title(&self) -> &str {
        &self.title
    }

    fn setup_filter(&mut self, filter: &mut PlotFilter, ctx: &ToolContext) -> StateId {
        let config = ctx.config();
        let start = filter.new_state();

        let history: History =
            Rc::new(RefCell::new(UndoStack::with_max_depth(config.undo_depth)));
        ObjectHandler::install_shared(
            filter,
            MouseButton::Left,
            Modifiers::NONE,
            start,
            false,
            config,
            &history,
        );
        ObjectHandler::install_shared(
            filter,
            MouseButton::Left,
            Modifiers::CTRL,
            start,
            true,
            config,
            &history,
        );
        bind_undo_keys(filter, start, &history);

        let validate = ctx.clone();
        filter.register_transition(
            start,
            EventMatch::keys([KeyCode::ENTER, KeyCode::KEYPAD_ENTER, KeyCode::SPACE]),
            move |_: &mut PlotFilter, _: &mut Plot, _: &Event| {
                validate.validate();
                validate.job_finished();
            },
            Some(start),
        );
        filter.register_transition(
            start,
            EventMatch::standard(StandardKey::SelectAll),
            |_: &mut PlotFilter, plot: &mut Plot, _: &Event| {
                plot.select_all();
                plot.replot();
            },
            Some(start),
        );

        let nudge = ArrowNudge::new(config);
        filter.register_transition(
            start,
            EventMatch::keys([KeyCode::LEFT, KeyCode::UP, KeyCode::RIGHT, KeyCode::DOWN]),
            move |_: &mut PlotFilter, plot: &mut Plot, event: &Event| nudge.apply(plot, event),
            Some(start),
        );

        setup_standard_tool_filter(filter, start, config)
    }
}

/// Keyboard edits of the selected items
#[derive(Clone, Copy, Debug)]
struct ArrowNudge {
    step: f32,
    fine_step: f32,
    /// Radians
    rotation: f32,
    fine_rotation: f32,
}

impl ArrowNudge {
    fn new(config: &InteractionConfig) -> Self {
        Self {
            step: config.arrow_step,
            fine_step: config.arrow_fine_step,
            rotation: config.arrow_rotation_deg.to_radians(),
            fine_rotation: config.arrow_fine_rotation_deg.to_radians(),
        }
    }

    fn apply(&self, plot: &mut Plot, event: &Event) {
        let modifiers = event.modifiers;
        let changed = if modifiers == Modifiers::NONE {
            translate(plot, event.key, self.step)
        } else if modifiers == Modifiers::CTRL {
            translate(plot, event.key, self.fine_step)
        } else if modifiers == Modifiers::SHIFT {
            rotate(plot, event.key, self.rotation)
        } else if modifiers == Modifiers::CTRL | Modifiers::SHIFT {
            rotate(plot, event.key, self.fine_rotation)
        } else {
            false
        };
        if changed {
            plot.replot();
        }
    }
}

fn translate(plot: &mut Plot, key: KeyCode, step: f32) -> bool {
    // Surface y grows downwards
    let delta = match key {
        KeyCode::LEFT => Point::new(-step, 0.0),
        KeyCode::RIGHT => Point::new(step, 0.0),
        KeyCode::UP => Point::new(0.0, -step),
        KeyCode::DOWN => Point::new(0.0, step),
        _ => return false,
    };
    let mut changed = false;
    for id in plot.selected_items() {
        if plot.can_move(id) {
            changed |= plot.move_shape(id, Point::ZERO, delta);
        }
    }
    changed
}

fn rotate(plot: &mut Plot, key: KeyCode, angle: f32) -> bool {
    let angle = match key {
        KeyCode::LEFT => -angle,
        KeyCode::RIGHT => angle,
        _ => return false,
    };
    let mut changed = false;
    for id in plot.selected_items() {
        if plot.can_rotate(id) {
            changed |= plot.rotate_shape_by(id, angle);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::shape::Shape;
    use crate::surface::{ItemId, PlotSurface};
    use crate::tools::{PlotId, ToolId, ToolSignal};
    use plume_core::Size;

    struct Fixture {
        canvas: Canvas,
        filter: PlotFilter,
        ctx: ToolContext,
    }

    fn setup() -> Fixture {
        let ctx = ToolContext::new(
            ToolId::default(),
            PlotId::default(),
            Rc::new(InteractionConfig::default()),
            Rc::default(),
        );
        let mut filter = PlotFilter::new();
        let mut canvas = Canvas::new(Size::new(100.0, 100.0));
        let start = SelectTool::default().setup_filter(&mut filter, &ctx);
        filter.transition_to(start, &mut canvas);
        Fixture { canvas, filter, ctx }
    }

    impl Fixture {
        fn add(&mut self, shape: Shape) -> ItemId {
            self.canvas.add_item(shape)
        }

        fn key(&mut self, key: KeyCode, modifiers: Modifiers) {
            let event = Event::key_down(key).with_modifiers(modifiers);
            self.filter.dispatch(&mut self.canvas, &event);
        }

        fn click(&mut self, x: f32, y: f32, modifiers: Modifiers) {
            let at = Point::new(x, y);
            let down = Event::pointer_down(at, MouseButton::Left).with_modifiers(modifiers);
            let up = Event::pointer_up(at, MouseButton::Left).with_modifiers(modifiers);
            self.filter.dispatch(&mut self.canvas, &down);
            self.filter.dispatch(&mut self.canvas, &up);
        }

        fn center(&self, id: ItemId) -> Point {
            self.canvas.item(id).unwrap().center()
        }
    }

    fn square(x: f32, y: f32) -> Shape {
        Shape::rectangle(Point::new(x, y), Point::new(x + 20.0, y + 20.0))
    }

    #[test]
    fn arrows_nudge_selected_items() {
        let mut f = setup();
        let id = f.add(square(20.0, 20.0));
        let other = f.add(square(60.0, 60.0));
        f.canvas.select_item(id);

        f.key(KeyCode::LEFT, Modifiers::NONE);
        assert!(f.center(id).distance(Point::new(20.0, 30.0)) < 1e-3);

        f.key(KeyCode::RIGHT, Modifiers::CTRL);
        assert!(f.center(id).distance(Point::new(21.0, 30.0)) < 1e-3);

        // Up on screen is up in data
        f.key(KeyCode::UP, Modifiers::NONE);
        assert!(f.center(id).distance(Point::new(21.0, 40.0)) < 1e-3);

        f.key(KeyCode::LEFT, Modifiers::ALT);
        assert!(f.center(id).distance(Point::new(21.0, 40.0)) < 1e-3);
        assert!(f.center(other).distance(Point::new(70.0, 70.0)) < 1e-3);
    }

    #[test]
    fn shift_arrows_rotate_rotatable_items_only() {
        let mut f = setup();
        let tri = vec![Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(30.0, 40.0)];
        let poly = f.add(Shape::polygon(tri, true));
        let rect = f.add(square(60.0, 60.0));
        f.canvas.select_item(poly);
        f.canvas.select_item(rect);
        let (poly_before, rect_before) = (f.canvas.item(poly).cloned(), f.canvas.item(rect).cloned());

        f.key(KeyCode::RIGHT, Modifiers::SHIFT);
        assert_ne!(f.canvas.item(poly).cloned(), poly_before);
        assert_eq!(f.canvas.item(rect).cloned(), rect_before);

        // Shift+Up is not a rotation
        let after = f.canvas.item(poly).cloned();
        f.key(KeyCode::UP, Modifiers::SHIFT);
        assert_eq!(f.canvas.item(poly).cloned(), after);
    }

    #[test]
    fn ctrl_click_extends_the_selection() {
        let mut f = setup();
        let a = f.add(square(10.0, 10.0));
        let b = f.add(square(60.0, 60.0));

        // Pixel y is flipped: data (20, 20) sits at pixel (20, 80)
        f.click(20.0, 80.0, Modifiers::NONE);
        assert_eq!(f.canvas.selected_items(), vec![a]);

        f.click(70.0, 30.0, Modifiers::CTRL);
        let selected = f.canvas.selected_items();
        assert!(selected.contains(&a) && selected.contains(&b));

        f.click(50.0, 50.0, Modifiers::NONE);
        assert!(f.canvas.selected_items().is_empty());
    }

    #[test]
    fn select_all_and_validate() {
        let mut f = setup();
        f.add(square(10.0, 10.0));
        f.add(square(60.0, 60.0));
        f.key(KeyCode::A, Modifiers::COMMAND);
        assert_eq!(f.canvas.selected_items().len(), 2);

        f.key(KeyCode::ENTER, Modifiers::NONE);
        let signals: Vec<ToolSignal> = f.ctx.signals.borrow().iter().copied().collect();
        assert_eq!(
            signals,
            vec![
                ToolSignal::Validate {
                    tool: ToolId::default(),
                    plot: PlotId::default()
                },
                ToolSignal::JobFinished(ToolId::default()),
            ]
        );
    }

    #[test]
    fn plain_and_ctrl_edits_share_one_history() {
        let mut f = setup();
        let a = f.add(square(10.0, 10.0));
        let b = f.add(square(60.0, 60.0));
        let held: plume_core::MouseButtons = MouseButton::Left.into();

        let drag = |f: &mut Fixture, from: Point, to: Point, modifiers: Modifiers| {
            let events = [
                Event::pointer_down(from, MouseButton::Left),
                Event::pointer_move(to, held),
                Event::pointer_up(to, MouseButton::Left),
            ];
            for event in events {
                f.filter.dispatch(&mut f.canvas, &event.with_modifiers(modifiers));
            }
        };
        drag(&mut f, Point::new(20.0, 80.0), Point::new(25.0, 80.0), Modifiers::NONE);
        drag(&mut f, Point::new(70.0, 30.0), Point::new(75.0, 30.0), Modifiers::CTRL);
        assert!(f.center(a).distance(Point::new(25.0, 20.0)) < 1e-3);
        assert!(f.center(b).distance(Point::new(75.0, 70.0)) < 1e-3);

        f.key(KeyCode::Z, Modifiers::COMMAND);
        assert!(f.center(b).distance(Point::new(70.0, 70.0)) < 1e-3);
        assert!(f.center(a).distance(Point::new(25.0, 20.0)) < 1e-3);

        f.key(KeyCode::Z, Modifiers::COMMAND);
        assert!(f.center(a).distance(Point::new(20.0, 20.0)) < 1e-3);
    }
}
