//! Object selection and editing
//!
//! On press the handler picks a target item and decides once how the
//! following moves apply to it:
//!
//! 1. inside an item that cannot move but can rotate: rotate it
//! 2. within the pick tolerance of a control point: drag that point
//! 3. inside a movable item: translate it
//! 4. anything else clears the selection and returns to idle
//!
//! Each completed edit is recorded in an undo history, which the
//! standard Undo and Redo shortcuts replay from the idle state.

use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{Event, EventMatch, Modifiers, MouseButton, Point, StandardKey, StateId};

use crate::config::InteractionConfig;
use crate::surface::{HitTest, ItemId, Plot, PlotFilter};
use crate::undo::{EditKind, UndoAction, UndoStack};

/// How the current gesture edits its target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grab {
    /// Rotation by dragging anywhere inside the item
    Rotate,
    /// Control point drag
    Handle(usize),
    Translate,
}

/// Undo history shared between handlers of one plot
pub type History = Rc<RefCell<UndoStack>>;

/// Bind the standard Undo and Redo shortcuts on `state` to `history`.
pub fn bind_undo_keys(filter: &mut PlotFilter, state: StateId, history: &History) {
    let h = Rc::clone(history);
    filter.register_transition(
        state,
        EventMatch::standard(StandardKey::Undo),
        move |_: &mut PlotFilter, plot: &mut Plot, _: &Event| {
            if h.borrow_mut().undo(plot) {
                plot.replot();
            }
        },
        Some(state),
    );
    let h = Rc::clone(history);
    filter.register_transition(
        state,
        EventMatch::standard(StandardKey::Redo),
        move |_: &mut PlotFilter, plot: &mut Plot, _: &Event| {
            if h.borrow_mut().redo(plot) {
                plot.replot();
            }
        },
        Some(state),
    );
}

pub struct ObjectHandler {
    start_state: StateId,
    state0: StateId,
    multiselection: bool,
    selection_distance: f32,
    history: History,
    active: Option<ItemId>,
    grab: Option<Grab>,
    first_pos: Option<Point>,
    last_pos: Option<Point>,
    /// The press landed on the already active item; a release without any
    /// move clears the selection
    unselection_pending: bool,
    pending: Option<UndoAction>,
}

impl ObjectHandler {
    /// Install with a private undo history and bind the Undo and Redo
    /// shortcuts to it.
    pub fn install(
        filter: &mut PlotFilter,
        button: MouseButton,
        modifiers: Modifiers,
        start_state: StateId,
        multiselection: bool,
        config: &InteractionConfig,
    ) -> Rc<RefCell<Self>> {
        let history: History = Rc::new(RefCell::new(UndoStack::with_max_depth(config.undo_depth)));
        bind_undo_keys(filter, start_state, &history);
        Self::install_shared(
            filter,
            button,
            modifiers,
            start_state,
            multiselection,
            config,
            &history,
        )
    }

    /// Install recording edits into `history`, without binding any keys.
    ///
    /// Several handlers on one plot can share a history so that a single
    /// shortcut steps through all of their edits.
    pub fn install_shared(
        filter: &mut PlotFilter,
        button: MouseButton,
        modifiers: Modifiers,
        start_state: StateId,
        multiselection: bool,
        config: &InteractionConfig,
        history: &History,
    ) -> Rc<RefCell<Self>> {
        let handler = Rc::new(RefCell::new(Self {
            start_state,
            state0: start_state,
            multiselection,
            selection_distance: config.selection_distance,
            history: Rc::clone(history),
            active: None,
            grab: None,
            first_pos: None,
            last_pos: None,
            unselection_pending: false,
            pending: None,
        }));

        let h = Rc::clone(&handler);
        let state0 = filter.register_transition(
            start_state,
            EventMatch::press(button, modifiers),
            move |filter: &mut PlotFilter, plot: &mut Plot, event: &Event| {
                h.borrow_mut().start_tracking(filter, plot, event)
            },
            None,
        );
        let h = Rc::clone(&handler);
        filter.register_transition(
            state0,
            EventMatch::moved(Some(button), modifiers),
            move |_: &mut PlotFilter, plot: &mut Plot, event: &Event| {
                h.borrow_mut().drag_to(plot, event)
            },
            Some(state0),
        );
        let h = Rc::clone(&handler);
        filter.register_transition(
            state0,
            EventMatch::release(button, modifiers),
            move |_: &mut PlotFilter, plot: &mut Plot, _: &Event| {
                h.borrow_mut().stop_tracking(plot)
            },
            Some(start_state),
        );

        handler.borrow_mut().state0 = state0;
        handler
    }

    pub fn state0(&self) -> StateId {
        self.state0
    }

    /// Item edited by the gesture in progress
    pub fn active(&self) -> Option<ItemId> {
        self.active
    }

    pub fn grab(&self) -> Option<Grab> {
        self.grab
    }

    /// Undo history this handler records into
    pub fn history(&self) -> History {
        Rc::clone(&self.history)
    }

    fn clear(&mut self) {
        self.active = None;
        self.grab = None;
        self.first_pos = None;
        self.last_pos = None;
        self.pending = None;
    }

    fn abort(&mut self, filter: &mut PlotFilter, plot: &mut Plot, unselect: bool) {
        if unselect {
            plot.unselect_all();
            plot.replot();
        }
        self.clear();
        filter.transition_to(self.start_state, plot);
    }

    fn start_tracking(&mut self, filter: &mut PlotFilter, plot: &mut Plot, event: &Event) {
        self.clear();
        let pos = event.pos;
        self.first_pos = Some(pos);
        self.last_pos = Some(pos);
        let tolerance = self.selection_distance;

        let selected = plot.active_item();
        let mut nearest = plot.nearest_object(pos, tolerance);
        if let Some((id, hit)) = nearest {
            if !plot.can_select(id) || hit.distance >= tolerance {
                nearest = plot.nearest_object_in_z(pos);
            }
        }
        self.unselection_pending = selected == nearest.map(|(id, _)| id);

        let target = match selected {
            Some(active) if !self.multiselection => {
                match self.retarget(filter, plot, active, nearest, pos) {
                    Some(target) => target,
                    None => return,
                }
            }
            _ => {
                let Some((id, hit)) = nearest else {
                    let unselect = self.unselection_pending;
                    self.abort(filter, plot, unselect);
                    return;
                };
                if !plot.is_selected(id) {
                    if !self.multiselection {
                        plot.unselect_all();
                    }
                    plot.select_item(id);
                }
                plot.set_active_item(Some(id));
                (id, hit)
            }
        };

        self.classify(filter, plot, target);
        plot.replot();
    }

    /// Choose the target when an item is already active.
    ///
    /// Presses away from the active item may land on another selected
    /// movable item, or select a different object outright. Returns `None`
    /// once the gesture has been resolved here.
    fn retarget(
        &mut self,
        filter: &mut PlotFilter,
        plot: &mut Plot,
        active: ItemId,
        nearest: Option<(ItemId, HitTest)>,
        pos: Point,
    ) -> Option<(ItemId, HitTest)> {
        let tolerance = self.selection_distance;
        let Some(hit) = plot.hit_test(active, pos) else {
            self.abort(filter, plot, false);
            return None;
        };
        if let Some(other) = hit.other {
            plot.set_active_item(Some(other));
            self.abort(filter, plot, false);
            return None;
        }
        if hit.distance < tolerance || hit.inside {
            return Some((active, hit));
        }

        let sibling = plot
            .selected_items()
            .into_iter()
            .filter(|id| *id != active && plot.can_move(*id))
            .find_map(|id| {
                plot.hit_test(id, pos)
                    .filter(|h| h.distance < tolerance || h.inside)
                    .map(|h| (id, h))
            });
        if let Some((id, hit)) = sibling {
            plot.set_active_item(Some(id));
            return Some((id, hit));
        }

        match nearest.filter(|(id, _)| plot.can_select(*id)) {
            Some((id, hit)) => {
                plot.unselect_all();
                plot.select_item(id);
                plot.set_active_item(Some(id));
                self.unselection_pending = false;
                Some((id, hit))
            }
            None => {
                self.abort(filter, plot, true);
                None
            }
        }
    }

    fn classify(&mut self, filter: &mut PlotFilter, plot: &mut Plot, (id, hit): (ItemId, HitTest)) {
        let grab = if !plot.can_move(id) && hit.inside && plot.can_rotate(id) {
            Some(Grab::Rotate)
        } else if hit.distance < self.selection_distance
            && (plot.can_resize(id) || plot.can_rotate(id))
        {
            hit.handle.map(Grab::Handle)
        } else {
            None
        };
        let grab = grab.or_else(|| (hit.inside && plot.can_move(id)).then_some(Grab::Translate));

        match grab {
            Some(grab) => {
                tracing::trace!(?id, ?grab, "object grabbed");
                self.active = Some(id);
                self.grab = Some(grab);
            }
            None => {
                let unselect = self.unselection_pending;
                self.abort(filter, plot, unselect);
            }
        }
    }

    fn drag_to(&mut self, plot: &mut Plot, event: &Event) {
        let (Some(id), Some(grab), Some(first), Some(last)) =
            (self.active, self.grab, self.first_pos, self.last_pos)
        else {
            return;
        };
        if !plot.contains_item(id) {
            tracing::debug!(?id, "object removed during gesture");
            self.clear();
            return;
        }
        self.unselection_pending = false;
        let pos = event.pos;

        let kind = match grab {
            Grab::Rotate => {
                plot.rotate_shape(id, last, pos);
                EditKind::Rotate
            }
            Grab::Translate => {
                plot.move_shape(id, last, pos);
                EditKind::Move
            }
            Grab::Handle(handle) => {
                let ctrl = event.modifiers.ctrl();
                plot.move_point(id, handle, pos, ctrl);
                EditKind::MovePoint { handle, ctrl }
            }
        };
        self.pending = Some(UndoAction::new(&*plot, id, kind, first, pos));
        self.last_pos = Some(pos);
        plot.replot();
    }

    fn stop_tracking(&mut self, plot: &mut Plot) {
        if let Some(action) = self.pending.take() {
            self.history.borrow_mut().push(action);
        }
        if self.unselection_pending {
            plot.unselect_all();
            plot.replot();
        }
        self.clear();
    }
}
