//! Hover and wheel handlers
//!
//! Both are single self-loops on their start state and keep no state
//! between events.

use plume_core::{Event, EventMatch, Modifiers, StateId};

use crate::handlers::gesture::zoom_about;
use crate::surface::{Plot, PlotFilter};

/// Wheel delta of one notch
const WHEEL_NOTCH: f32 = 120.0;

/// Pointer motion with no button held updates the hover marker.
pub fn install_move(filter: &mut PlotFilter, modifiers: Modifiers, start_state: StateId) {
    filter.register_transition(
        start_state,
        EventMatch::moved(None, modifiers),
        |_: &mut PlotFilter, plot: &mut Plot, event: &Event| {
            plot.move_marker(event.pos, event.modifiers);
        },
        Some(start_state),
    );
}

/// Wheel rotation with exactly `modifiers` held zooms about the pointer.
///
/// `step` is the fraction of the extent zoomed per notch.
pub fn install_wheel_zoom(
    filter: &mut PlotFilter,
    modifiers: Modifiers,
    start_state: StateId,
    step: f32,
) {
    filter.register_transition(
        start_state,
        EventMatch::wheel(modifiers),
        move |_: &mut PlotFilter, plot: &mut Plot, event: &Event| {
            let factor = event.wheel_delta / WHEEL_NOTCH * step;
            let size = plot.contents_size();
            let (dx, dy) = zoom_about(event.pos, size.width, size.height, factor);
            plot.zoom_view(dx, dy, Some(true));
            plot.replot();
        },
        Some(start_state),
    );
}
