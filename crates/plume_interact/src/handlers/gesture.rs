//! Touch gesture handlers
//!
//! Driven by gesture phases rather than buttons:
//!
//! ```text
//! start --Started--> state0 --Updated--> state1 --Updated--> state1
//!   ^                  |                   |
//!   +--Finished/Canceled-------------------+
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{Event, EventMatch, GestureData, GestureKind, GesturePhase, Point, StateId};

use crate::config::InteractionConfig;
use crate::shape::{Capabilities, Shape};
use crate::surface::{ItemId, Plot, PlotFilter};
use crate::view::AxisDrag;

pub trait GestureBehavior: 'static {
    fn kind(&self) -> GestureKind;

    fn start_tracking(
        &mut self,
        _filter: &mut PlotFilter,
        _plot: &mut Plot,
        _gesture: &GestureData,
    ) {
    }

    fn update(&mut self, filter: &mut PlotFilter, plot: &mut Plot, gesture: &GestureData);

    /// Called on both finish and cancel
    fn stop_tracking(
        &mut self,
        _filter: &mut PlotFilter,
        _plot: &mut Plot,
        _gesture: &GestureData,
    ) {
    }
}

type Step<B> = fn(&mut B, &mut PlotFilter, &mut Plot, &GestureData);

pub struct GestureHandler<B> {
    pub start_state: StateId,
    pub state0: StateId,
    pub state1: StateId,
    behavior: B,
}

impl<B: GestureBehavior> GestureHandler<B> {
    pub fn install(
        filter: &mut PlotFilter,
        start_state: StateId,
        behavior: B,
    ) -> Rc<RefCell<Self>> {
        let kind = behavior.kind();
        let handler = Rc::new(RefCell::new(Self {
            start_state,
            state0: start_state,
            state1: start_state,
            behavior,
        }));
        let on = |phase| EventMatch::gesture(kind, phase);

        let state0 = filter.register_transition(
            start_state,
            on(GesturePhase::Started),
            Self::hook(&handler, B::start_tracking),
            None,
        );
        let state1 = filter.register_transition(
            state0,
            on(GesturePhase::Updated),
            Self::hook(&handler, B::update),
            None,
        );
        filter.register_transition(
            state1,
            on(GesturePhase::Updated),
            Self::hook(&handler, B::update),
            Some(state1),
        );
        for state in [state0, state1] {
            for phase in [GesturePhase::Finished, GesturePhase::Canceled] {
                filter.register_transition(
                    state,
                    on(phase),
                    Self::hook(&handler, B::stop_tracking),
                    Some(start_state),
                );
            }
        }

        {
            let mut h = handler.borrow_mut();
            h.state0 = state0;
            h.state1 = state1;
        }
        handler
    }

    fn hook(
        handler: &Rc<RefCell<Self>>,
        step: Step<B>,
    ) -> impl Fn(&mut PlotFilter, &mut Plot, &Event) + 'static {
        let handler = Rc::clone(handler);
        move |filter: &mut PlotFilter, plot: &mut Plot, event: &Event| {
            if let Some(gesture) = event.gesture {
                step(&mut handler.borrow_mut().behavior, filter, plot, &gesture);
            }
        }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }
}

/// Two-finger pinch: the hotspot pans, the scale zooms about it.
///
/// Each update's scale is clamped so a noisy frame cannot jump the view.
#[derive(Clone, Debug)]
pub struct PinchPan {
    scale_min: f32,
    scale_max: f32,
    lock_aspect_ratio: bool,
    marker: Option<ItemId>,
    start: Option<Point>,
    last: Option<Point>,
}

impl PinchPan {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            scale_min: config.pinch_scale_min,
            scale_max: config.pinch_scale_max,
            lock_aspect_ratio: config.lock_aspect_ratio_on_pinch,
            marker: None,
            start: None,
            last: None,
        }
    }

    /// Hotspot marker shown while the gesture is active
    pub fn marker(&self) -> Option<ItemId> {
        self.marker
    }

    fn clear(&mut self, plot: &mut Plot) {
        if let Some(marker) = self.marker.take() {
            plot.remove_item(marker);
        }
        self.start = None;
        self.last = None;
    }
}

impl GestureBehavior for PinchPan {
    fn kind(&self) -> GestureKind {
        GestureKind::Pinch
    }

    fn start_tracking(&mut self, _: &mut PlotFilter, plot: &mut Plot, gesture: &GestureData) {
        self.clear(plot);
        let hotspot = gesture.hotspot;
        let marker = Shape::marker(plot.canvas_to_axes(hotspot))
            .with_caps(Capabilities::LOCKED)
            .with_z(plot.max_z() + 1);
        self.marker = Some(plot.add_item(marker));
        self.start = Some(hotspot);
        self.last = Some(hotspot);
    }

    fn update(&mut self, _: &mut PlotFilter, plot: &mut Plot, gesture: &GestureData) {
        let (Some(start), Some(last)) = (self.start, self.last) else {
            return;
        };
        let pos = gesture.hotspot;
        let factor = gesture.scale_factor.clamp(self.scale_min, self.scale_max) - 1.0;
        let size = plot.contents_size();
        self.last = Some(pos);

        plot.pan_view(
            AxisDrag::new(pos.x, last.x, start.x, size.width),
            AxisDrag::new(pos.y, last.y, start.y, size.height),
        );
        let (dx, dy) = zoom_about(pos, size.width, size.height, factor);
        plot.zoom_view(dx, dy, Some(self.lock_aspect_ratio));
        plot.replot();
    }

    fn stop_tracking(&mut self, _: &mut PlotFilter, plot: &mut Plot, _: &GestureData) {
        self.clear(plot);
        plot.replot();
    }
}

/// Drag parameters zooming in by `factor` of the extent about `pos`.
///
/// Negative factors zoom out.
pub(crate) fn zoom_about(pos: Point, width: f32, height: f32, factor: f32) -> (AxisDrag, AxisDrag) {
    (
        AxisDrag::new(pos.x + width * factor, pos.x, pos.x, width),
        AxisDrag::new(pos.y - height * factor, pos.y, pos.y, height),
    )
}

pub type PinchPanHandler = GestureHandler<PinchPan>;
