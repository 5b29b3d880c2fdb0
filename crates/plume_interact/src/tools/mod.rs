//! Tools
//!
//! A tool is a user-facing mode. Interactive tools wire handlers into every
//! plot's [`PlotFilter`] from a start state of their own, and only one of them
//! is active at a time: activation moves every plot's filter to that tool's
//! start state. Command tools run once against the active plot and never take
//! part in that exclusion.
//!
//! Handler callbacks cannot reach the [`PlotManager`] that owns them, so they
//! report through a [`ToolContext`] instead. Signals queue up during dispatch
//! and the manager drains them once the event has been handled.

mod command;
mod manager;
mod multiline;
mod rect;
mod select;

pub use command::{ActionTool, AutoscaleTool, DeleteItemTool};
pub use manager::{PlotManager, ToolEvent};
pub use multiline::MultiLineTool;
pub use rect::{FinalShape, RectZoomTool, RectangularActionTool};
pub use select::SelectTool;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use plume_core::{CursorShape, StateId};
use slotmap::new_key_type;

use crate::config::InteractionConfig;
use crate::surface::{Plot, PlotFilter};

new_key_type! {
    /// Handle to a plot registered with a [`PlotManager`]
    pub struct PlotId;

    /// Handle to a tool registered with a [`PlotManager`]
    pub struct ToolId;
}

/// Request raised from inside a handler callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolSignal {
    /// The tool finished one unit of work, such as drawing a shape
    JobFinished(ToolId),
    /// The user confirmed the current selection
    Validate { tool: ToolId, plot: PlotId },
}

type SignalQueue = Rc<RefCell<VecDeque<ToolSignal>>>;

/// What a tool's callbacks know about where they are installed
#[derive(Clone, Debug)]
pub struct ToolContext {
    tool: ToolId,
    plot: PlotId,
    config: Rc<InteractionConfig>,
    signals: SignalQueue,
}

impl ToolContext {
    pub(crate) fn new(
        tool: ToolId,
        plot: PlotId,
        config: Rc<InteractionConfig>,
        signals: SignalQueue,
    ) -> Self {
        Self {
            tool,
            plot,
            config,
            signals,
        }
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn plot(&self) -> PlotId {
        self.plot
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn job_finished(&self) {
        self.signals
            .borrow_mut()
            .push_back(ToolSignal::JobFinished(self.tool));
    }

    pub fn validate(&self) {
        self.signals.borrow_mut().push_back(ToolSignal::Validate {
            tool: self.tool,
            plot: self.plot,
        });
    }
}

/// A modal tool.
///
/// [`setup_filter`](InteractiveTool::setup_filter) runs once per plot the
/// tool is registered on. Everything the installed callbacks need must be
/// captured at that point.
pub trait InteractiveTool {
    fn title(&self) -> &str;

    /// Cursor shown while the tool is idle
    fn cursor(&self) -> CursorShape {
        CursorShape::Arrow
    }

    /// Return to the default tool once a job finishes
    fn switch_to_default_on_finish(&self) -> bool {
        false
    }

    /// Install this tool's handlers and return its start state
    fn setup_filter(&mut self, filter: &mut PlotFilter, ctx: &ToolContext) -> StateId;
}

/// A one-shot action on the active plot
pub trait CommandTool {
    fn title(&self) -> &str;

    fn activate_command(&mut self, plot: &mut Plot);
}
