//! Plot and tool registry

use std::cell::RefCell;
use std::rc::Rc;

use plume_core::{Event, StateId};
use slotmap::{SecondaryMap, SlotMap};

use crate::config::InteractionConfig;
use crate::error::{Result, ToolError};
use crate::surface::{Plot, PlotFilter, PlotSurface};
use crate::tools::{
    CommandTool, InteractiveTool, PlotId, SignalQueue, ToolContext, ToolId, ToolSignal,
};

/// Notification for the host application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolEvent {
    Activated(ToolId),
    Deactivated(ToolId),
    JobFinished(ToolId),
    Validated { tool: ToolId, plot: PlotId },
    CommandRun(ToolId),
}

struct PlotSlot {
    surface: Box<dyn PlotSurface>,
    filter: PlotFilter,
}

enum ToolSlot {
    Interactive {
        tool: Box<dyn InteractiveTool>,
        start_states: SecondaryMap<PlotId, StateId>,
    },
    Command(Box<dyn CommandTool>),
}

impl ToolSlot {
    fn title(&self) -> &str {
        match self {
            ToolSlot::Interactive { tool, .. } => tool.title(),
            ToolSlot::Command(tool) => tool.title(),
        }
    }
}

/// Owns plot surfaces together with their filters, and the tools wired into
/// them.
///
/// The first interactive tool added becomes the default tool and is
/// activated right away.
pub struct PlotManager {
    plots: SlotMap<PlotId, PlotSlot>,
    tools: SlotMap<ToolId, ToolSlot>,
    order: Vec<ToolId>,
    default_tool: Option<ToolId>,
    active_tool: Option<ToolId>,
    active_plot: Option<PlotId>,
    config: Rc<InteractionConfig>,
    signals: SignalQueue,
    events: Vec<ToolEvent>,
}

impl Default for PlotManager {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl PlotManager {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            plots: SlotMap::with_key(),
            tools: SlotMap::with_key(),
            order: Vec::new(),
            default_tool: None,
            active_tool: None,
            active_plot: None,
            config: Rc::new(config),
            signals: Rc::new(RefCell::new(Default::default())),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    // =========================================================================
    // Plots
    // =========================================================================

    /// Register a plot surface. Every tool is wired into its new filter and
    /// the filter starts in the active tool's start state.
    pub fn add_plot(&mut self, surface: Box<dyn PlotSurface>) -> PlotId {
        let plot = self.plots.insert(PlotSlot {
            surface,
            filter: PlotFilter::new(),
        });
        for tool in self.order.clone() {
            self.register(tool, plot);
        }
        if let Some(active) = self.active_tool {
            self.enter_start_state(active, plot);
        }
        if self.active_plot.is_none() {
            self.active_plot = Some(plot);
        }
        tracing::debug!(?plot, "plot added");
        plot
    }

    pub fn remove_plot(&mut self, plot: PlotId) -> Result<Box<dyn PlotSurface>> {
        let slot = self.plots.remove(plot).ok_or(ToolError::UnknownPlot(plot))?;
        for tool in self.tools.values_mut() {
            if let ToolSlot::Interactive { start_states, .. } = tool {
                start_states.remove(plot);
            }
        }
        if self.active_plot == Some(plot) {
            self.active_plot = self.plots.keys().next();
        }
        Ok(slot.surface)
    }

    pub fn plot(&self, plot: PlotId) -> Option<&Plot> {
        self.plots.get(plot).map(|slot| slot.surface.as_ref())
    }

    pub fn plot_mut(&mut self, plot: PlotId) -> Option<&mut Plot> {
        self.plots.get_mut(plot).map(|slot| slot.surface.as_mut())
    }

    pub fn filter(&self, plot: PlotId) -> Option<&PlotFilter> {
        self.plots.get(plot).map(|slot| &slot.filter)
    }

    /// Plot that received the most recent event
    pub fn active_plot(&self) -> Option<PlotId> {
        self.active_plot
    }

    pub fn plot_ids(&self) -> impl Iterator<Item = PlotId> + '_ {
        self.plots.keys()
    }

    // =========================================================================
    // Tools
    // =========================================================================

    pub fn add_tool(&mut self, tool: impl InteractiveTool + 'static) -> ToolId {
        let id = self.tools.insert(ToolSlot::Interactive {
            tool: Box::new(tool),
            start_states: SecondaryMap::new(),
        });
        self.order.push(id);
        let plots: Vec<PlotId> = self.plots.keys().collect();
        for plot in plots {
            self.register(id, plot);
        }
        if self.default_tool.is_none() {
            self.default_tool = Some(id);
            self.activate_interactive(id);
        }
        id
    }

    pub fn add_command(&mut self, tool: impl CommandTool + 'static) -> ToolId {
        let id = self.tools.insert(ToolSlot::Command(Box::new(tool)));
        self.order.push(id);
        id
    }

    pub fn title(&self, tool: ToolId) -> Option<&str> {
        self.tools.get(tool).map(ToolSlot::title)
    }

    /// Tools in registration order
    pub fn tool_ids(&self) -> &[ToolId] {
        &self.order
    }

    pub fn default_tool(&self) -> Option<ToolId> {
        self.default_tool
    }

    pub fn set_default_tool(&mut self, tool: ToolId) -> Result<()> {
        self.ensure_interactive(tool)?;
        self.default_tool = Some(tool);
        Ok(())
    }

    pub fn active_tool(&self) -> Option<ToolId> {
        self.active_tool
    }

    pub fn is_active(&self, tool: ToolId) -> bool {
        self.active_tool == Some(tool)
    }

    /// Start state of `tool` in the filter of `plot`
    pub fn start_state(&self, tool: ToolId, plot: PlotId) -> Option<StateId> {
        match self.tools.get(tool)? {
            ToolSlot::Interactive { start_states, .. } => start_states.get(plot).copied(),
            ToolSlot::Command(_) => None,
        }
    }

    /// Make `tool` the active interactive tool, resetting every plot's
    /// filter to the tool's start state. Any gesture in progress is dropped.
    pub fn activate(&mut self, tool: ToolId) -> Result<()> {
        self.ensure_interactive(tool)?;
        self.activate_interactive(tool);
        Ok(())
    }

    /// Run a command tool against the active plot
    pub fn trigger_command(&mut self, tool: ToolId) -> Result<()> {
        self.ensure_command(tool)?;
        let plot = self.active_plot.ok_or(ToolError::NoActivePlot)?;
        let Some(ToolSlot::Command(command)) = self.tools.get_mut(tool) else {
            return Err(ToolError::NotACommand(tool));
        };
        let slot = self.plots.get_mut(plot).ok_or(ToolError::UnknownPlot(plot))?;
        tracing::debug!(tool = command.title(), ?plot, "running command");
        command.activate_command(slot.surface.as_mut());
        self.events.push(ToolEvent::CommandRun(tool));
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Feed one input event to `plot` and act on the signals it raised
    pub fn dispatch(&mut self, plot: PlotId, event: &Event) -> Result<()> {
        let slot = self.plots.get_mut(plot).ok_or(ToolError::UnknownPlot(plot))?;
        self.active_plot = Some(plot);
        slot.filter.dispatch(slot.surface.as_mut(), event);
        self.process_signals();
        Ok(())
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }

    fn next_signal(&self) -> Option<ToolSignal> {
        self.signals.borrow_mut().pop_front()
    }

    fn process_signals(&mut self) {
        while let Some(signal) = self.next_signal() {
            match signal {
                ToolSignal::Validate { tool, plot } => {
                    tracing::debug!(?tool, ?plot, "selection validated");
                    self.events.push(ToolEvent::Validated { tool, plot });
                }
                ToolSignal::JobFinished(tool) => {
                    tracing::debug!(?tool, "tool job finished");
                    self.events.push(ToolEvent::JobFinished(tool));
                    let switch = matches!(
                        self.tools.get(tool),
                        Some(ToolSlot::Interactive { tool: t, .. }) if t.switch_to_default_on_finish()
                    );
                    if let (true, Some(default)) = (switch, self.default_tool) {
                        if self.active_tool != Some(default) {
                            self.activate_interactive(default);
                        }
                    }
                }
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn register(&mut self, tool: ToolId, plot: PlotId) {
        let (Some(ToolSlot::Interactive { tool: t, start_states }), Some(slot)) =
            (self.tools.get_mut(tool), self.plots.get_mut(plot))
        else {
            return;
        };
        let ctx = ToolContext::new(tool, plot, Rc::clone(&self.config), Rc::clone(&self.signals));
        let start = t.setup_filter(&mut slot.filter, &ctx);
        slot.filter.bind_cursor(t.cursor(), [start]);
        start_states.insert(plot, start);
        tracing::trace!(title = t.title(), ?plot, start, "tool registered");
    }

    fn enter_start_state(&mut self, tool: ToolId, plot: PlotId) {
        let (Some(ToolSlot::Interactive { start_states, .. }), Some(slot)) =
            (self.tools.get(tool), self.plots.get_mut(plot))
        else {
            return;
        };
        if let Some(start) = start_states.get(plot) {
            slot.filter.transition_to(*start, slot.surface.as_mut());
        }
    }

    fn activate_interactive(&mut self, tool: ToolId) {
        let plots: Vec<PlotId> = self.plots.keys().collect();
        for plot in plots {
            self.enter_start_state(tool, plot);
        }
        let previous = self.active_tool.replace(tool);
        if let Some(previous) = previous.filter(|p| *p != tool) {
            self.events.push(ToolEvent::Deactivated(previous));
        }
        tracing::debug!(?tool, "tool activated");
        self.events.push(ToolEvent::Activated(tool));
    }

    fn ensure_interactive(&self, tool: ToolId) -> Result<()> {
        match self.tools.get(tool) {
            Some(ToolSlot::Interactive { .. }) => Ok(()),
            Some(ToolSlot::Command(_)) => Err(ToolError::NotInteractive(tool)),
            None => Err(ToolError::UnknownTool(tool)),
        }
    }

    fn ensure_command(&self, tool: ToolId) -> Result<()> {
        match self.tools.get(tool) {
            Some(ToolSlot::Command(_)) => Ok(()),
            Some(ToolSlot::Interactive { .. }) => Err(ToolError::NotACommand(tool)),
            None => Err(ToolError::UnknownTool(tool)),
        }
    }
}
