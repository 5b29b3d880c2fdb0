//! One-shot tools

use std::fmt;

use crate::surface::Plot;
use crate::tools::CommandTool;

/// Fit the view to the visible items
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoscaleTool;

impl CommandTool for AutoscaleTool {
    fn title(&self) -> &str {
        "Autoscale"
    }

    fn activate_command(&mut self, plot: &mut Plot) {
        plot.autoscale();
        plot.replot();
    }
}

/// Remove the selected items that can be selected
#[derive(Clone, Copy, Debug, Default)]
pub struct DeleteItemTool;

impl CommandTool for DeleteItemTool {
    fn title(&self) -> &str {
        "Remove"
    }

    fn activate_command(&mut self, plot: &mut Plot) {
        let doomed: Vec<_> = plot
            .selected_items()
            .into_iter()
            .filter(|id| plot.can_select(*id))
            .collect();
        if doomed.is_empty() {
            return;
        }
        for id in doomed {
            plot.remove_item(id);
        }
        plot.replot();
    }
}

/// Command backed by a closure
pub struct ActionTool {
    title: String,
    action: Box<dyn FnMut(&mut Plot)>,
}

impl fmt::Debug for ActionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTool")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl ActionTool {
    pub fn new<F>(title: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut Plot) + 'static,
    {
        Self {
            title: title.into(),
            action: Box::new(action),
        }
    }
}

impl CommandTool for ActionTool {
    fn title(&self) -> &str {
        &self.title
    }

    fn activate_command(&mut self, plot: &mut Plot) {
        (self.action)(plot);
    }
}
