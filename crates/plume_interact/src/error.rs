//! Tool layer errors

use thiserror::Error;

use crate::tools::{PlotId, ToolId};

/// Errors returned by [`PlotManager`](crate::tools::PlotManager) lookups
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolError {
    /// Plot was removed or never added
    #[error("Unknown plot: {0:?}")]
    UnknownPlot(PlotId),

    /// Tool was never added to this manager
    #[error("Unknown tool: {0:?}")]
    UnknownTool(ToolId),

    /// Tool exists but is not a command tool
    #[error("Tool {0:?} is not a command tool")]
    NotACommand(ToolId),

    /// Tool exists but is not interactive
    #[error("Tool {0:?} is not an interactive tool")]
    NotInteractive(ToolId),

    /// No plot to run a command against
    #[error("No active plot")]
    NoActivePlot,
}

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;
