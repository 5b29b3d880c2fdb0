//! Plume Interaction Tools
//!
//! Gesture handlers, modal tools and edit history on top of the
//! `plume_core` event filter.
//!
//! # Features
//!
//! - **Plot Surfaces**: The [`PlotSurface`] trait, plus [`Canvas`], an
//!   in-memory surface with a generational item arena
//! - **Handlers**: Pan, zoom, click, rubber-band, polyline entry, object
//!   editing and pinch gestures
//! - **Tools**: Mutually exclusive interactive tools and one-shot commands
//!   managed per plot by [`PlotManager`]
//! - **Undo/Redo**: Linear history of geometric edits that tolerates removed
//!   items
//!
//! # Example
//!
//! ```rust
//! use plume_core::{Event, MouseButton, MouseButtons, Point, Size};
//! use plume_interact::{Canvas, PlotManager, PlotSurface, SelectTool, Shape};
//!
//! let mut canvas = Canvas::new(Size::new(100.0, 100.0));
//! let square = canvas.add_item(Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 30.0)));
//!
//! let mut manager = PlotManager::default();
//! manager.add_tool(SelectTool::default());
//! let plot = manager.add_plot(Box::new(canvas));
//!
//! // Drag the square 10 pixels to the right
//! let held: MouseButtons = MouseButton::Left.into();
//! for event in [
//!     Event::pointer_down(Point::new(20.0, 80.0), MouseButton::Left),
//!     Event::pointer_move(Point::new(30.0, 80.0), held),
//!     Event::pointer_up(Point::new(30.0, 80.0), MouseButton::Left),
//! ] {
//!     manager.dispatch(plot, &event).unwrap();
//! }
//!
//! let center = manager.plot(plot).unwrap().item(square).unwrap().center();
//! assert!(center.distance(Point::new(30.0, 20.0)) < 1e-3);
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod handlers;
pub mod shape;
pub mod surface;
pub mod tools;
pub mod undo;
pub mod view;

pub use canvas::Canvas;
pub use config::InteractionConfig;
pub use error::{Result, ToolError};
pub use shape::{Capabilities, Shape, ShapeKind};
pub use surface::{HitTest, ItemId, Plot, PlotFilter, PlotNotification, PlotSurface};
pub use tools::{
    ActionTool, AutoscaleTool, CommandTool, DeleteItemTool, FinalShape, InteractiveTool,
    MultiLineTool, PlotId, PlotManager, RectZoomTool, RectangularActionTool, SelectTool,
    ToolContext, ToolEvent, ToolId, ToolSignal,
};
pub use undo::{EditKind, UndoAction, UndoStack};
pub use view::{AxisDrag, Domain1D, Domain2D, PlotView};
