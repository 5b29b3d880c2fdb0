//! Plot surface collaborator
//!
//! Handlers and undo entries never own plot items. They hold an [`ItemId`], a
//! generational key into the surface's item arena, and resolve it on every
//! access; a removed item simply resolves to `None`.

use plume_core::{EventFilter, FilterHost, Modifiers, Point, Size};
use slotmap::new_key_type;

use crate::shape::Shape;
use crate::view::AxisDrag;

new_key_type! {
    /// Weak handle to an item owned by a plot surface
    pub struct ItemId;
}

/// A plot surface as seen by handlers and tools
pub type Plot = dyn PlotSurface;

/// Dispatcher installed on a plot surface
pub type PlotFilter = EventFilter<Plot>;

/// Result of testing a surface position against an item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTest {
    /// Distance in pixels to the item outline
    pub distance: f32,
    /// Nearest control point
    pub handle: Option<usize>,
    /// Position lies strictly inside the item
    pub inside: bool,
    /// Item to treat as hit instead of this one
    pub other: Option<ItemId>,
}

impl HitTest {
    pub fn miss() -> Self {
        Self {
            distance: f32::MAX,
            handle: None,
            inside: false,
            other: None,
        }
    }
}

/// Change reported by a surface to its host application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotNotification {
    SelectionChanged,
    ActiveItemChanged(Option<ItemId>),
    AxesChanged,
    ItemRemoved(ItemId),
    ContextMenuRequested { x: i32, y: i32 },
}

/// Everything the interaction layer needs from a plot.
///
/// Geometry edit operations take surface (pixel) positions; implementations
/// convert through the current view transform.
pub trait PlotSurface: FilterHost {
    // Items

    fn add_item(&mut self, shape: Shape) -> ItemId;
    fn remove_item(&mut self, id: ItemId) -> Option<Shape>;
    fn item(&self, id: ItemId) -> Option<&Shape>;
    fn item_mut(&mut self, id: ItemId) -> Option<&mut Shape>;

    /// All items, topmost first
    fn items_z_sorted(&self) -> Vec<ItemId>;

    fn contains_item(&self, id: ItemId) -> bool {
        self.item(id).is_some()
    }

    fn max_z(&self) -> i32 {
        self.items_z_sorted()
            .first()
            .and_then(|id| self.item(*id))
            .map_or(0, |s| s.z)
    }

    fn can_select(&self, id: ItemId) -> bool {
        self.item(id).is_some_and(|s| s.caps.selectable)
    }

    fn can_move(&self, id: ItemId) -> bool {
        self.item(id).is_some_and(|s| s.caps.movable)
    }

    fn can_resize(&self, id: ItemId) -> bool {
        self.item(id).is_some_and(|s| s.caps.resizable)
    }

    fn can_rotate(&self, id: ItemId) -> bool {
        self.item(id).is_some_and(|s| s.caps.rotatable)
    }

    // Selection

    fn selected_items(&self) -> Vec<ItemId>;
    fn is_selected(&self, id: ItemId) -> bool;
    fn select_item(&mut self, id: ItemId);
    fn unselect_item(&mut self, id: ItemId);
    /// Clears the selection and the active item
    fn unselect_all(&mut self);
    fn active_item(&self) -> Option<ItemId>;
    fn set_active_item(&mut self, id: Option<ItemId>);

    fn select_all(&mut self) {
        for id in self.items_z_sorted() {
            if self.can_select(id) && self.item(id).is_some_and(|s| s.visible) {
                self.select_item(id);
            }
        }
    }

    // Transforms

    /// Size of the drawable contents in pixels
    fn contents_size(&self) -> Size;
    fn canvas_to_axes(&self, pos: Point) -> Point;
    fn axes_to_canvas(&self, pos: Point) -> Point;

    // Hit testing

    fn hit_test(&self, id: ItemId, pos: Point) -> Option<HitTest> {
        let shape = self.item(id)?;
        Some(shape.hit_test(pos, |p| self.axes_to_canvas(p)))
    }

    /// Topmost visible selectable item, stopping at the first one closer
    /// than `close_dist`; otherwise the closest overall.
    fn nearest_object(&self, pos: Point, close_dist: f32) -> Option<(ItemId, HitTest)> {
        let mut best: Option<(ItemId, HitTest)> = None;
        for id in self.items_z_sorted() {
            if !self.can_select(id) || !self.item(id).is_some_and(|s| s.visible) {
                continue;
            }
            let Some(hit) = self.hit_test(id, pos) else {
                continue;
            };
            if best.map_or(true, |(_, b)| hit.distance < b.distance) {
                best = Some((id, hit));
            }
            if hit.distance < close_dist {
                break;
            }
        }
        best
    }

    /// Topmost visible item strictly containing `pos`
    fn nearest_object_in_z(&self, pos: Point) -> Option<(ItemId, HitTest)> {
        self.items_z_sorted().into_iter().find_map(|id| {
            if !self.item(id).is_some_and(|s| s.visible) {
                return None;
            }
            self.hit_test(id, pos)
                .filter(|hit| hit.inside)
                .map(|hit| (id, hit))
        })
    }

    // Geometry edits

    fn move_point(&mut self, id: ItemId, handle: usize, pos: Point, ctrl: bool) -> bool {
        let target = self.canvas_to_axes(pos);
        match self.item_mut(id) {
            Some(shape) => {
                shape.move_point_to(handle, target, ctrl);
                true
            }
            None => false,
        }
    }

    fn move_shape(&mut self, id: ItemId, from: Point, to: Point) -> bool {
        let (old, new) = (self.canvas_to_axes(from), self.canvas_to_axes(to));
        match self.item_mut(id) {
            Some(shape) => {
                shape.move_shape(old, new);
                true
            }
            None => false,
        }
    }

    /// Rotate about the item center by the angle swept from `from` to `to`
    fn rotate_shape(&mut self, id: ItemId, from: Point, to: Point) -> bool {
        let Some(shape) = self.item(id) else {
            return false;
        };
        let center = self.axes_to_canvas(shape.center());
        let a0 = (from.y - center.y).atan2(from.x - center.x);
        let a1 = (to.y - center.y).atan2(to.x - center.x);
        self.rotate_shape_by(id, a1 - a0)
    }

    /// Rotate about the item center by `angle` radians in surface space
    fn rotate_shape_by(&mut self, id: ItemId, angle: f32) -> bool;

    // View

    fn pan_view(&mut self, dx: AxisDrag, dy: AxisDrag);
    fn zoom_view(&mut self, dx: AxisDrag, dy: AxisDrag, lock_aspect_ratio: Option<bool>);
    fn zoom_rect_view(&mut self, p0: Point, p1: Point);
    fn autoscale(&mut self);

    /// Hover readout at `pos`
    fn move_marker(&mut self, _pos: Point, _modifiers: Modifiers) {}

    fn context_menu(&mut self, _pos: Point) {}

    fn replot(&mut self);
}
