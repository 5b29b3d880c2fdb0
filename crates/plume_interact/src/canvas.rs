//! In-memory plot surface
//!
//! `Canvas` keeps items in a slot arena and tracks selection, view limits and
//! redraw requests without drawing anything. Hosts embed it (or their own
//! [`PlotSurface`]) and read back notifications after each event.

use plume_core::{CursorShape, FilterHost, Modifiers, Point, Rect, Size};
use slotmap::SlotMap;

use crate::shape::Shape;
use crate::surface::{ItemId, PlotNotification, PlotSurface};
use crate::view::{AxisDrag, Domain1D, Domain2D, PlotView};

pub struct Canvas {
    size: Size,
    view: PlotView,
    items: SlotMap<ItemId, Shape>,
    /// Insertion order; later items draw above earlier ones at equal z
    order: Vec<ItemId>,
    selected: Vec<ItemId>,
    active: Option<ItemId>,
    cursor: CursorShape,
    lock_aspect_ratio: bool,
    marker: Option<Point>,
    redraws: u64,
    notifications: Vec<PlotNotification>,
}

impl Canvas {
    /// Canvas whose data domain initially matches its pixel size
    pub fn new(size: Size) -> Self {
        let domain = Domain2D::new(
            Domain1D::new(0.0, size.width),
            Domain1D::new(0.0, size.height),
        );
        Self::with_view(size, PlotView::new(domain))
    }

    pub fn with_view(size: Size, view: PlotView) -> Self {
        Self {
            size,
            view,
            items: SlotMap::with_key(),
            order: Vec::new(),
            selected: Vec::new(),
            active: None,
            cursor: CursorShape::default(),
            lock_aspect_ratio: false,
            marker: None,
            redraws: 0,
            notifications: Vec::new(),
        }
    }

    pub fn view(&self) -> &PlotView {
        &self.view
    }

    pub fn set_view(&mut self, view: PlotView) {
        self.view = view;
        self.notify(PlotNotification::AxesChanged);
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn set_lock_aspect_ratio(&mut self, lock: bool) {
        self.lock_aspect_ratio = lock;
    }

    /// Last hover position reported through `move_marker`, in data units
    pub fn marker(&self) -> Option<Point> {
        self.marker
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn take_notifications(&mut self) -> Vec<PlotNotification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: PlotNotification) {
        self.notifications.push(notification);
    }

    fn plot_rect(&self) -> Rect {
        self.view.plot_rect(self.size)
    }
}

impl FilterHost for Canvas {
    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }
}

impl PlotSurface for Canvas {
    fn add_item(&mut self, shape: Shape) -> ItemId {
        let id = self.items.insert(shape);
        self.order.push(id);
        id
    }

    fn remove_item(&mut self, id: ItemId) -> Option<Shape> {
        let shape = self.items.remove(id)?;
        self.order.retain(|i| *i != id);
        if self.selected.contains(&id) {
            self.selected.retain(|i| *i != id);
            self.notify(PlotNotification::SelectionChanged);
        }
        if self.active == Some(id) {
            self.set_active_item(None);
        }
        self.notify(PlotNotification::ItemRemoved(id));
        Some(shape)
    }

    fn item(&self, id: ItemId) -> Option<&Shape> {
        self.items.get(id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Shape> {
        self.items.get_mut(id)
    }

    fn items_z_sorted(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.order.iter().rev().copied().collect();
        // stable: ties keep most recent first
        ids.sort_by_key(|id| {
            let z = self.items.get(*id).map_or(i32::MIN, |s| s.z);
            std::cmp::Reverse(z)
        });
        ids
    }

    fn selected_items(&self) -> Vec<ItemId> {
        self.selected.clone()
    }

    fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    fn select_item(&mut self, id: ItemId) {
        if self.items.contains_key(id) && !self.selected.contains(&id) {
            self.selected.push(id);
            self.notify(PlotNotification::SelectionChanged);
        }
    }

    fn unselect_item(&mut self, id: ItemId) {
        if self.selected.contains(&id) {
            self.selected.retain(|i| *i != id);
            self.notify(PlotNotification::SelectionChanged);
        }
    }

    fn unselect_all(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify(PlotNotification::SelectionChanged);
        }
        self.set_active_item(None);
    }

    fn active_item(&self) -> Option<ItemId> {
        self.active.filter(|id| self.items.contains_key(*id))
    }

    fn set_active_item(&mut self, id: Option<ItemId>) {
        let id = id.filter(|id| self.items.contains_key(*id));
        if self.active != id {
            self.active = id;
            self.notify(PlotNotification::ActiveItemChanged(id));
        }
    }

    fn contents_size(&self) -> Size {
        self.plot_rect().size
    }

    fn canvas_to_axes(&self, pos: Point) -> Point {
        self.view.px_to_data(pos, self.plot_rect())
    }

    fn axes_to_canvas(&self, pos: Point) -> Point {
        self.view.data_to_px(pos, self.plot_rect())
    }

    fn rotate_shape_by(&mut self, id: ItemId, angle: f32) -> bool {
        let (view, rect) = (self.view, self.plot_rect());
        match self.items.get_mut(id) {
            Some(shape) => {
                shape.rotate_local(
                    angle,
                    |p| view.data_to_px(p, rect),
                    |p| view.px_to_data(p, rect),
                );
                true
            }
            None => false,
        }
    }

    fn pan_view(&mut self, dx: AxisDrag, dy: AxisDrag) {
        let rect = self.plot_rect();
        self.view
            .pan(dx.current - dx.last, dy.current - dy.last, rect);
        self.notify(PlotNotification::AxesChanged);
    }

    fn zoom_view(&mut self, dx: AxisDrag, dy: AxisDrag, lock_aspect_ratio: Option<bool>) {
        let rect = self.plot_rect();
        let lock = lock_aspect_ratio.unwrap_or(self.lock_aspect_ratio);
        self.view.zoom(dx, dy, lock, rect);
        self.notify(PlotNotification::AxesChanged);
    }

    fn zoom_rect_view(&mut self, p0: Point, p1: Point) {
        let rect = self.plot_rect();
        self.view.zoom_rect(p0, p1, rect);
        self.notify(PlotNotification::AxesChanged);
    }

    fn autoscale(&mut self) {
        let mut bounds: Option<(Point, Point)> = None;
        for shape in self.items.values().filter(|s| s.visible) {
            for p in shape.points() {
                bounds = Some(match bounds {
                    None => (*p, *p),
                    Some((lo, hi)) => (
                        Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                        Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                    ),
                });
            }
        }
        let Some((lo, hi)) = bounds else {
            return;
        };
        self.view.domain.x.fit(lo.x, hi.x);
        self.view.domain.y.fit(lo.y, hi.y);
        self.notify(PlotNotification::AxesChanged);
    }

    fn move_marker(&mut self, pos: Point, _modifiers: Modifiers) {
        self.marker = Some(self.canvas_to_axes(pos));
    }

    fn context_menu(&mut self, pos: Point) {
        self.notify(PlotNotification::ContextMenuRequested {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        });
    }

    fn replot(&mut self) {
        self.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(Size::new(100.0, 100.0))
    }

    #[test]
    fn removed_item_resolves_to_none() {
        let mut c = canvas();
        let id = c.add_item(Shape::marker(Point::new(1.0, 1.0)));
        c.select_item(id);
        c.set_active_item(Some(id));
        assert!(c.remove_item(id).is_some());
        assert!(c.item(id).is_none());
        assert!(c.selected_items().is_empty());
        assert_eq!(c.active_item(), None);

        // A new item reusing the slot gets a different generation.
        let other = c.add_item(Shape::marker(Point::new(2.0, 2.0)));
        assert_ne!(id, other);
        assert!(!c.contains_item(id));
    }

    #[test]
    fn z_order_prefers_higher_z_then_most_recent() {
        let mut c = canvas();
        let low = c.add_item(Shape::marker(Point::ZERO).with_z(-1));
        let a = c.add_item(Shape::marker(Point::ZERO));
        let b = c.add_item(Shape::marker(Point::ZERO));
        let top = c.add_item(Shape::marker(Point::ZERO).with_z(5));
        assert_eq!(c.items_z_sorted(), vec![top, b, a, low]);
        assert_eq!(c.max_z(), 5);
    }

    #[test]
    fn nearest_object_stops_at_close_hit() {
        let mut c = canvas();
        // y is flipped: data y=90 sits at pixel y=10
        let far = c.add_item(Shape::marker(Point::new(50.0, 50.0)));
        let near = c.add_item(Shape::marker(Point::new(10.0, 90.0)));
        let (id, hit) = c.nearest_object(Point::new(12.0, 10.0), 6.0).unwrap();
        assert_eq!(id, near);
        assert!((hit.distance - 2.0).abs() < 1e-4);

        let (id, _) = c.nearest_object(Point::new(52.0, 50.0), 6.0).unwrap();
        assert_eq!(id, far);
    }

    #[test]
    fn nearest_in_z_requires_containment() {
        let mut c = canvas();
        let r = c.add_item(Shape::rectangle(Point::new(20.0, 20.0), Point::new(80.0, 80.0)));
        assert_eq!(c.nearest_object_in_z(Point::new(50.0, 50.0)).map(|h| h.0), Some(r));
        assert!(c.nearest_object_in_z(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn move_shape_uses_surface_positions() {
        let mut c = canvas();
        let id = c.add_item(Shape::marker(Point::new(10.0, 10.0)));
        assert!(c.move_shape(id, Point::new(0.0, 0.0), Point::new(5.0, 5.0)));
        // +5 px down is -5 in data y
        assert_eq!(c.item(id).unwrap().points()[0], Point::new(15.0, 5.0));
    }

    #[test]
    fn autoscale_fits_visible_items() {
        let mut c = canvas();
        c.add_item(Shape::segment(Point::new(10.0, 20.0), Point::new(30.0, 20.0)));
        c.autoscale();
        let d = c.view().domain;
        assert!((d.x.min - 9.96).abs() < 1e-4);
        assert_eq!(d.y, Domain1D::new(19.0, 21.0));
        assert!(c.take_notifications().contains(&PlotNotification::AxesChanged));
    }
}
