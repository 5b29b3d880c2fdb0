use plume_core::{Point, Rect, Size};

/// 1D numeric domain (min..max).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain1D {
    pub min: f32,
    pub max: f32,
}

impl Domain1D {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }

    pub fn pan_by(&mut self, delta: f32) {
        self.min += delta;
        self.max += delta;
    }

    /// Scale the domain about `origin` (domain units).
    ///
    /// `factor > 1` zooms out, `factor < 1` zooms in. Non-positive factors are
    /// ignored since they would flip or collapse the axis.
    pub fn scale_about(&mut self, origin: f32, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let min = origin - factor * (origin - self.min);
        let max = origin + factor * (self.max - origin);
        self.min = min;
        self.max = max;
    }

    /// Fit the domain to `min..max`, widening a zero span by one unit on each
    /// side and otherwise adding a 0.2% margin.
    pub fn fit(&mut self, min: f32, max: f32) {
        if min == max {
            self.min = min - 1.0;
            self.max = max + 1.0;
        } else {
            let margin = 0.002 * (max - min);
            self.min = min - margin;
            self.max = max + margin;
        }
    }
}

/// 2D domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain2D {
    pub x: Domain1D,
    pub y: Domain1D,
}

impl Domain2D {
    pub fn new(x: Domain1D, y: Domain1D) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

/// One axis of a drag: `(current, last, start, extent)` in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisDrag {
    pub current: f32,
    pub last: f32,
    pub start: f32,
    /// Surface extent along this axis
    pub extent: f32,
}

impl AxisDrag {
    pub fn new(current: f32, last: f32, start: f32, extent: f32) -> Self {
        Self {
            current,
            last,
            start,
            extent,
        }
    }

    /// Zoom factor for this step; `direction` is -1 on x and +1 on y.
    pub fn zoom_factor(&self, direction: f32) -> f32 {
        if self.extent <= 0.0 {
            return 1.0;
        }
        1.0 + 3.0 * direction * (self.current - self.last) / self.extent
    }
}

/// View transform for a plot: data domain mapping to local pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotView {
    pub domain: Domain2D,
    /// Padding inside the plotting area (left, top, right, bottom).
    pub padding: [f32; 4],
}

impl PlotView {
    pub fn new(domain: Domain2D) -> Self {
        Self {
            domain,
            padding: [0.0; 4],
        }
    }

    pub fn with_padding(mut self, padding: [f32; 4]) -> Self {
        self.padding = padding;
        self
    }

    pub fn plot_rect(&self, size: Size) -> Rect {
        let [left, top, right, bottom] = self.padding;
        let w = (size.width - left - right).max(0.0);
        let h = (size.height - top - bottom).max(0.0);
        Rect::new(left, top, w, h)
    }

    pub fn x_to_px(&self, x: f32, rect: Rect) -> f32 {
        let t = (x - self.domain.x.min) / self.domain.x.span();
        rect.origin.x + t * rect.width()
    }

    pub fn y_to_px(&self, y: f32, rect: Rect) -> f32 {
        // y increases downward in screen coords.
        let t = (y - self.domain.y.min) / self.domain.y.span();
        rect.origin.y + (1.0 - t) * rect.height()
    }

    /// Unclamped: positions outside the plot map outside the domain.
    pub fn px_to_x(&self, px: f32, rect: Rect) -> f32 {
        let t = (px - rect.origin.x) / rect.width();
        self.domain.x.min + t * self.domain.x.span()
    }

    pub fn px_to_y(&self, py: f32, rect: Rect) -> f32 {
        let t = (py - rect.origin.y) / rect.height();
        self.domain.y.min + (1.0 - t) * self.domain.y.span()
    }

    pub fn data_to_px(&self, p: Point, rect: Rect) -> Point {
        Point::new(self.x_to_px(p.x, rect), self.y_to_px(p.y, rect))
    }

    pub fn px_to_data(&self, p: Point, rect: Rect) -> Point {
        Point::new(self.px_to_x(p.x, rect), self.px_to_y(p.y, rect))
    }

    /// Shift the domain so content follows a pointer moving by `(dx, dy)` px.
    pub fn pan(&mut self, dx: f32, dy: f32, rect: Rect) {
        if rect.width() > 0.0 {
            let span = self.domain.x.span();
            self.domain.x.pan_by(-dx / rect.width() * span);
        }
        if rect.height() > 0.0 {
            let span = self.domain.y.span();
            self.domain.y.pan_by(dy / rect.height() * span);
        }
    }

    /// Incremental drag zoom about the drag start.
    ///
    /// With `lock_aspect_ratio` both axes use the horizontal factor.
    pub fn zoom(&mut self, dx: AxisDrag, dy: AxisDrag, lock_aspect_ratio: bool, rect: Rect) {
        let fx = dx.zoom_factor(-1.0);
        let fy = if lock_aspect_ratio {
            fx
        } else {
            dy.zoom_factor(1.0)
        };
        let ox = self.px_to_x(dx.start, rect);
        let oy = self.px_to_y(dy.start, rect);
        self.domain.x.scale_about(ox, fx);
        self.domain.y.scale_about(oy, fy);
    }

    /// Set the domain to the pixel rectangle spanned by `p0` and `p1`.
    ///
    /// An axis along which the rectangle is degenerate keeps its limits.
    pub fn zoom_rect(&mut self, p0: Point, p1: Point, rect: Rect) {
        let (x0, x1) = (self.px_to_x(p0.x, rect), self.px_to_x(p1.x, rect));
        if x0 != x1 {
            self.domain.x = Domain1D::new(x0.min(x1), x0.max(x1));
        }
        let (y0, y1) = (self.px_to_y(p0.y, rect), self.px_to_y(p1.y, rect));
        if y0 != y1 {
            self.domain.y = Domain1D::new(y0.min(y1), y0.max(y1));
        }
    }
}
