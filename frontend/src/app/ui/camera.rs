use egui::{Pos2, Rect, Vec2};
use gridsearch::Point;

/// Smallest and largest size of one cell on screen, in pixels
const MIN_SCALE: f64 = 2.0;
const MAX_SCALE: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset: (f64, f64),
    scale: f64,
}

/// A camera that can be used to pan and zoom the view. World units are grid
/// cells and pixels are relative to the top left corner of the canvas.
impl Camera {
    pub fn new(initial_scale: f64) -> Camera {
        Camera {
            offset: (0.0, 0.0),
            scale: initial_scale.clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    /// A camera that shows a grid of the given size centered in a canvas of
    /// the given pixel size
    pub fn fit(canvas: Vec2, columns: usize, rows: usize) -> Camera {
        let (columns, rows) = (columns.max(1) as f64, rows.max(1) as f64);
        let scale = (canvas.x as f64 / columns).min(canvas.y as f64 / rows);

        let mut camera = Camera::new(scale);
        camera.offset = (
            (canvas.x as f64 / camera.scale - columns) / 2.0,
            (canvas.y as f64 / camera.scale - rows) / 2.0,
        );
        camera
    }

    /// Converts a pixel position into a world position
    pub fn pixel_to_world(&self, pos: Pos2) -> (f64, f64) {
        let (x, y) = (pos.x as f64 / self.scale, pos.y as f64 / self.scale);
        (x - self.offset.0, y - self.offset.1)
    }

    /// Converts a world position into a pixel position
    pub fn world_to_pixel(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(
            ((x + self.offset.0) * self.scale) as f32,
            ((y + self.offset.1) * self.scale) as f32,
        )
    }

    /// The grid cell under a pixel, if it lies inside a grid of the given size
    pub fn pixel_to_point(&self, pos: Pos2, columns: usize, rows: usize) -> Option<Point> {
        let (x, y) = self.pixel_to_world(pos);
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let point = Point {
            x: x as usize,
            y: y as usize,
        };
        (point.x < columns && point.y < rows).then_some(point)
    }

    /// Screen rectangle covered by a cell
    pub fn cell_rect(&self, point: Point) -> Rect {
        Rect::from_min_max(
            self.world_to_pixel(point.x as f64, point.y as f64),
            self.world_to_pixel(point.x as f64 + 1.0, point.y as f64 + 1.0),
        )
    }

    /// Pans the camera by the given amount in pixels
    pub fn pan_pixels(&mut self, delta: Vec2) {
        self.offset.0 += delta.x as f64 / self.scale;
        self.offset.1 += delta.y as f64 / self.scale;
    }

    /// Zooms by `factor`, keeping the world position under `pos` in place
    pub fn zoom_at(&mut self, pos: Pos2, factor: f64) {
        let target = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let factor = target / self.scale;

        // x and y need to be the location on the canvas, not in the world
        let (x, y) = (pos.x as f64 / self.scale, pos.y as f64 / self.scale);

        self.scale = target;
        self.offset.0 -= x * (1.0 - 1.0 / factor);
        self.offset.1 -= y * (1.0 - 1.0 / factor);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
