use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
/// Deep enough to separate small eastern counties
const MAX_ZOOM: f64 = 5000.0;
const ZOOM_STEP: f64 = 1.5;

/// Visible map area. `zoom` is the number of viewport widths spanned by
/// the full 360° of longitude.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    pub zoom: f64,
    /// Canvas width in braille pixels
    pub width: usize,
    /// Canvas height in braille pixels
    pub height: usize,
}

/// Web Mercator y in [0, 1], 0 at the north edge
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat * PI / 180.0;
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[inline]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI
}

#[inline]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat: center_lat.clamp(-85.0, 85.0),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Pan by a braille pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale().max(1.0);
        self.center_lon += dx as f64 * 360.0 / scale;
        let y = mercator_y(self.center_lat) + dy as f64 / scale;
        self.center_lat = inverse_mercator_y(y);

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }
        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in keeping the point under (px, py) fixed
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Pan so the anchor lands back under the cursor
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Project (lon, lat) to braille pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (px, py) = self.project_f(lon, lat);
        (px as i32, py as i32)
    }

    /// Sub-pixel projection
    pub fn project_f(&self, lon: f64, lat: f64) -> (f64, f64) {
        let scale = self.scale();
        let px = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;
        (px, py)
    }

    /// Pixel coordinates back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        self.unproject_f(px as f64, py as f64)
    }

    pub fn unproject_f(&self, px: f64, py: f64) -> (f64, f64) {
        let scale = self.scale().max(f64::MIN_POSITIVE);
        let x = (px - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);

        (x * 360.0 - 180.0, inverse_mercator_y(y))
    }

    /// Geographic bounds of the visible area: (min_lon, min_lat, max_lon, max_lat)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (west, north) = self.unproject_f(0.0, 0.0);
        let (east, south) = self.unproject_f(self.width as f64, self.height as f64);
        (west, south, east, north)
    }

    /// Rough bounding box check for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}
