use crate::map::{ChoroplethLayer, Viewport};
use crate::risk::Annotation;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub layer: ChoroplethLayer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for hover lookups
    pub mouse_pos: Option<(u16, u16)>,
    /// Initial centre and zoom, restored on reset
    home: (f64, f64, f64),
}

/// Braille pixel size of the map area for a terminal of the given size.
/// One border cell on each side plus the status bar row.
fn map_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Terminal cell to braille pixel, accounting for the border.
/// Border cells on the left and top map to negative pixels.
fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
    let px = (col as i32 - 1) * 2;
    let py = (row as i32 - 1) * 4;
    (px, py)
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        layer: ChoroplethLayer,
        center: (f64, f64),
        zoom: f64,
    ) -> Self {
        let (pixel_width, pixel_height) = map_pixels(width, height);
        Self {
            viewport: Viewport::new(center.0, center.1, zoom, pixel_width, pixel_height),
            layer,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            home: (center.0, center.1, zoom),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = map_pixels(width, height);
        self.viewport.width = pixel_width;
        self.viewport.height = pixel_height;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a terminal cell
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    /// Return to the initial view. Loaded data is untouched.
    pub fn reset_view(&mut self) {
        let (lon, lat, zoom) = self.home;
        self.viewport = Viewport::new(lon, lat, zoom, self.viewport.width, self.viewport.height);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Pan by the drag distance since the last event
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (last_col as i32 - col as i32) * 2;
            let dy = (last_row as i32 - row as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((col, row));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Mouse position in braille pixels, sampled at the cell centre
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| {
            let (px, py) = cell_to_pixel(col, row);
            (px + 1, py + 2)
        })
    }

    /// County under the mouse cursor
    pub fn hovered(&self) -> Option<&Annotation> {
        let (px, py) = self.mouse_pixel_pos()?;
        if px < 0 || py < 0 || px >= self.viewport.width as i32 || py >= self.viewport.height as i32 {
            return None;
        }
        let (lon, lat) = self.viewport.unproject(px, py);
        self.layer.annotation_at(lon, lat)
    }
}
