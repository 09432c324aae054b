use crate::braille::BrailleCanvas;

/// A closed ring of (lon, lat) vertices
pub type Ring = Vec<(f64, f64)>;

/// Geographic bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    /// Bounds of every vertex in `rings`, `None` if there are no vertices
    pub fn of_rings(rings: &[Ring]) -> Option<Self> {
        let mut points = rings.iter().flatten();
        let &(lon, lat) = points.next()?;
        let init = BBox { min_lon: lon, min_lat: lat, max_lon: lon, max_lat: lat };
        Some(points.fold(init, |b, &(lon, lat)| BBox {
            min_lon: b.min_lon.min(lon),
            min_lat: b.min_lat.min(lat),
            max_lon: b.max_lon.max(lon),
            max_lat: b.max_lat.max(lat),
        }))
    }

    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    #[inline]
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_lon <= other.max_lon
            && self.max_lon >= other.min_lon
            && self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
    }
}

/// Even-odd point-in-polygon test across all rings.
/// Holes and disjoint parts of a multipolygon fall out of the crossing count.
pub fn point_in_rings(lon: f64, lat: f64, rings: &[Ring]) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

/// Bresenham line into the canvas
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]
    }

    #[test]
    fn test_point_in_square() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0)];
        assert!(point_in_rings(5.0, 5.0, &rings));
        assert!(!point_in_rings(15.0, 5.0, &rings));
        assert!(!point_in_rings(5.0, -1.0, &rings));
    }

    #[test]
    fn test_hole_excluded() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0), square(4.0, 4.0, 6.0, 6.0)];
        assert!(point_in_rings(2.0, 2.0, &rings));
        assert!(!point_in_rings(5.0, 5.0, &rings));
    }

    #[test]
    fn test_multipart() {
        let rings = vec![square(0.0, 0.0, 1.0, 1.0), square(5.0, 5.0, 6.0, 6.0)];
        assert!(point_in_rings(0.5, 0.5, &rings));
        assert!(point_in_rings(5.5, 5.5, &rings));
        assert!(!point_in_rings(3.0, 3.0, &rings));
    }

    #[test]
    fn test_bbox() {
        let rings = vec![square(-3.0, 1.0, 2.0, 4.0)];
        let bbox = BBox::of_rings(&rings).unwrap();
        assert_eq!(bbox, BBox { min_lon: -3.0, min_lat: 1.0, max_lon: 2.0, max_lat: 4.0 });
        assert!(bbox.contains(0.0, 2.0));
        assert!(!bbox.contains(0.0, 5.0));
        assert!(BBox::of_rings(&[]).is_none());
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }
}
