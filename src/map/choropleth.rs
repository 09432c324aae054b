use rayon::prelude::*;
use tracing::debug;

use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, point_in_rings, BBox, Ring};
use crate::map::projection::Viewport;
use crate::map::spatial::FeatureGrid;
use crate::risk::{Annotation, CountyFeature, RiskTable, RiskTier};

/// Grid cell size in degrees; most counties fit inside one or two cells
const GRID_CELL_DEGREES: f64 = 1.0;

/// Per-feature style callback. Called once per county when the layer is
/// built; it must not depend on anything but its arguments.
pub type StyleFn = fn(&CountyFeature, &RiskTable) -> Annotation;

/// A county boundary with its identifying properties
#[derive(Clone, Debug)]
pub struct County {
    pub feature: CountyFeature,
    /// Exterior rings and holes of every part
    pub rings: Vec<Ring>,
    pub bbox: BBox,
}

impl County {
    /// `None` if the geometry has no vertices
    pub fn new(feature: CountyFeature, rings: Vec<Ring>) -> Option<Self> {
        let bbox = BBox::of_rings(&rings)?;
        Some(Self { feature, rings, bbox })
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bbox.contains(lon, lat) && point_in_rings(lon, lat, &self.rings)
    }
}

/// Display toggles
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_fill: bool,
    pub show_outlines: bool,
    pub show_legend: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_fill: true,
            show_outlines: true,
            show_legend: true,
        }
    }
}

/// Rasterised layer for one frame
pub struct ChoroplethFrame {
    pub cols: usize,
    pub rows: usize,
    /// Tier of the county under each cell centre, row-major
    pub fills: Vec<Option<RiskTier>>,
    pub outlines: BrailleCanvas,
}

impl ChoroplethFrame {
    pub fn fill(&self, col: usize, row: usize) -> Option<RiskTier> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.fills[row * self.cols + col]
    }
}

/// Styled county polygons plus the index used for hit testing
pub struct ChoroplethLayer {
    counties: Vec<County>,
    annotations: Vec<Annotation>,
    grid: FeatureGrid,
    pub settings: DisplaySettings,
}

impl ChoroplethLayer {
    /// Style every county once and index the geometry
    pub fn build(counties: Vec<County>, table: &RiskTable, style: StyleFn) -> Self {
        let annotations: Vec<Annotation> = counties
            .par_iter()
            .map(|county| style(&county.feature, table))
            .collect();
        let grid = FeatureGrid::build(counties.iter().map(|c| &c.bbox), GRID_CELL_DEGREES);

        debug!(counties = counties.len(), "choropleth layer built");

        Self {
            counties,
            annotations,
            grid,
            settings: DisplaySettings::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of counties whose key had no entry in the risk table
    pub fn unmatched(&self, table: &RiskTable) -> usize {
        self.annotations
            .iter()
            .filter(|a| table.get(&a.key).is_none())
            .count()
    }

    /// Index of the county containing the point. Overlaps resolve to the
    /// county loaded last, which is the one drawn on top.
    pub fn county_at(&self, lon: f64, lat: f64) -> Option<usize> {
        self.grid
            .query_point(lon, lat)
            .iter()
            .rev()
            .copied()
            .find(|&idx| self.counties[idx].contains(lon, lat))
    }

    /// Annotation of the county containing the point
    pub fn annotation_at(&self, lon: f64, lat: f64) -> Option<&Annotation> {
        self.county_at(lon, lat).map(|idx| &self.annotations[idx])
    }

    /// Rasterise fills and outlines for a `cols` x `rows` character area
    pub fn render(&self, cols: usize, rows: usize, viewport: &Viewport) -> ChoroplethFrame {
        let fills = if self.settings.show_fill {
            self.render_fills(cols, rows, viewport)
        } else {
            vec![None; cols * rows]
        };

        let mut outlines = BrailleCanvas::new(cols, rows);
        if self.settings.show_outlines {
            self.render_outlines(&mut outlines, viewport);
        }

        ChoroplethFrame { cols, rows, fills, outlines }
    }

    fn render_fills(&self, cols: usize, rows: usize, viewport: &Viewport) -> Vec<Option<RiskTier>> {
        (0..rows)
            .into_par_iter()
            .flat_map_iter(|row| {
                (0..cols).map(move |col| {
                    // Sample the centre of the 2x4 braille cell
                    let px = col as f64 * 2.0 + 1.0;
                    let py = row as f64 * 4.0 + 2.0;
                    let (lon, lat) = viewport.unproject_f(px, py);
                    self.county_at(lon, lat).map(|idx| self.annotations[idx].tier)
                })
            })
            .collect()
    }

    fn render_outlines(&self, canvas: &mut BrailleCanvas, viewport: &Viewport) {
        let (min_lon, min_lat, max_lon, max_lat) = viewport.bounds();
        let visible = BBox { min_lon, min_lat, max_lon, max_lat };

        let mut candidates = Vec::new();
        self.grid.query_into(&visible, &mut candidates);
        candidates.sort_unstable();
        candidates.dedup();

        for idx in candidates {
            let county = &self.counties[idx];
            if !county.bbox.intersects(&visible) {
                continue;
            }
            for ring in &county.rings {
                draw_ring(canvas, ring, viewport);
            }
        }
    }

    pub fn toggle_fill(&mut self) {
        self.settings.show_fill = !self.settings.show_fill;
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }

    pub fn toggle_legend(&mut self) {
        self.settings.show_legend = !self.settings.show_legend;
    }
}

/// Draw a ring with per-segment culling
fn draw_ring(canvas: &mut BrailleCanvas, ring: &Ring, viewport: &Viewport) {
    if ring.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in ring {
        let (px, py) = viewport.project(lon, lat);
        if let Some((prev_x, prev_y)) = prev {
            // Skip degenerate and absurdly long segments
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist > 0
                && dist < viewport.width * 4
                && viewport.line_might_be_visible((prev_x, prev_y), (px, py))
            {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }
        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::annotate;

    fn square(name: &str, fips: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> County {
        let ring = vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
        County::new(CountyFeature::new(name, fips), vec![ring]).unwrap()
    }

    fn layer() -> ChoroplethLayer {
        let counties = vec![
            square("Travis", "48", -98.2, 30.0, -97.4, 30.6),
            square("Kern", "06", -120.2, 34.8, -117.6, 35.8),
        ];
        let table: RiskTable = [("Travis County, TX".to_string(), 75.0)].into_iter().collect();
        ChoroplethLayer::build(counties, &table, annotate)
    }

    #[test]
    fn test_annotations_follow_counties() {
        let layer = layer();
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.annotations()[0].key, "Travis County, TX");
        assert_eq!(layer.annotations()[0].color, "#BD0026");
        assert_eq!(layer.annotations()[1].risk, 0.0);
    }

    #[test]
    fn test_hit_testing() {
        let layer = layer();
        assert_eq!(layer.county_at(-97.7, 30.3), Some(0));
        assert_eq!(layer.county_at(-119.0, 35.5), Some(1));
        assert_eq!(layer.county_at(-100.0, 40.0), None);
        assert_eq!(
            layer.annotation_at(-97.7, 30.3).map(|a| a.tier),
            Some(RiskTier::VeryHigh)
        );
    }

    #[test]
    fn test_unmatched_count() {
        let table: RiskTable = [("Travis County, TX".to_string(), 75.0)].into_iter().collect();
        assert_eq!(layer().unmatched(&table), 1);
    }

    #[test]
    fn test_render_centered_county() {
        let layer = layer();
        // Travis spans ~0.8° of longitude; 4° across the view keeps it central
        let viewport = Viewport::new(-97.8, 30.3, 90.0, 80, 80);
        let frame = layer.render(40, 20, &viewport);

        assert_eq!(frame.fills.len(), 40 * 20);
        assert_eq!(frame.fill(20, 10), Some(RiskTier::VeryHigh));
        assert_eq!(frame.fill(0, 0), None);
        assert_eq!(frame.fill(99, 0), None);
        let outline_cells = (0..20)
            .flat_map(|r| (0..40).map(move |c| (c, r)))
            .filter(|&(c, r)| frame.outlines.glyph(c, r).is_some())
            .count();
        assert!(outline_cells > 0);
    }

    #[test]
    fn test_toggles_blank_frame() {
        let mut layer = layer();
        layer.toggle_fill();
        layer.toggle_outlines();
        let viewport = Viewport::new(-97.8, 30.3, 90.0, 80, 80);
        let frame = layer.render(40, 20, &viewport);
        assert!(frame.fills.iter().all(Option::is_none));
        assert_eq!(frame.outlines.glyph(20, 10), None);
    }
}
