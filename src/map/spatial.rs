use std::collections::HashMap;

use crate::map::geometry::BBox;

/// Uniform grid over lon/lat for county lookups.
/// Each county is registered in every cell its bounding box overlaps, so a
/// query never misses a county; callers filter the false positives.
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Index bounding boxes by their position in the iterator
    pub fn build<'a>(bboxes: impl Iterator<Item = &'a BBox>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, bbox) in bboxes.enumerate() {
            let min_cell = grid.to_cell(bbox.min_lon, bbox.min_lat);
            let max_cell = grid.to_cell(bbox.max_lon, bbox.max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidates whose bbox overlaps the cell containing the point
    pub fn query_point(&self, lon: f64, lat: f64) -> &[usize] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append candidates for a region. May contain duplicates.
    pub fn query_into(&self, bounds: &BBox, results: &mut Vec<usize>) {
        let min_cell = self.to_cell(bounds.min_lon, bounds.min_lat);
        let max_cell = self.to_cell(bounds.max_lon, bounds.max_lat);
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> BBox {
        BBox { min_lon, min_lat, max_lon, max_lat }
    }

    #[test]
    fn test_spanning_feature_found_in_every_cell() {
        let boxes = [bbox(-120.5, 34.2, -117.4, 35.9), bbox(-98.0, 30.0, -97.4, 30.6)];
        let grid = FeatureGrid::build(boxes.iter(), 1.0);

        assert_eq!(grid.query_point(-120.1, 34.5), &[0]);
        assert_eq!(grid.query_point(-117.9, 35.5), &[0]);
        assert_eq!(grid.query_point(-97.7, 30.3), &[1]);
        assert!(grid.query_point(-80.0, 40.0).is_empty());
    }

    #[test]
    fn test_region_query() {
        let boxes = [bbox(0.5, 0.5, 0.8, 0.8), bbox(5.5, 5.5, 5.8, 5.8)];
        let grid = FeatureGrid::build(boxes.iter(), 1.0);

        let mut found = Vec::new();
        grid.query_into(&bbox(0.0, 0.0, 2.0, 2.0), &mut found);
        assert_eq!(found, vec![0]);

        found.clear();
        grid.query_into(&bbox(0.0, 0.0, 6.0, 6.0), &mut found);
        found.sort_unstable();
        found.dedup();
        assert_eq!(found, vec![0, 1]);
    }
}
