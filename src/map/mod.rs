mod choropleth;
mod geometry;
mod projection;
mod spatial;

pub use choropleth::{ChoroplethFrame, ChoroplethLayer, County, DisplaySettings, StyleFn};
pub use geometry::{BBox, Ring};
pub use projection::Viewport;
