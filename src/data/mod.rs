use crate::map::{County, Ring};
use crate::risk::{CountyFeature, RiskTable};
use geojson::{Feature, GeoJson, Geometry, Value};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON in {}: {source}", .path.display())]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },
    #[error("invalid risk table in {}: {source}", .path.display())]
    RiskTable {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },
    #[error("{} contains no usable county features", .path.display())]
    NoCounties { path: PathBuf },
}

/// Counts from parsing a boundary file
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Features lacking NAME or STATEFP
    pub missing_properties: usize,
    /// Features without polygon geometry
    pub non_polygonal: usize,
}

/// Load county boundaries from a GeoJSON file
pub fn load_counties(path: &Path) -> Result<Vec<County>, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = content.parse().map_err(|source| DataError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    let (counties, stats) = counties_from_geojson(geojson);
    if stats.missing_properties > 0 {
        warn!(
            skipped = stats.missing_properties,
            "features without NAME/STATEFP properties were skipped"
        );
    }
    if stats.non_polygonal > 0 {
        warn!(skipped = stats.non_polygonal, "features without polygon geometry were skipped");
    }
    if counties.is_empty() {
        return Err(DataError::NoCounties { path: path.to_path_buf() });
    }

    info!(counties = counties.len(), path = %path.display(), "loaded county boundaries");
    Ok(counties)
}

/// Extract counties from a FeatureCollection, a single Feature, or nothing
pub fn counties_from_geojson(geojson: GeoJson) -> (Vec<County>, ParseStats) {
    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    };

    let mut stats = ParseStats::default();
    let mut counties = Vec::with_capacity(features.len());
    for feature in &features {
        let Some(props) = county_properties(feature) else {
            stats.missing_properties += 1;
            continue;
        };
        let mut rings = Vec::new();
        if let Some(ref geometry) = feature.geometry {
            collect_rings(geometry, &mut rings);
        }
        match County::new(props, rings) {
            Some(county) => counties.push(county),
            None => stats.non_polygonal += 1,
        }
    }
    (counties, stats)
}

fn county_properties(feature: &Feature) -> Option<CountyFeature> {
    let props = feature.properties.as_ref()?;
    let name = props.get("NAME").and_then(|v| v.as_str())?;
    let fips = props.get("STATEFP").and_then(|v| v.as_str())?;
    Some(CountyFeature::new(name, fips))
}

fn collect_rings(geometry: &Geometry, rings: &mut Vec<Ring>) {
    match &geometry.value {
        Value::Polygon(polygon) => {
            rings.extend(polygon.iter().map(|ring| to_ring(ring)));
        }
        Value::MultiPolygon(polygons) => {
            for polygon in polygons {
                rings.extend(polygon.iter().map(|ring| to_ring(ring)));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_rings(g, rings);
            }
        }
        _ => {}
    }
}

fn to_ring(coords: &[Vec<f64>]) -> Ring {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

/// A table value. Anything that is not a number counts as missing.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Other(IgnoredAny),
}

/// Load the flat `{"<County> County, <ST>": risk}` table
pub fn load_risk_table(path: &Path) -> Result<RiskTable, DataError> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_risk_table(&mut bytes).map_err(|source| DataError::RiskTable {
        path: path.to_path_buf(),
        source,
    })?;

    info!(entries = table.len(), path = %path.display(), "loaded risk table");
    Ok(table)
}

/// Like [`load_risk_table`], but a missing file yields an empty table.
/// Every county then renders as Low.
pub fn load_risk_table_if_present(path: &Path) -> Result<RiskTable, DataError> {
    if !path.exists() {
        warn!(path = %path.display(), "risk table not found, all counties default to 0%");
        return Ok(RiskTable::default());
    }
    load_risk_table(path)
}

/// Parse risk table JSON in place (simd-json mutates the buffer)
pub fn parse_risk_table(bytes: &mut [u8]) -> Result<RiskTable, simd_json::Error> {
    let raw: HashMap<String, RawScore> = simd_json::serde::from_slice(bytes)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, score)| match score {
            RawScore::Number(risk) => Some((key, risk)),
            RawScore::Other(_) => None,
        })
        .collect())
}
