use geo::{ChamberlainDuquetteArea, Coord, Intersects, LineString, Point, Polygon};
use geojson::{Feature, GeoJson};
use thiserror::Error;

/// A `[longitude, latitude]` pair, as stored in GeoJSON positions
pub type Position = [f64; 2];

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Only polygon drawing is supported.")]
    NotAPolygon,

    #[error("The feature collection contains no features")]
    EmptyCollection,

    #[error("Polygon has no vertices")]
    EmptyPolygon,

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] geojson::Error),
}

/// Pick the single drawn feature out of any GeoJSON document.
/// Bare geometries are wrapped into a property-less feature and collections
/// contribute their first feature.
pub fn polygon_feature(geo_json: GeoJson) -> Result<Feature, GeometryError> {
    let feature = match geo_json {
        GeoJson::Feature(feature) => feature,
        GeoJson::Geometry(geometry) => Feature::from(geometry),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .ok_or(GeometryError::EmptyCollection)?,
    };

    // Validate eagerly so callers never hold a non-polygon feature
    to_polygon(&feature)?;

    Ok(feature)
}

pub fn to_polygon(feature: &Feature) -> Result<Polygon<f64>, GeometryError> {
    let geometry = feature.geometry.as_ref().ok_or(GeometryError::NotAPolygon)?;

    match &geometry.value {
        geojson::Value::Polygon(_) => Ok((&geometry.value).try_into()?),
        _ => Err(GeometryError::NotAPolygon),
    }
}

/// Spherical area of the polygon in square kilometres
pub fn area_km2(polygon: &Polygon<f64>) -> f64 {
    polygon.chamberlain_duquette_unsigned_area() / 1_000_000.0
}

/// Mean of the ring vertices, each ring's closing vertex left out.
/// Not area-weighted: extra vertices along one edge pull the point toward it.
pub fn centroid(polygon: &Polygon<f64>) -> Option<Point<f64>> {
    let vertices: Vec<Coord<f64>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(open_ring)
        .copied()
        .collect();

    if vertices.is_empty() {
        return None;
    }

    let count = vertices.len() as f64;
    let sum = vertices
        .iter()
        .fold(Coord::zero(), |acc, coord| acc + *coord);

    Some(Point::new(sum.x / count, sum.y / count))
}

fn open_ring(ring: &LineString<f64>) -> &[Coord<f64>] {
    match ring.0.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => &ring.0,
    }
}

pub fn centroid_position(polygon: &Polygon<f64>) -> Result<Position, GeometryError> {
    centroid(polygon)
        .map(|point| [point.x(), point.y()])
        .ok_or(GeometryError::EmptyPolygon)
}

/// True when the two polygons share at least one point, edges included
pub fn overlaps(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    a.intersects(b)
}
