use std::path::{Path, PathBuf};

use geojson::GeoJson;
use thiserror::Error;
use tracing::warn;

use crate::{
    geometry::{self, GeometryError},
    models::{area::DraftArea, store::Store},
    pricing::compute_pricing,
};

#[derive(Debug, Error)]
pub enum CreateDraftError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("This area overlaps an already purchased area. Please adjust your selection.")]
    OverlapsPurchasedArea(String),
}

pub struct CreateDraftParameters {
    pub geo_json: GeoJson,
}

pub fn read_geo_json(path: &Path) -> Result<GeoJson, CreateDraftError> {
    let content = std::fs::read_to_string(path).map_err(|e| CreateDraftError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    content
        .parse::<GeoJson>()
        .map_err(|e| CreateDraftError::Geometry(GeometryError::InvalidGeoJson(e)))
}

pub fn create_draft(
    store: &Store,
    parameters: CreateDraftParameters,
) -> Result<DraftArea, CreateDraftError> {
    let feature = geometry::polygon_feature(parameters.geo_json)?;
    let polygon = geometry::to_polygon(&feature)?;

    // Purchased polygons are locked, touching one counts as an overlap
    for area in &store.areas {
        match area.polygon() {
            Ok(purchased) if geometry::overlaps(&polygon, &purchased) => {
                return Err(CreateDraftError::OverlapsPurchasedArea(area.name.clone()));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(id = %area.id, error = %e, "Skipping purchase with unreadable geometry");
            }
        }
    }

    let area_km2 = geometry::area_km2(&polygon);
    let centroid = geometry::centroid_position(&polygon)?;
    let pricing = compute_pricing(&polygon, Some(area_km2));

    Ok(DraftArea {
        geometry: feature,
        area_km2,
        centroid,
        country_code: pricing.country_code,
        price_per_km2: pricing.price_per_km2,
        total_price: pricing.total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::fixtures::square_feature, models::area::PurchasedArea};

    fn parameters(lon: f64, lat: f64, half_side: f64) -> CreateDraftParameters {
        CreateDraftParameters {
            geo_json: GeoJson::Feature(square_feature(lon, lat, half_side)),
        }
    }

    fn store_with_purchase_at(lon: f64, lat: f64) -> Store {
        let draft = create_draft(&Store::default(), parameters(lon, lat, 1.0)).unwrap();
        let mut store = Store::default();
        store.add_area(PurchasedArea::from_draft(
            draft,
            String::from("Taken"),
            None,
            None,
        ));
        store
    }

    #[test]
    fn test_create_draft_prices_polygon() {
        let draft = create_draft(&Store::default(), parameters(-100.0, 40.0, 0.5)).unwrap();

        assert_eq!(draft.country_code, "US");
        assert_eq!(draft.price_per_km2, 0.8);
        assert!(draft.area_km2 > 0.0);
        assert!((draft.total_price - draft.area_km2 * 0.8).abs() < 1e-6);
        assert!((draft.centroid[0] + 100.0).abs() < 1e-9);
        assert!((draft.centroid[1] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_create_draft_in_open_ocean_uses_default() {
        let draft = create_draft(&Store::default(), parameters(-30.0, 0.0, 0.5)).unwrap();

        assert_eq!(draft.country_code, "DEFAULT");
        assert_eq!(draft.price_per_km2, 0.5);
    }

    #[test]
    fn test_create_draft_rejects_non_polygon() {
        let geo_json: GeoJson = r#"{ "type": "Point", "coordinates": [0, 0] }"#
            .parse()
            .unwrap();

        let result = create_draft(&Store::default(), CreateDraftParameters { geo_json });
        assert!(matches!(
            result,
            Err(CreateDraftError::Geometry(GeometryError::NotAPolygon))
        ));
    }

    #[test]
    fn test_create_draft_rejects_overlap() {
        let store = store_with_purchase_at(10.0, 50.0);

        let overlapping = create_draft(&store, parameters(10.5, 50.5, 1.0));
        match overlapping {
            Err(CreateDraftError::OverlapsPurchasedArea(name)) => assert_eq!(name, "Taken"),
            _ => panic!("Expected OverlapsPurchasedArea error"),
        }

        // Sharing an edge is still an overlap
        let touching = create_draft(&store, parameters(12.0, 50.0, 1.0));
        assert!(matches!(
            touching,
            Err(CreateDraftError::OverlapsPurchasedArea(_))
        ));

        let disjoint = create_draft(&store, parameters(14.0, 50.0, 0.5));
        assert!(disjoint.is_ok());
    }

    #[test]
    fn test_read_geo_json_missing_file() {
        let result = read_geo_json(Path::new("/tmp/worldlots_does_not_exist.geojson"));
        assert!(matches!(result, Err(CreateDraftError::ReadFailed { .. })));
    }
}
