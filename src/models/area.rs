use geo::Polygon;
use geojson::Feature;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    geometry::{self, GeometryError, Position},
    models::image::{DisplayHandle, PurchaseImage},
};

/// A priced polygon that has not been purchased yet
#[derive(Debug, Clone, PartialEq)]
pub struct DraftArea {
    pub geometry: Feature,
    pub area_km2: f64,
    pub centroid: Position,
    pub country_code: String,
    pub price_per_km2: f64,
    pub total_price: f64,
}

/// Persisted shape of a purchase, as written to storage
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPurchasedArea {
    pub id: String,
    /// GeoJSON feature holding a polygon
    pub geometry: Feature,
    pub area_km2: f64,
    /// Older records may lack it; it is derived from the geometry on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Position>,
    pub country_code: String,
    pub price_per_km2: f64,
    pub total_price: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `data:<mime>;base64,<payload>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_url: Option<String>,
    pub created_at: Timestamp,
}

/// A purchase as held in memory
#[derive(Debug)]
pub struct PurchasedArea {
    /// Identifier of the purchase
    pub id: String,
    /// Purchased polygon
    pub geometry: Feature,
    /// Area in square kilometres, as priced
    pub area_km2: f64,
    /// Centroid as `[lon, lat]`
    pub centroid: Position,
    /// Country resolved at pricing time, or `DEFAULT`
    pub country_code: String,
    /// Clamped rate applied
    pub price_per_km2: f64,
    /// Price paid
    pub total_price: f64,
    /// Name or nickname given by the buyer
    pub name: String,
    /// Optional free text
    pub description: Option<String>,
    /// Inline image payload, the only persisted form of the image
    pub image_data_url: Option<String>,
    /// Transient handle over the decoded image, present iff a payload decoded
    pub image_handle: Option<DisplayHandle>,
    /// When the purchase was confirmed
    pub created_at: Timestamp,
}

impl PurchasedArea {
    pub fn from_draft(
        draft: DraftArea,
        name: String,
        description: Option<String>,
        image: Option<PurchaseImage>,
    ) -> Self {
        let (image_data_url, image_handle) = match image {
            Some(image) => (Some(image.data_url), Some(image.handle)),
            None => (None, None),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            geometry: draft.geometry,
            area_km2: draft.area_km2,
            centroid: draft.centroid,
            country_code: draft.country_code,
            price_per_km2: draft.price_per_km2,
            total_price: draft.total_price,
            name,
            description,
            image_data_url,
            image_handle,
            created_at: Timestamp::now(),
        }
    }

    pub fn polygon(&self) -> Result<Polygon<f64>, GeometryError> {
        geometry::to_polygon(&self.geometry)
    }

    pub fn has_image(&self) -> bool {
        self.image_data_url.is_some()
    }

    /// Drops the image payload and releases its handle.
    /// Returns false when there was no image to remove.
    pub fn remove_image(&mut self) -> bool {
        if let Some(handle) = self.image_handle.take() {
            handle.release();
        }
        self.image_data_url.take().is_some()
    }

    /// Persisted form, without the display handle
    pub fn to_stored(&self) -> StoredPurchasedArea {
        StoredPurchasedArea {
            id: self.id.clone(),
            geometry: self.geometry.clone(),
            area_km2: self.area_km2,
            centroid: Some(self.centroid),
            country_code: self.country_code.clone(),
            price_per_km2: self.price_per_km2,
            total_price: self.total_price,
            name: self.name.clone(),
            description: self.description.clone(),
            image_data_url: self.image_data_url.clone(),
            created_at: self.created_at,
        }
    }
}
