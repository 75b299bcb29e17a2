use serde_json::to_string_pretty;
use tracing::{error, warn};

use crate::{
    geometry,
    models::{
        area::{PurchasedArea, StoredPurchasedArea},
        image::DisplayHandle,
    },
    storage::{Storage, StorageError},
};

/// Key the purchase collection lives under
pub const STORAGE_KEY: &str = "world-map-purchases";

/// Reads and writes the whole purchase collection as one JSON array.
///
/// `load`, `save` and `clear` never fail: storage and codec errors are logged
/// and degrade to an empty collection or a no-op.
pub struct PurchaseLedger<S> {
    storage: S,
    key: String,
}

impl<S: Storage> PurchaseLedger<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> Vec<PurchasedArea> {
        self.try_load().unwrap_or_else(|e| {
            error!(key = %self.key, error = %e, "Failed to load purchases from storage");
            vec![]
        })
    }

    pub fn try_load(&self) -> Result<Vec<PurchasedArea>, StorageError> {
        let Some(content) = self.storage.get_item(&self.key)? else {
            return Ok(vec![]);
        };

        let stored: Vec<StoredPurchasedArea> =
            serde_json::from_str(&content).map_err(|e| StorageError::ParseFailed {
                key: self.key.clone(),
                source: e,
            })?;

        Ok(stored.into_iter().map(restore_area).collect())
    }

    pub fn save(&self, areas: &[PurchasedArea]) {
        if let Err(e) = self.try_save(areas) {
            error!(key = %self.key, error = %e, "Failed to persist purchases");
        }
    }

    pub fn try_save(&self, areas: &[PurchasedArea]) -> Result<(), StorageError> {
        let payload: Vec<StoredPurchasedArea> =
            areas.iter().map(PurchasedArea::to_stored).collect();
        let json =
            to_string_pretty(&payload).map_err(|e| StorageError::SerializeFailed { source: e })?;
        self.storage.set_item(&self.key, &json)
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            error!(key = %self.key, error = %e, "Failed to clear purchases");
        }
    }
}

/// Fills in a missing centroid and rebuilds the display handle from the
/// inline image, if any. A broken image only costs that record its handle.
fn restore_area(stored: StoredPurchasedArea) -> PurchasedArea {
    let centroid = stored.centroid.unwrap_or_else(|| {
        geometry::to_polygon(&stored.geometry)
            .and_then(|polygon| geometry::centroid_position(&polygon))
            .unwrap_or_else(|e| {
                warn!(id = %stored.id, error = %e, "Failed to derive centroid for stored purchase");
                [0.0, 0.0]
            })
    });

    let image_handle = stored.image_data_url.as_deref().and_then(|data_url| {
        DisplayHandle::from_data_url(data_url)
            .inspect_err(|e| {
                error!(id = %stored.id, error = %e, "Failed to build display handle from stored image");
            })
            .ok()
    });

    PurchasedArea {
        id: stored.id,
        geometry: stored.geometry,
        area_km2: stored.area_km2,
        centroid,
        country_code: stored.country_code,
        price_per_km2: stored.price_per_km2,
        total_price: stored.total_price,
        name: stored.name,
        description: stored.description,
        image_data_url: stored.image_data_url,
        image_handle,
        created_at: stored.created_at,
    }
}
