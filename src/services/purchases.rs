use thiserror::Error;

use crate::{
    ledger::PurchaseLedger,
    models::{
        area::{DraftArea, PurchasedArea},
        image::PurchaseImage,
        store::Store,
    },
    storage::Storage,
};

#[derive(Debug, Error)]
pub enum ConfirmPurchaseError {
    #[error("Please add a name or nickname for this area.")]
    NameRequired,

    #[error("Consent is required to upload an image.")]
    ConsentRequired,
}

pub struct ConfirmPurchaseParameters {
    pub draft: DraftArea,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<PurchaseImage>,
    pub consent: bool,
}

/// Locks the draft in as a purchase and persists the whole collection
pub fn confirm_purchase<'a, S: Storage>(
    store: &'a mut Store,
    ledger: &PurchaseLedger<S>,
    parameters: ConfirmPurchaseParameters,
) -> Result<&'a PurchasedArea, ConfirmPurchaseError> {
    let name = parameters.name.trim();
    if name.is_empty() {
        return Err(ConfirmPurchaseError::NameRequired);
    }

    if parameters.image.is_some() && !parameters.consent {
        return Err(ConfirmPurchaseError::ConsentRequired);
    }

    let description = parameters
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let area = PurchasedArea::from_draft(
        parameters.draft,
        name.to_string(),
        description,
        parameters.image,
    );
    let index = store.areas.len();

    store.add_area(area);
    ledger.save(&store.areas);

    Ok(&store.areas[index])
}

#[derive(Debug, Error)]
pub enum RemoveImageError {
    #[error("Purchase '{0}' not found")]
    PurchaseNotFound(String),
}

pub struct RemoveImageParameters {
    pub id: String,
}

/// Returns whether an image was actually removed
pub fn remove_image<S: Storage>(
    store: &mut Store,
    ledger: &PurchaseLedger<S>,
    parameters: RemoveImageParameters,
) -> Result<bool, RemoveImageError> {
    let area = store
        .get_area_mut(&parameters.id)
        .ok_or(RemoveImageError::PurchaseNotFound(parameters.id))?;

    if !area.remove_image() {
        return Ok(false);
    }

    ledger.save(&store.areas);

    Ok(true)
}

/// Drops every purchase from memory and storage. Returns how many were dropped.
pub fn clear_purchases<S: Storage>(store: &mut Store, ledger: &PurchaseLedger<S>) -> usize {
    let count = store.clear_areas();
    ledger.clear();
    count
}

#[derive(Debug, Error)]
pub enum FindPurchaseError {
    #[error("Purchase '{0}' not found")]
    PurchaseNotFound(String),

    #[error("Purchase name is ambiguous. Multiple purchases found: {}", .0.join(", "))]
    AmbiguousPurchaseName(Vec<String>),
}

/// Exact id first, then a case-insensitive name fragment
pub fn find_purchase<'a>(
    store: &'a Store,
    query: &str,
) -> Result<&'a PurchasedArea, FindPurchaseError> {
    if let Some(area) = store.get_area(query) {
        return Ok(area);
    }

    let matching_areas: Vec<_> = store.find_areas_by_name(query).collect();

    match matching_areas.len() {
        0 => Err(FindPurchaseError::PurchaseNotFound(query.to_string())),
        1 => Ok(matching_areas[0]),
        _ => {
            let names: Vec<String> = matching_areas.iter().map(|a| a.name.clone()).collect();
            Err(FindPurchaseError::AmbiguousPurchaseName(names))
        }
    }
}
