use crate::models::area::PurchasedArea;

/// The in-memory purchase collection. Append-only apart from image removal.
#[derive(Debug, Default)]
pub struct Store {
    pub areas: Vec<PurchasedArea>,
}

impl Store {
    pub fn new(areas: Vec<PurchasedArea>) -> Self {
        Self { areas }
    }

    pub fn add_area(&mut self, area: PurchasedArea) {
        self.areas.push(area);
    }

    pub fn get_area(&self, id: &str) -> Option<&PurchasedArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn get_area_mut(&mut self, id: &str) -> Option<&mut PurchasedArea> {
        self.areas.iter_mut().find(|a| a.id == id)
    }

    /// Case-insensitive name match
    pub fn find_areas_by_name<'a>(
        &'a self,
        fragment: &str,
    ) -> impl Iterator<Item = &'a PurchasedArea> + use<'a> {
        let fragment = fragment.to_lowercase();
        self.areas
            .iter()
            .filter(move |a| a.name.to_lowercase().contains(&fragment))
    }

    pub fn total_spent(&self) -> f64 {
        self.areas.iter().map(|a| a.total_price).sum()
    }

    /// Empties the collection, releasing every display handle.
    /// Returns how many purchases were dropped.
    pub fn clear_areas(&mut self) -> usize {
        let count = self.areas.len();
        for mut area in self.areas.drain(..) {
            if let Some(handle) = area.image_handle.take() {
                handle.release();
            }
        }
        count
    }
}
