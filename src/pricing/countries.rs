use geo::{Intersects, Point, Rect, coord};

/// Rough rectangular bounds of a country, in degrees
pub struct CountryBounds {
    pub code: &'static str,
    pub name: &'static str,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl CountryBounds {
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Edges count as inside
    pub fn contains(&self, point: Point<f64>) -> bool {
        self.rect().intersects(&point.0)
    }
}

const fn bounds(
    code: &'static str,
    name: &'static str,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
) -> CountryBounds {
    CountryBounds {
        code,
        name,
        min_lon,
        min_lat,
        max_lon,
        max_lat,
    }
}

/// Checked in order, the first hit wins. US and CA share the 49th parallel.
pub static COUNTRY_BOUNDS: [CountryBounds; 10] = [
    bounds("US", "United States", -125.0, 24.0, -66.0, 49.0),
    bounds("CA", "Canada", -140.0, 49.0, -52.0, 70.0),
    bounds("BR", "Brazil", -74.0, -34.0, -34.0, 5.0),
    bounds("DE", "Germany", 5.5, 47.0, 15.5, 55.5),
    bounds("FR", "France", -5.5, 42.0, 8.5, 51.0),
    bounds("GB", "United Kingdom", -8.5, 49.5, 1.8, 59.0),
    bounds("IN", "India", 68.0, 7.0, 97.0, 37.5),
    bounds("CN", "China", 73.0, 18.0, 135.0, 54.0),
    bounds("AU", "Australia", 112.0, -44.0, 154.0, -10.0),
    bounds("ZA", "South Africa", 16.0, -35.0, 33.0, -22.0),
];

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_BOUNDS
        .iter()
        .find(|bounds| bounds.code == code)
        .map(|bounds| bounds.name)
}
