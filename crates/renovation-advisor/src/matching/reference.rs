use crate::archetypes::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// National capital used as the stand-in location for every archetype of a
/// country. Per-archetype coordinates from upstream are not trusted.
const COUNTRY_REFERENCE_POINTS: &[(&str, f64, f64)] = &[
    ("Austria", 48.2082, 16.3738),
    ("Belgium", 50.8503, 4.3517),
    ("Bulgaria", 42.6977, 23.3219),
    ("Croatia", 45.8150, 15.9819),
    ("Cyprus", 35.1856, 33.3823),
    ("Czechia", 50.0755, 14.4378),
    ("Czech Republic", 50.0755, 14.4378),
    ("Denmark", 55.6761, 12.5683),
    ("Estonia", 59.4370, 24.7536),
    ("Finland", 60.1699, 24.9384),
    ("France", 48.8566, 2.3522),
    ("Germany", 52.5200, 13.4050),
    ("Greece", 37.9838, 23.7275),
    ("Hungary", 47.4979, 19.0402),
    ("Ireland", 53.3498, -6.2603),
    ("Italy", 41.9028, 12.4964),
    ("Latvia", 56.9496, 24.1052),
    ("Lithuania", 54.6872, 25.2797),
    ("Luxembourg", 49.6116, 6.1319),
    ("Malta", 35.8989, 14.5146),
    ("Netherlands", 52.3676, 4.9041),
    ("Norway", 59.9139, 10.7522),
    ("Poland", 52.2297, 21.0122),
    ("Portugal", 38.7223, -9.1393),
    ("Romania", 44.4268, 26.1025),
    ("Serbia", 44.7866, 20.4489),
    ("Slovakia", 48.1486, 17.1077),
    ("Slovenia", 46.0569, 14.5058),
    ("Spain", 40.4168, -3.7038),
    ("Sweden", 59.3293, 18.0686),
    ("Switzerland", 46.9480, 7.4474),
    ("United Kingdom", 51.5074, -0.1278),
    ("UK", 51.5074, -0.1278),
];

/// Reference point for `country`, matched case-insensitively.
pub fn reference_point(country: &str) -> Option<Coordinates> {
    let country = country.trim();
    COUNTRY_REFERENCE_POINTS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(country))
        .map(|&(_, lat, lon)| Coordinates::new(lat, lon))
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Distance from `origin` to the country's reference point, `+inf` when unmapped.
pub fn country_distance_km(origin: Coordinates, country: &str) -> f64 {
    reference_point(country)
        .map(|point| haversine_km(origin, point))
        .unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn athens_to_rome_is_roughly_1050_km() {
        let athens = reference_point("Greece").expect("greece mapped");
        let rome = reference_point("italy").expect("lookup ignores case");
        let distance = haversine_km(athens, rome);
        assert!((distance - 1052.0).abs() < 15.0, "distance was {distance}");
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let point = Coordinates::new(37.98, 23.73);
        assert!(haversine_km(point, point).abs() < 1e-9);
    }

    #[test]
    fn unmapped_country_is_infinitely_far() {
        let origin = Coordinates::new(37.98, 23.73);
        assert!(country_distance_km(origin, "Atlantis").is_infinite());
    }
}
