//! Cities and the stores that run the promotion in each of them.

pub const STORE_LOCATIONS: &[(&str, &[&str])] = &[
    ("Bengaluru", &["Koramangala", "Indiranagar", "Whitefield"]),
    ("Mumbai", &["Andheri", "Bandra", "Powai"]),
    ("Delhi", &["Connaught Place", "Saket", "Rajouri Garden"]),
    ("Hyderabad", &["Hitech City", "Banjara Hills"]),
    ("Chennai", &["T. Nagar", "Anna Nagar"]),
];

pub fn cities() -> impl Iterator<Item = &'static str> {
    STORE_LOCATIONS.iter().map(|(city, _)| *city)
}

/// Case-insensitive lookup of a city's stores.
pub fn stores_for(city: &str) -> Option<&'static [&'static str]> {
    let city = city.trim();
    STORE_LOCATIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city))
        .map(|(_, stores)| *stores)
}

pub fn is_known_store(city: &str, store: &str) -> bool {
    let store = store.trim();
    stores_for(city)
        .map(|stores| stores.iter().any(|s| s.eq_ignore_ascii_case(store)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_lookup() {
        assert!(stores_for("mumbai").is_some());
        assert!(stores_for("Atlantis").is_none());
        assert!(is_known_store("Delhi", "saket"));
        assert!(!is_known_store("Delhi", "Bandra"));
        assert_eq!(cities().count(), STORE_LOCATIONS.len());
    }
}
