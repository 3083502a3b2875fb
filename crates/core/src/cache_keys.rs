//! Key names for the read-through list cache.

pub const REGIONS_ALL: &str = "regions:all";
pub const CITIES_ALL: &str = "cities:all";

pub fn cities_by_region(region_id: crate::types::DbId) -> String {
    format!("cities:region:{region_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_scoped_city_key() {
        assert_eq!(cities_by_region(7), "cities:region:7");
    }
}
