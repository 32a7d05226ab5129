//! Spot selection over the currently available pool

use crate::error::ParkingError;
use crate::geo::{self, GeoPoint};
use crate::models::Spot;

/// A user preference resolved against the lot configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPreference {
    /// No preference stored; take the first spot by name.
    None,
    /// A specific spot by name; wins outright when it is in the pool.
    Spot(String),
    /// Minimize distance to a reference point.
    Near(GeoPoint),
}

/// Select exactly one spot from the available pool.
///
/// Selection order:
/// 1. a preferred specific spot, when present in the pool;
/// 2. the spot closest to the resolved reference point, among spots that
///    carry coordinates (equidistant candidates fall back to name order);
/// 3. the first available spot by name ascending.
///
/// The choice is advisory: callers must still win the reservation on the
/// registry before acting on it.
pub fn select_spot<'a>(
    available: &'a [Spot],
    preference: &ResolvedPreference,
) -> Result<&'a Spot, ParkingError> {
    if available.is_empty() {
        return Err(ParkingError::NoAvailableSpot);
    }

    if let ResolvedPreference::Spot(name) = preference {
        if let Some(spot) = available.iter().find(|s| &s.name == name) {
            return Ok(spot);
        }
        // Preferred spot is taken; fall through to the default ordering.
    }

    if let ResolvedPreference::Near(target) = preference {
        let mut candidates: Vec<(&Spot, f64)> = available
            .iter()
            .filter_map(|s| s.coordinates().map(|p| (s, geo::distance_m(p, *target))))
            .collect();

        if !candidates.is_empty() {
            candidates.sort_by(|(a, da), (b, db)| {
                da.total_cmp(db).then_with(|| a.name.cmp(&b.name))
            });
            return Ok(candidates[0].0);
        }
        // No spot in the pool carries coordinates; fall through.
    }

    available
        .iter()
        .min_by(|a, b| a.name.cmp(&b.name))
        .ok_or(ParkingError::NoAvailableSpot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::SpotStatus;

    fn spot(name: &str, coords: Option<(f64, f64)>) -> Spot {
        Spot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: SpotStatus::Available,
            lat: coords.map(|c| c.0),
            lng: coords.map(|c| c.1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const ENTRANCE: GeoPoint = GeoPoint {
        lat: 37.7749,
        lng: -122.4194,
    };

    #[test]
    fn empty_pool_is_terminal() {
        let result = select_spot(&[], &ResolvedPreference::None);
        assert!(matches!(result, Err(ParkingError::NoAvailableSpot)));
    }

    #[test]
    fn specific_match_wins_over_distance() {
        // A3 sits far from the entrance, B1 right next to it.
        let pool = vec![
            spot("B1", Some((ENTRANCE.lat, ENTRANCE.lng))),
            spot("A3", Some((ENTRANCE.lat + 0.01, ENTRANCE.lng))),
        ];

        let chosen = select_spot(&pool, &ResolvedPreference::Spot("A3".to_string())).unwrap();
        assert_eq!(chosen.name, "A3");
    }

    #[test]
    fn unavailable_specific_falls_back_to_name_order() {
        let pool = vec![spot("B2", None), spot("A5", None)];

        let chosen = select_spot(&pool, &ResolvedPreference::Spot("A1".to_string())).unwrap();
        assert_eq!(chosen.name, "A5");
    }

    #[test]
    fn nearest_spot_wins_for_reference_preference() {
        // ~10 m and ~50 m north of the entrance.
        let pool = vec![
            spot("A1", Some((ENTRANCE.lat + 0.00045, ENTRANCE.lng))),
            spot("A2", Some((ENTRANCE.lat + 0.00009, ENTRANCE.lng))),
        ];

        let chosen = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap();
        assert_eq!(chosen.name, "A2");
    }

    #[test]
    fn spots_without_coordinates_are_skipped_for_distance() {
        let pool = vec![
            spot("A1", None),
            spot("B9", Some((ENTRANCE.lat + 0.001, ENTRANCE.lng))),
        ];

        let chosen = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap();
        assert_eq!(chosen.name, "B9");
    }

    #[test]
    fn coordinate_free_pool_falls_back_to_name_order() {
        let pool = vec![spot("B1", None), spot("A1", None)];

        let chosen = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap();
        assert_eq!(chosen.name, "A1");
    }

    #[test]
    fn equidistant_candidates_break_ties_by_name() {
        let east = (ENTRANCE.lat, ENTRANCE.lng + 0.0002);
        let west = (ENTRANCE.lat, ENTRANCE.lng - 0.0002);
        let pool = vec![spot("B3", Some(east)), spot("A7", Some(west))];

        let chosen = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap();
        assert_eq!(chosen.name, "A7");
    }

    #[test]
    fn no_preference_takes_first_by_name() {
        let pool = vec![spot("B1", None), spot("A1", None), spot("A10", None)];

        let chosen = select_spot(&pool, &ResolvedPreference::None).unwrap();
        assert_eq!(chosen.name, "A1");
    }

    #[test]
    fn selection_is_deterministic() {
        let pool = vec![
            spot("A1", Some((ENTRANCE.lat + 0.001, ENTRANCE.lng))),
            spot("A2", Some((ENTRANCE.lat + 0.002, ENTRANCE.lng))),
        ];

        let first = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap().id;
        for _ in 0..10 {
            let again = select_spot(&pool, &ResolvedPreference::Near(ENTRANCE)).unwrap().id;
            assert_eq!(first, again);
        }
    }
}
