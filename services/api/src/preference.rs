//! Stored placement preferences and their resolution

use anyhow::Result;
use tracing::info;

use crate::allocation::ResolvedPreference;
use crate::error::ParkingError;
use crate::models::{ParkingConfig, User};
use crate::validation::is_valid_spot_name;

/// Read access to the singleton lot configuration.
///
/// `get_or_create` lazily creates the row with the default reference
/// coordinates when none exists yet.
#[allow(async_fn_in_trait)]
pub trait ConfigStore {
    async fn get_or_create(&self) -> Result<ParkingConfig>;
}

/// A user's stored placement preference.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotPreference {
    None,
    Specific(String),
    Entrance,
    Exit,
    Shop,
}

impl SpotPreference {
    /// Parse the preference from the pair of columns stored on the user
    /// record. An unknown kind is rejected rather than silently ignored.
    pub fn from_record(
        kind: Option<&str>,
        preferred_spot: Option<&str>,
    ) -> Result<Self, ParkingError> {
        match kind {
            None => Ok(SpotPreference::None),
            Some("specific") => match preferred_spot {
                Some(name) => Ok(SpotPreference::Specific(name.to_string())),
                None => Err(ParkingError::InvalidPreference(
                    "specific preference without a spot name".to_string(),
                )),
            },
            Some("entrance") => Ok(SpotPreference::Entrance),
            Some("exit") => Ok(SpotPreference::Exit),
            Some("shop") => Ok(SpotPreference::Shop),
            Some(other) => Err(ParkingError::InvalidPreference(other.to_string())),
        }
    }
}

/// Resolves a user's stored preference into an allocation target.
#[derive(Clone)]
pub struct PreferenceResolver<C> {
    config_store: C,
}

impl<C: ConfigStore> PreferenceResolver<C> {
    pub fn new(config_store: C) -> Self {
        Self { config_store }
    }

    /// Resolve the preference stored on `user`.
    ///
    /// Reference-point preferences read the lot configuration, creating it
    /// with default coordinates on first access. A specific-spot preference
    /// outside the naming scheme fails with `InvalidPreference`.
    pub async fn resolve(&self, user: &User) -> Result<ResolvedPreference, ParkingError> {
        let preference =
            SpotPreference::from_record(user.preference_kind.as_deref(), user.preferred_spot.as_deref())?;

        match preference {
            SpotPreference::None => Ok(ResolvedPreference::None),
            SpotPreference::Specific(name) => {
                if !is_valid_spot_name(&name) {
                    return Err(ParkingError::InvalidPreference(name));
                }
                Ok(ResolvedPreference::Spot(name))
            }
            SpotPreference::Entrance => {
                let config = self.config_store.get_or_create().await?;
                info!("Resolved preference for user {}: closest to entrance", user.id);
                Ok(ResolvedPreference::Near(config.entrance()))
            }
            SpotPreference::Exit => {
                let config = self.config_store.get_or_create().await?;
                info!("Resolved preference for user {}: closest to exit", user.id);
                Ok(ResolvedPreference::Near(config.exit()))
            }
            SpotPreference::Shop => {
                let config = self.config_store.get_or_create().await?;
                info!("Resolved preference for user {}: closest to shop", user.id);
                Ok(ResolvedPreference::Near(config.shop()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::config::DEFAULT_ENTRANCE;
    use crate::testing::MemoryConfigStore;

    fn user_with_preference(kind: Option<&str>, spot: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "driver@example.com".to_string(),
            scan_token: Some("token".to_string()),
            preference_kind: kind.map(str::to_string),
            preferred_spot: spot.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn no_preference_resolves_to_none() {
        let resolver = PreferenceResolver::new(MemoryConfigStore::empty());
        let user = user_with_preference(None, None);

        let resolved = resolver.resolve(&user).await.unwrap();
        assert_eq!(resolved, ResolvedPreference::None);
    }

    #[tokio::test]
    async fn specific_preference_resolves_to_spot_name() {
        let resolver = PreferenceResolver::new(MemoryConfigStore::empty());
        let user = user_with_preference(Some("specific"), Some("A3"));

        let resolved = resolver.resolve(&user).await.unwrap();
        assert_eq!(resolved, ResolvedPreference::Spot("A3".to_string()));
    }

    #[tokio::test]
    async fn out_of_scheme_specific_preference_is_invalid() {
        let resolver = PreferenceResolver::new(MemoryConfigStore::empty());
        let user = user_with_preference(Some("specific"), Some("Z99"));

        let result = resolver.resolve(&user).await;
        assert!(matches!(result, Err(ParkingError::InvalidPreference(_))));
    }

    #[tokio::test]
    async fn unknown_kind_is_invalid() {
        let resolver = PreferenceResolver::new(MemoryConfigStore::empty());
        let user = user_with_preference(Some("rooftop"), None);

        let result = resolver.resolve(&user).await;
        assert!(matches!(result, Err(ParkingError::InvalidPreference(_))));
    }

    #[tokio::test]
    async fn entrance_preference_reads_lazily_created_config() {
        let store = MemoryConfigStore::empty();
        let resolver = PreferenceResolver::new(store.clone());
        let user = user_with_preference(Some("entrance"), None);

        let resolved = resolver.resolve(&user).await.unwrap();
        match resolved {
            ResolvedPreference::Near(point) => {
                assert_eq!(point.lat, DEFAULT_ENTRANCE.0);
                assert_eq!(point.lng, DEFAULT_ENTRANCE.1);
            }
            other => panic!("expected coordinate target, got {:?}", other),
        }

        // The config row now exists; a second resolve reuses it.
        assert_eq!(store.created_count(), 1);
        resolver.resolve(&user).await.unwrap();
        assert_eq!(store.created_count(), 1);
    }
}
