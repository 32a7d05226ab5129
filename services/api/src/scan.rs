//! Scan-driven arrival/departure state machine
//!
//! A scan token does not say whether the vehicle is arriving or leaving;
//! the gateway infers it from the presence of an open session. Spot
//! selection is advisory: correctness under concurrent arrivals rests
//! entirely on the registry's atomic `try_reserve`, and a lost race means
//! re-selecting from a fresh snapshot.

use tracing::{info, warn};
use uuid::Uuid;

use crate::allocation::{self, ResolvedPreference};
use crate::error::ParkingError;
use crate::models::{Session, Spot, SpotStatus, User};
use crate::preference::{ConfigStore, PreferenceResolver};

/// How many reservation races a single arrival will absorb before giving up.
const MAX_RESERVE_ATTEMPTS: usize = 3;

/// Lookup of the scanning user by token.
#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    async fn find_by_scan_token(&self, token: &str) -> Result<Option<User>, ParkingError>;
}

/// The authoritative record of spots and their occupancy.
#[allow(async_fn_in_trait)]
pub trait SpotRegistry {
    async fn list_available(&self) -> Result<Vec<Spot>, ParkingError>;

    async fn get(&self, spot_id: Uuid) -> Result<Option<Spot>, ParkingError>;

    /// Atomically transition available -> occupied. Returns `false` when a
    /// concurrent caller won the spot first.
    async fn try_reserve(&self, spot_id: Uuid) -> Result<bool, ParkingError>;

    /// Transition occupied -> available once the owning session has closed.
    async fn release(&self, spot_id: Uuid) -> Result<(), ParkingError>;
}

/// The authoritative record of parking sessions.
#[allow(async_fn_in_trait)]
pub trait SessionLedger {
    async fn find_open_session(&self, user_id: Uuid) -> Result<Option<Session>, ParkingError>;

    /// Fails with `UserAlreadyParked` if the user already has an open
    /// session.
    async fn open_session(&self, user_id: Uuid, spot_id: Uuid) -> Result<Session, ParkingError>;

    /// Sets the end timestamp. Fails with `SessionAlreadyClosed` when called
    /// twice on the same session.
    async fn close_session(&self, session_id: Uuid) -> Result<Session, ParkingError>;
}

/// Outcome of a scan, tagged by the inferred direction.
#[derive(Debug)]
pub enum ScanOutcome {
    Entrance { session: Session, spot: Spot },
    Exit { session: Session },
}

/// The state machine entry point for scan events.
#[derive(Clone)]
pub struct ScanGateway<D, R, L, C> {
    users: D,
    registry: R,
    ledger: L,
    resolver: PreferenceResolver<C>,
}

impl<D, R, L, C> ScanGateway<D, R, L, C>
where
    D: UserDirectory,
    R: SpotRegistry,
    L: SessionLedger,
    C: ConfigStore,
{
    pub fn new(users: D, registry: R, ledger: L, resolver: PreferenceResolver<C>) -> Self {
        Self {
            users,
            registry,
            ledger,
            resolver,
        }
    }

    /// Handle one scan event.
    ///
    /// An open session for the scanning user means departure; otherwise the
    /// scan is an arrival, honoring an explicitly requested spot when one is
    /// supplied.
    pub async fn scan(
        &self,
        token: &str,
        explicit_spot: Option<Uuid>,
    ) -> Result<ScanOutcome, ParkingError> {
        let user = self
            .users
            .find_by_scan_token(token)
            .await?
            .ok_or(ParkingError::InvalidToken)?;

        match self.ledger.find_open_session(user.id).await? {
            Some(open) => self.depart(&user, open).await,
            None => self.arrive(&user, explicit_spot).await,
        }
    }

    async fn depart(&self, user: &User, open: Session) -> Result<ScanOutcome, ParkingError> {
        let closed = self.ledger.close_session(open.id).await?;
        self.registry.release(closed.spot_id).await?;

        info!("User {} left spot {}", user.id, closed.spot_id);
        Ok(ScanOutcome::Exit { session: closed })
    }

    async fn arrive(
        &self,
        user: &User,
        explicit_spot: Option<Uuid>,
    ) -> Result<ScanOutcome, ParkingError> {
        let spot = match explicit_spot {
            Some(spot_id) => self.reserve_explicit(spot_id).await?,
            None => self.reserve_preferred(user).await?,
        };

        let session = match self.ledger.open_session(user.id, spot.id).await {
            Ok(session) => session,
            Err(e) => {
                // The reservation must not outlive a failed open.
                self.registry.release(spot.id).await?;
                return Err(e);
            }
        };

        info!("User {} parked at spot {}", user.id, spot.name);
        Ok(ScanOutcome::Entrance { session, spot })
    }

    /// Validate and reserve a spot the caller named explicitly.
    async fn reserve_explicit(&self, spot_id: Uuid) -> Result<Spot, ParkingError> {
        let mut spot = self
            .registry
            .get(spot_id)
            .await?
            .ok_or(ParkingError::SpotNotFound)?;

        if spot.status != SpotStatus::Available {
            return Err(ParkingError::SpotUnavailable);
        }

        if !self.registry.try_reserve(spot.id).await? {
            return Err(ParkingError::SpotUnavailable);
        }

        spot.status = SpotStatus::Occupied;
        Ok(spot)
    }

    /// Select a spot from the available pool and win its reservation.
    ///
    /// Each lost race re-selects from a fresh snapshot; a stale selection is
    /// never force-applied. An empty pool is terminal.
    async fn reserve_preferred(&self, user: &User) -> Result<Spot, ParkingError> {
        let preference = match self.resolver.resolve(user).await {
            Ok(preference) => preference,
            Err(ParkingError::InvalidPreference(value)) => {
                warn!(
                    "User {} has an invalid stored preference ({}); allocating without it",
                    user.id, value
                );
                ResolvedPreference::None
            }
            Err(e) => return Err(e),
        };

        for attempt in 1..=MAX_RESERVE_ATTEMPTS {
            let available = self.registry.list_available().await?;
            let mut candidate = allocation::select_spot(&available, &preference)?.clone();

            if self.registry.try_reserve(candidate.id).await? {
                candidate.status = SpotStatus::Occupied;
                return Ok(candidate);
            }

            warn!(
                "Lost reservation race for spot {} (attempt {}); re-selecting",
                candidate.name, attempt
            );
        }

        Err(ParkingError::NoAvailableSpot)
    }
}
