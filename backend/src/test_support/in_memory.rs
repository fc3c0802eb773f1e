//! In-memory implementation of every repository port.
//!
//! Behaves like the PostgreSQL adapters for the properties the services rely
//! on: unique emails, one participant row per pair, compare-and-set status
//! changes, and cascading deletes. Timestamps are rounded to microseconds on
//! write, as `TIMESTAMPTZ` columns do.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::ports::{
    ItemCandidate, ItineraryPersistenceError, ItineraryRepository, ParticipantPersistenceError,
    ParticipantRepository, TripPersistenceError, TripRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, ItemAccessFacts, ItineraryItem, ItineraryItemId, NewUser, Participant,
    ParticipantStatus, Participation, PendingInvitation, SharedResource, Trip, TripAccessFacts,
    TripId, User, UserId,
};
use crate::domain::timestamps::STORED_SUBSEC_DIGITS;

fn column(at: DateTime<Utc>) -> DateTime<Utc> {
    at.round_subsecs(STORED_SUBSEC_DIGITS)
}

fn stored_trip(trip: &Trip) -> Trip {
    Trip {
        start_date: trip.start_date.map(column),
        end_date: trip.end_date.map(column),
        created_at: column(trip.created_at),
        updated_at: column(trip.updated_at),
        ..trip.clone()
    }
}

fn stored_item(item: &ItineraryItem) -> ItineraryItem {
    ItineraryItem {
        created_at: column(item.created_at),
        updated_at: column(item.updated_at),
        ..item.clone()
    }
}

fn stored_participation(participation: &Participation) -> Participation {
    Participation {
        created_at: column(participation.created_at),
        updated_at: column(participation.updated_at),
        ..participation.clone()
    }
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    trips: HashMap<TripId, Trip>,
    items: HashMap<ItineraryItemId, ItineraryItem>,
    participants: HashMap<(SharedResource, UserId), Participation>,
}

impl State {
    fn status(&self, resource: SharedResource, user: UserId) -> Option<ParticipantStatus> {
        self.participants
            .get(&(resource, user))
            .map(|row| row.status)
    }

    fn trip_facts(&self, trip: &Trip, user: UserId) -> TripAccessFacts {
        TripAccessFacts {
            owner_id: trip.owner_id,
            status: self.status(SharedResource::Trip(trip.id), user),
        }
    }

    fn item_facts(&self, item: &ItineraryItem, user: UserId) -> ItemAccessFacts {
        ItemAccessFacts {
            owner_id: item.owner_id,
            status: self.status(SharedResource::ItineraryItem(item.id), user),
            trip: item
                .trip_id
                .and_then(|id| self.trips.get(&id))
                .map(|trip| self.trip_facts(trip, user)),
        }
    }

    fn resource_owner(&self, resource: SharedResource) -> Option<(UserId, String)> {
        match resource {
            SharedResource::Trip(id) => self
                .trips
                .get(&id)
                .map(|trip| (trip.owner_id, trip.name.as_str().to_owned())),
            SharedResource::ItineraryItem(id) => self
                .items
                .get(&id)
                .map(|item| (item.owner_id, item.kind().as_str().to_owned())),
        }
    }
}

/// Shared store backing all repository ports in tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user directly, bypassing sign-in.
    pub fn seed_user(&self, user: User) {
        self.state().users.insert(user.id, user);
    }

    /// Number of participant rows for a resource, in any status.
    #[must_use]
    pub fn participant_count(&self, resource: &SharedResource) -> usize {
        self.state()
            .participants
            .keys()
            .filter(|(key, _)| key == resource)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.get(id).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state();
        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_str()));
        }
        let stored = User {
            id: user.id,
            email: user.email.clone(),
            given_name: user.given_name.clone(),
            family_name: user.family_name.clone(),
            picture_url: user.picture_url.clone(),
            oauth: user.oauth.clone(),
            status: user.status,
            created_at: column(user.created_at),
            updated_at: column(user.created_at),
        };
        state.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        let mut state = self.state();
        if state.trips.contains_key(&trip.id) {
            return Err(TripPersistenceError::query(format!(
                "duplicate trip id {}",
                trip.id
            )));
        }
        state.trips.insert(trip.id, stored_trip(trip));
        Ok(())
    }

    async fn find(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        Ok(self.state().trips.get(id).cloned())
    }

    async fn update(&self, trip: &Trip) -> Result<bool, TripPersistenceError> {
        let mut state = self.state();
        match state.trips.get_mut(&trip.id) {
            Some(stored) => {
                *stored = stored_trip(trip);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError> {
        let mut state = self.state();
        if state.trips.remove(id).is_none() {
            return Ok(false);
        }
        state
            .participants
            .retain(|(resource, _), _| *resource != SharedResource::Trip(*id));
        for item in state.items.values_mut() {
            if item.trip_id == Some(*id) {
                item.trip_id = None;
            }
        }
        Ok(true)
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError> {
        let state = self.state();
        Ok(state
            .trips
            .values()
            .filter(|trip| {
                trip.owner_id == *user
                    || state
                        .participants
                        .contains_key(&(SharedResource::Trip(trip.id), *user))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryStore {
    async fn find_status(
        &self,
        resource: &SharedResource,
        user: &UserId,
    ) -> Result<Option<ParticipantStatus>, ParticipantPersistenceError> {
        Ok(self.state().status(*resource, *user))
    }

    async fn insert(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipantPersistenceError> {
        let mut state = self.state();
        let key = (participation.resource, participation.user_id);
        if state.participants.contains_key(&key) {
            return Err(ParticipantPersistenceError::already_exists(format!(
                "{} / user {}",
                participation.resource, participation.user_id
            )));
        }
        state.participants.insert(key, stored_participation(participation));
        Ok(())
    }

    async fn transition(
        &self,
        resource: &SharedResource,
        user: &UserId,
        from: ParticipantStatus,
        to: ParticipantStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, ParticipantPersistenceError> {
        let mut state = self.state();
        match state.participants.get_mut(&(*resource, *user)) {
            Some(row) if row.status == from => {
                row.status = to;
                row.updated_at = column(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_for_resource(
        &self,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, ParticipantPersistenceError> {
        let state = self.state();
        let mut rows: Vec<&Participation> = state
            .participants
            .values()
            .filter(|row| row.resource == *resource)
            .collect();
        rows.sort_by_key(|row| (row.created_at, row.user_id));
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                state.users.get(&row.user_id).map(|user| Participant {
                    user: user.summary(),
                    status: row.status,
                    invited_at: row.created_at,
                    updated_at: row.updated_at,
                })
            })
            .collect())
    }

    async fn list_pending_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<PendingInvitation>, ParticipantPersistenceError> {
        let state = self.state();
        let mut pending: Vec<PendingInvitation> = state
            .participants
            .values()
            .filter(|row| row.user_id == *user && row.status == ParticipantStatus::Invited)
            .filter_map(|row| {
                let (owner_id, title) = state.resource_owner(row.resource)?;
                let inviter = state.users.get(&owner_id)?.summary();
                Some(PendingInvitation {
                    resource: row.resource,
                    title,
                    inviter,
                    invited_at: row.created_at,
                })
            })
            .collect();
        pending.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
        Ok(pending)
    }
}

#[async_trait]
impl ItineraryRepository for InMemoryStore {
    async fn insert(&self, item: &ItineraryItem) -> Result<(), ItineraryPersistenceError> {
        let mut state = self.state();
        if state.items.contains_key(&item.id) {
            return Err(ItineraryPersistenceError::query(format!(
                "duplicate itinerary item id {}",
                item.id
            )));
        }
        state.items.insert(item.id, stored_item(item));
        Ok(())
    }

    async fn find(
        &self,
        id: &ItineraryItemId,
    ) -> Result<Option<ItineraryItem>, ItineraryPersistenceError> {
        Ok(self.state().items.get(id).cloned())
    }

    async fn update(&self, item: &ItineraryItem) -> Result<bool, ItineraryPersistenceError> {
        let mut state = self.state();
        match state.items.get_mut(&item.id) {
            Some(stored) => {
                *stored = stored_item(item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ItineraryItemId) -> Result<bool, ItineraryPersistenceError> {
        let mut state = self.state();
        if state.items.remove(id).is_none() {
            return Ok(false);
        }
        state
            .participants
            .retain(|(resource, _), _| *resource != SharedResource::ItineraryItem(*id));
        Ok(true)
    }

    async fn list_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<ItineraryItem>, ItineraryPersistenceError> {
        Ok(self
            .state()
            .items
            .values()
            .filter(|item| item.trip_id == Some(*trip))
            .cloned()
            .collect())
    }

    async fn list_candidates(
        &self,
        user: &UserId,
        trip: Option<TripId>,
    ) -> Result<Vec<ItemCandidate>, ItineraryPersistenceError> {
        let state = self.state();
        Ok(state
            .items
            .values()
            .filter(|item| trip.is_none() || item.trip_id == trip)
            .map(|item| ItemCandidate {
                item: item.clone(),
                access: state.item_facts(item, *user),
            })
            .filter(|candidate| {
                let facts = &candidate.access;
                facts.owner_id == *user
                    || facts.status.is_some()
                    || facts
                        .trip
                        .is_some_and(|trip| trip.owner_id == *user || trip.status.is_some())
            })
            .collect())
    }
}
