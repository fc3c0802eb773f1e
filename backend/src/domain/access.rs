//! Access decisions for trips and itinerary items.
//!
//! The rules are pure functions over ownership and participant status so the
//! store-backed service, listing filters, and tests share one definition.
//! Reading and writing use the same predicate; there is no read-only role.

use super::ids::UserId;
use super::participant::ParticipantStatus;

/// Facts needed to decide access to a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripAccessFacts {
    pub owner_id: UserId,
    /// Subject's participant status on the trip, if a row exists.
    pub status: Option<ParticipantStatus>,
}

/// Facts needed to decide access to an itinerary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAccessFacts {
    pub owner_id: UserId,
    /// Subject's participant status on the item itself.
    pub status: Option<ParticipantStatus>,
    /// Facts about the parent trip, when the item belongs to one.
    pub trip: Option<TripAccessFacts>,
}

/// Whether `user` may read or modify the trip described by `facts`.
///
/// # Examples
/// ```
/// use tripshare::domain::{ParticipantStatus, TripAccessFacts, UserId, trip_access};
///
/// let owner = UserId::random();
/// let guest = UserId::random();
/// let facts = TripAccessFacts { owner_id: owner, status: Some(ParticipantStatus::Left) };
/// assert!(trip_access(&owner, &facts));
/// assert!(!trip_access(&guest, &facts));
/// ```
#[must_use]
pub fn trip_access(user: &UserId, facts: &TripAccessFacts) -> bool {
    facts.owner_id == *user || facts.status.is_some_and(ParticipantStatus::grants_access)
}

/// Whether `user` may read or modify the item described by `facts`.
///
/// The creator keeps access even after losing access to the parent trip.
#[must_use]
pub fn item_access(user: &UserId, facts: &ItemAccessFacts) -> bool {
    facts.owner_id == *user
        || facts
            .trip
            .as_ref()
            .is_some_and(|trip| trip_access(user, trip))
        || facts.status.is_some_and(ParticipantStatus::grants_access)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, false)]
    #[case(Some(ParticipantStatus::Unknown), false)]
    #[case(Some(ParticipantStatus::Invited), true)]
    #[case(Some(ParticipantStatus::Joined), true)]
    #[case(Some(ParticipantStatus::Declined), false)]
    #[case(Some(ParticipantStatus::Left), false)]
    fn trip_access_follows_participant_status(
        #[case] status: Option<ParticipantStatus>,
        #[case] expected: bool,
    ) {
        let guest = UserId::random();
        let facts = TripAccessFacts {
            owner_id: UserId::random(),
            status,
        };
        assert_eq!(trip_access(&guest, &facts), expected);
    }

    #[test]
    fn item_access_inherits_from_trip() {
        let guest = UserId::random();
        let facts = ItemAccessFacts {
            owner_id: UserId::random(),
            status: None,
            trip: Some(TripAccessFacts {
                owner_id: UserId::random(),
                status: Some(ParticipantStatus::Joined),
            }),
        };
        assert!(item_access(&guest, &facts));
    }

    #[test]
    fn item_scope_sharing_is_independent_of_trip_status() {
        let guest = UserId::random();
        let facts = ItemAccessFacts {
            owner_id: UserId::random(),
            status: Some(ParticipantStatus::Invited),
            trip: Some(TripAccessFacts {
                owner_id: UserId::random(),
                status: Some(ParticipantStatus::Declined),
            }),
        };
        assert!(item_access(&guest, &facts));
    }

    #[test]
    fn creator_keeps_access_after_leaving_the_trip() {
        let creator = UserId::random();
        let facts = ItemAccessFacts {
            owner_id: creator,
            status: None,
            trip: Some(TripAccessFacts {
                owner_id: UserId::random(),
                status: Some(ParticipantStatus::Left),
            }),
        };
        assert!(item_access(&creator, &facts));
    }

    #[test]
    fn unrelated_users_are_denied() {
        let stranger = UserId::random();
        let facts = ItemAccessFacts {
            owner_id: UserId::random(),
            status: Some(ParticipantStatus::Left),
            trip: None,
        };
        assert!(!item_access(&stranger, &facts));
    }
}
