//! Tests for the trip service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockItineraryRepository, MockParticipantRepository, MockTripRepository};
use crate::domain::{ErrorCode, ParticipantStatus};
use crate::test_support::clock::fixture_clock;
use crate::test_support::fixtures::{
    accommodation_details, activity_details, at, item_owned_by, trip_draft, trip_owned_by,
};

type Service = TripService<MockTripRepository, MockParticipantRepository, MockItineraryRepository>;

fn make_service(
    trips: MockTripRepository,
    participants: MockParticipantRepository,
    items: MockItineraryRepository,
) -> Service {
    TripService::new(
        Arc::new(trips),
        Arc::new(participants),
        Arc::new(items),
        fixture_clock(at(10, 12)),
    )
}

#[tokio::test]
async fn create_persists_a_trip_owned_by_the_actor() {
    let owner = UserId::random();
    let mut trips = MockTripRepository::new();
    trips
        .expect_insert()
        .withf(move |trip| trip.owner_id == owner && trip.name.as_str() == "Lisbon")
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(
        trips,
        MockParticipantRepository::new(),
        MockItineraryRepository::new(),
    );
    let trip = service
        .create_trip(&owner, trip_draft("Lisbon", Some(at(20, 9)), None))
        .await
        .expect("trip created");
    assert_eq!(trip.created_at, at(10, 12));
    assert_eq!(trip.updated_at, trip.created_at);
}

#[rstest]
#[case(false, 3)]
#[case(true, 1)]
#[tokio::test]
async fn list_orders_and_filters_trips(#[case] future_only: bool, #[case] expected_len: usize) {
    let owner = UserId::random();
    let undated = trip_owned_by(owner, None);
    let past = trip_owned_by(owner, Some(at(2, 9)));
    let upcoming = trip_owned_by(owner, Some(at(20, 9)));
    let stored = vec![undated.clone(), upcoming.clone(), past.clone()];

    let mut trips = MockTripRepository::new();
    trips
        .expect_list_for_member()
        .times(1)
        .return_once(move |_| Ok(stored));

    let service = make_service(
        trips,
        MockParticipantRepository::new(),
        MockItineraryRepository::new(),
    );
    let listed = service
        .list_trips(&owner, future_only)
        .await
        .expect("listing succeeds");
    assert_eq!(listed.len(), expected_len);
    if future_only {
        assert_eq!(listed[0].id, upcoming.id);
    } else {
        let ids: Vec<_> = listed.iter().map(|trip| trip.id).collect();
        assert_eq!(ids, vec![past.id, upcoming.id, undated.id]);
    }
}

#[tokio::test]
async fn details_include_items_in_chronological_order() {
    let owner = UserId::random();
    let trip = trip_owned_by(owner, Some(at(10, 9)));
    let trip_id = trip.id;
    let late = item_owned_by(owner, Some(trip_id), accommodation_details(at(12, 15)));
    let early = item_owned_by(owner, Some(trip_id), activity_details(at(11, 9)));
    let stored = vec![late.clone(), early.clone()];

    let mut trips = MockTripRepository::new();
    trips
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));
    let mut items = MockItineraryRepository::new();
    items
        .expect_list_for_trip()
        .times(1)
        .return_once(move |_| Ok(stored));

    let service = make_service(trips, MockParticipantRepository::new(), items);
    let details = service
        .trip_details(&owner, &trip_id)
        .await
        .expect("details");
    assert_eq!(details.items, vec![early, late]);
}

#[tokio::test]
async fn participants_cannot_delete_trips() {
    let guest = UserId::random();
    let trip = trip_owned_by(UserId::random(), None);
    let trip_id = trip.id;

    let mut trips = MockTripRepository::new();
    trips
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));
    trips.expect_delete().never();
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_status()
        .times(1)
        .return_once(|_, _| Ok(Some(ParticipantStatus::Joined)));

    let service = make_service(trips, participants, MockItineraryRepository::new());
    let error = service
        .delete_trip(&guest, &trip_id)
        .await
        .expect_err("guest delete");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn invalid_patches_leave_the_store_untouched() {
    let owner = UserId::random();
    let trip = trip_owned_by(owner, Some(at(10, 9)));
    let trip_id = trip.id;

    let mut trips = MockTripRepository::new();
    trips
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));
    trips.expect_update().never();

    let service = make_service(
        trips,
        MockParticipantRepository::new(),
        MockItineraryRepository::new(),
    );
    let patch = TripPatch {
        end_date: Some(Some(at(5, 9))),
        ..TripPatch::default()
    };
    let error = service
        .update_trip(&owner, &trip_id, patch)
        .await
        .expect_err("end before start");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("endDate"))
    );
}

mod over_store {
    //! Behaviour against the in-memory store rather than mocks.
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::domain::ports::{ParticipantRepository, TripRepository};
    use crate::domain::{Participation, SharedResource, TripPatch};
    use crate::test_support::in_memory::InMemoryStore;

    type StoreService = TripService<InMemoryStore, InMemoryStore, InMemoryStore>;

    fn store_service(store: &Arc<InMemoryStore>, now: DateTime<Utc>) -> StoreService {
        TripService::new(
            Arc::clone(store),
            Arc::clone(store),
            Arc::clone(store),
            fixture_clock(now),
        )
    }

    fn nanos_after(base: DateTime<Utc>, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(base.timestamp(), nanos)
            .single()
            .expect("valid timestamp")
    }

    async fn seed_participation(
        store: &InMemoryStore,
        trip: &Trip,
        user: UserId,
        status: ParticipantStatus,
    ) {
        TripRepository::insert(store, trip).await.expect("trip stored");
        ParticipantRepository::insert(
            store,
            &Participation {
                resource: SharedResource::Trip(trip.id),
                user_id: user,
                status,
                created_at: at(5, 9),
                updated_at: at(6, 9),
            },
        )
        .await
        .expect("participant stored");
    }

    #[tokio::test]
    async fn stored_trips_read_back_unchanged_with_a_fine_grained_clock() {
        let store = Arc::new(InMemoryStore::new());
        let service = store_service(&store, nanos_after(at(10, 12), 987_654_321));
        let owner = UserId::random();

        let start = nanos_after(at(20, 9), 555_555_555);
        let created = service
            .create_trip(&owner, trip_draft("Lisbon", Some(start), None))
            .await
            .expect("created");
        let fetched = service
            .trip_details(&owner, &created.id)
            .await
            .expect("details");
        assert_eq!(fetched.trip, created);

        let patch = TripPatch {
            end_date: Some(Some(nanos_after(at(24, 18), 1))),
            ..TripPatch::default()
        };
        let updated = service
            .update_trip(&owner, &created.id, patch)
            .await
            .expect("updated");
        let refetched = service
            .trip_details(&owner, &created.id)
            .await
            .expect("details");
        assert_eq!(refetched.trip, updated);
    }

    #[rstest]
    #[case(ParticipantStatus::Declined)]
    #[case(ParticipantStatus::Left)]
    #[tokio::test]
    async fn former_participants_still_list_the_trip_but_cannot_open_it(
        #[case] status: ParticipantStatus,
    ) {
        let store = Arc::new(InMemoryStore::new());
        let service = store_service(&store, at(10, 12));
        let guest = UserId::random();
        let trip = trip_owned_by(UserId::random(), Some(at(20, 9)));
        seed_participation(&store, &trip, guest, status).await;

        let listed = service.list_trips(&guest, false).await.expect("listing");
        assert_eq!(
            listed.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![trip.id]
        );
        let error = service
            .trip_details(&guest, &trip.id)
            .await
            .expect_err("no access");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn undated_trips_list_last() {
        let store = Arc::new(InMemoryStore::new());
        let service = store_service(&store, at(10, 12));
        let owner = UserId::random();
        let undated = trip_owned_by(owner, None);
        let upcoming = trip_owned_by(owner, Some(at(20, 9)));
        let past = trip_owned_by(owner, Some(at(2, 9)));
        for trip in [&undated, &upcoming, &past] {
            TripRepository::insert(store.as_ref(), trip)
                .await
                .expect("trip stored");
        }

        let all = service.list_trips(&owner, false).await.expect("listing");
        assert_eq!(
            all.iter().map(|trip| trip.id).collect::<Vec<_>>(),
            vec![past.id, upcoming.id, undated.id]
        );
        let future = service.list_trips(&owner, true).await.expect("listing");
        assert_eq!(
            future.iter().map(|trip| trip.id).collect::<Vec<_>>(),
            vec![upcoming.id]
        );
    }
}
