//! Tests for the sharing service.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockItineraryRepository, MockParticipantRepository, MockTripRepository, MockUserRepository,
    ParticipantPersistenceError, TripRepository,
};
use crate::domain::{ErrorCode, ItineraryItem, Trip, User};
use crate::test_support::clock::fixture_clock;
use crate::test_support::fixtures::{activity_details, at, item_owned_by, trip_owned_by, user};
use crate::test_support::in_memory::InMemoryStore;

type StoreService = SharingService<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore>;

struct Harness {
    store: Arc<InMemoryStore>,
    service: StoreService,
    owner: User,
    guest: User,
    trip: Trip,
}

impl Harness {
    fn trip_resource(&self) -> SharedResource {
        SharedResource::Trip(self.trip.id)
    }

    async fn invite_guest(&self) {
        self.service
            .invite(&self.owner.id, &self.trip_resource(), &self.guest.email)
            .await
            .expect("invitation succeeds");
    }

    async fn add_item(&self, item: &ItineraryItem) {
        crate::domain::ports::ItineraryRepository::insert(self.store.as_ref(), item)
            .await
            .expect("item stored");
    }
}

#[fixture]
async fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let owner = user("ada@example.com");
    let guest = user("grace@example.com");
    store.seed_user(owner.clone());
    store.seed_user(guest.clone());
    let trip = trip_owned_by(owner.id, Some(at(20, 9)));
    TripRepository::insert(store.as_ref(), &trip)
        .await
        .expect("trip stored");
    let service = SharingService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        fixture_clock(at(10, 12)),
    );
    Harness {
        store,
        service,
        owner,
        guest,
        trip,
    }
}

#[rstest]
#[tokio::test]
async fn invite_then_join(#[future] harness: Harness) {
    let h = harness.await;
    h.invite_guest().await;

    let pending = h
        .service
        .pending_invitations(&h.guest.id)
        .await
        .expect("pending listing");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].inviter.id, h.owner.id);
    assert_eq!(pending[0].title, "Fixture trip");

    let status = h
        .service
        .respond(&h.guest.id, &h.trip_resource(), InvitationResponse::Joined)
        .await
        .expect("join succeeds");
    assert_eq!(status, ParticipantStatus::Joined);

    let participants = h
        .service
        .list_participants(&h.guest.id, &h.trip_resource())
        .await
        .expect("participants");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].status, ParticipantStatus::Joined);
    assert!(
        h.service
            .pending_invitations(&h.guest.id)
            .await
            .expect("pending")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn second_invitation_conflicts(#[future] harness: Harness) {
    let h = harness.await;
    h.invite_guest().await;
    let error = h
        .service
        .invite(&h.owner.id, &h.trip_resource(), &h.guest.email)
        .await
        .expect_err("duplicate invite");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(h.store.participant_count(&h.trip_resource()), 1);
}

#[rstest]
#[tokio::test]
async fn declined_guests_cannot_be_invited_again(#[future] harness: Harness) {
    let h = harness.await;
    h.invite_guest().await;
    h.service
        .respond(&h.guest.id, &h.trip_resource(), InvitationResponse::Declined)
        .await
        .expect("decline");
    let error = h
        .service
        .invite(&h.owner.id, &h.trip_resource(), &h.guest.email)
        .await
        .expect_err("re-invite");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn self_invitation_conflicts(#[future] harness: Harness) {
    let h = harness.await;
    let error = h
        .service
        .invite(&h.owner.id, &h.trip_resource(), &h.owner.email)
        .await
        .expect_err("self invite");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn unknown_invitees_are_not_found(#[future] harness: Harness) {
    let h = harness.await;
    let nobody = crate::domain::EmailAddress::new("nobody@example.com").expect("email");
    let error = h
        .service
        .invite(&h.owner.id, &h.trip_resource(), &nobody)
        .await
        .expect_err("unknown email");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn participants_cannot_invite_and_strangers_see_nothing(#[future] harness: Harness) {
    let h = harness.await;
    h.invite_guest().await;
    let stranger = user("linus@example.com");
    h.store.seed_user(stranger.clone());

    let by_guest = h
        .service
        .invite(&h.guest.id, &h.trip_resource(), &stranger.email)
        .await
        .expect_err("guest invite");
    assert_eq!(by_guest.code(), ErrorCode::Forbidden);

    let by_stranger = h
        .service
        .invite(&stranger.id, &h.trip_resource(), &h.guest.email)
        .await
        .expect_err("stranger invite");
    assert_eq!(by_stranger.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(InvitationResponse::Joined)]
#[case(InvitationResponse::Declined)]
#[tokio::test]
async fn owners_cannot_respond(#[future] harness: Harness, #[case] response: InvitationResponse) {
    let h = harness.await;
    let error = h
        .service
        .respond(&h.owner.id, &h.trip_resource(), response)
        .await
        .expect_err("owner response");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn leaving_requires_having_joined(#[future] harness: Harness) {
    let h = harness.await;
    h.invite_guest().await;
    let early = h
        .service
        .leave(&h.guest.id, &h.trip_resource())
        .await
        .expect_err("leave while invited");
    assert_eq!(early.code(), ErrorCode::Conflict);

    h.service
        .respond(&h.guest.id, &h.trip_resource(), InvitationResponse::Joined)
        .await
        .expect("join");
    h.service
        .leave(&h.guest.id, &h.trip_resource())
        .await
        .expect("leave");
    let again = h
        .service
        .respond(&h.guest.id, &h.trip_resource(), InvitationResponse::Joined)
        .await
        .expect_err("rejoin after leaving");
    assert_eq!(again.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn responding_without_an_invitation_is_not_found(#[future] harness: Harness) {
    let h = harness.await;
    let error = h
        .service
        .respond(&h.guest.id, &h.trip_resource(), InvitationResponse::Joined)
        .await
        .expect_err("no invitation");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn item_sharing_is_scoped_to_the_item(#[future] harness: Harness) {
    let h = harness.await;
    let item = item_owned_by(h.owner.id, None, activity_details(at(21, 10)));
    h.add_item(&item).await;
    let resource = SharedResource::ItineraryItem(item.id);

    h.service
        .invite(&h.owner.id, &resource, &h.guest.email)
        .await
        .expect("item invitation");
    let pending = h
        .service
        .pending_invitations(&h.guest.id)
        .await
        .expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].resource, resource);
    assert_eq!(pending[0].title, "activity");

    let trip_error = h
        .service
        .list_participants(&h.guest.id, &h.trip_resource())
        .await
        .expect_err("no trip access");
    assert_eq!(trip_error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn lost_compare_and_set_is_a_conflict() {
    let owner = UserId::random();
    let guest = UserId::random();
    let trip = trip_owned_by(owner, None);
    let resource = SharedResource::Trip(trip.id);

    let mut trips = MockTripRepository::new();
    trips
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_status()
        .times(2)
        .returning(|_, _| Ok(Some(ParticipantStatus::Invited)));
    participants
        .expect_transition()
        .times(1)
        .return_once(|_, _, _, _, _| Ok(false));

    let service = SharingService::new(
        Arc::new(trips),
        Arc::new(participants),
        Arc::new(MockItineraryRepository::new()),
        Arc::new(MockUserRepository::new()),
        fixture_clock(at(10, 12)),
    );
    let error = service
        .respond(&guest, &resource, InvitationResponse::Joined)
        .await
        .expect_err("concurrent change");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

/// Participant store that yields after every status read, so concurrent
/// invitations both pass the existence check before either inserts.
struct InterleavedParticipants(Arc<InMemoryStore>);

#[async_trait]
impl ParticipantRepository for InterleavedParticipants {
    async fn find_status(
        &self,
        resource: &SharedResource,
        user: &UserId,
    ) -> Result<Option<ParticipantStatus>, ParticipantPersistenceError> {
        let status = self.0.find_status(resource, user).await;
        tokio::task::yield_now().await;
        status
    }

    async fn insert(
        &self,
        participation: &Participation,
    ) -> Result<(), ParticipantPersistenceError> {
        ParticipantRepository::insert(self.0.as_ref(), participation).await
    }

    async fn transition(
        &self,
        resource: &SharedResource,
        user: &UserId,
        from: ParticipantStatus,
        to: ParticipantStatus,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, ParticipantPersistenceError> {
        self.0.transition(resource, user, from, to, at).await
    }

    async fn list_for_resource(
        &self,
        resource: &SharedResource,
    ) -> Result<Vec<Participant>, ParticipantPersistenceError> {
        self.0.list_for_resource(resource).await
    }

    async fn list_pending_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<PendingInvitation>, ParticipantPersistenceError> {
        self.0.list_pending_for_user(user).await
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_invitations_leave_a_single_row(#[future] harness: Harness) {
    let h = harness.await;
    let service = SharingService::new(
        Arc::clone(&h.store),
        Arc::new(InterleavedParticipants(Arc::clone(&h.store))),
        Arc::clone(&h.store),
        Arc::clone(&h.store),
        fixture_clock(at(10, 12)),
    );
    let resource = h.trip_resource();

    let (first, second) = tokio::join!(
        service.invite(&h.owner.id, &resource, &h.guest.email),
        service.invite(&h.owner.id, &resource, &h.guest.email),
    );

    let (winner, loser) = match (first, second) {
        (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
        other => panic!("expected exactly one invitation to succeed, got {other:?}"),
    };
    assert_eq!(winner.status, ParticipantStatus::Invited);
    assert_eq!(loser.code(), ErrorCode::Conflict);
    assert_eq!(
        loser.details().and_then(|details| details.get("code")),
        Some(&serde_json::json!("already_invited"))
    );
    assert_eq!(h.store.participant_count(&resource), 1);
}

#[tokio::test]
async fn insert_race_losers_see_the_duplicate_invite_conflict() {
    let owner = user("ada@example.com");
    let guest = user("grace@example.com");
    let guest_email = guest.email.clone();
    let trip = trip_owned_by(owner.id, None);
    let resource = SharedResource::Trip(trip.id);

    let mut trips = MockTripRepository::new();
    trips
        .expect_find()
        .times(1)
        .return_once(move |_| Ok(Some(trip)));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(guest)));
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_status()
        .times(1)
        .return_once(|_, _| Ok(None));
    participants
        .expect_insert()
        .times(1)
        .return_once(|_| Err(ParticipantPersistenceError::already_exists("pair")));

    let service = SharingService::new(
        Arc::new(trips),
        Arc::new(participants),
        Arc::new(MockItineraryRepository::new()),
        Arc::new(users),
        fixture_clock(at(10, 12)),
    );
    let error = service
        .invite(&owner.id, &resource, &guest_email)
        .await
        .expect_err("row already exists");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details(),
        Some(&serde_json::json!({"code": "already_invited"}))
    );
}
