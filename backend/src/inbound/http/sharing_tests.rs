//! Tests for sharing HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{ErrorCode, ItineraryItemId, TripId};
use crate::inbound::http::test_utils::{MockPorts, TEST_TOKEN, test_app};
use crate::test_support::fixtures::{at, fixture_timestamp, user};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(invite_to_trip)
        .service(list_trip_participants)
        .service(respond_to_trip_invitation)
        .service(leave_trip)
        .service(invite_to_item)
        .service(list_item_participants)
        .service(respond_to_item_invitation)
        .service(leave_item)
        .service(list_invitations);
}

fn summary(email: &str) -> UserSummary {
    let account = user(email);
    UserSummary {
        id: account.id,
        email: account.email,
        given_name: account.given_name,
        family_name: account.family_name,
    }
}

#[actix_web::test]
async fn inviting_to_a_trip_returns_the_participant() {
    let trip_id = TripId::random();
    let mut ports = MockPorts::signed_in(&user("ada@example.com"));
    ports
        .sharing
        .expect_invite()
        .withf(move |_, resource, email| {
            *resource == SharedResource::Trip(trip_id) && email.as_ref() == "bea@example.com"
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(Participant {
                user: summary("bea@example.com"),
                status: ParticipantStatus::Invited,
                invited_at: fixture_timestamp(),
                updated_at: fixture_timestamp(),
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/trips/{trip_id}/participants"))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .set_json(json!({"email": " Bea@Example.com "}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "invited");
    assert_eq!(body["user"]["email"], "bea@example.com");
    assert_eq!(body["invitedAt"], "2025-06-01T12:00:00+00:00");
}

#[actix_web::test]
async fn invitation_email_is_validated_before_calling_the_port() {
    let mut ports = MockPorts::signed_in(&user("ada@example.com"));
    ports.sharing.expect_invite().never();
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/itinerary-items/{}/participants", ItineraryItemId::random()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .set_json(json!({"email": "not-an-email"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(response).await;
    let details = error.details().expect("details present");
    assert_eq!(details["field"], "email");
    assert_eq!(details["code"], "invalid_email");
}

#[rstest]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[actix_web::test]
async fn invitation_failures_keep_their_status(
    #[case] code: ErrorCode,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::signed_in(&user("ada@example.com"));
    ports
        .sharing
        .expect_invite()
        .times(1)
        .returning(move |_, _, _| Err(Error::new(code, "refused")));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/trips/{}/participants", TripId::random()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .set_json(json!({"email": "bea@example.com"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
}

#[rstest]
#[case("/api/v1/trips/{id}/participants", true)]
#[case("/api/v1/itinerary-items/{id}/participants", false)]
#[actix_web::test]
async fn participants_are_listed_for_either_resource(
    #[case] template: &str,
    #[case] is_trip: bool,
) {
    let id = uuid::Uuid::new_v4();
    let expected = if is_trip {
        SharedResource::Trip(TripId::from_uuid(id))
    } else {
        SharedResource::ItineraryItem(ItineraryItemId::from_uuid(id))
    };
    let mut ports = MockPorts::signed_in(&user("ada@example.com"));
    ports
        .sharing_query
        .expect_list_participants()
        .withf(move |_, resource| *resource == expected)
        .times(1)
        .returning(|_, _| {
            Ok(vec![Participant {
                user: summary("bea@example.com"),
                status: ParticipantStatus::Joined,
                invited_at: at(1, 9),
                updated_at: at(2, 9),
            }])
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::get()
        .uri(&template.replace("{id}", &id.to_string()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["participants"][0]["status"], "joined");
    assert_eq!(body["participants"][0]["user"]["givenName"], "bea");
}

#[rstest]
#[case("joined", InvitationResponse::Joined, ParticipantStatus::Joined)]
#[case("declined", InvitationResponse::Declined, ParticipantStatus::Declined)]
#[actix_web::test]
async fn responding_reports_the_new_status(
    #[case] wire: &str,
    #[case] answer: InvitationResponse,
    #[case] status: ParticipantStatus,
) {
    let mut ports = MockPorts::signed_in(&user("bea@example.com"));
    ports
        .sharing
        .expect_respond()
        .withf(move |_, _, response| *response == answer)
        .times(1)
        .returning(move |_, _, _| Ok(status));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/trips/{}/invitation", TripId::random()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .set_json(json!({"status": wire}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], wire);
}

#[rstest]
#[case(json!({"status": "left"}))]
#[case(json!({"status": "invited"}))]
#[case(json!({}))]
#[actix_web::test]
async fn responses_other_than_join_or_decline_are_rejected(#[case] body: Value) {
    let mut ports = MockPorts::signed_in(&user("bea@example.com"));
    ports.sharing.expect_respond().never();
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/itinerary-items/{}/invitation", ItineraryItemId::random()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(Ok(()), StatusCode::NO_CONTENT)]
#[case(Err(ErrorCode::Conflict), StatusCode::CONFLICT)]
#[actix_web::test]
async fn leaving_maps_outcomes(
    #[case] outcome: Result<(), ErrorCode>,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::signed_in(&user("bea@example.com"));
    ports
        .sharing
        .expect_leave()
        .times(1)
        .returning(move |_, _| outcome.map_err(|code| Error::new(code, "not joined")));
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/trips/{}/participation", TripId::random()))
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn pending_invitations_describe_the_resource() {
    let trip_id = TripId::random();
    let item_id = ItineraryItemId::random();
    let mut ports = MockPorts::signed_in(&user("bea@example.com"));
    ports
        .sharing_query
        .expect_pending_invitations()
        .times(1)
        .returning(move |_| {
            Ok(vec![
                PendingInvitation {
                    resource: SharedResource::ItineraryItem(item_id),
                    title: "flight".to_owned(),
                    inviter: summary("ada@example.com"),
                    invited_at: at(3, 9),
                },
                PendingInvitation {
                    resource: SharedResource::Trip(trip_id),
                    title: "Lisbon long weekend".to_owned(),
                    inviter: summary("ada@example.com"),
                    invited_at: at(2, 9),
                },
            ])
        });
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/invitations")
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let invitations = body["invitations"].as_array().expect("array");
    assert_eq!(invitations.len(), 2);
    assert_eq!(invitations[0]["resourceType"], "itinerary_item");
    assert_eq!(invitations[0]["resourceId"], item_id.to_string());
    assert_eq!(invitations[1]["resourceType"], "trip");
    assert_eq!(invitations[1]["title"], "Lisbon long weekend");
}

#[actix_web::test]
async fn malformed_resource_ids_are_rejected() {
    let mut ports = MockPorts::signed_in(&user("ada@example.com"));
    ports.sharing_query.expect_list_participants().never();
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/trips/not-a-uuid/participants")
        .insert_header((AUTHORIZATION, TEST_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn sharing_routes_require_a_bearer_token() {
    let mut ports = MockPorts::default();
    ports.authenticator.expect_authenticate().never();
    ports.sharing_query.expect_pending_invitations().never();
    let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/invitations")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
