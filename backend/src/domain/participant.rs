//! Participant lifecycle shared by trip and itinerary item sharing.
//!
//! ```text
//! (none) --invite--> invited --respond(joined)--> joined --leave--> left
//!                       \--respond(declined)--> declined
//! ```
//!
//! `declined` and `left` are terminal. `unknown` is only a storage default and
//! never the target of a transition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{ItineraryItemId, TripId, UserId};
use super::user::UserSummary;

/// Status of a user's participation in a shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Unknown,
    Invited,
    Joined,
    Declined,
    Left,
}

impl ParticipantStatus {
    /// Stable storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Invited => "invited",
            Self::Joined => "joined",
            Self::Declined => "declined",
            Self::Left => "left",
        }
    }

    /// Whether a row in this status grants access to its resource.
    #[must_use]
    pub const fn grants_access(self) -> bool {
        matches!(self, Self::Invited | Self::Joined)
    }

    /// Status reached by applying `transition`, or the reason it is refused.
    ///
    /// # Examples
    /// ```
    /// use tripshare::domain::{InvitationResponse, ParticipantStatus, ParticipantTransition};
    ///
    /// let next = ParticipantStatus::Invited
    ///     .apply(ParticipantTransition::Respond(InvitationResponse::Joined))
    ///     .expect("invited users may join");
    /// assert_eq!(next, ParticipantStatus::Joined);
    /// assert!(ParticipantStatus::Invited.apply(ParticipantTransition::Leave).is_err());
    /// ```
    pub fn apply(self, transition: ParticipantTransition) -> Result<Self, TransitionError> {
        let target = transition.target();
        match (self, transition) {
            (Self::Invited, ParticipantTransition::Respond(_))
            | (Self::Joined, ParticipantTransition::Leave) => Ok(target),
            (from, _) => Err(TransitionError { from, to: target }),
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown participant status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown participant status: {0}")]
pub struct UnknownParticipantStatus(pub String);

impl FromStr for ParticipantStatus {
    type Err = UnknownParticipantStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "invited" => Ok(Self::Invited),
            "joined" => Ok(Self::Joined),
            "declined" => Ok(Self::Declined),
            "left" => Ok(Self::Left),
            other => Err(UnknownParticipantStatus(other.to_owned())),
        }
    }
}

/// Answer an invited user may give.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvitationResponse {
    Joined,
    Declined,
}

/// Participant-driven status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantTransition {
    Respond(InvitationResponse),
    Leave,
}

impl ParticipantTransition {
    /// Status the transition moves to when permitted.
    #[must_use]
    pub const fn target(self) -> ParticipantStatus {
        match self {
            Self::Respond(InvitationResponse::Joined) => ParticipantStatus::Joined,
            Self::Respond(InvitationResponse::Declined) => ParticipantStatus::Declined,
            Self::Leave => ParticipantStatus::Left,
        }
    }
}

/// Refused status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move participant from {from} to {to}")]
pub struct TransitionError {
    pub from: ParticipantStatus,
    pub to: ParticipantStatus,
}

/// Resource that can be shared with other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SharedResource {
    Trip(TripId),
    ItineraryItem(ItineraryItemId),
}

impl SharedResource {
    /// Human-readable resource kind used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Trip(_) => "trip",
            Self::ItineraryItem(_) => "itinerary item",
        }
    }
}

impl fmt::Display for SharedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trip(id) => write!(f, "trip {id}"),
            Self::ItineraryItem(id) => write!(f, "itinerary item {id}"),
        }
    }
}

/// A user's participation record for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub resource: SharedResource,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant listing entry joined with the participant's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user: UserSummary,
    pub status: ParticipantStatus,
    pub invited_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outstanding invitation addressed to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitation {
    pub resource: SharedResource,
    /// Trip name, or item kind for itinerary items.
    pub title: String,
    /// Owner of the shared resource.
    pub inviter: UserSummary,
    pub invited_at: DateTime<Utc>,
}
