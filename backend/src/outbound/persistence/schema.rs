//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered user accounts, keyed by a UUID and unique by email.
    users (id) {
        id -> Uuid,
        /// Lowercased email address; unique.
        email -> Varchar,
        /// Local credential. Always empty for accounts provisioned through the
        /// identity provider.
        password_hash -> Text,
        given_name -> Varchar,
        family_name -> Varchar,
        picture_url -> Nullable<Text>,
        oauth_provider -> Nullable<Varchar>,
        oauth_subject_id -> Nullable<Varchar>,
        /// One of `unverified`, `active`, `deactivated`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trips owned by a single user.
    trips (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        start_date -> Nullable<Timestamptz>,
        end_date -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trip sharing rows; one per (trip, user).
    trip_participants (trip_id, user_id) {
        trip_id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Itinerary items. Kind-specific fields live in `fields` as JSON.
    itinerary_items (id) {
        id -> Uuid,
        owner_id -> Uuid,
        trip_id -> Nullable<Uuid>,
        /// Item kind tag, e.g. `flight`.
        item_type -> Varchar,
        fields -> Jsonb,
        /// Denormalised sort anchor derived from `fields`.
        itinerary_datetime -> Nullable<Timestamptz>,
        booking_reference -> Nullable<Text>,
        booking_url -> Nullable<Text>,
        notes -> Nullable<Text>,
        raw_details -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Item sharing rows; one per (item, user).
    itinerary_participants (itinerary_item_id, user_id) {
        itinerary_item_id -> Uuid,
        user_id -> Uuid,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(trips -> users (owner_id));
diesel::joinable!(trip_participants -> trips (trip_id));
diesel::joinable!(trip_participants -> users (user_id));
diesel::joinable!(itinerary_items -> trips (trip_id));
diesel::joinable!(itinerary_items -> users (owner_id));
diesel::joinable!(itinerary_participants -> itinerary_items (itinerary_item_id));
diesel::joinable!(itinerary_participants -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    trips,
    trip_participants,
    itinerary_items,
    itinerary_participants,
);
