//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes the schema, update this file to match (or regenerate it
//! with `diesel print-schema` against a migrated database).

diesel::table! {
    /// Registered pickup points.
    pickup_points (id) {
        id -> Uuid,
        registration_date -> Timestamptz,
        /// Canonical city name; constrained by a CHECK to the allow-list.
        city -> Text,
    }
}

diesel::table! {
    /// Receptions opened at pickup points.
    ///
    /// The partial unique index `receptions_one_open_per_pvz` allows at most
    /// one `in_progress` row per `pvz_id`.
    receptions (id) {
        id -> Uuid,
        date_time -> Timestamptz,
        pvz_id -> Uuid,
        /// `in_progress` or `close`.
        status -> Text,
    }
}

diesel::table! {
    /// Items received into receptions.
    products (id) {
        id -> Uuid,
        date_time -> Timestamptz,
        #[sql_name = "type"]
        item_type -> Text,
        reception_id -> Uuid,
        seq -> Int8,
    }
}

diesel::table! {
    /// Registered accounts. `email` is unique via `users_email_key`.
    users (id) {
        id -> Uuid,
        email -> Text,
        password_hash -> Text,
        role -> Text,
    }
}

diesel::joinable!(receptions -> pickup_points (pvz_id));
diesel::joinable!(products -> receptions (reception_id));

diesel::allow_tables_to_appear_in_same_query!(pickup_points, receptions, products, users);
