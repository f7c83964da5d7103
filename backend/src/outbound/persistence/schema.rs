//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Nullable<Varchar>,
        /// Bcrypt-encoded password.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Communities posts can be filed under.
    groups (id) {
        id -> Int4,
        title -> Varchar,
        /// Unique URL fragment.
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Int4,
        text -> Text,
        /// Set by the database on insert; drives feed ordering.
        created_at -> Timestamptz,
        author_id -> Uuid,
        group_id -> Nullable<Int4>,
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        post_id -> Int4,
        author_id -> Uuid,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Subscriptions: `user_id` follows `author_id`.
    ///
    /// The pair is unique and a row never links a user to themselves.
    follows (id) {
        id -> Int4,
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
