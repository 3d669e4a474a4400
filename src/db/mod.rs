//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Google subject ID -> user ID index (uniqueness guard)
    pub const IDENTITIES: &str = "identities";
    /// Email -> user ID index (uniqueness guard)
    pub const EMAILS: &str = "emails";
}
