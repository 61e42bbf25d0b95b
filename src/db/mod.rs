//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;
