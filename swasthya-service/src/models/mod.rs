//! Domain models for the SwasthyaLink gateway.

pub mod chat;
pub mod family;
pub mod relationship;
pub mod user;

pub use chat::{ChatReply, GenerateReply};
pub use family::{FamilyNetworkEntry, FamilyRequest, MemberStatus, RequestStatus, RequestTarget};
pub use relationship::{inverse_label, Relationship, RELATED};
pub use user::UserRecord;
