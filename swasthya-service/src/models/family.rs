//! Family connection requests and network entries.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a family request. Leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a request is addressed to.
///
/// Members without an account are addressed by name; the name then doubles as
/// their network key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    ByEmail { email: String, name: Option<String> },
    ByName(String),
}

impl RequestTarget {
    /// Build a target from the optional wire fields, ignoring blank values.
    pub fn from_parts(to_email: Option<String>, to_name: Option<String>) -> Option<Self> {
        let to_email = to_email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        let to_name = to_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        match (to_email, to_name) {
            (Some(email), name) => Some(RequestTarget::ByEmail { email, name }),
            (None, Some(name)) => Some(RequestTarget::ByName(name)),
            (None, None) => None,
        }
    }

    /// Identity used for duplicate detection and as the network key.
    pub fn key(&self) -> &str {
        match self {
            RequestTarget::ByEmail { email, .. } => email,
            RequestTarget::ByName(name) => name,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            RequestTarget::ByEmail { email, .. } => Some(email),
            RequestTarget::ByName(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RequestTarget::ByEmail { name, .. } => name.as_deref(),
            RequestTarget::ByName(name) => Some(name),
        }
    }

    /// Loose match against a stored identifier: equal to either the email or
    /// the name carried by this target.
    pub fn matches(&self, identifier: &str) -> bool {
        self.email() == Some(identifier) || self.name() == Some(identifier)
    }
}

impl Serialize for RequestTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            to_email: Option<&'a str>,
            to_name: Option<&'a str>,
        }

        Wire {
            to_email: self.email(),
            to_name: self.name(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRequest {
    pub id: String,
    pub from_email: String,
    #[serde(flatten)]
    pub target: RequestTarget,
    pub relationship: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl FamilyRequest {
    pub fn new(from_email: String, target: RequestTarget, relationship: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_email,
            target,
            relationship,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Same sender, target and relationship, and still pending.
    pub fn duplicates(&self, from_email: &str, target: &RequestTarget, relationship: &str) -> bool {
        self.is_pending()
            && self.from_email == from_email
            && self.target.key() == target.key()
            && self.relationship == relationship
    }

    /// Whether `email` is the addressee, by email or by the name field.
    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.target.matches(email)
    }

    /// Move out of `Pending`. Callers check `is_pending` first.
    pub(crate) fn resolve(&mut self, status: RequestStatus) {
        self.status = status;
        self.responded_at = Some(Utc::now());
    }
}

/// Member status inside a network. Entries only exist once accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyNetworkEntry {
    /// Member email, or the member's name when no email is known.
    pub email: String,
    pub name: String,
    /// Relationship of this member to the network owner.
    pub relationship: String,
    pub status: MemberStatus,
    pub added_at: DateTime<Utc>,
}

impl FamilyNetworkEntry {
    pub fn accepted(email: String, name: String, relationship: String) -> Self {
        Self {
            email,
            name,
            relationship,
            status: MemberStatus::Accepted,
            added_at: Utc::now(),
        }
    }
}
