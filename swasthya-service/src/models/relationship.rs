//! Relationship labels and their inverses.
//!
//! A request states the relationship from the sender's point of view
//! ("Alice's Parent is Bob"); the receiving side of the network stores the
//! inverse ("Bob's Child is Alice").

/// Label used for any relationship without a known inverse.
pub const RELATED: &str = "Related";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    Spouse,
    Parent,
    Child,
    Sibling,
    Grandparent,
    Grandchild,
    UncleAunt,
    NieceNephew,
    Cousin,
    Friend,
    Caregiver,
    Patient,
    /// Any label outside the table. Renders and inverts as [`RELATED`].
    Unknown,
}

impl Relationship {
    /// Every label with a defined inverse.
    pub const KNOWN: [Relationship; 12] = [
        Relationship::Spouse,
        Relationship::Parent,
        Relationship::Child,
        Relationship::Sibling,
        Relationship::Grandparent,
        Relationship::Grandchild,
        Relationship::UncleAunt,
        Relationship::NieceNephew,
        Relationship::Cousin,
        Relationship::Friend,
        Relationship::Caregiver,
        Relationship::Patient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Spouse => "Spouse",
            Relationship::Parent => "Parent",
            Relationship::Child => "Child",
            Relationship::Sibling => "Sibling",
            Relationship::Grandparent => "Grandparent",
            Relationship::Grandchild => "Grandchild",
            Relationship::UncleAunt => "Uncle/Aunt",
            Relationship::NieceNephew => "Niece/Nephew",
            Relationship::Cousin => "Cousin",
            Relationship::Friend => "Friend",
            Relationship::Caregiver => "Caregiver",
            Relationship::Patient => "Patient",
            Relationship::Unknown => RELATED,
        }
    }

    /// Exact, case-sensitive label match. Total: anything else is `Unknown`.
    pub fn parse(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|r| r.as_str() == label)
            .unwrap_or(Relationship::Unknown)
    }

    pub fn inverse(self) -> Self {
        match self {
            Relationship::Spouse => Relationship::Spouse,
            Relationship::Parent => Relationship::Child,
            Relationship::Child => Relationship::Parent,
            Relationship::Sibling => Relationship::Sibling,
            Relationship::Grandparent => Relationship::Grandchild,
            Relationship::Grandchild => Relationship::Grandparent,
            Relationship::UncleAunt => Relationship::NieceNephew,
            Relationship::NieceNephew => Relationship::UncleAunt,
            Relationship::Cousin => Relationship::Cousin,
            Relationship::Friend => Relationship::Friend,
            Relationship::Caregiver => Relationship::Patient,
            Relationship::Patient => Relationship::Caregiver,
            Relationship::Unknown => Relationship::Unknown,
        }
    }
}

/// Inverse of a free-form label. Unknown labels map to [`RELATED`].
pub fn inverse_label(label: &str) -> &'static str {
    Relationship::parse(label).inverse().as_str()
}
