//! In-memory user directory with substring search.

use crate::models::UserRecord;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Search query is required")]
    MissingQuery,
}

/// Field set used by advanced search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Email,
    Name,
    Address,
    All,
}

impl SearchType {
    /// Unknown or missing values behave as `All`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("email") => SearchType::Email,
            Some("name") => SearchType::Name,
            Some("address") => SearchType::Address,
            _ => SearchType::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Email => "email",
            SearchType::Name => "name",
            SearchType::Address => "address",
            SearchType::All => "all",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Directory with the demo accounts the front-end ships with.
    pub fn seeded() -> Self {
        Self::new(vec![
            UserRecord::new(
                "john.doe@example.com",
                "John Doe",
                "+1-555-0101",
                "123 Main Street",
                "New York",
                "NY",
                "10001",
            ),
            UserRecord::new(
                "jane.smith@example.com",
                "Jane Smith",
                "+1-555-0102",
                "456 Oak Avenue",
                "Los Angeles",
                "CA",
                "90001",
            ),
            UserRecord::new(
                "robert.johnson@example.com",
                "Robert Johnson",
                "+1-555-0103",
                "789 Pine Road",
                "Chicago",
                "IL",
                "60601",
            ),
            UserRecord::new(
                "maria.garcia@example.com",
                "Maria Garcia",
                "+1-555-0104",
                "321 Elm Street",
                "Houston",
                "TX",
                "77001",
            ),
            UserRecord::new(
                "priya.sharma@example.com",
                "Priya Sharma",
                "+91-98765-43210",
                "12 MG Road",
                "Bengaluru",
                "KA",
                "560001",
            ),
        ])
    }

    /// Case-insensitive substring search over email and name.
    pub fn search(&self, query: Option<&str>) -> Result<Vec<UserRecord>, DirectoryError> {
        let needle = normalize(query)?;

        Ok(self
            .users
            .iter()
            .filter(|u| contains_ci(&u.email, &needle) || contains_ci(&u.name, &needle))
            .cloned()
            .collect())
    }

    /// Search over the field set selected by `search_type`.
    ///
    /// Zip codes are matched case-sensitively against the raw query; every
    /// other field is matched case-insensitively.
    pub fn search_advanced(
        &self,
        query: Option<&str>,
        search_type: SearchType,
    ) -> Result<Vec<UserRecord>, DirectoryError> {
        let needle = normalize(query)?;
        let raw = query.unwrap_or_default().trim();

        let matches_address = |u: &UserRecord| {
            contains_ci(&u.address, &needle)
                || contains_ci(&u.city, &needle)
                || contains_ci(&u.state, &needle)
                || u.zip_code.contains(raw)
        };

        Ok(self
            .users
            .iter()
            .filter(|u| match search_type {
                SearchType::Email => contains_ci(&u.email, &needle),
                SearchType::Name => contains_ci(&u.name, &needle),
                SearchType::Address => matches_address(u),
                SearchType::All => {
                    contains_ci(&u.email, &needle)
                        || contains_ci(&u.name, &needle)
                        || u.phone.contains(raw)
                        || matches_address(u)
                }
            })
            .cloned()
            .collect())
    }

    /// Exact, case-insensitive email lookup.
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

fn normalize(query: Option<&str>) -> Result<String, DirectoryError> {
    match query.map(str::trim) {
        Some(q) if !q.is_empty() => Ok(q.to_lowercase()),
        _ => Err(DirectoryError::MissingQuery),
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
