use serde::{Deserialize, Serialize};

/// Directory entry. Seeded at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl UserRecord {
    pub fn new(
        email: &str,
        name: &str,
        phone: &str,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
    ) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip_code: zip_code.to_string(),
        }
    }
}
