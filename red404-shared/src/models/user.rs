use serde::{Deserialize, Deserializer, Serialize};

/// The authenticated account as the backend reports it.
///
/// This is also the exact shape cached under the `user_data` storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    /// Backend identifier of the account. Numeric ids are kept in their decimal form.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// Email address used to sign in.
    pub email: String,
}

impl User {
    /// Build a user from its identifier and email.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Signed(id) => id.to_string(),
        RawId::Unsigned(id) => id.to_string(),
    })
}
