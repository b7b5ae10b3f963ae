use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
}

/// What the server remembers about a signed-in visitor. Never part of any rendered page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub visits: u64,
    /// Unix timestamp in seconds.
    pub last_seen: u64,
}
