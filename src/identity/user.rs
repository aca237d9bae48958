use serde::{Deserialize, Serialize};

use super::role::Role;

/// A user record as issued by the registry. Immutable once issued; the copy
/// persisted under `<role>_token_user` must round-trip through serde intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub phone: String,
    /// Responders carry their unit; citizens have none.
    #[serde(default)]
    pub department: Option<String>,
}
