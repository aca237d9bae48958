use super::role::Role;
use super::user::User;

/// A login attempt: the exact triple a registry entry must match.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), password: password.into(), role }
    }
}

/// User lookup collaborator. `SessionStore` consults it on every `login` and
/// never on `switch_role`/`check_auth`, which trust the persisted pair.
pub trait UserRegistry: Send + Sync {
    /// Return the record matching all three fields exactly, or `None`.
    fn find_user(&self, username: &str, password: &str, role: Role) -> Option<User>;
}
