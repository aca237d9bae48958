use std::fmt;
use serde::{Deserialize, Serialize};

/// Closed set of user kinds. Kept as an enum, not a free string, so every
/// role-keyed lookup is an exhaustive match and adding a role is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Responder,
}

impl Role {
    /// Declaration order; governs restore precedence in `SessionStore::check_auth`
    /// and the ordering of `logged_roles`.
    pub const ALL: [Role; 2] = [Role::Citizen, Role::Responder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Responder => "responder",
        }
    }

    /// Credential-cache key holding this role's session token.
    pub fn token_key(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen_token",
            Role::Responder => "responder_token",
        }
    }

    /// Credential-cache key holding the serialized user record paired with the token.
    pub fn user_key(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen_token_user",
            Role::Responder => "responder_token_user",
        }
    }

    /// Lenient parse for console/user input. Unknown names are `None`, never an error.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citizen" => Some(Role::Citizen),
            "responder" => Some(Role::Responder),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_citizen_first() {
        assert_eq!(Role::ALL[0], Role::Citizen);
        assert_eq!(Role::ALL[1], Role::Responder);
    }

    #[test]
    fn cache_keys_derive_from_role_name() {
        for role in Role::ALL {
            assert_eq!(role.token_key(), format!("{}_token", role));
            assert_eq!(role.user_key(), format!("{}_token_user", role));
        }
    }

    #[test]
    fn parse_is_lenient_and_closed() {
        assert_eq!(Role::parse(" Citizen "), Some(Role::Citizen));
        assert_eq!(Role::parse("RESPONDER"), Some(Role::Responder));
        assert_eq!(Role::parse("firefighter"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn serde_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Responder).unwrap(), "\"responder\"");
        let back: Role = serde_json::from_str("\"citizen\"").unwrap();
        assert_eq!(back, Role::Citizen);
    }
}
