//! Session store supporting concurrent per-role logins in one context.
//! At most one role is focused at a time; switching adopts a persisted
//! credential pair without re-authenticating against the registry.

use std::sync::Arc;
use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::storage::CredentialCache;
use super::registry::{LoginRequest, UserRegistry};
use super::role::Role;
use super::user::User;

pub type SessionToken = String;

/// Snapshot of the active authenticated identity. Logged-in state is derived
/// from user presence, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
    token: Option<SessionToken>,
}

impl Session {
    fn adopt(user: User, token: SessionToken) -> Self {
        Session { user: Some(user), token: Some(token) }
    }

    pub fn is_logged_in(&self) -> bool { self.user.is_some() }
    pub fn user(&self) -> Option<&User> { self.user.as_ref() }
    pub fn token(&self) -> Option<&str> { self.token.as_deref() }
    pub fn active_role(&self) -> Option<Role> { self.user.as_ref().map(|u| u.role) }
    pub fn display_name(&self) -> Option<&str> { self.user.as_ref().map(|u| u.name.as_str()) }
    pub fn phone(&self) -> Option<&str> { self.user.as_ref().map(|u| u.phone.as_str()) }
}

/// Caller-facing result of a login attempt. Mismatched credentials and
/// unexpected faults both land here; neither is raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
}

impl LoginOutcome {
    fn ok(message: &str) -> Self { Self { success: true, message: message.into() } }
    fn failed(message: &str) -> Self { Self { success: false, message: message.into() } }
}

fn mint_token(user: &User) -> SessionToken {
    format!("{}_{}_{}", user.role, user.id, Utc::now().timestamp_millis())
}

/// One per application context. Holds the single focused session and owns the
/// coupling between it and the per-role persisted credential pairs.
pub struct SessionStore {
    registry: Arc<dyn UserRegistry>,
    cache: Arc<dyn CredentialCache>,
    state: RwLock<Session>,
}

impl SessionStore {
    pub fn new(registry: Arc<dyn UserRegistry>, cache: Arc<dyn CredentialCache>) -> Self {
        Self { registry, cache, state: RwLock::new(Session::default()) }
    }

    /// Current session snapshot, cheap to clone and safe to hand to the guard.
    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    /// Authenticate a (username, password, role) triple against the registry.
    /// On a match the minted token and user record are persisted for the role
    /// before the session is replaced; on any internal fault the outcome is a
    /// generic failure and the session is left unchanged.
    pub fn login(&self, req: &LoginRequest) -> LoginOutcome {
        match self.try_login(req) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(target: "cityalert::identity", "login fault for '{}': {:#}", req.username, e);
                LoginOutcome::failed("Login failed, please retry")
            }
        }
    }

    fn try_login(&self, req: &LoginRequest) -> Result<LoginOutcome> {
        let Some(user) = self.registry.find_user(&req.username, &req.password, req.role) else {
            return Ok(LoginOutcome::failed("Incorrect username, password or role"));
        };

        let token = mint_token(&user);
        let encoded = serde_json::to_string(&user).context("encode user record")?;
        self.cache
            .set(user.role.token_key(), &token)
            .with_context(|| format!("persist token for {}", user.role))?;
        self.cache
            .set(user.role.user_key(), &encoded)
            .with_context(|| format!("persist user record for {}", user.role))?;

        debug!(target: "cityalert::identity", "login user={} role={}", user.username, user.role);
        *self.state.write() = Session::adopt(user, token);
        Ok(LoginOutcome::ok("Login successful"))
    }

    /// Remove the active role's persisted pair and clear the session.
    /// A no-op when nothing is logged in.
    pub fn logout(&self) {
        let mut state = self.state.write();
        if let Some(role) = state.user.as_ref().map(|u| u.role) {
            self.discard_pair(role);
            debug!(target: "cityalert::identity", "logout role={}", role);
        }
        *state = Session::default();
    }

    /// Startup restore: adopt the first role, in declaration order, with a
    /// complete persisted pair. Returns false and leaves the session empty
    /// when no role has one.
    pub fn check_auth(&self) -> bool {
        for role in Role::ALL {
            if let Some((user, token)) = self.read_pair(role) {
                debug!(target: "cityalert::identity", "restored session role={}", role);
                *self.state.write() = Session::adopt(user, token);
                return true;
            }
        }
        false
    }

    /// Adopt the persisted pair for `role` without consulting the registry.
    /// Fails (returning false, session untouched) unless the pair is complete
    /// and the stored record's role matches.
    pub fn switch_role(&self, role: Role) -> bool {
        match self.read_pair(role) {
            Some((user, token)) if user.role == role => {
                debug!(target: "cityalert::identity", "switch role={}", role);
                *self.state.write() = Session::adopt(user, token);
                true
            }
            Some((user, _)) => {
                debug!(
                    target: "cityalert::identity",
                    "persisted pair under {} belongs to {}, ignoring", role, user.role
                );
                false
            }
            None => false,
        }
    }

    /// Every role, in declaration order, that holds a persisted token,
    /// regardless of which one is focused.
    pub fn logged_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| matches!(self.cache.get(role.token_key()), Ok(Some(_))))
            .collect()
    }

    /// Drop the persisted pair for `role`. If that role was focused, fall
    /// over to the first remaining logged role, or log out entirely when none
    /// remains (or its pair turns out incomplete).
    pub fn clear_role_auth(&self, role: Role) {
        self.discard_pair(role);
        if self.state.read().active_role() != Some(role) {
            return;
        }
        let next = self.logged_roles().into_iter().find(|r| *r != role);
        match next {
            Some(other) if self.switch_role(other) => {}
            _ => self.logout(),
        }
    }

    /// Read a role's persisted pair, treating anything incomplete or
    /// undecodable as absent.
    fn read_pair(&self, role: Role) -> Option<(User, SessionToken)> {
        let token = self.cache.get(role.token_key()).ok().flatten()?;
        let raw = self.cache.get(role.user_key()).ok().flatten()?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some((user, token)),
            Err(e) => {
                debug!(
                    target: "cityalert::identity",
                    "discarding undecodable user record for {}: {}", role, e
                );
                None
            }
        }
    }

    // Best-effort removal of both keys; a leftover key is treated as an
    // incomplete pair by every restore path.
    fn discard_pair(&self, role: Role) {
        if let Err(e) = self.cache.remove(role.token_key()) {
            warn!(target: "cityalert::identity", "failed to remove {}: {}", role.token_key(), e);
        }
        if let Err(e) = self.cache.remove(role.user_key()) {
            warn!(target: "cityalert::identity", "failed to remove {}: {}", role.user_key(), e);
        }
    }
}
