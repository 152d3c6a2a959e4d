//! Local mock accounts and session.
//!
//! Accounts live under one store key as a JSON array, the signed-in session
//! under another. There is no server: this only gates which CLI commands
//! may run.

use crate::store::KeyValueStore;
use crate::util::{now_epoch_ms, now_epoch_nanos, sha256_hex};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

pub const USERS_KEY: &str = "lexdraft_users";
pub const SESSION_KEY: &str = "lexdraft_session";

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "Demo@123";
const DEMO_NAME: &str = "Demo User";

const MIN_PASSWORD_LEN: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("{}", .0.join("\n"))]
    WeakPassword(Vec<String>),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("not signed in; run `lexdraft login` first")]
    NotAuthenticated,
    #[error("account store: {0}")]
    Store(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Store(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub email: String,
    pub password_sha256: String,
    pub name: String,
    pub created_at_epoch_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub token: String,
    pub created_at_epoch_ms: u64,
}

pub struct AuthService<S> {
    store: S,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Seed the demo account when no accounts exist yet.
    pub fn initialize(&self) -> Result<(), AuthError> {
        if self.users()?.is_empty() {
            tracing::debug!(email = DEMO_EMAIL, "seeding demo account");
            self.write_users(&[new_user(DEMO_EMAIL, DEMO_PASSWORD, DEMO_NAME)])?;
        }
        Ok(())
    }

    pub fn users(&self) -> Result<Vec<StoredUser>, AuthError> {
        match self.store.get(USERS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| AuthError::Store(format!("parse {USERS_KEY}: {err}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Every unmet password requirement, in a fixed order.
    pub fn validate_password(password: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            ));
        }
        if !password.chars().any(|ch| ch.is_ascii_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(|ch| ch.is_ascii_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|ch| ch.is_ascii_digit()) {
            errors.push("Password must contain at least one number".to_string());
        }
        if !password.chars().any(|ch| SPECIAL_CHARS.contains(ch)) {
            errors.push("Password must contain at least one special character".to_string());
        }
        errors
    }

    /// Create an account and sign it in.
    pub fn signup(&self, email: &str, password: &str, name: &str) -> Result<Session, AuthError> {
        if !email_pattern().is_match(email) {
            return Err(AuthError::InvalidEmail);
        }
        let problems = Self::validate_password(password);
        if !problems.is_empty() {
            return Err(AuthError::WeakPassword(problems));
        }

        let mut users = self.users()?;
        if users.iter().any(|user| user.email == email) {
            return Err(AuthError::UserExists);
        }
        users.push(new_user(email, password, name));
        self.write_users(&users)?;
        tracing::info!(email, "account created");

        self.login(email, password)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let digest = sha256_hex(password.as_bytes());
        let user = self
            .users()?
            .into_iter()
            .find(|user| user.email == email && user.password_sha256 == digest)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            token: session_token(&user.email),
            user: SessionUser {
                email: user.email,
                name: user.name,
            },
            created_at_epoch_ms: now_epoch_ms(),
        };
        let raw = serde_json::to_string(&session)
            .map_err(|err| AuthError::Store(format!("serialize session: {err}")))?;
        self.store.set(SESSION_KEY, &raw)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<Session>, AuthError> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|err| AuthError::Store(format!("parse {SESSION_KEY}: {err}"))),
            None => Ok(None),
        }
    }

    /// An unreadable session counts as signed out.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.current_session(), Ok(Some(_)))
    }

    pub fn require_session(&self) -> Result<Session, AuthError> {
        self.current_session()?.ok_or(AuthError::NotAuthenticated)
    }

    fn write_users(&self, users: &[StoredUser]) -> Result<(), AuthError> {
        let raw = serde_json::to_string(users)
            .map_err(|err| AuthError::Store(format!("serialize {USERS_KEY}: {err}")))?;
        self.store.set(USERS_KEY, &raw)?;
        Ok(())
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn new_user(email: &str, password: &str, name: &str) -> StoredUser {
    StoredUser {
        email: email.to_string(),
        password_sha256: sha256_hex(password.as_bytes()),
        name: name.to_string(),
        created_at_epoch_ms: now_epoch_ms(),
    }
}

fn session_token(email: &str) -> String {
    let seed = format!("{email}:{}:{}", now_epoch_nanos(), std::process::id());
    sha256_hex(seed.as_bytes())[..16].to_string()
}
