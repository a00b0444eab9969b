//! [`MemorySessionStore`]: holds the single active principal.
//!
//! Credentials are checked against argon2 PHC hashes. In [`AuthMode::Demo`]
//! unknown credentials still sign in, as a citizen named after the email's
//! local part; [`AuthMode::Strict`] rejects them and rate-limits repeated
//! failures.

use std::{collections::HashMap, sync::Arc, time::Duration};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use smartroad_core::{
  Error, Result,
  principal::{AuthResult, Principal, PrincipalId, Role},
  store::SessionStore,
};
use tokio::{sync::Mutex, time::Instant};

// ─── Configuration ───────────────────────────────────────────────────────────

/// How unmatched credentials are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
  /// Every sign-in succeeds; sign-up discards the password.
  #[default]
  Demo,
  /// Credentials must match a registered account.
  Strict,
}

/// A registered principal and its password hash.
#[derive(Debug, Clone)]
pub struct Account {
  pub principal:     Principal,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl Account {
  /// Hash `password` and bind it to `principal`.
  pub fn new(principal: Principal, password: &str) -> Result<Self> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::Credentials(format!("argon2 error: {e}")))?
      .to_string();
    Ok(Self { principal, password_hash })
  }

  /// Exact in demo mode; trimmed and case-insensitive in strict mode.
  fn matches_email(&self, email: &str, mode: AuthMode) -> bool {
    match mode {
      AuthMode::Demo => self.principal.email == email,
      AuthMode::Strict => self.principal.email.eq_ignore_ascii_case(email.trim()),
    }
  }

  fn verify(&self, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  }
}

pub struct AuthConfig {
  pub mode:                AuthMode,
  pub accounts:            Vec<Account>,
  /// Consecutive failures per email before strict mode answers
  /// [`AuthResult::RateLimited`].
  pub max_failed_attempts: u32,
  /// How long the rate limit holds after the last failure.
  pub lockout:             Duration,
}

impl AuthConfig {
  /// The two built-in demo accounts.
  pub fn demo(mode: AuthMode) -> Result<Self> {
    Ok(Self {
      mode,
      accounts: vec![
        Account::new(demo_citizen(), "demo123")?,
        Account::new(demo_admin(), "admin123")?,
      ],
      max_failed_attempts: 5,
      lockout: Duration::from_secs(300),
    })
  }
}

pub fn demo_citizen() -> Principal {
  Principal {
    id:    PrincipalId::new("user-1"),
    name:  "Rajesh Kumar".to_owned(),
    email: "citizen@smartroad.ai".to_owned(),
    role:  Role::Citizen,
  }
}

pub fn demo_admin() -> Principal {
  Principal {
    id:    PrincipalId::new("admin-1"),
    name:  "Admin Officer".to_owned(),
    email: "admin@smartroad.ai".to_owned(),
    role:  Role::Admin,
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct State {
  active:   Option<Principal>,
  accounts: Vec<Account>,
  /// Consecutive failed sign-ins and the time of the latest, keyed by
  /// lower-cased email. Expired entries are pruned on every new failure.
  failures: HashMap<String, (u32, Instant)>,
}

/// Cloning is cheap: clones share the same session.
#[derive(Clone)]
pub struct MemorySessionStore {
  state:        Arc<Mutex<State>>,
  mode:         AuthMode,
  max_failures: u32,
  lockout:      Duration,
  admin:        Principal,
}

impl MemorySessionStore {
  pub fn new(config: AuthConfig) -> Self {
    let admin = config
      .accounts
      .iter()
      .map(|a| &a.principal)
      .find(|p| p.is_admin())
      .cloned()
      .unwrap_or_else(demo_admin);
    Self {
      state: Arc::new(Mutex::new(State {
        active:   None,
        accounts: config.accounts,
        failures: HashMap::new(),
      })),
      mode: config.mode,
      max_failures: config.max_failed_attempts,
      lockout: config.lockout,
      admin,
    }
  }

  pub fn mode(&self) -> AuthMode { self.mode }

  #[cfg(test)]
  pub(crate) async fn tracked_failures(&self) -> usize { self.state.lock().await.failures.len() }
}

impl SessionStore for MemorySessionStore {
  type Error = Error;

  async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResult> {
    let key = email.trim().to_lowercase();
    let mut state = self.state.lock().await;

    if self.mode == AuthMode::Strict
      && let Some((count, last)) = state.failures.get(&key).copied()
    {
      if last.elapsed() >= self.lockout {
        state.failures.remove(&key);
      } else if count >= self.max_failures {
        tracing::warn!(email = %key, "sign-in rate limited");
        return Ok(AuthResult::RateLimited);
      }
    }

    let matched = state
      .accounts
      .iter()
      .find(|a| a.matches_email(email, self.mode) && a.verify(password))
      .map(|a| a.principal.clone());

    let principal = match (matched, self.mode) {
      (Some(p), _) => {
        state.failures.remove(&key);
        p
      }
      (None, AuthMode::Demo) => Principal::citizen_from_email(email),
      (None, AuthMode::Strict) => {
        let lockout = self.lockout;
        state.failures.retain(|_, (_, last)| last.elapsed() < lockout);
        let entry = state.failures.entry(key).or_insert((0, Instant::now()));
        *entry = (entry.0 + 1, Instant::now());
        tracing::info!("sign-in rejected");
        return Ok(AuthResult::InvalidCredentials);
      }
    };

    tracing::info!(id = %principal.id, role = %principal.role, "signed in");
    state.active = Some(principal.clone());
    Ok(AuthResult::Authenticated(principal))
  }

  async fn sign_up(
    &self,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
  ) -> Result<AuthResult> {
    let principal = Principal {
      id: PrincipalId::generate(),
      name: name.to_owned(),
      email: email.to_owned(),
      role,
    };
    let mut state = self.state.lock().await;

    if self.mode == AuthMode::Strict {
      if role == Role::Admin {
        tracing::warn!(email = %email, "admin sign-up refused");
        return Ok(AuthResult::Forbidden);
      }
      if state.accounts.iter().any(|a| a.matches_email(email, self.mode)) {
        return Ok(AuthResult::EmailTaken);
      }
      state.accounts.push(Account::new(principal.clone(), password)?);
    }

    tracing::info!(id = %principal.id, %role, "signed up");
    state.active = Some(principal.clone());
    Ok(AuthResult::Authenticated(principal))
  }

  async fn sign_out(&self) -> Result<()> {
    if let Some(p) = self.state.lock().await.active.take() {
      tracing::info!(id = %p.id, "signed out");
    }
    Ok(())
  }

  async fn sign_in_as_admin(&self) -> Result<AuthResult> {
    if self.mode == AuthMode::Strict {
      tracing::warn!("admin shortcut refused");
      return Ok(AuthResult::Forbidden);
    }
    self.state.lock().await.active = Some(self.admin.clone());
    tracing::info!(id = %self.admin.id, "signed in as admin");
    Ok(AuthResult::Authenticated(self.admin.clone()))
  }

  async fn current(&self) -> Result<Option<Principal>> {
    Ok(self.state.lock().await.active.clone())
  }
}
