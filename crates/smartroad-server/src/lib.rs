//! SmartRoad server: configuration, state assembly, and routing.
//!
//! The binary in `main.rs` only loads [`ServerConfig`], initialises logging,
//! and serves [`router`].

pub mod seed;

use std::time::Duration;

use anyhow::Context as _;
use argon2::PasswordHash;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use smartroad_api::{AppState, api_router};
use smartroad_core::{
  principal::{Principal, PrincipalId, Role},
  report::TransitionPolicy,
};
use smartroad_detect::Detector;
use smartroad_store_memory::{
  Account, AuthConfig, AuthMode, MemoryReportStore, MemorySessionStore,
};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// An extra account registered at startup, alongside the demo accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  pub name:          String,
  pub email:         String,
  #[serde(default)]
  pub role:          Role,
  /// Argon2 PHC string, as printed by `--hash-password`.
  pub password_hash: String,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `SMARTROAD_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// Start with the demo report set.
  pub seed_demo_data:      bool,
  pub transition_policy:   TransitionPolicy,
  pub auth_mode:           AuthMode,
  pub max_failed_attempts: u32,
  pub lockout_secs:        u64,
  /// Fixed detector seed; entropy when absent.
  pub detector_seed:       Option<u64>,
  pub accounts:            Vec<AccountConfig>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8080,
      seed_demo_data:      true,
      transition_policy:   TransitionPolicy::default(),
      auth_mode:           AuthMode::default(),
      max_failed_attempts: 5,
      lockout_secs:        300,
      detector_seed:       None,
      accounts:            Vec::new(),
    }
  }
}

// ─── State ────────────────────────────────────────────────────────────────────

pub type ServerState = AppState<MemoryReportStore, MemorySessionStore>;

/// Assemble stores and detector from `config`.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<ServerState> {
  let mut auth =
    AuthConfig::demo(config.auth_mode).context("failed to hash demo credentials")?;
  auth.max_failed_attempts = config.max_failed_attempts;
  auth.lockout = Duration::from_secs(config.lockout_secs);

  for account in &config.accounts {
    PasswordHash::new(&account.password_hash).map_err(|e| {
      anyhow::anyhow!("invalid password hash for {}: {e}", account.email)
    })?;
    auth.accounts.push(Account {
      principal:     Principal {
        id:    PrincipalId::generate(),
        name:  account.name.clone(),
        email: account.email.clone(),
        role:  account.role,
      },
      password_hash: account.password_hash.clone(),
    });
  }

  let policy = config.transition_policy;
  let reports = if config.seed_demo_data {
    MemoryReportStore::with_reports(policy, seed::demo_reports(Utc::now()))
  } else {
    MemoryReportStore::new(policy)
  };

  let detector = config.detector_seed.map_or_else(Detector::new, Detector::seeded);

  tracing::info!(
    mode = ?config.auth_mode,
    policy = ?policy,
    accounts = auth.accounts.len(),
    seeded = config.seed_demo_data,
    "state assembled"
  );

  Ok(AppState::new(reports, MemorySessionStore::new(auth), detector))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn router(state: ServerState) -> Router {
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
