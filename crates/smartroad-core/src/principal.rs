//! Principal: the identity held by the session store.
//!
//! Principals are never persisted. Reports carry a denormalised copy of the
//! owning principal's id and name, not a live reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// What a principal is allowed to see in the presentation layer.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  #[default]
  Citizen,
  Admin,
}

/// Opaque principal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// A fresh id for a synthesized or newly registered principal.
  pub fn generate() -> Self { Self(format!("user-{}", Uuid::new_v4().simple())) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PrincipalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// An authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub id:    PrincipalId,
  pub name:  String,
  pub email: String,
  pub role:  Role,
}

impl Principal {
  /// Synthesize a citizen from a bare email address. The display name is the
  /// local part (everything before the first `@`).
  pub fn citizen_from_email(email: &str) -> Self {
    let name = email.split('@').next().unwrap_or(email).to_owned();
    Self {
      id: PrincipalId::generate(),
      name,
      email: email.to_owned(),
      role: Role::Citizen,
    }
  }

  pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// Outcome of a sign-in or sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
  Authenticated(Principal),
  InvalidCredentials,
  /// Too many consecutive failures for this email.
  RateLimited,
  /// Sign-up with an email that already has an account.
  EmailTaken,
  /// The backend does not grant the requested role without credentials.
  Forbidden,
}

impl AuthResult {
  pub fn principal(&self) -> Option<&Principal> {
    match self {
      Self::Authenticated(p) => Some(p),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn citizen_name_is_email_local_part() {
    let p = Principal::citizen_from_email("jane.doe@example.org");
    assert_eq!(p.name, "jane.doe");
    assert_eq!(p.email, "jane.doe@example.org");
    assert_eq!(p.role, Role::Citizen);
    assert!(p.id.as_str().starts_with("user-"));
  }

  #[test]
  fn citizen_without_at_sign_uses_whole_string() {
    let p = Principal::citizen_from_email("nobody");
    assert_eq!(p.name, "nobody");
  }

  #[test]
  fn generated_ids_are_unique() {
    assert_ne!(PrincipalId::generate(), PrincipalId::generate());
  }

  #[test]
  fn role_parses_lowercase() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!(Role::Citizen.to_string(), "citizen");
  }
}
