//! HTTP Basic-auth verification and the middleware that resolves the
//! [`Caller`] for each request.
//!
//! Requests without an `Authorization` header pass through anonymously; the
//! catalogue is public and the order endpoints reject them on their own.
//! A header that is present but does not verify is always a 401.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use cinema_api::Caller;
use serde::Deserialize;

use crate::{ServerConfig, error::Error};

/// One set of credentials accepted by this server instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Verify credentials from headers against `accounts`.
///
/// Returns `Ok(None)` when no `Authorization` header is present.
pub fn verify_auth(headers: &HeaderMap, accounts: &[Account]) -> Result<Option<Caller>, Error> {
  let Some(header_val) = headers.get(axum::http::header::AUTHORIZATION) else {
    return Ok(None);
  };
  let header_val = header_val.to_str().map_err(|_| Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let account = accounts
    .iter()
    .find(|a| a.username == username)
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Some(Caller(account.username.clone())))
}

/// Middleware: insert the verified [`Caller`] into request extensions.
pub async fn resolve_caller(
  State(config): State<Arc<ServerConfig>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  match verify_auth(req.headers(), &config.accounts) {
    Ok(Some(caller)) => {
      tracing::debug!(caller = %caller.0, "authenticated");
      req.extensions_mut().insert(caller);
    }
    Ok(None) => {}
    Err(e) => {
      tracing::info!(uri = %req.uri(), "rejected credentials");
      return Err(e);
    }
  }
  Ok(next.run(req).await)
}
