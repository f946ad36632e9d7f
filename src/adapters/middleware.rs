use axum::http::HeaderMap;
use tracing::warn;

use crate::{adapters::state::AppState, application::error::ApplicationError};

/// Resolves the owner identity supplied by the gateway in the X-Owner-Id
/// header. The value is opaque here; credential validation happens upstream.
///
/// A missing header is only accepted when an anonymous fallback owner is
/// configured, so unauthenticated access stays an explicit opt-in mode.
pub fn resolve_owner_id(state: &AppState, headers: &HeaderMap) -> Result<String, ApplicationError> {
    if let Some(header_value) = headers.get("X-Owner-Id") {
        let owner = header_value.to_str().map_err(|_| {
            warn!("X-Owner-Id header contains invalid UTF-8");
            ApplicationError::BadRequest("Invalid X-Owner-Id header".to_string())
        })?;

        if !owner.trim().is_empty() {
            return Ok(owner.trim().to_string());
        }
    }

    match &state.anonymous_owner {
        Some(owner) => Ok(owner.clone()),
        None => {
            warn!("Request without owner identity and no anonymous owner configured");
            Err(ApplicationError::Unauthorized)
        }
    }
}
