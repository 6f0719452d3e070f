//! Basic-auth gate shared by the entry page and the report endpoint.
use super::*;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

/// Decodes `Authorization: Basic <base64(user:pass)>`.
pub(super) fn basic_credentials_from_headers(headers: &HeaderMap) -> Option<(String, String)> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Returns the authenticated username or a 401 challenge.
pub(super) fn authorize_dashboard_request(
    expected: &DashboardCredentials,
    headers: &HeaderMap,
) -> Result<String, DashboardApiError> {
    let Some((username, password)) = basic_credentials_from_headers(headers) else {
        tracing::warn!("dashboard request without basic credentials");
        return Err(DashboardApiError::unauthorized());
    };
    if username != expected.username || password != expected.password {
        tracing::warn!(user = %username, "dashboard credentials rejected");
        return Err(DashboardApiError::unauthorized());
    }
    Ok(username)
}
