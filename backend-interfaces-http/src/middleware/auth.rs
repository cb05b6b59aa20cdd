use axum::http::HeaderMap;

use backend_application::commands::device_token_commands::verify_device_token;
use backend_domain::RuntimeConfig;

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Sensor signal endpoints accept either the operator bearer token or
/// the sensor's own device token.
pub fn authorize_device(config: &RuntimeConfig, headers: &HeaderMap, sensor_id: &str) -> bool {
    if authorize(config, headers) {
        return true;
    }
    let Some(secret) = config.device_secret.as_deref() else {
        return false;
    };
    extract_bearer(headers)
        .map(|token| verify_device_token(secret, sensor_id, &token))
        .unwrap_or(false)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
