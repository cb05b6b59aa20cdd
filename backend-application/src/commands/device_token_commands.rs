use anyhow::anyhow;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use backend_domain::{DeviceTokenRequest, DeviceTokenResponse};

use crate::commands::normalize_required;
use crate::{AppError, AppState};

const TOKEN_PREFIX: &str = "whirl";
const TOKEN_VERSION: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Issue the per-device token a sensor presents on its status and RFID
/// signals. Tokens are stateless: verification recomputes the signature
/// from the configured device secret.
pub async fn issue_device_token(
    state: &AppState,
    payload: DeviceTokenRequest,
) -> Result<DeviceTokenResponse, AppError> {
    let sensor_id = normalize_required(payload.sensor_id, "sensor_id")?;
    let secret = state
        .config
        .device_secret
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("device_secret is not configured".to_string()))?;

    if state.sensor_repo.fetch_sensor(&sensor_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "sensor '{}' not found",
            sensor_id
        )));
    }

    let token = sign_device_token(secret, &sensor_id)?;
    Ok(DeviceTokenResponse { sensor_id, token })
}

pub fn sign_device_token(secret: &str, sensor_id: &str) -> Result<String, AppError> {
    let payload_to_sign = format!("{}|{}|{}", TOKEN_PREFIX, TOKEN_VERSION, sensor_id);
    let signature = sign_hmac_sha256(secret, &payload_to_sign)?;
    Ok(format!(
        "{}.{}.{}.{}",
        TOKEN_PREFIX, TOKEN_VERSION, sensor_id, signature
    ))
}

pub fn verify_device_token(secret: &str, sensor_id: &str, token: &str) -> bool {
    match sign_device_token(secret, sensor_id) {
        Ok(expected) => expected == token,
        Err(_) => false,
    }
}

fn sign_hmac_sha256(secret: &str, payload: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Internal(anyhow!("hmac init failed: {err}")))?;
    mac.update(payload.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    Ok(out)
}
