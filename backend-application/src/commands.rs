// Application commands (write paths)

pub mod collector_commands;
pub mod company_commands;
pub mod device_token_commands;
pub mod request_commands;
pub mod review_commands;
pub mod sensor_commands;
pub mod settlement_commands;

use crate::AppError;

pub(crate) fn normalize_required(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
