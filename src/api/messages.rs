//! User-facing error text.
//!
//! Every failure that reaches a screen goes through [`describe`], so the
//! wording for a given class of error is the same everywhere.

use super::ApiError;

pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection.";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

const DATABASE_HINT: &str =
    "The backend could not reach its database. Check the server's database configuration.";

/// Maps any [`ApiError`] to a single human-readable message. Never fails and
/// never returns an empty string.
pub fn describe(error: &ApiError) -> String {
    match error {
        ApiError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
        ApiError::NetworkError(_) => NETWORK_MESSAGE.to_string(),
        ApiError::Http {
            status,
            detail,
            body,
        } => describe_status(*status, detail.as_deref(), body),
        ApiError::ParseError { preview, .. } => {
            if preview.is_empty() {
                "Unexpected response from server.".to_string()
            } else {
                format!("Unexpected response from server: {}", preview)
            }
        }
        ApiError::InvalidInput(message) | ApiError::Storage(message) => {
            if message.trim().is_empty() {
                GENERIC_MESSAGE.to_string()
            } else {
                message.clone()
            }
        }
    }
}

fn describe_status(status: u16, detail: Option<&str>, body: &str) -> String {
    let detail = detail.map(str::trim).filter(|d| !d.is_empty());

    let fixed = match status {
        400 => Some("Bad request"),
        401 => Some("Unauthorized. Please log in again"),
        403 => Some("Access denied"),
        404 => Some("Resource not found"),
        500 => Some("Server error. Please try again later"),
        _ => None,
    };

    let message = match (fixed, detail) {
        (Some(phrase), Some(detail)) => format!("{}: {}", phrase, detail),
        (Some(phrase), None) => format!("{}.", phrase),
        (None, _) if (500..600).contains(&status) => {
            format!("Server error ({}). Please try again later.", status)
        }
        (None, Some(detail)) => format!("Error {}: {}", status, detail),
        (None, None) => {
            let body = body.trim();
            if body.is_empty() {
                format!("Error {}: Request failed", status)
            } else {
                format!("Error {}: {}", status, body)
            }
        }
    };

    if status >= 500 && mentions_database(detail.unwrap_or(body)) {
        format!("{} {}", message, DATABASE_HINT)
    } else {
        message
    }
}

fn mentions_database(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    ["database", "connection refused", "psycopg", "sqlalchemy", "asyncpg"]
        .iter()
        .any(|needle| text.contains(needle))
}
