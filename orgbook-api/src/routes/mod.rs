/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: User lookup
/// - `organisations`: Organisation CRUD and membership

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod health;
pub mod organisations;
pub mod users;

/// Success envelope wrapping every 2xx payload:
/// `{"status": "success", "message": ..., "data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Success<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data,
        }
    }
}

/// Success response with no payload, used by operations that only
/// acknowledge (e.g. adding a member).
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub status: String,
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }
}
