//! Admin authorization for catalog mutations.
//!
//! The admin presents a bearer token; the server only stores the token's
//! SHA-256 digest and compares digests in constant time.

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Guards mutating routes.
#[derive(Debug, Clone, Default)]
pub struct AdminGuard {
    digest: Option<[u8; 32]>,
}

impl AdminGuard {
    /// A guard that lets every request through (no admin token configured).
    pub fn open() -> Self {
        Self { digest: None }
    }

    /// A guard accepting the token whose hex SHA-256 digest is `digest_hex`.
    pub fn from_digest_hex(digest_hex: &str) -> Result<Self, AppError> {
        let bytes = hex::decode(digest_hex.trim())
            .map_err(|e| AppError::Internal(format!("Invalid admin token digest: {}", e)))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|_| {
            AppError::Internal("Invalid admin token digest: expected 32 bytes".to_string())
        })?;
        Ok(Self {
            digest: Some(digest),
        })
    }

    /// A guard accepting exactly `token`.
    pub fn from_token(token: &str) -> Self {
        Self {
            digest: Some(sha256(token)),
        }
    }

    /// Checks the `Authorization: Bearer <token>` header.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(expected) = self.digest else {
            return Ok(());
        };

        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        if constant_time_eq(&sha256(token.trim()), &expected) {
            Ok(())
        } else {
            tracing::warn!("Rejected admin request with invalid token");
            Err(AppError::Unauthorized)
        }
    }
}

fn sha256(token: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(token.as_bytes()));
    out
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
