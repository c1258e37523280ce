//! One-time admission token: a QR code a participant presents at the
//! venue door. Only the hash is persisted; the raw value is re-derivable
//! for QR regeneration only by whoever generated it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::TokenHash;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryToken {
	pub id: Uuid,
	pub token_hash: TokenHash,
	/// Plaintext token, retained so the owning participant can redisplay
	/// their QR. Deliberately weakens "hash only" storage discipline —
	/// never indexed, never returned through admitter-facing paths.
	pub raw_token: Option<String>,
	pub registration_id: Uuid,
	pub expires_at: DateTime<Utc>,
	pub used_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

impl EntryToken {
	pub fn create(token_hash: TokenHash, registration_id: Uuid, expire_hours: i64) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			token_hash,
			raw_token: None,
			registration_id,
			expires_at: now + Duration::hours(expire_hours),
			used_at: None,
			created_at: now,
		}
	}

	/// Mark the token used. One-time use: fails if already used or expired.
	pub fn use_token(&mut self) -> Result<()> {
		if self.used_at.is_some() {
			return Err(Error::invalid_state(
				"token has already been used",
				"used".to_string(),
			));
		}
		if self.is_expired() {
			return Err(Error::invalid_state(
				"token has expired",
				"expired".to_string(),
			));
		}
		self.used_at = Some(Utc::now());
		Ok(())
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	pub fn is_used(&self) -> bool {
		self.used_at.is_some()
	}

	pub fn is_valid(&self) -> bool {
		!self.is_expired() && !self.is_used()
	}
}
