//! Append-only record of every state-changing action, written in the same
//! transaction as the mutation it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
	pub id: Uuid,
	pub entity_type: String,
	pub entity_id: Uuid,
	pub action: String,
	pub user_id: Option<Uuid>,
	pub ip_address: Option<String>,
	pub details: serde_json::Value,
	pub timestamp: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

impl AuditLog {
	pub fn new(
		entity_type: impl Into<String>,
		entity_id: Uuid,
		action: impl Into<String>,
		user_id: Option<Uuid>,
		ip_address: Option<String>,
	) -> Result<Self> {
		let entity_type = entity_type.into();
		let action = action.into();
		if entity_type.is_empty() {
			return Err(Error::Validation("entity type cannot be empty".into()));
		}
		if action.is_empty() {
			return Err(Error::Validation("action cannot be empty".into()));
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			entity_type,
			entity_id,
			action,
			user_id,
			ip_address,
			details: serde_json::Value::Object(Default::default()),
			timestamp: now,
			created_at: now,
		})
	}

	/// Attach structured context sufficient to reconstruct the change
	/// (before/after values and the like).
	pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
		if let Ok(value) = serde_json::to_value(details) {
			self.details = value;
		}
		self
	}
}
