//! A supporting document uploaded for a participant (e.g. proof of
//! eligibility).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
	pub id: Uuid,
	pub participant_id: Uuid,
	pub file_path: String,
	pub file_type: String,
	pub created_at: DateTime<Utc>,
}

impl Document {
	pub fn new(
		participant_id: Uuid,
		file_path: impl Into<String>,
		file_type: impl Into<String>,
	) -> Result<Self> {
		let file_path = file_path.into();
		let file_type = file_type.into();
		if file_path.is_empty() {
			return Err(Error::Validation("file path cannot be empty".into()));
		}
		if file_type.is_empty() {
			return Err(Error::Validation("file type cannot be empty".into()));
		}
		Ok(Self {
			id: Uuid::new_v4(),
			participant_id,
			file_path,
			file_type,
			created_at: Utc::now(),
		})
	}
}
