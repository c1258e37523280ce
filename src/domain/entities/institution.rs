//! Schools and other educational organizations, used for the seating
//! scheduler's institution-spreading policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
	pub id: Uuid,
	pub name: String,
	pub short_name: Option<String>,
	pub city: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl Institution {
	pub fn new(
		name: impl Into<String>,
		short_name: Option<String>,
		city: Option<String>,
	) -> Result<Self> {
		let name = name.into();
		if name.trim().chars().count() < 2 {
			return Err(Error::Validation(
				"institution name must be at least 2 characters".into(),
			));
		}
		Ok(Self {
			id: Uuid::new_v4(),
			name,
			short_name,
			city,
			created_at: Utc::now(),
		})
	}
}
