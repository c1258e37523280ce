//! A physical room used to seat participants during a competition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
	pub id: Uuid,
	pub competition_id: Uuid,
	pub name: String,
	pub capacity: u32,
	pub created_at: DateTime<Utc>,
}

impl Room {
	pub fn new(competition_id: Uuid, name: impl Into<String>, capacity: u32) -> Result<Self> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(Error::Validation("room name cannot be empty".into()));
		}
		if capacity < 1 {
			return Err(Error::Validation("room capacity must be positive".into()));
		}
		Ok(Self {
			id: Uuid::new_v4(),
			competition_id,
			name,
			capacity,
			created_at: Utc::now(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_zero_capacity() {
		assert!(Room::new(Uuid::new_v4(), "101", 0).is_err());
	}

	#[test]
	fn rejects_empty_name() {
		assert!(Room::new(Uuid::new_v4(), "  ", 10).is_err());
	}
}
