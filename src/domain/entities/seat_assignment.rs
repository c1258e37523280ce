//! Assigns a registration to a room, seat, and test variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAssignment {
	pub id: Uuid,
	pub registration_id: Uuid,
	pub room_id: Uuid,
	pub seat_number: u32,
	pub variant_number: u32,
	pub created_at: DateTime<Utc>,
}

impl SeatAssignment {
	pub fn new(
		registration_id: Uuid,
		room_id: Uuid,
		seat_number: u32,
		variant_number: u32,
	) -> Result<Self> {
		if seat_number < 1 {
			return Err(Error::Validation("seat number must be positive".into()));
		}
		if variant_number < 1 {
			return Err(Error::Validation("variant number must be positive".into()));
		}
		Ok(Self {
			id: Uuid::new_v4(),
			registration_id,
			room_id,
			seat_number,
			variant_number,
			created_at: Utc::now(),
		})
	}
}
