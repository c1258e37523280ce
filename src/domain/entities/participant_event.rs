//! Invigilator-recorded events against an attempt (start work, submit,
//! exit/enter room).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::EventType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEvent {
	pub id: Uuid,
	pub attempt_id: Uuid,
	pub event_type: EventType,
	pub recorded_by: Uuid,
	pub timestamp: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

impl ParticipantEvent {
	pub fn new(attempt_id: Uuid, event_type: EventType, recorded_by: Uuid) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			attempt_id,
			event_type,
			recorded_by,
			timestamp: now,
			created_at: now,
		}
	}
}
