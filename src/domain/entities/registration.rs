//! Links a Participant to a Competition and tracks admission progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::RegistrationStatus;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
	pub id: Uuid,
	pub participant_id: Uuid,
	pub competition_id: Uuid,
	pub status: RegistrationStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Registration {
	pub fn new(participant_id: Uuid, competition_id: Uuid) -> Self {
		let now = Utc::now();
		Self {
			id: Uuid::new_v4(),
			participant_id,
			competition_id,
			status: RegistrationStatus::Pending,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn admit(&mut self) -> Result<()> {
		if self.status != RegistrationStatus::Pending {
			return Err(Error::invalid_state(
				"can only admit from pending status",
				self.status.to_string(),
			));
		}
		self.status = RegistrationStatus::Admitted;
		self.updated_at = Utc::now();
		Ok(())
	}

	pub fn complete(&mut self) -> Result<()> {
		if self.status != RegistrationStatus::Admitted {
			return Err(Error::invalid_state(
				"can only complete from admitted status",
				self.status.to_string(),
			));
		}
		self.status = RegistrationStatus::Completed;
		self.updated_at = Utc::now();
		Ok(())
	}

	pub fn cancel(&mut self) -> Result<()> {
		if self.status == RegistrationStatus::Cancelled {
			return Err(Error::invalid_state(
				"registration is already cancelled",
				self.status.to_string(),
			));
		}
		self.status = RegistrationStatus::Cancelled;
		self.updated_at = Utc::now();
		Ok(())
	}

	pub fn is_active(&self) -> bool {
		self.status.is_active()
	}

	pub fn can_generate_sheet(&self) -> bool {
		self.status.can_generate_sheet()
	}
}
