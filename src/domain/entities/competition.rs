//! The olympiad itself: its schedule, variant count, and lifecycle status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::CompetitionStatus;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
	pub id: Uuid,
	pub name: String,
	pub date: NaiveDate,
	pub registration_start: DateTime<Utc>,
	pub registration_end: DateTime<Utc>,
	pub variants_count: u32,
	pub max_score: u32,
	pub status: CompetitionStatus,
	pub created_by: Uuid,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Competition {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		name: impl Into<String>,
		date: NaiveDate,
		registration_start: DateTime<Utc>,
		registration_end: DateTime<Utc>,
		variants_count: u32,
		max_score: u32,
		created_by: Uuid,
	) -> Result<Self> {
		let name = name.into();
		if name.trim().chars().count() < 3 {
			return Err(Error::Validation(
				"competition name must be at least 3 characters".into(),
			));
		}
		if registration_start >= registration_end {
			return Err(Error::Validation(
				"registration start must be before registration end".into(),
			));
		}
		if variants_count < 1 {
			return Err(Error::Validation(
				"there must be at least one variant".into(),
			));
		}
		if max_score < 1 {
			return Err(Error::Validation(
				"max score must be positive".into(),
			));
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			name,
			date,
			registration_start,
			registration_end,
			variants_count,
			max_score,
			status: CompetitionStatus::Draft,
			created_by,
			created_at: now,
			updated_at: now,
		})
	}

	pub fn open_registration(&mut self) -> Result<()> {
		self.require(CompetitionStatus::Draft, "open registration")?;
		self.status = CompetitionStatus::RegistrationOpen;
		self.touch();
		Ok(())
	}

	pub fn start_competition(&mut self) -> Result<()> {
		self.require(CompetitionStatus::RegistrationOpen, "start the competition")?;
		self.status = CompetitionStatus::InProgress;
		self.touch();
		Ok(())
	}

	pub fn start_checking(&mut self) -> Result<()> {
		self.require(CompetitionStatus::InProgress, "start checking")?;
		self.status = CompetitionStatus::Checking;
		self.touch();
		Ok(())
	}

	pub fn publish_results(&mut self) -> Result<()> {
		self.require(CompetitionStatus::Checking, "publish results")?;
		self.status = CompetitionStatus::Published;
		self.touch();
		Ok(())
	}

	pub fn is_registration_open(&self) -> bool {
		self.status == CompetitionStatus::RegistrationOpen
	}

	pub fn is_in_progress(&self) -> bool {
		self.status == CompetitionStatus::InProgress
	}

	pub fn are_results_published(&self) -> bool {
		self.status == CompetitionStatus::Published
	}

	fn require(&self, expected: CompetitionStatus, action: &str) -> Result<()> {
		if self.status != expected {
			return Err(Error::invalid_state(
				format!("cannot {action} from the current status"),
				self.status.to_string(),
			));
		}
		Ok(())
	}

	fn touch(&mut self) {
		self.updated_at = Utc::now();
	}
}
