//! Participant profile (extends a [`User`](super::user::User) with
//! olympiad-specific data).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
	pub id: Uuid,
	pub user_id: Uuid,
	pub full_name: String,
	pub school: String,
	pub grade: Option<u32>,
	pub institution_id: Option<Uuid>,
	pub dob: Option<chrono::NaiveDate>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Participant {
	pub fn new(
		user_id: Uuid,
		full_name: impl Into<String>,
		school: impl Into<String>,
		grade: Option<u32>,
		institution_id: Option<Uuid>,
		dob: Option<chrono::NaiveDate>,
	) -> Result<Self> {
		let full_name = full_name.into();
		let school = school.into();
		validate_full_name(&full_name)?;
		validate_school(&school)?;
		if let Some(grade) = grade {
			validate_grade(grade)?;
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			user_id,
			full_name,
			school,
			grade,
			institution_id,
			dob,
			created_at: now,
			updated_at: now,
		})
	}

	pub fn update_profile(
		&mut self,
		full_name: Option<String>,
		school: Option<String>,
		grade: Option<u32>,
	) -> Result<()> {
		if let Some(full_name) = full_name {
			validate_full_name(&full_name)?;
			self.full_name = full_name;
		}
		if let Some(school) = school {
			validate_school(&school)?;
			self.school = school;
		}
		if let Some(grade) = grade {
			validate_grade(grade)?;
			self.grade = Some(grade);
		}
		self.updated_at = Utc::now();
		Ok(())
	}
}

fn validate_full_name(value: &str) -> Result<()> {
	if value.trim().chars().count() < 2 {
		return Err(Error::Validation(
			"full name must be at least 2 characters".into(),
		));
	}
	Ok(())
}

fn validate_school(value: &str) -> Result<()> {
	if value.trim().chars().count() < 2 {
		return Err(Error::Validation(
			"school name must be at least 2 characters".into(),
		));
	}
	Ok(())
}

fn validate_grade(grade: u32) -> Result<()> {
	if !(1..=12).contains(&grade) {
		return Err(Error::Validation("grade must be between 1 and 12".into()));
	}
	Ok(())
}
