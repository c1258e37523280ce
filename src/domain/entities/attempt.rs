//! One participant's answer sheet attempt: the aggregate scoring pivots
//! around. A registration has exactly one primary attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::TokenHash;
use crate::domain::value_objects::AttemptStatus;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
	pub id: Uuid,
	pub registration_id: Uuid,
	pub variant_number: u32,
	pub sheet_token_hash: TokenHash,
	pub status: AttemptStatus,
	pub score_total: Option<u32>,
	pub max_score: u32,
	pub confidence: Option<f64>,
	pub pdf_file_path: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Attempt {
	pub fn new(
		registration_id: Uuid,
		variant_number: u32,
		sheet_token_hash: TokenHash,
		max_score: u32,
	) -> Result<Self> {
		if variant_number < 1 {
			return Err(Error::Validation("variant number must be positive".into()));
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			registration_id,
			variant_number,
			sheet_token_hash,
			status: AttemptStatus::Printed,
			score_total: None,
			max_score,
			confidence: None,
			pdf_file_path: None,
			created_at: now,
			updated_at: now,
		})
	}

	pub fn mark_scanned(&mut self) -> Result<()> {
		if self.status != AttemptStatus::Printed {
			return Err(Error::invalid_state(
				"can only scan printed attempts",
				self.status.to_string(),
			));
		}
		self.status = AttemptStatus::Scanned;
		self.touch();
		Ok(())
	}

	pub fn apply_score(&mut self, score: u32, confidence: Option<f64>) -> Result<()> {
		if !self.status.can_apply_score() {
			return Err(Error::invalid_state(
				format!("cannot apply score in status {}", self.status),
				self.status.to_string(),
			));
		}
		if let Some(confidence) = confidence {
			if !(0.0..=1.0).contains(&confidence) {
				return Err(Error::Validation(
					"confidence must be between 0.0 and 1.0".into(),
				));
			}
		}
		if score > self.max_score {
			return Err(Error::Validation(format!(
				"score {score} exceeds max score {}",
				self.max_score
			)));
		}
		self.score_total = Some(score);
		self.confidence = confidence;
		self.status = AttemptStatus::Scored;
		self.touch();
		Ok(())
	}

	pub fn publish(&mut self) -> Result<()> {
		if !self.status.has_score() {
			return Err(Error::invalid_state(
				"cannot publish attempt without a score",
				self.status.to_string(),
			));
		}
		self.status = AttemptStatus::Published;
		self.touch();
		Ok(())
	}

	pub fn invalidate(&mut self) {
		self.status = AttemptStatus::Invalidated;
		self.touch();
	}

	pub fn is_valid(&self) -> bool {
		self.status.is_valid()
	}

	pub fn has_score(&self) -> bool {
		self.score_total.is_some()
	}

	/// Score as a percentage of the competition's max score; `None` until
	/// scored (original `Score.percentage` convenience, kept on the
	/// attempt since results/ranking consumers want it directly).
	pub fn score_percentage(&self) -> Option<f64> {
		self.score_total
			.map(|s| (s as f64 / self.max_score as f64) * 100.0)
	}
}
