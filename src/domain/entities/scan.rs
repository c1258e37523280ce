//! An uploaded image/PDF of a scanned answer sheet, and the OCR result
//! attached to it asynchronously.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
	pub id: Uuid,
	pub attempt_id: Option<Uuid>,
	pub file_path: String,
	pub uploaded_by: Uuid,
	pub answer_sheet_id: Option<Uuid>,
	pub ocr_score: Option<u32>,
	pub ocr_confidence: Option<f64>,
	pub ocr_raw_text: Option<String>,
	pub verified_by: Option<Uuid>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Scan {
	pub fn new(attempt_id: Option<Uuid>, file_path: impl Into<String>, uploaded_by: Uuid) -> Result<Self> {
		let file_path = file_path.into();
		if file_path.is_empty() {
			return Err(Error::Validation("file path cannot be empty".into()));
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			attempt_id,
			file_path,
			uploaded_by,
			answer_sheet_id: None,
			ocr_score: None,
			ocr_confidence: None,
			ocr_raw_text: None,
			verified_by: None,
			created_at: now,
			updated_at: now,
		})
	}

	/// Bind a scan whose QR could not be resolved at upload time to the
	/// attempt the OCR worker later identified.
	pub fn link_attempt(&mut self, attempt_id: Uuid) {
		self.attempt_id = Some(attempt_id);
		self.updated_at = Utc::now();
	}

	pub fn update_ocr_result(
		&mut self,
		score: Option<u32>,
		confidence: Option<f64>,
		raw_text: impl Into<String>,
	) -> Result<()> {
		if let Some(confidence) = confidence {
			if !(0.0..=1.0).contains(&confidence) {
				return Err(Error::Validation(
					"confidence must be between 0.0 and 1.0".into(),
				));
			}
		}
		self.ocr_score = score;
		self.ocr_confidence = confidence;
		self.ocr_raw_text = Some(raw_text.into());
		self.updated_at = Utc::now();
		Ok(())
	}

	pub fn verify(&mut self, verified_by: Uuid, corrected_score: Option<u32>) {
		if let Some(corrected_score) = corrected_score {
			self.ocr_score = Some(corrected_score);
		}
		self.verified_by = Some(verified_by);
		self.updated_at = Utc::now();
	}

	pub fn is_processed(&self) -> bool {
		self.ocr_raw_text.is_some()
	}

	pub fn is_verified(&self) -> bool {
		self.verified_by.is_some()
	}

	pub fn has_valid_score(&self) -> bool {
		self.ocr_score.is_some() && self.ocr_confidence.is_some()
	}
}
