//! The physical answer sheet issued for an attempt, carrying its own QR
//! token so a reissued ("extra") sheet can be bound independently of the
//! primary one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::TokenHash;
use crate::domain::value_objects::SheetKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSheet {
	pub id: Uuid,
	pub attempt_id: Uuid,
	pub sheet_token_hash: TokenHash,
	pub kind: SheetKind,
	pub pdf_file_path: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl AnswerSheet {
	pub fn new(attempt_id: Uuid, sheet_token_hash: TokenHash, kind: SheetKind) -> Self {
		Self {
			id: Uuid::new_v4(),
			attempt_id,
			sheet_token_hash,
			kind,
			pdf_file_path: None,
			created_at: Utc::now(),
		}
	}
}
