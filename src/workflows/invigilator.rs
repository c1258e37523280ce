//! Invigilator actions during the sitting: timeline events against
//! an attempt, and reissuing a sheet when the original was spoiled.

use uuid::Uuid;

use crate::crypto::TokenService;
use crate::domain::entities::{AnswerSheet, ParticipantEvent};
use crate::domain::value_objects::{AttemptStatus, EventType, SheetKind};
use crate::error::{Error, Result};
use crate::ports::{ObjectStore, SheetRenderer};
use crate::repository::{AnswerSheetRepository, AttemptRepository, ParticipantEventRepository};

pub async fn record_event(
	attempts: &(impl AttemptRepository + ?Sized),
	events: &(impl ParticipantEventRepository + ?Sized),
	attempt_id: Uuid,
	event_type: EventType,
	recorded_by: Uuid,
) -> Result<ParticipantEvent> {
	let attempt = attempts
		.get_by_id(attempt_id)
		.await?
		.ok_or_else(|| Error::not_found("attempt", attempt_id))?;

	if attempt.status == AttemptStatus::Invalidated {
		return Err(Error::invalid_state(
			"cannot record events against an invalidated attempt",
			attempt.status.to_string(),
		));
	}

	let event = ParticipantEvent::new(attempt_id, event_type, recorded_by);
	events.create(event).await
}

pub async fn get_attempt_events(
	events: &(impl ParticipantEventRepository + ?Sized),
	attempt_id: Uuid,
) -> Result<Vec<ParticipantEvent>> {
	events.get_by_attempt(attempt_id).await
}

/// Issue a replacement sheet for an attempt whose original was spoiled.
/// Does not touch the attempt's own status: the original sheet's score,
/// if any, stands until a checker explicitly overwrites it.
#[allow(clippy::too_many_arguments)]
pub async fn issue_extra_sheet(
	attempts: &(impl AttemptRepository + ?Sized),
	answer_sheets: &(impl AnswerSheetRepository + ?Sized),
	object_store: &(impl ObjectStore + ?Sized),
	sheet_renderer: &(impl SheetRenderer + ?Sized),
	token_service: &TokenService,
	attempt_id: Uuid,
	qr_token_size_bytes: usize,
) -> Result<AnswerSheet> {
	let attempt = attempts
		.get_by_id(attempt_id)
		.await?
		.ok_or_else(|| Error::not_found("attempt", attempt_id))?;

	let sheet_token = token_service.generate(qr_token_size_bytes);
	let pdf_bytes = sheet_renderer.render(&sheet_token.raw, attempt.variant_number)?;

	let mut answer_sheet = AnswerSheet::new(attempt.id, sheet_token.hash, SheetKind::Extra);
	let object_key = format!("sheets/extra/{}/{}.pdf", attempt.id, answer_sheet.id);
	object_store
		.put("answer-sheets", &object_key, pdf_bytes)
		.await?;
	answer_sheet.pdf_file_path = Some(object_key);

	answer_sheets.create(answer_sheet).await
}
