//! The admission workflow: verify an entry token at the
//! venue door, then approve it — the single transactional step that
//! fans out into the registration, competition, seating, token, and
//! audit subsystems and produces an attempt plus its primary answer
//! sheet.

use rand::Rng;
use uuid::Uuid;

use crate::crypto::TokenService;
use crate::domain::entities::{AnswerSheet, Attempt, AuditLog};
use crate::domain::value_objects::SheetKind;
use crate::error::{Error, Result};
use crate::ports::{ObjectStore, SheetRenderer};
use crate::repository::{
	AnswerSheetRepository, AttemptRepository, AuditLogRepository, CompetitionRepository,
	DocumentRepository, EntryTokenRepository, InstitutionRepository, ParticipantRepository,
	RegistrationRepository, RoomRepository, SeatAssignmentRepository,
};
use crate::seating;

/// Read-only preview of an entry token, as shown to the admitter before
/// they commit to approving admission. Never mutates state.
pub struct VerifyResult {
	pub registration_id: Uuid,
	pub participant_id: Uuid,
	pub participant_name: String,
	pub participant_school: String,
	pub participant_grade: Option<u32>,
	pub competition_id: Uuid,
	pub competition_name: String,
	pub institution_name: Option<String>,
	pub dob: Option<chrono::NaiveDate>,
	pub has_documents: bool,
	pub can_proceed: bool,
	pub message: String,
}

/// Look up the entry token by raw value and report whether admission can
/// proceed, without mutating anything.
#[allow(clippy::too_many_arguments)]
pub async fn verify(
	entry_tokens: &(impl EntryTokenRepository + ?Sized),
	registrations: &(impl RegistrationRepository + ?Sized),
	participants: &(impl ParticipantRepository + ?Sized),
	competitions: &(impl CompetitionRepository + ?Sized),
	institutions: &(impl InstitutionRepository + ?Sized),
	documents: &(impl DocumentRepository + ?Sized),
	token_service: &TokenService,
	raw_token: &str,
) -> Result<VerifyResult> {
	if raw_token.is_empty() {
		return Err(Error::Validation("token cannot be empty".into()));
	}

	let hash = token_service.hash(raw_token);
	let entry_token = entry_tokens
		.get_by_token_hash(&hash)
		.await?
		.ok_or_else(|| Error::Validation("token not found".into()))?;

	if entry_token.is_expired() {
		return Err(Error::invalid_state("token has expired", "expired".to_string()));
	}
	if entry_token.is_used() {
		return Err(Error::invalid_state("token has already been used", "used".to_string()));
	}

	let registration = registrations
		.get_by_id(entry_token.registration_id)
		.await?
		.ok_or_else(|| Error::not_found("registration", entry_token.registration_id))?;
	let participant = participants
		.get_by_id(registration.participant_id)
		.await?
		.ok_or_else(|| Error::not_found("participant", registration.participant_id))?;
	let competition = competitions
		.get_by_id(registration.competition_id)
		.await?
		.ok_or_else(|| Error::not_found("competition", registration.competition_id))?;

	let institution_name = match participant.institution_id {
		Some(institution_id) => institutions.get_by_id(institution_id).await?.map(|i| i.name),
		None => None,
	};
	let has_documents = !documents.get_by_participant(participant.id).await?.is_empty();

	let (can_proceed, message) = if competition.is_in_progress() {
		(true, "participant confirmed, sheet may be issued".to_string())
	} else {
		(
			false,
			format!("competition is not in progress: status={}", competition.status),
		)
	};

	Ok(VerifyResult {
		registration_id: registration.id,
		participant_id: participant.id,
		participant_name: participant.full_name,
		participant_school: participant.school,
		participant_grade: participant.grade,
		competition_id: competition.id,
		competition_name: competition.name,
		institution_name,
		dob: participant.dob,
		has_documents,
		can_proceed,
		message,
	})
}

pub struct ApproveResult {
	pub attempt_id: Uuid,
	pub variant_number: u32,
	pub pdf_url: String,
	pub sheet_token: String,
	pub room_name: Option<String>,
	pub seat_number: Option<u32>,
}

/// Verify → admit → seat → generate sheet → persist, as one atomic step.
/// Every sub-step after the PDF upload has no compensating delete on
/// failure: an orphaned object-store blob is cleaned up out-of-band,
/// never in the hot path.
#[allow(clippy::too_many_arguments)]
pub async fn approve(
	entry_tokens: &(impl EntryTokenRepository + ?Sized),
	registrations: &(impl RegistrationRepository + ?Sized),
	competitions: &(impl CompetitionRepository + ?Sized),
	rooms: &(impl RoomRepository + ?Sized),
	seats: &(impl SeatAssignmentRepository + ?Sized),
	participants: &(impl ParticipantRepository + ?Sized),
	attempts: &(impl AttemptRepository + ?Sized),
	answer_sheets: &(impl AnswerSheetRepository + ?Sized),
	audit_logs: &(impl AuditLogRepository + ?Sized),
	object_store: &(impl ObjectStore + ?Sized),
	sheet_renderer: &(impl SheetRenderer + ?Sized),
	token_service: &TokenService,
	registration_id: Uuid,
	raw_token: &str,
	admitter_id: Uuid,
	ip_address: Option<String>,
	qr_token_size_bytes: usize,
) -> Result<ApproveResult> {
	// 1. Re-verify, this time checking it actually belongs to `registration_id`.
	let hash = token_service.hash(raw_token);
	let mut entry_token = entry_tokens
		.get_by_token_hash(&hash)
		.await?
		.ok_or_else(|| Error::Validation("token not found".into()))?;
	if entry_token.is_expired() {
		return Err(Error::invalid_state("token has expired", "expired".to_string()));
	}
	if entry_token.is_used() {
		return Err(Error::invalid_state("token has already been used", "used".to_string()));
	}
	if entry_token.registration_id != registration_id {
		return Err(Error::Validation(
			"token does not match this registration".into(),
		));
	}

	// 2. Mark the token used.
	entry_token.use_token()?;
	entry_tokens.update(entry_token).await?;

	// 3. Admit the registration.
	let mut registration = registrations
		.get_by_id(registration_id)
		.await?
		.ok_or_else(|| Error::not_found("registration", registration_id))?;
	registration.admit()?;
	let registration = registrations.update(registration).await?;

	// 4. Seat, or fall back to a random variant if no rooms are configured.
	let competition = competitions
		.get_by_id(registration.competition_id)
		.await?
		.ok_or_else(|| Error::not_found("competition", registration.competition_id))?;

	let seat = seating::assign_seat(
		rooms,
		seats,
		registrations,
		participants,
		registration.id,
		competition.id,
		competition.variants_count,
	)
	.await?;

	let (variant_number, room_name, seat_number) = match &seat {
		Some(assignment) => (
			assignment.variant_number,
			Some(assignment.room_name.clone()),
			Some(assignment.seat_number),
		),
		None => {
			let variant_number = rand::thread_rng().gen_range(1..=competition.variants_count);
			(variant_number, None, None)
		}
	};

	// 5. Generate the sheet token.
	let sheet_token = token_service.generate(qr_token_size_bytes);

	// 6-8. Create the attempt, render and upload its PDF.
	let mut attempt = Attempt::new(
		registration.id,
		variant_number,
		sheet_token.hash.clone(),
		competition.max_score,
	)?;
	let pdf_bytes = sheet_renderer.render(&sheet_token.raw, variant_number)?;
	let object_key = format!("sheets/{}/{}.pdf", competition.id, attempt.id);
	object_store
		.put("answer-sheets", &object_key, pdf_bytes)
		.await?;
	attempt.pdf_file_path = Some(object_key.clone());
	let attempt = attempts.create(attempt).await?;

	// 9. Create the primary answer sheet.
	let mut answer_sheet = AnswerSheet::new(attempt.id, sheet_token.hash.clone(), SheetKind::Primary);
	answer_sheet.pdf_file_path = Some(object_key);
	answer_sheets.create(answer_sheet).await?;

	// 10. Registration is now complete: the sheet has been handed over.
	let mut registration = registration;
	registration.complete()?;
	registrations.update(registration).await?;

	// 11. Audit record.
	let audit = AuditLog::new(
		"registration",
		registration_id,
		"admitted",
		Some(admitter_id),
		ip_address,
	)?
	.with_details(&serde_json::json!({
		"variant_number": variant_number,
		"attempt_id": attempt.id,
		"room_name": room_name,
		"seat_number": seat_number,
	}));
	audit_logs.create(audit).await?;

	Ok(ApproveResult {
		attempt_id: attempt.id,
		variant_number,
		pdf_url: format!("admission/sheets/{}/download", attempt.id),
		sheet_token: sheet_token.raw,
		room_name,
		seat_number,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::entities::{Competition, Participant, Room};
	use crate::ports::{InMemoryObjectStore, MarkerSheetRenderer};
	use crate::repository::{Repository, Store};
	use crate::workflows::registration;
	use chrono::{Duration, Utc};

	fn service() -> TokenService {
		TokenService::new("0123456789abcdef0123456789abcdef").unwrap()
	}

	async fn setup(store: &Store, rooms: &[u32]) -> (Uuid, Uuid) {
		let user_id = Uuid::new_v4();
		let participant = Participant::new(user_id, "Ann Lee", "School 5", Some(9), None, None).unwrap();
		let participant_id = participant.id;
		store.create(participant).await.unwrap();

		let now = Utc::now();
		let mut competition = Competition::new(
			"Regional Math Olympiad",
			now.date_naive(),
			now,
			now + Duration::days(7),
			4,
			100,
			Uuid::new_v4(),
		)
		.unwrap();
		competition.open_registration().unwrap();
		competition.start_competition().unwrap();
		let competition_id = competition.id;
		store.create(competition).await.unwrap();

		for (i, capacity) in rooms.iter().enumerate() {
			let room = Room::new(competition_id, format!("Room {i}"), *capacity).unwrap();
			store.create(room).await.unwrap();
		}

		(participant_id, competition_id)
	}

	async fn register_and_get_token(store: &Store, participant_id: Uuid, competition_id: Uuid) -> (Uuid, String) {
		let result = registration::register(
			store, store, store, store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await
		.unwrap();
		(result.registration_id, result.raw_token)
	}

	#[tokio::test]
	async fn full_admission_lifecycle_produces_attempt_and_sheet() {
		let store = Store::new();
		let object_store = InMemoryObjectStore::new();
		let renderer = MarkerSheetRenderer::new(crate::crypto::ErrorCorrection::H);
		let (participant_id, competition_id) = setup(&store, &[10]).await;
		let (registration_id, raw_token) = register_and_get_token(&store, participant_id, competition_id).await;

		let preview = verify(
			&store, &store, &store, &store, &store, &store, &service(), &raw_token,
		)
		.await
		.unwrap();
		assert!(preview.can_proceed);

		let approved = approve(
			&store, &store, &store, &store, &store, &store, &store, &store, &store,
			&object_store, &renderer, &service(), registration_id, &raw_token, Uuid::new_v4(), None, 32,
		)
		.await
		.unwrap();

		assert!(approved.variant_number >= 1 && approved.variant_number <= 4);
		assert!(!approved.sheet_token.is_empty());
		assert_eq!(approved.seat_number, Some(1));

		let attempt = AttemptRepository::get_by_registration(&store, registration_id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(attempt.id, approved.attempt_id);
		let sheets = answer_sheets_for(&store, attempt.id).await;
		assert_eq!(sheets.len(), 1);
		assert_eq!(sheets[0].kind, SheetKind::Primary);
	}

	async fn answer_sheets_for(store: &Store, attempt_id: Uuid) -> Vec<AnswerSheet> {
		AnswerSheetRepository::get_by_attempt(store, attempt_id)
			.await
			.unwrap()
	}

	#[tokio::test]
	async fn second_approve_with_same_token_fails() {
		let store = Store::new();
		let object_store = InMemoryObjectStore::new();
		let renderer = MarkerSheetRenderer::new(crate::crypto::ErrorCorrection::H);
		let (participant_id, competition_id) = setup(&store, &[10]).await;
		let (registration_id, raw_token) = register_and_get_token(&store, participant_id, competition_id).await;

		approve(
			&store, &store, &store, &store, &store, &store, &store, &store, &store,
			&object_store, &renderer, &service(), registration_id, &raw_token, Uuid::new_v4(), None, 32,
		)
		.await
		.unwrap();

		let second = approve(
			&store, &store, &store, &store, &store, &store, &store, &store, &store,
			&object_store, &renderer, &service(), registration_id, &raw_token, Uuid::new_v4(), None, 32,
		)
		.await;
		assert!(matches!(second, Err(Error::InvalidState { .. })));
	}

	#[tokio::test]
	async fn approve_without_rooms_picks_random_variant_in_range() {
		let store = Store::new();
		let object_store = InMemoryObjectStore::new();
		let renderer = MarkerSheetRenderer::new(crate::crypto::ErrorCorrection::H);
		let (participant_id, competition_id) = setup(&store, &[]).await;
		let (registration_id, raw_token) = register_and_get_token(&store, participant_id, competition_id).await;

		let approved = approve(
			&store, &store, &store, &store, &store, &store, &store, &store, &store,
			&object_store, &renderer, &service(), registration_id, &raw_token, Uuid::new_v4(), None, 32,
		)
		.await
		.unwrap();

		assert!(approved.room_name.is_none());
		assert!(approved.seat_number.is_none());
		assert!(approved.variant_number >= 1 && approved.variant_number <= 4);
	}

	#[tokio::test]
	async fn verify_reports_cannot_proceed_when_not_in_progress() {
		let store = Store::new();
		let user_id = Uuid::new_v4();
		let participant = Participant::new(user_id, "Ann Lee", "School 5", Some(9), None, None).unwrap();
		let participant_id = participant.id;
		store.create(participant).await.unwrap();

		let now = Utc::now();
		let competition = Competition::new(
			"Regional Math Olympiad",
			now.date_naive(),
			now,
			now + Duration::days(7),
			4,
			100,
			Uuid::new_v4(),
		)
		.unwrap();
		let competition_id = competition.id;
		store.create(competition).await.unwrap();

		let registered = registration::register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, true, 32, 24,
		)
		.await
		.unwrap();

		let preview = verify(
			&store, &store, &store, &store, &store, &store, &service(), &registered.raw_token,
		)
		.await
		.unwrap();
		assert!(!preview.can_proceed);
	}
}
