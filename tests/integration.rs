//! End-to-end scenarios against the in-memory adapters: a single
//! participant's full lifecycle from registration through published
//! results, institution spreading across rooms, duplicate-registration
//! rejection, token refresh, and both branches of OCR auto-apply.

use chrono::{Duration, Utc};
use uuid::Uuid;

use olympiadqr::crypto::{ErrorCorrection, TokenService};
use olympiadqr::domain::entities::{Competition, Participant, Room, Scan};
use olympiadqr::error::Error;
use olympiadqr::ports::{InMemoryObjectStore, MarkerOcrEngine, MarkerSheetRenderer, RoundtripQrDecoder};
use olympiadqr::repository::{Repository, Store};
use olympiadqr::workflows::{admission, ocr, registration, scoring};

fn token_service() -> TokenService {
	TokenService::new("0123456789abcdef0123456789abcdef").unwrap()
}

async fn make_participant(store: &Store, name: &str, institution_id: Option<Uuid>) -> Uuid {
	let participant = Participant::new(Uuid::new_v4(), name, "School 5", Some(9), institution_id, None).unwrap();
	let id = participant.id;
	store.create(participant).await.unwrap();
	id
}

async fn make_competition(store: &Store, variants_count: u32, max_score: u32, rooms: &[u32]) -> Uuid {
	let now = Utc::now();
	let mut competition = Competition::new(
		"Math",
		now.date_naive(),
		now,
		now + Duration::days(7),
		variants_count,
		max_score,
		Uuid::new_v4(),
	)
	.unwrap();
	competition.open_registration().unwrap();
	let competition_id = competition.id;
	store.create(competition).await.unwrap();

	for (i, capacity) in rooms.iter().enumerate() {
		let room = Room::new(competition_id, format!("Room {i}"), *capacity).unwrap();
		store.create(room).await.unwrap();
	}
	competition_id
}

/// Scenario 1: single participant lifecycle, end to end through
/// published results.
#[tokio::test]
async fn single_participant_lifecycle() {
	let store = Store::new();
	let object_store = InMemoryObjectStore::new();
	let renderer = MarkerSheetRenderer::new(ErrorCorrection::H);
	let svc = token_service();

	let participant_id = make_participant(&store, "Ann Lee", None).await;
	let competition_id = make_competition(&store, 4, 100, &[]).await;

	let enrolled = registration::register(
		&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
	)
	.await
	.unwrap();

	use olympiadqr::workflows::lifecycle;
	lifecycle::start_competition(&store, competition_id).await.unwrap();

	let preview = admission::verify(
		&store, &store, &store, &store, &store, &store, &svc, &enrolled.raw_token,
	)
	.await
	.unwrap();
	assert!(preview.can_proceed);

	let approved = admission::approve(
		&store, &store, &store, &store, &store, &store, &store, &store, &store,
		&object_store, &renderer, &svc, enrolled.registration_id, &enrolled.raw_token, Uuid::new_v4(), None, 32,
	)
	.await
	.unwrap();
	assert!((1..=4).contains(&approved.variant_number));
	assert!(!approved.sheet_token.is_empty());

	// Re-approving with the now-used token fails.
	let second = admission::approve(
		&store, &store, &store, &store, &store, &store, &store, &store, &store,
		&object_store, &renderer, &svc, enrolled.registration_id, &enrolled.raw_token, Uuid::new_v4(), None, 32,
	)
	.await;
	assert!(matches!(second, Err(Error::InvalidState { .. })));

	scoring::apply_score_direct(&store, approved.attempt_id, 87).await.unwrap();

	lifecycle::start_checking(&store, competition_id).await.unwrap();

	let mut attempt: olympiadqr::domain::entities::Attempt = Repository::get_by_id(&store, approved.attempt_id)
		.await
		.unwrap()
		.unwrap();
	attempt.publish().unwrap();
	store.update(attempt).await.unwrap();

	lifecycle::publish_results(&store, competition_id).await.unwrap();

	let rows = scoring::results(&store, &store, &store, &store, competition_id)
		.await
		.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].rank, 1);
	assert_eq!(rows[0].score_total, 87);
}

/// Scenario 2: two rooms, five registrations from each of two
/// institutions, spread 5/5 rather than lopsided.
#[tokio::test]
async fn institution_spreading_across_rooms() {
	let store = Store::new();
	let object_store = InMemoryObjectStore::new();
	let renderer = MarkerSheetRenderer::new(ErrorCorrection::H);
	let svc = token_service();

	let competition_id = make_competition(&store, 4, 100, &[10, 10]).await;
	use olympiadqr::workflows::lifecycle;
	lifecycle::start_competition(&store, competition_id).await.unwrap();

	let institution_x = Uuid::new_v4();
	let institution_y = Uuid::new_v4();

	for institution in [institution_x, institution_y] {
		for i in 0..5 {
			let participant_id = make_participant(&store, &format!("P{institution}-{i}"), Some(institution)).await;
			let enrolled = registration::register(
				&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
			)
			.await
			.unwrap();
			admission::approve(
				&store, &store, &store, &store, &store, &store, &store, &store, &store,
				&object_store, &renderer, &svc, enrolled.registration_id, &enrolled.raw_token, Uuid::new_v4(), None, 32,
			)
			.await
			.unwrap();
		}
	}

	let rooms = olympiadqr::repository::RoomRepository::get_by_competition(&store, competition_id)
		.await
		.unwrap();
	for room in rooms {
		let count = olympiadqr::repository::SeatAssignmentRepository::count_by_room(&store, room.id)
			.await
			.unwrap();
		assert_eq!(count, 5, "room {} should hold exactly 5 seats", room.name);
	}
}

/// Scenario 3: registering twice for the same competition is rejected.
#[tokio::test]
async fn duplicate_registration_rejected() {
	let store = Store::new();
	let svc = token_service();
	let participant_id = make_participant(&store, "Ann Lee", None).await;
	let competition_id = make_competition(&store, 4, 100, &[]).await;

	registration::register(
		&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
	)
	.await
	.unwrap();

	let second = registration::register(
		&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
	)
	.await;
	assert!(matches!(second, Err(Error::DuplicateKey(_))));
}

/// Scenario 4: an expired-but-unused entry token can be refreshed; the
/// old raw value stops verifying and the new one does.
#[tokio::test]
async fn refresh_token_after_expiry() {
	let store = Store::new();
	let svc = token_service();
	let participant_id = make_participant(&store, "Ann Lee", None).await;
	let competition_id = make_competition(&store, 4, 100, &[]).await;

	let enrolled = registration::register(
		&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
	)
	.await
	.unwrap();

	let mut entry_token = olympiadqr::repository::EntryTokenRepository::get_by_registration(
		&store,
		enrolled.registration_id,
	)
	.await
	.unwrap()
	.unwrap();
	entry_token.expires_at = Utc::now() - Duration::hours(1);
	Repository::<olympiadqr::domain::entities::EntryToken>::update(&store, entry_token)
		.await
		.unwrap();

	let new_raw = registration::refresh_token(&store, &store, &svc, enrolled.registration_id, 32, 24)
		.await
		.unwrap();

	let refreshed = olympiadqr::repository::EntryTokenRepository::get_by_registration(
		&store,
		enrolled.registration_id,
	)
	.await
	.unwrap()
	.unwrap();
	assert!(svc.verify(&new_raw, &refreshed.token_hash));
	assert!(!svc.verify(&enrolled.raw_token, &refreshed.token_hash));
}

/// Scenario 5 & 6: OCR confidence above threshold auto-applies; below
/// threshold defers to manual verification, which then applies the
/// corrected score.
#[tokio::test]
async fn ocr_auto_apply_and_manual_fallback() {
	let store = Store::new();
	let object_store = InMemoryObjectStore::new();
	let renderer = MarkerSheetRenderer::new(ErrorCorrection::H);
	let svc = token_service();
	let qr_decoder = RoundtripQrDecoder;
	let ocr_engine = MarkerOcrEngine::new();

	let competition_id = make_competition(&store, 4, 100, &[]).await;
	use olympiadqr::workflows::lifecycle;
	lifecycle::start_competition(&store, competition_id).await.unwrap();

	// High confidence: auto-applies.
	let participant_id = make_participant(&store, "Ann Lee", None).await;
	let enrolled = registration::register(
		&store, &store, &store, &store, &svc, participant_id, competition_id, false, 32, 24,
	)
	.await
	.unwrap();
	let approved = admission::approve(
		&store, &store, &store, &store, &store, &store, &store, &store, &store,
		&object_store, &renderer, &svc, enrolled.registration_id, &enrolled.raw_token, Uuid::new_v4(), None, 32,
	)
	.await
	.unwrap();

	let scan_bytes = format!("{}\nscore=87;confidence=0.92", approved.sheet_token).into_bytes();
	object_store.put("scans", "scans/high.jpg", scan_bytes).await.unwrap();
	let scan = Scan::new(None, "scans/high.jpg", Uuid::new_v4()).unwrap();
	let scan_id = scan.id;
	store.create(scan).await.unwrap();

	let outcome = ocr::process_scan(
		&store, &store, &object_store, "scans", &qr_decoder, &ocr_engine, &svc, 0.7, scan_id,
	)
	.await
	.unwrap();
	assert!(outcome.auto_applied);
	let attempt: olympiadqr::domain::entities::Attempt =
		Repository::get_by_id(&store, approved.attempt_id).await.unwrap().unwrap();
	assert_eq!(attempt.score_total, Some(87));
	assert_eq!(attempt.status, olympiadqr::domain::value_objects::AttemptStatus::Scored);

	// Low confidence: defers, then manual verification applies the
	// corrected score.
	let participant_id_2 = make_participant(&store, "Ben Ng", None).await;
	let enrolled_2 = registration::register(
		&store, &store, &store, &store, &svc, participant_id_2, competition_id, false, 32, 24,
	)
	.await
	.unwrap();
	let approved_2 = admission::approve(
		&store, &store, &store, &store, &store, &store, &store, &store, &store,
		&object_store, &renderer, &svc, enrolled_2.registration_id, &enrolled_2.raw_token, Uuid::new_v4(), None, 32,
	)
	.await
	.unwrap();

	let scan_bytes_2 = format!("{}\nscore=55;confidence=0.4", approved_2.sheet_token).into_bytes();
	object_store.put("scans", "scans/low.jpg", scan_bytes_2).await.unwrap();
	let scan_2 = Scan::new(None, "scans/low.jpg", Uuid::new_v4()).unwrap();
	let scan_id_2 = scan_2.id;
	store.create(scan_2).await.unwrap();

	let outcome_2 = ocr::process_scan(
		&store, &store, &object_store, "scans", &qr_decoder, &ocr_engine, &svc, 0.7, scan_id_2,
	)
	.await
	.unwrap();
	assert!(!outcome_2.auto_applied);
	let attempt_2: olympiadqr::domain::entities::Attempt =
		Repository::get_by_id(&store, approved_2.attempt_id).await.unwrap().unwrap();
	assert_eq!(attempt_2.status, olympiadqr::domain::value_objects::AttemptStatus::Scanned);
	assert!(attempt_2.score_total.is_none());

	scoring::verify_scan(&store, &store, scan_id_2, Uuid::new_v4(), Some(82))
		.await
		.unwrap();
	let attempt_2: olympiadqr::domain::entities::Attempt =
		Repository::get_by_id(&store, approved_2.attempt_id).await.unwrap().unwrap();
	assert_eq!(attempt_2.score_total, Some(82));
	assert_eq!(attempt_2.status, olympiadqr::domain::value_objects::AttemptStatus::Scored);
}

/// Results of a non-published competition are not exposed.
#[tokio::test]
async fn results_hidden_before_publication() {
	let store = Store::new();
	let competition_id = make_competition(&store, 4, 100, &[]).await;
	let result = scoring::results(&store, &store, &store, &store, competition_id).await;
	assert!(matches!(result, Err(Error::InvalidState { .. })));
}
