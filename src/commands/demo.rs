use anyhow::Result;

use crate::config::Settings;
use crate::crypto::{ErrorCorrection, TokenService};
use crate::domain::entities::{Competition, Room};
use crate::domain::value_objects::{EventType, UserRole};
use crate::ports::{
	HmacClaimsEncoder, HmacPasswordHasher, InMemoryObjectStore, MarkerOcrEngine,
	MarkerSheetRenderer, RoundtripQrDecoder,
};
use crate::repository::{Repository, Store};
use crate::workflows::{admission, auth, document, institution, invigilator, lifecycle, ocr, registration, scoring};

/// Run the full lifecycle once against fresh in-memory adapters, printing
/// every stage's output. This is the crate's own "integration test you can
/// watch" — every workflow in the component list gets exercised.
pub async fn run(config_dir: Option<&str>) -> Result<()> {
	let settings = Settings::load_from(config_dir)?;
	let store = Store::new();
	let object_store = InMemoryObjectStore::new();
	let token_service = TokenService::new(&settings.security.hmac_secret_key)?;
	let password_hasher = HmacPasswordHasher::new(&settings.security.secret_key);
	let jwt_encoder = HmacClaimsEncoder::new(&settings.security.secret_key);
	let ec = ErrorCorrection::parse(&settings.qr.error_correction)?;
	let sheet_renderer = MarkerSheetRenderer::new(ec);
	let qr_decoder = RoundtripQrDecoder;
	let ocr_engine = MarkerOcrEngine::new();
	let token_size = settings.qr.token_size_bytes;

	println!("== institution ==");
	let school = institution::create(&store, "Lyceum 7", Some("L7".into()), Some("Minsk".into())).await?;
	println!("created institution {} ({})", school.name, school.id);
	let found = institution::search(&store, "lyceum", 5).await?;
	println!("search 'lyceum' -> {} match(es)", found.len());

	println!("\n== accounts ==");
	let registered = auth::register_user(
		&store,
		&store,
		&password_hasher,
		&jwt_encoder,
		"ann@example.com",
		"hunter2",
		UserRole::Participant,
		Some("Ann Lee".into()),
		Some("School 5".into()),
		Some(9),
	)
	.await?;
	let participant_id = registered
		.participant_id
		.expect("participant role always yields a participant row");
	println!("registered participant user {}", registered.user_id);

	let admitter = auth::register_user(
		&store,
		&store,
		&password_hasher,
		&jwt_encoder,
		"door@example.com",
		"letmein1",
		UserRole::Admitter,
		None,
		None,
		None,
	)
	.await?;
	let login = auth::login_user(&store, &password_hasher, &jwt_encoder, "door@example.com", "letmein1").await?;
	println!("admitter {} logged in, role={:?}", login.user_id, login.role);

	println!("\n== competition ==");
	let now = chrono::Utc::now();
	let mut competition = Competition::new(
		"Regional Math Olympiad",
		now.date_naive(),
		now,
		now + chrono::Duration::days(7),
		4,
		100,
		admitter.user_id,
	)?;
	let competition_id = competition.id;
	competition = store.create(competition).await?;
	println!("created competition '{}' (status={})", competition.name, competition.status);

	let room = Room::new(competition_id, "Room 101", 30)?;
	store.create(room).await?;

	lifecycle::open_registration(&store, competition_id).await?;
	println!("registration open");

	let enrolled = registration::register(
		&store,
		&store,
		&store,
		&store,
		&token_service,
		participant_id,
		competition_id,
		false,
		token_size,
		settings.entry_token_expire_hours,
	)
	.await?;
	println!("registered participant, entry token minted");

	lifecycle::start_competition(&store, competition_id).await?;
	println!("competition in progress");

	println!("\n== admission ==");
	let preview = admission::verify(&store, &store, &store, &store, &store, &store, &token_service, &enrolled.raw_token)
		.await?;
	println!("verify: {} ({})", preview.message, preview.can_proceed);

	let approved = admission::approve(
		&store,
		&store,
		&store,
		&store,
		&store,
		&store,
		&store,
		&store,
		&store,
		&object_store,
		&sheet_renderer,
		&token_service,
		enrolled.registration_id,
		&enrolled.raw_token,
		admitter.user_id,
		Some("127.0.0.1".into()),
		token_size,
	)
	.await?;
	println!(
		"admitted: variant={} room={:?} seat={:?}",
		approved.variant_number, approved.room_name, approved.seat_number
	);

	invigilator::record_event(&store, &store, approved.attempt_id, EventType::StartWork, admitter.user_id).await?;
	invigilator::record_event(&store, &store, approved.attempt_id, EventType::Submit, admitter.user_id).await?;
	println!("recorded start/submit events");

	println!("\n== document ==");
	document::upload(
		&store,
		&store,
		&object_store,
		participant_id,
		"eligibility.pdf",
		"application/pdf",
		b"proof-of-eligibility".to_vec(),
	)
	.await?;
	let docs = document::list_for_participant(&store, participant_id).await?;
	println!("{} document(s) on file", docs.len());

	println!("\n== scan + ocr ==");
	let scan_bytes = format!("{}\nscore=87;confidence=0.95", approved.sheet_token).into_bytes();
	object_store
		.put(&settings.storage.bucket_scans, "scans/demo-1.jpg", scan_bytes)
		.await?;
	let scan = crate::domain::entities::Scan::new(None, "scans/demo-1.jpg", admitter.user_id)?;
	let scan_id = scan.id;
	store.create(scan).await?;

	let outcome = ocr::process_scan(
		&store,
		&store,
		&object_store,
		&settings.storage.bucket_scans,
		&qr_decoder,
		&ocr_engine,
		&token_service,
		settings.ocr.confidence_threshold,
		scan_id,
	)
	.await?;
	println!(
		"ocr: score={:?} confidence={:?} auto_applied={}",
		outcome.ocr_score, outcome.ocr_confidence, outcome.auto_applied
	);

	println!("\n== results ==");
	lifecycle::start_checking(&store, competition_id).await?;
	lifecycle::publish_results(&store, competition_id).await?;
	let rows = scoring::results(&store, &store, &store, &store, competition_id).await?;
	for row in &rows {
		println!(
			"#{}  {} ({})  {}/{} ({:.1}%)",
			row.rank, row.full_name, row.school, row.score_total, 100, row.score_percentage
		);
	}

	Ok(())
}
