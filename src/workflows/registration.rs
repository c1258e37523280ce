//! The registration workflow: create a registration and its
//! one-time entry token, and refresh that token if it expires before
//! the participant is admitted.

use uuid::Uuid;

use crate::crypto::TokenService;
use crate::domain::entities::{EntryToken, Registration};
use crate::error::{Error, Result};
use crate::repository::{
	CompetitionRepository, EntryTokenRepository, ParticipantRepository, RegistrationRepository,
};

pub struct RegisterResult {
	pub registration_id: Uuid,
	pub raw_token: String,
}

/// Register a participant for a competition and mint their entry token.
///
/// `skip_status_check` is reserved for admin bulk pre-registration before
/// the admin opens registration.
pub async fn register(
	participants: &(impl ParticipantRepository + ?Sized),
	competitions: &(impl CompetitionRepository + ?Sized),
	registrations: &(impl RegistrationRepository + ?Sized),
	entry_tokens: &(impl EntryTokenRepository + ?Sized),
	token_service: &TokenService,
	participant_id: Uuid,
	competition_id: Uuid,
	skip_status_check: bool,
	qr_token_size_bytes: usize,
	entry_token_expire_hours: i64,
) -> Result<RegisterResult> {
	participants
		.get_by_id(participant_id)
		.await?
		.ok_or_else(|| Error::not_found("participant", participant_id))?;

	let competition = competitions
		.get_by_id(competition_id)
		.await?
		.ok_or_else(|| Error::not_found("competition", competition_id))?;

	if !skip_status_check && !competition.is_registration_open() {
		return Err(Error::invalid_state(
			"registration is closed for this competition",
			competition.status.to_string(),
		));
	}

	if registrations
		.get_by_participant_and_competition(participant_id, competition_id)
		.await?
		.is_some()
	{
		return Err(Error::DuplicateKey(
			"already registered for this competition".into(),
		));
	}

	let registration = Registration::new(participant_id, competition_id);
	let registration = registrations.create(registration).await?;

	let token = token_service.generate(qr_token_size_bytes);
	let mut entry_token = EntryToken::create(token.hash, registration.id, entry_token_expire_hours);
	entry_token.raw_token = Some(token.raw.clone());
	entry_tokens.create(entry_token).await?;

	Ok(RegisterResult {
		registration_id: registration.id,
		raw_token: token.raw,
	})
}

/// Regenerate the raw token and extend `expires_at`, preserving the
/// `EntryToken` row's identity. Fails if the token has already been
/// used — admission is complete and there is nothing left to refresh.
pub async fn refresh_token(
	registrations: &(impl RegistrationRepository + ?Sized),
	entry_tokens: &(impl EntryTokenRepository + ?Sized),
	token_service: &TokenService,
	registration_id: Uuid,
	qr_token_size_bytes: usize,
	entry_token_expire_hours: i64,
) -> Result<String> {
	registrations
		.get_by_id(registration_id)
		.await?
		.ok_or_else(|| Error::not_found("registration", registration_id))?;

	let mut entry_token = entry_tokens
		.get_by_registration(registration_id)
		.await?
		.ok_or_else(|| Error::not_found("entry_token", registration_id))?;

	if entry_token.is_used() {
		return Err(Error::invalid_state(
			"cannot refresh a token that has already been used",
			"used".to_string(),
		));
	}

	let token = token_service.generate(qr_token_size_bytes);
	entry_token.token_hash = token.hash;
	entry_token.raw_token = Some(token.raw.clone());
	entry_token.expires_at = chrono::Utc::now() + chrono::Duration::hours(entry_token_expire_hours);
	entry_token.used_at = None;
	entry_tokens.update(entry_token).await?;

	Ok(token.raw)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::entities::{Competition, Participant};
	use crate::repository::{Repository, Store};
	use chrono::{Duration, Utc};

	fn service() -> TokenService {
		TokenService::new("0123456789abcdef0123456789abcdef").unwrap()
	}

	async fn setup(store: &Store) -> (Uuid, Uuid) {
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
		let competition_id = competition.id;
		store.create(competition).await.unwrap();

		(participant_id, competition_id)
	}

	#[tokio::test]
	async fn register_issues_a_raw_token() {
		let store = Store::new();
		let (participant_id, competition_id) = setup(&store).await;
		let result = register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await
		.unwrap();
		assert!(!result.raw_token.is_empty());
	}

	#[tokio::test]
	async fn duplicate_registration_rejected() {
		let store = Store::new();
		let (participant_id, competition_id) = setup(&store).await;
		register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await
		.unwrap();
		let second = register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await;
		assert!(matches!(second, Err(Error::DuplicateKey(_))));
	}

	#[tokio::test]
	async fn registration_closed_competition_rejected() {
		let store = Store::new();
		let (participant_id, _) = setup(&store).await;
		let now = Utc::now();
		let draft = Competition::new(
			"Draft Olympiad",
			now.date_naive(),
			now,
			now + Duration::days(7),
			2,
			50,
			Uuid::new_v4(),
		)
		.unwrap();
		let draft_id = draft.id;
		store.create(draft).await.unwrap();

		let result = register(
			&store, &store, &store, &store, &service(), participant_id, draft_id, false, 32, 24,
		)
		.await;
		assert!(matches!(result, Err(Error::InvalidState { .. })));
	}

	#[tokio::test]
	async fn skip_status_check_allows_draft_registration() {
		let store = Store::new();
		let (participant_id, _) = setup(&store).await;
		let now = Utc::now();
		let draft = Competition::new(
			"Draft Olympiad",
			now.date_naive(),
			now,
			now + Duration::days(7),
			2,
			50,
			Uuid::new_v4(),
		)
		.unwrap();
		let draft_id = draft.id;
		store.create(draft).await.unwrap();

		let result = register(
			&store, &store, &store, &store, &service(), participant_id, draft_id, true, 32, 24,
		)
		.await;
		assert!(result.is_ok());
	}

	#[tokio::test]
	async fn refresh_issues_new_token_and_extends_expiry() {
		let store = Store::new();
		let (participant_id, competition_id) = setup(&store).await;
		let registered = register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await
		.unwrap();

		// Simulate expiry by rewinding the stored token.
		let mut entry_token = store
			.get_by_registration(registered.registration_id)
			.await
			.unwrap()
			.unwrap();
		entry_token.expires_at = Utc::now() - Duration::hours(1);
		assert!(entry_token.is_expired());
		Repository::<EntryToken>::update(&store, entry_token).await.unwrap();

		let new_raw = refresh_token(
			&store,
			&store,
			&service(),
			registered.registration_id,
			32,
			24,
		)
		.await
		.unwrap();
		assert_ne!(new_raw, registered.raw_token);

		let refreshed = store
			.get_by_registration(registered.registration_id)
			.await
			.unwrap()
			.unwrap();
		assert!(!refreshed.is_expired());
		assert!(service().verify(&new_raw, &refreshed.token_hash));
		assert!(!service().verify(&registered.raw_token, &refreshed.token_hash));
	}

	#[tokio::test]
	async fn refresh_rejects_used_token() {
		let store = Store::new();
		let (participant_id, competition_id) = setup(&store).await;
		let registered = register(
			&store, &store, &store, &store, &service(), participant_id, competition_id, false, 32, 24,
		)
		.await
		.unwrap();

		let mut entry_token = store
			.get_by_registration(registered.registration_id)
			.await
			.unwrap()
			.unwrap();
		entry_token.use_token().unwrap();
		Repository::<EntryToken>::update(&store, entry_token).await.unwrap();

		let result = refresh_token(
			&store,
			&store,
			&service(),
			registered.registration_id,
			32,
			24,
		)
		.await;
		assert!(result.is_err());
	}
}
