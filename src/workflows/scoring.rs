//! Manual scoring and the published results projection.

use uuid::Uuid;

use crate::domain::entities::Scan;
use crate::domain::value_objects::CompetitionStatus;
use crate::error::{Error, Result};
use crate::repository::{
	AttemptRepository, CompetitionRepository, ParticipantRepository, RegistrationRepository,
	ScanRepository,
};

/// Confirm (optionally correcting) an OCR-read score and apply it to the
/// attempt the scan is linked to.
pub async fn verify_scan(
	scans: &(impl ScanRepository + ?Sized),
	attempts: &(impl AttemptRepository + ?Sized),
	scan_id: Uuid,
	verified_by: Uuid,
	corrected_score: Option<u32>,
) -> Result<()> {
	let mut scan = scans
		.get_by_id(scan_id)
		.await?
		.ok_or_else(|| Error::not_found("scan", scan_id))?;

	let attempt_id = scan
		.attempt_id
		.ok_or_else(|| Error::invalid_state("scan is not linked to an attempt", "unlinked".to_string()))?;

	let mut attempt = attempts
		.get_by_id(attempt_id)
		.await?
		.ok_or_else(|| Error::not_found("attempt", attempt_id))?;

	scan.verify(verified_by, corrected_score);
	let score = scan
		.ocr_score
		.ok_or_else(|| Error::Validation("no score to verify".into()))?;
	attempt.apply_score(score, None)?;

	scans.update(scan).await?;
	attempts.update(attempt).await?;
	Ok(())
}

/// Apply a score directly, bypassing OCR entirely (a checker keying in a
/// score from a paper sheet that never got scanned).
pub async fn apply_score_direct(
	attempts: &(impl AttemptRepository + ?Sized),
	attempt_id: Uuid,
	score: u32,
) -> Result<()> {
	let mut attempt = attempts
		.get_by_id(attempt_id)
		.await?
		.ok_or_else(|| Error::not_found("attempt", attempt_id))?;
	attempt.apply_score(score, None)?;
	attempts.update(attempt).await?;
	Ok(())
}

#[derive(Debug, Clone)]
pub struct ResultRow {
	pub rank: u32,
	pub registration_id: Uuid,
	pub participant_id: Uuid,
	pub full_name: String,
	pub school: String,
	pub score_total: u32,
	pub score_percentage: f64,
}

/// The ranked results table for a competition, visible only once results
/// have been published. Standard/1224-style ranking: tied scores share
/// a rank and the next rank skips accordingly.
pub async fn results(
	competitions: &(impl CompetitionRepository + ?Sized),
	registrations: &(impl RegistrationRepository + ?Sized),
	participants: &(impl ParticipantRepository + ?Sized),
	attempts: &(impl AttemptRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Vec<ResultRow>> {
	let competition = competitions
		.get_by_id(competition_id)
		.await?
		.ok_or_else(|| Error::not_found("competition", competition_id))?;

	if competition.status != CompetitionStatus::Published {
		return Err(Error::invalid_state(
			"results are not published for this competition",
			competition.status.to_string(),
		));
	}

	let competition_attempts = attempts
		.get_by_competition(competition_id, 0, usize::MAX)
		.await?;

	let mut rows = Vec::new();
	for attempt in competition_attempts {
		if !matches!(
			attempt.status,
			crate::domain::value_objects::AttemptStatus::Scored
				| crate::domain::value_objects::AttemptStatus::Published
		) {
			continue;
		}
		let Some(score) = attempt.score_total else {
			continue;
		};
		let registration = registrations
			.get_by_id(attempt.registration_id)
			.await?
			.ok_or_else(|| Error::not_found("registration", attempt.registration_id))?;
		let participant = participants
			.get_by_id(registration.participant_id)
			.await?
			.ok_or_else(|| Error::not_found("participant", registration.participant_id))?;

		rows.push((registration.id, participant, score, attempt.max_score));
	}

	rows.sort_by(|a, b| b.2.cmp(&a.2));

	let mut out = Vec::with_capacity(rows.len());
	let mut rank = 0u32;
	let mut previous_score: Option<u32> = None;
	for (position, (registration_id, participant, score, max_score)) in rows.into_iter().enumerate() {
		if previous_score != Some(score) {
			rank = position as u32 + 1;
			previous_score = Some(score);
		}
		out.push(ResultRow {
			rank,
			registration_id,
			participant_id: participant.id,
			full_name: participant.full_name,
			school: participant.school,
			score_total: score,
			score_percentage: (score as f64 / max_score as f64) * 100.0,
		});
	}

	Ok(out)
}
