//! Competition lifecycle transitions: thin wrappers around
//! the entity's own transition methods plus persistence. No audit trail
//! here — lifecycle changes are rare, attributable admin actions already
//! visible in the competition row's `updated_at`.

use uuid::Uuid;

use crate::domain::entities::Competition;
use crate::error::{Error, Result};
use crate::repository::CompetitionRepository;

async fn load(
	competitions: &(impl CompetitionRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Competition> {
	competitions
		.get_by_id(competition_id)
		.await?
		.ok_or_else(|| Error::not_found("competition", competition_id))
}

pub async fn open_registration(
	competitions: &(impl CompetitionRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Competition> {
	let mut competition = load(competitions, competition_id).await?;
	competition.open_registration()?;
	competitions.update(competition).await
}

pub async fn start_competition(
	competitions: &(impl CompetitionRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Competition> {
	let mut competition = load(competitions, competition_id).await?;
	competition.start_competition()?;
	competitions.update(competition).await
}

pub async fn start_checking(
	competitions: &(impl CompetitionRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Competition> {
	let mut competition = load(competitions, competition_id).await?;
	competition.start_checking()?;
	competitions.update(competition).await
}

pub async fn publish_results(
	competitions: &(impl CompetitionRepository + ?Sized),
	competition_id: Uuid,
) -> Result<Competition> {
	let mut competition = load(competitions, competition_id).await?;
	competition.publish_results()?;
	competitions.update(competition).await
}
