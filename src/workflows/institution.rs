//! Institution directory: create and search, the missing piece of
//! how an institution gets into the system in the first place.

use crate::domain::entities::Institution;
use crate::error::{Error, Result};
use crate::repository::InstitutionRepository;

pub async fn create(
	institutions: &(impl InstitutionRepository + ?Sized),
	name: impl Into<String>,
	short_name: Option<String>,
	city: Option<String>,
) -> Result<Institution> {
	let name = name.into();
	if institutions.get_by_name(&name).await?.is_some() {
		return Err(Error::DuplicateKey(format!(
			"an institution named '{name}' already exists"
		)));
	}
	let institution = Institution::new(name, short_name, city)?;
	institutions.create(institution).await
}

pub async fn search(
	institutions: &(impl InstitutionRepository + ?Sized),
	query: &str,
	limit: usize,
) -> Result<Vec<Institution>> {
	institutions.search(query, limit).await
}
