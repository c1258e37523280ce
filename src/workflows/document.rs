//! Supporting-document upload: attach eligibility paperwork to a
//! participant and list what's on file for them.

use uuid::Uuid;

use crate::domain::entities::Document;
use crate::error::{Error, Result};
use crate::ports::ObjectStore;
use crate::repository::{DocumentRepository, ParticipantRepository};

const BUCKET: &str = "documents";

pub async fn upload(
	participants: &(impl ParticipantRepository + ?Sized),
	documents: &(impl DocumentRepository + ?Sized),
	object_store: &(impl ObjectStore + ?Sized),
	participant_id: Uuid,
	file_name: &str,
	file_type: impl Into<String>,
	bytes: Vec<u8>,
) -> Result<Document> {
	participants
		.get_by_id(participant_id)
		.await?
		.ok_or_else(|| Error::not_found("participant", participant_id))?;

	let key = format!("{participant_id}/{file_name}");
	object_store.put(BUCKET, &key, bytes).await?;

	let document = Document::new(participant_id, key, file_type)?;
	documents.create(document).await
}

pub async fn list_for_participant(
	documents: &(impl DocumentRepository + ?Sized),
	participant_id: Uuid,
) -> Result<Vec<Document>> {
	documents.get_by_participant(participant_id).await
}
