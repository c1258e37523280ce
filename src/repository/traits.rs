//! Repository trait definitions. `Repository<T>` covers the uniform
//! CRUD+pagination shape every aggregate shares; each aggregate then adds
//! the handful of lookups its workflows actually need.

use async_trait::async_trait;
use uuid::Uuid;

use crate::crypto::TokenHash;
use crate::domain::entities::*;
use crate::domain::value_objects::CompetitionStatus;
use crate::error::Result;

#[async_trait]
pub trait Repository<T>: Send + Sync {
	async fn create(&self, entity: T) -> Result<T>;
	async fn get_by_id(&self, id: Uuid) -> Result<Option<T>>;
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<T>>;
	async fn update(&self, entity: T) -> Result<T>;
	async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
	async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
	async fn exists_by_email(&self, email: &str) -> Result<bool>;
}

#[async_trait]
pub trait ParticipantRepository: Repository<Participant> {
	async fn get_by_user_id(&self, user_id: Uuid) -> Result<Option<Participant>>;
}

#[async_trait]
pub trait InstitutionRepository: Repository<Institution> {
	async fn search(&self, query: &str, limit: usize) -> Result<Vec<Institution>>;
	async fn get_by_name(&self, name: &str) -> Result<Option<Institution>>;
}

#[async_trait]
pub trait CompetitionRepository: Repository<Competition> {
	async fn get_by_status(
		&self,
		status: CompetitionStatus,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Competition>>;
}

#[async_trait]
pub trait RoomRepository: Repository<Room> {
	async fn get_by_competition(&self, competition_id: Uuid) -> Result<Vec<Room>>;
}

#[async_trait]
pub trait RegistrationRepository: Repository<Registration> {
	async fn get_by_participant_and_competition(
		&self,
		participant_id: Uuid,
		competition_id: Uuid,
	) -> Result<Option<Registration>>;
	async fn get_by_competition(
		&self,
		competition_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Registration>>;
	async fn get_by_participant_id(
		&self,
		participant_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Registration>>;
}

#[async_trait]
pub trait EntryTokenRepository: Repository<EntryToken> {
	async fn get_by_token_hash(&self, hash: &TokenHash) -> Result<Option<EntryToken>>;
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<EntryToken>>;
}

#[async_trait]
pub trait SeatAssignmentRepository: Repository<SeatAssignment> {
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<SeatAssignment>>;
	async fn get_by_room(&self, room_id: Uuid) -> Result<Vec<SeatAssignment>>;
	async fn count_by_room(&self, room_id: Uuid) -> Result<usize>;
	async fn count_by_room_and_institution(
		&self,
		room_id: Uuid,
		institution_id: Uuid,
	) -> Result<usize>;
}

#[async_trait]
pub trait AttemptRepository: Repository<Attempt> {
	async fn get_by_sheet_token_hash(&self, hash: &TokenHash) -> Result<Option<Attempt>>;
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<Attempt>>;
	async fn get_by_competition(
		&self,
		competition_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Attempt>>;
}

#[async_trait]
pub trait AnswerSheetRepository: Repository<AnswerSheet> {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<AnswerSheet>>;
	async fn get_by_token_hash(&self, hash: &TokenHash) -> Result<Option<AnswerSheet>>;
	async fn get_primary_by_attempt(&self, attempt_id: Uuid) -> Result<Option<AnswerSheet>>;
}

#[async_trait]
pub trait ScanRepository: Repository<Scan> {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<Scan>>;
	async fn get_unverified(&self, skip: usize, limit: usize) -> Result<Vec<Scan>>;
}

#[async_trait]
pub trait ParticipantEventRepository: Repository<ParticipantEvent> {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<ParticipantEvent>>;
}

#[async_trait]
pub trait DocumentRepository: Repository<Document> {
	async fn get_by_participant(&self, participant_id: Uuid) -> Result<Vec<Document>>;
}

#[async_trait]
pub trait AuditLogRepository: Repository<AuditLog> {
	async fn get_by_entity(
		&self,
		entity_type: &str,
		entity_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<AuditLog>>;
	async fn get_by_user(&self, user_id: Uuid, skip: usize, limit: usize) -> Result<Vec<AuditLog>>;
}
