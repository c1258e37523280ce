//! In-memory repository implementation: one `RwLock<HashMap<Uuid, T>>`
//! table per aggregate, composed behind a single [`Store`] so a workflow
//! can take `&Store` and see every table through one consistent,
//! lock-guarded snapshot for the span of its call — the in-process stand-in
//! for "one session, one transaction".

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::crypto::TokenHash;
use crate::domain::entities::*;
use crate::domain::value_objects::CompetitionStatus;
use crate::error::{Error, Result};

use super::traits::*;

macro_rules! table {
	($name:ident, $entity:ty) => {
		#[derive(Default)]
		struct $name {
			rows: RwLock<HashMap<Uuid, $entity>>,
		}

		impl $name {
			fn create(&self, entity: $entity) -> $entity {
				self.rows
					.write()
					.unwrap()
					.insert(entity.id, entity.clone());
				entity
			}

			fn get_by_id(&self, id: Uuid) -> Option<$entity> {
				self.rows.read().unwrap().get(&id).cloned()
			}

			fn get_all(&self, skip: usize, limit: usize) -> Vec<$entity> {
				let mut rows: Vec<_> = self.rows.read().unwrap().values().cloned().collect();
				rows.sort_by_key(|e| e.created_at);
				rows.into_iter().skip(skip).take(limit).collect()
			}

			fn update(&self, entity: $entity) -> Result<$entity> {
				let mut rows = self.rows.write().unwrap();
				if !rows.contains_key(&entity.id) {
					return Err(Error::not_found(stringify!($entity), entity.id));
				}
				rows.insert(entity.id, entity.clone());
				Ok(entity)
			}

			fn delete(&self, id: Uuid) -> bool {
				self.rows.write().unwrap().remove(&id).is_some()
			}

			fn all_values(&self) -> Vec<$entity> {
				self.rows.read().unwrap().values().cloned().collect()
			}
		}
	};
}

table!(UserTable, User);
table!(ParticipantTable, Participant);
table!(InstitutionTable, Institution);
table!(CompetitionTable, Competition);
table!(RoomTable, Room);
table!(RegistrationTable, Registration);
table!(EntryTokenTable, EntryToken);
table!(SeatAssignmentTable, SeatAssignment);
table!(AttemptTable, Attempt);
table!(AnswerSheetTable, AnswerSheet);
table!(ScanTable, Scan);
table!(ParticipantEventTable, ParticipantEvent);
table!(DocumentTable, Document);
table!(AuditLogTable, AuditLog);

/// The full set of in-memory tables, composed behind one handle.
#[derive(Default)]
pub struct Store {
	users: UserTable,
	participants: ParticipantTable,
	institutions: InstitutionTable,
	competitions: CompetitionTable,
	rooms: RoomTable,
	registrations: RegistrationTable,
	entry_tokens: EntryTokenTable,
	seat_assignments: SeatAssignmentTable,
	attempts: AttemptTable,
	answer_sheets: AnswerSheetTable,
	scans: ScanTable,
	participant_events: ParticipantEventTable,
	documents: DocumentTable,
	audit_logs: AuditLogTable,
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl Repository<User> for Store {
	async fn create(&self, entity: User) -> Result<User> {
		Ok(self.users.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
		Ok(self.users.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<User>> {
		Ok(self.users.get_all(skip, limit))
	}
	async fn update(&self, entity: User) -> Result<User> {
		self.users.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.users.delete(id))
	}
}

#[async_trait]
impl UserRepository for Store {
	async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
		Ok(self
			.users
			.all_values()
			.into_iter()
			.find(|u| u.email == email))
	}
	async fn exists_by_email(&self, email: &str) -> Result<bool> {
		Ok(self.users.all_values().iter().any(|u| u.email == email))
	}
}

#[async_trait]
impl Repository<Participant> for Store {
	async fn create(&self, entity: Participant) -> Result<Participant> {
		Ok(self.participants.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Participant>> {
		Ok(self.participants.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Participant>> {
		Ok(self.participants.get_all(skip, limit))
	}
	async fn update(&self, entity: Participant) -> Result<Participant> {
		self.participants.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.participants.delete(id))
	}
}

#[async_trait]
impl ParticipantRepository for Store {
	async fn get_by_user_id(&self, user_id: Uuid) -> Result<Option<Participant>> {
		Ok(self
			.participants
			.all_values()
			.into_iter()
			.find(|p| p.user_id == user_id))
	}
}

#[async_trait]
impl Repository<Institution> for Store {
	async fn create(&self, entity: Institution) -> Result<Institution> {
		Ok(self.institutions.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Institution>> {
		Ok(self.institutions.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Institution>> {
		Ok(self.institutions.get_all(skip, limit))
	}
	async fn update(&self, entity: Institution) -> Result<Institution> {
		self.institutions.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.institutions.delete(id))
	}
}

#[async_trait]
impl InstitutionRepository for Store {
	async fn search(&self, query: &str, limit: usize) -> Result<Vec<Institution>> {
		let needle = query.to_lowercase();
		Ok(self
			.institutions
			.all_values()
			.into_iter()
			.filter(|i| i.name.to_lowercase().contains(&needle))
			.take(limit)
			.collect())
	}
	async fn get_by_name(&self, name: &str) -> Result<Option<Institution>> {
		Ok(self
			.institutions
			.all_values()
			.into_iter()
			.find(|i| i.name == name))
	}
}

#[async_trait]
impl Repository<Competition> for Store {
	async fn create(&self, entity: Competition) -> Result<Competition> {
		Ok(self.competitions.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Competition>> {
		Ok(self.competitions.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Competition>> {
		Ok(self.competitions.get_all(skip, limit))
	}
	async fn update(&self, entity: Competition) -> Result<Competition> {
		self.competitions.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.competitions.delete(id))
	}
}

#[async_trait]
impl CompetitionRepository for Store {
	async fn get_by_status(
		&self,
		status: CompetitionStatus,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Competition>> {
		Ok(self
			.competitions
			.all_values()
			.into_iter()
			.filter(|c| c.status == status)
			.skip(skip)
			.take(limit)
			.collect())
	}
}

#[async_trait]
impl Repository<Room> for Store {
	async fn create(&self, entity: Room) -> Result<Room> {
		Ok(self.rooms.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Room>> {
		Ok(self.rooms.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Room>> {
		Ok(self.rooms.get_all(skip, limit))
	}
	async fn update(&self, entity: Room) -> Result<Room> {
		self.rooms.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.rooms.delete(id))
	}
}

#[async_trait]
impl RoomRepository for Store {
	async fn get_by_competition(&self, competition_id: Uuid) -> Result<Vec<Room>> {
		Ok(self
			.rooms
			.all_values()
			.into_iter()
			.filter(|r| r.competition_id == competition_id)
			.collect())
	}
}

#[async_trait]
impl Repository<Registration> for Store {
	async fn create(&self, entity: Registration) -> Result<Registration> {
		Ok(self.registrations.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Registration>> {
		Ok(self.registrations.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Registration>> {
		Ok(self.registrations.get_all(skip, limit))
	}
	async fn update(&self, entity: Registration) -> Result<Registration> {
		self.registrations.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.registrations.delete(id))
	}
}

#[async_trait]
impl RegistrationRepository for Store {
	async fn get_by_participant_and_competition(
		&self,
		participant_id: Uuid,
		competition_id: Uuid,
	) -> Result<Option<Registration>> {
		Ok(self.registrations.all_values().into_iter().find(|r| {
			r.participant_id == participant_id && r.competition_id == competition_id
		}))
	}
	async fn get_by_competition(
		&self,
		competition_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Registration>> {
		Ok(self
			.registrations
			.all_values()
			.into_iter()
			.filter(|r| r.competition_id == competition_id)
			.skip(skip)
			.take(limit)
			.collect())
	}
	async fn get_by_participant_id(
		&self,
		participant_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Registration>> {
		Ok(self
			.registrations
			.all_values()
			.into_iter()
			.filter(|r| r.participant_id == participant_id)
			.skip(skip)
			.take(limit)
			.collect())
	}
}

#[async_trait]
impl Repository<EntryToken> for Store {
	async fn create(&self, entity: EntryToken) -> Result<EntryToken> {
		Ok(self.entry_tokens.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<EntryToken>> {
		Ok(self.entry_tokens.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<EntryToken>> {
		Ok(self.entry_tokens.get_all(skip, limit))
	}
	async fn update(&self, entity: EntryToken) -> Result<EntryToken> {
		self.entry_tokens.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.entry_tokens.delete(id))
	}
}

#[async_trait]
impl EntryTokenRepository for Store {
	async fn get_by_token_hash(&self, hash: &TokenHash) -> Result<Option<EntryToken>> {
		Ok(self
			.entry_tokens
			.all_values()
			.into_iter()
			.find(|t| &t.token_hash == hash))
	}
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<EntryToken>> {
		Ok(self
			.entry_tokens
			.all_values()
			.into_iter()
			.find(|t| t.registration_id == registration_id))
	}
}

#[async_trait]
impl Repository<SeatAssignment> for Store {
	async fn create(&self, entity: SeatAssignment) -> Result<SeatAssignment> {
		Ok(self.seat_assignments.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<SeatAssignment>> {
		Ok(self.seat_assignments.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<SeatAssignment>> {
		Ok(self.seat_assignments.get_all(skip, limit))
	}
	async fn update(&self, entity: SeatAssignment) -> Result<SeatAssignment> {
		self.seat_assignments.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.seat_assignments.delete(id))
	}
}

#[async_trait]
impl SeatAssignmentRepository for Store {
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<SeatAssignment>> {
		Ok(self
			.seat_assignments
			.all_values()
			.into_iter()
			.find(|s| s.registration_id == registration_id))
	}
	async fn get_by_room(&self, room_id: Uuid) -> Result<Vec<SeatAssignment>> {
		Ok(self
			.seat_assignments
			.all_values()
			.into_iter()
			.filter(|s| s.room_id == room_id)
			.collect())
	}
	async fn count_by_room(&self, room_id: Uuid) -> Result<usize> {
		Ok(self
			.seat_assignments
			.all_values()
			.iter()
			.filter(|s| s.room_id == room_id)
			.count())
	}
	async fn count_by_room_and_institution(
		&self,
		room_id: Uuid,
		institution_id: Uuid,
	) -> Result<usize> {
		let assignments = self.seat_assignments.all_values();
		let mut count = 0;
		for assignment in assignments.iter().filter(|s| s.room_id == room_id) {
			if let Some(registration) = self.registrations.get_by_id(assignment.registration_id) {
				if let Some(participant) = self
					.participants
					.all_values()
					.into_iter()
					.find(|p| p.id == registration.participant_id)
				{
					if participant.institution_id == Some(institution_id) {
						count += 1;
					}
				}
			}
		}
		Ok(count)
	}
}

#[async_trait]
impl Repository<Attempt> for Store {
	async fn create(&self, entity: Attempt) -> Result<Attempt> {
		Ok(self.attempts.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Attempt>> {
		Ok(self.attempts.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Attempt>> {
		Ok(self.attempts.get_all(skip, limit))
	}
	async fn update(&self, entity: Attempt) -> Result<Attempt> {
		self.attempts.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.attempts.delete(id))
	}
}

#[async_trait]
impl AttemptRepository for Store {
	async fn get_by_sheet_token_hash(&self, hash: &TokenHash) -> Result<Option<Attempt>> {
		Ok(self
			.attempts
			.all_values()
			.into_iter()
			.find(|a| &a.sheet_token_hash == hash))
	}
	async fn get_by_registration(&self, registration_id: Uuid) -> Result<Option<Attempt>> {
		Ok(self
			.attempts
			.all_values()
			.into_iter()
			.find(|a| a.registration_id == registration_id))
	}
	async fn get_by_competition(
		&self,
		competition_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<Attempt>> {
		let registrations: Vec<_> = self
			.registrations
			.all_values()
			.into_iter()
			.filter(|r| r.competition_id == competition_id)
			.map(|r| r.id)
			.collect();
		Ok(self
			.attempts
			.all_values()
			.into_iter()
			.filter(|a| registrations.contains(&a.registration_id))
			.skip(skip)
			.take(limit)
			.collect())
	}
}

#[async_trait]
impl Repository<AnswerSheet> for Store {
	async fn create(&self, entity: AnswerSheet) -> Result<AnswerSheet> {
		Ok(self.answer_sheets.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<AnswerSheet>> {
		Ok(self.answer_sheets.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<AnswerSheet>> {
		Ok(self.answer_sheets.get_all(skip, limit))
	}
	async fn update(&self, entity: AnswerSheet) -> Result<AnswerSheet> {
		self.answer_sheets.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.answer_sheets.delete(id))
	}
}

#[async_trait]
impl AnswerSheetRepository for Store {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<AnswerSheet>> {
		Ok(self
			.answer_sheets
			.all_values()
			.into_iter()
			.filter(|s| s.attempt_id == attempt_id)
			.collect())
	}
	async fn get_by_token_hash(&self, hash: &TokenHash) -> Result<Option<AnswerSheet>> {
		Ok(self
			.answer_sheets
			.all_values()
			.into_iter()
			.find(|s| &s.sheet_token_hash == hash))
	}
	async fn get_primary_by_attempt(&self, attempt_id: Uuid) -> Result<Option<AnswerSheet>> {
		Ok(self
			.answer_sheets
			.all_values()
			.into_iter()
			.find(|s| s.attempt_id == attempt_id && s.kind == crate::domain::value_objects::SheetKind::Primary))
	}
}

#[async_trait]
impl Repository<Scan> for Store {
	async fn create(&self, entity: Scan) -> Result<Scan> {
		Ok(self.scans.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Scan>> {
		Ok(self.scans.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Scan>> {
		Ok(self.scans.get_all(skip, limit))
	}
	async fn update(&self, entity: Scan) -> Result<Scan> {
		self.scans.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.scans.delete(id))
	}
}

#[async_trait]
impl ScanRepository for Store {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<Scan>> {
		Ok(self
			.scans
			.all_values()
			.into_iter()
			.filter(|s| s.attempt_id == Some(attempt_id))
			.collect())
	}
	async fn get_unverified(&self, skip: usize, limit: usize) -> Result<Vec<Scan>> {
		Ok(self
			.scans
			.all_values()
			.into_iter()
			.filter(|s| s.is_processed() && !s.is_verified())
			.skip(skip)
			.take(limit)
			.collect())
	}
}

#[async_trait]
impl Repository<ParticipantEvent> for Store {
	async fn create(&self, entity: ParticipantEvent) -> Result<ParticipantEvent> {
		Ok(self.participant_events.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<ParticipantEvent>> {
		Ok(self.participant_events.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<ParticipantEvent>> {
		Ok(self.participant_events.get_all(skip, limit))
	}
	async fn update(&self, entity: ParticipantEvent) -> Result<ParticipantEvent> {
		self.participant_events.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.participant_events.delete(id))
	}
}

#[async_trait]
impl ParticipantEventRepository for Store {
	async fn get_by_attempt(&self, attempt_id: Uuid) -> Result<Vec<ParticipantEvent>> {
		Ok(self
			.participant_events
			.all_values()
			.into_iter()
			.filter(|e| e.attempt_id == attempt_id)
			.collect())
	}
}

#[async_trait]
impl Repository<Document> for Store {
	async fn create(&self, entity: Document) -> Result<Document> {
		Ok(self.documents.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<Document>> {
		Ok(self.documents.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<Document>> {
		Ok(self.documents.get_all(skip, limit))
	}
	async fn update(&self, entity: Document) -> Result<Document> {
		self.documents.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.documents.delete(id))
	}
}

#[async_trait]
impl DocumentRepository for Store {
	async fn get_by_participant(&self, participant_id: Uuid) -> Result<Vec<Document>> {
		Ok(self
			.documents
			.all_values()
			.into_iter()
			.filter(|d| d.participant_id == participant_id)
			.collect())
	}
}

#[async_trait]
impl Repository<AuditLog> for Store {
	async fn create(&self, entity: AuditLog) -> Result<AuditLog> {
		Ok(self.audit_logs.create(entity))
	}
	async fn get_by_id(&self, id: Uuid) -> Result<Option<AuditLog>> {
		Ok(self.audit_logs.get_by_id(id))
	}
	async fn get_all(&self, skip: usize, limit: usize) -> Result<Vec<AuditLog>> {
		Ok(self.audit_logs.get_all(skip, limit))
	}
	async fn update(&self, entity: AuditLog) -> Result<AuditLog> {
		self.audit_logs.update(entity)
	}
	async fn delete(&self, id: Uuid) -> Result<bool> {
		Ok(self.audit_logs.delete(id))
	}
}

#[async_trait]
impl AuditLogRepository for Store {
	async fn get_by_entity(
		&self,
		entity_type: &str,
		entity_id: Uuid,
		skip: usize,
		limit: usize,
	) -> Result<Vec<AuditLog>> {
		Ok(self
			.audit_logs
			.all_values()
			.into_iter()
			.filter(|l| l.entity_type == entity_type && l.entity_id == entity_id)
			.skip(skip)
			.take(limit)
			.collect())
	}
	async fn get_by_user(&self, user_id: Uuid, skip: usize, limit: usize) -> Result<Vec<AuditLog>> {
		Ok(self
			.audit_logs
			.all_values()
			.into_iter()
			.filter(|l| l.user_id == Some(user_id))
			.skip(skip)
			.take(limit)
			.collect())
	}
}
