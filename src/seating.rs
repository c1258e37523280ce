//! The seating scheduler: room/seat allocation with institution-spreading
//! and deterministic variant assignment.

use uuid::Uuid;

use crate::domain::entities::SeatAssignment;
use crate::error::{Error, Result};
use crate::repository::{
	ParticipantRepository, Registration as RegistrationEntity, RegistrationRepository, Repository,
	RoomRepository, SeatAssignmentRepository,
};

#[derive(Debug, Clone)]
pub struct AssignSeatResult {
	pub seat_assignment_id: Uuid,
	pub room_id: Uuid,
	pub room_name: String,
	pub seat_number: u32,
	pub variant_number: u32,
}

/// Assign a seat to a registration, spreading same-institution
/// participants across rooms and deriving the test variant from the seat
/// number.
///
/// 1. Idempotent: an existing assignment is returned unchanged.
/// 2. No rooms configured → `Ok(None)`, seating is skipped entirely.
/// 3. Every full room is skipped; no room with free capacity → `NoFreeSeats`.
/// 4. Among rooms with free capacity, pick the one with the fewest
///    existing occupants from the same institution, breaking ties by the
///    most free seats.
/// 5. Seat number is the smallest unused number in that room.
/// 6. Variant is `(seat_number % variants_count) + 1` — kept verbatim
///    from the source algorithm even though `((seat_number - 1) %
///    variants_count) + 1` reads more naturally; changing it would
///    silently reassign every already-printed sheet's variant.
pub async fn assign_seat(
	rooms: &(impl RoomRepository + ?Sized),
	seats: &(impl SeatAssignmentRepository + ?Sized),
	registrations: &(impl RegistrationRepository + ?Sized),
	participants: &(impl ParticipantRepository + ?Sized),
	registration_id: Uuid,
	competition_id: Uuid,
	variants_count: u32,
) -> Result<Option<AssignSeatResult>> {
	if let Some(existing) = seats.get_by_registration(registration_id).await? {
		let room_name = rooms
			.get_by_id(existing.room_id)
			.await?
			.map(|r| r.name)
			.unwrap_or_else(|| "?".to_string());
		return Ok(Some(AssignSeatResult {
			seat_assignment_id: existing.id,
			room_id: existing.room_id,
			room_name,
			seat_number: existing.seat_number,
			variant_number: existing.variant_number,
		}));
	}

	let competition_rooms = rooms.get_by_competition(competition_id).await?;
	if competition_rooms.is_empty() {
		return Ok(None);
	}

	let registration = registrations
		.get_by_id(registration_id)
		.await?
		.ok_or_else(|| Error::not_found("registration", registration_id))?;
	let participant = participants
		.get_by_id(registration.participant_id)
		.await?
		.ok_or_else(|| Error::not_found("participant", registration.participant_id))?;
	let institution_id = participant.institution_id;

	let mut best: Option<(crate::domain::entities::Room, usize, u32)> = None;
	for room in competition_rooms {
		let occupied = seats.count_by_room(room.id).await? as u32;
		if occupied >= room.capacity {
			continue;
		}
		let free_seats = room.capacity - occupied;
		let same_institution = match institution_id {
			Some(institution_id) => {
				seats
					.count_by_room_and_institution(room.id, institution_id)
					.await?
			}
			None => 0,
		};

		let better = match &best {
			None => true,
			Some((_, best_same, best_free)) => {
				same_institution < *best_same
					|| (same_institution == *best_same && free_seats > *best_free)
			}
		};
		if better {
			best = Some((room, same_institution, free_seats));
		}
	}

	let (room, _, _) = best.ok_or_else(|| {
		Error::Validation("no room has free capacity for this competition".into())
	})?;

	let room_assignments = seats.get_by_room(room.id).await?;
	let taken: std::collections::HashSet<u32> =
		room_assignments.iter().map(|a| a.seat_number).collect();
	let mut seat_number = 1;
	while taken.contains(&seat_number) {
		seat_number += 1;
	}

	let variant_number = (seat_number % variants_count) + 1;

	let assignment = SeatAssignment::new(registration_id, room.id, seat_number, variant_number)?;
	let assignment = seats.create(assignment).await?;

	Ok(Some(AssignSeatResult {
		seat_assignment_id: assignment.id,
		room_id: room.id,
		room_name: room.name,
		seat_number,
		variant_number,
	}))
}
