//! Enumerations shared across entities. Each carries the same lowercase
//! wire representation as the system it was ported from, since these
//! values cross the repository boundary and end up in persisted snapshots
//! and audit log details.

use serde::{Deserialize, Serialize};

/// Roles a [`User`](super::entities::user::User) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
	Participant,
	Admitter,
	Scanner,
	Admin,
	Invigilator,
}

impl UserRole {
	/// Admitter, Scanner, Invigilator, and Admin all operate the event; only
	/// Participant doesn't.
	pub fn is_staff(self) -> bool {
		matches!(
			self,
			UserRole::Admitter | UserRole::Scanner | UserRole::Invigilator | UserRole::Admin
		)
	}

	pub fn is_admin(self) -> bool {
		matches!(self, UserRole::Admin)
	}
}

/// Competition lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
	Draft,
	RegistrationOpen,
	InProgress,
	Checking,
	Published,
}

impl CompetitionStatus {
	pub fn allows_registration(self) -> bool {
		matches!(self, CompetitionStatus::RegistrationOpen)
	}

	pub fn allows_admission(self) -> bool {
		matches!(self, CompetitionStatus::InProgress)
	}

	pub fn allows_score_changes(self) -> bool {
		matches!(
			self,
			CompetitionStatus::InProgress | CompetitionStatus::Checking
		)
	}

	pub fn results_visible(self) -> bool {
		matches!(self, CompetitionStatus::Published)
	}
}

impl std::fmt::Display for CompetitionStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			CompetitionStatus::Draft => "draft",
			CompetitionStatus::RegistrationOpen => "registration_open",
			CompetitionStatus::InProgress => "in_progress",
			CompetitionStatus::Checking => "checking",
			CompetitionStatus::Published => "published",
		};
		write!(f, "{s}")
	}
}

/// Registration lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
	Pending,
	Admitted,
	Completed,
	Cancelled,
}

impl RegistrationStatus {
	pub fn is_active(self) -> bool {
		!matches!(self, RegistrationStatus::Cancelled)
	}

	pub fn can_generate_sheet(self) -> bool {
		matches!(self, RegistrationStatus::Admitted)
	}
}

impl std::fmt::Display for RegistrationStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			RegistrationStatus::Pending => "pending",
			RegistrationStatus::Admitted => "admitted",
			RegistrationStatus::Completed => "completed",
			RegistrationStatus::Cancelled => "cancelled",
		};
		write!(f, "{s}")
	}
}

/// Attempt (answer sheet) lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
	Printed,
	Scanned,
	Scored,
	Published,
	Invalidated,
}

impl AttemptStatus {
	pub fn is_valid(self) -> bool {
		!matches!(self, AttemptStatus::Invalidated)
	}

	pub fn can_upload_scan(self) -> bool {
		matches!(self, AttemptStatus::Printed)
	}

	pub fn can_apply_score(self) -> bool {
		matches!(
			self,
			AttemptStatus::Printed | AttemptStatus::Scanned | AttemptStatus::Scored
		)
	}

	pub fn has_score(self) -> bool {
		matches!(self, AttemptStatus::Scored | AttemptStatus::Published)
	}
}

impl std::fmt::Display for AttemptStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			AttemptStatus::Printed => "printed",
			AttemptStatus::Scanned => "scanned",
			AttemptStatus::Scored => "scored",
			AttemptStatus::Published => "published",
			AttemptStatus::Invalidated => "invalidated",
		};
		write!(f, "{s}")
	}
}

/// Primary vs. reissued answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
	Primary,
	Extra,
}

/// Events an invigilator can record against an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	StartWork,
	Submit,
	ExitRoom,
	EnterRoom,
}
