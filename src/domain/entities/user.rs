//! System user (all roles share one table, distinguished by `role`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserRole;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: Uuid,
	pub email: String,
	pub password_hash: String,
	pub role: UserRole,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: UserRole) -> Result<Self> {
		let email = email.into();
		let password_hash = password_hash.into();
		if !email.contains('@') {
			return Err(Error::Validation("invalid email address".into()));
		}
		if password_hash.is_empty() {
			return Err(Error::Validation("password hash cannot be empty".into()));
		}
		let now = Utc::now();
		Ok(Self {
			id: Uuid::new_v4(),
			email,
			password_hash,
			role,
			is_active: true,
			created_at: now,
			updated_at: now,
		})
	}

	pub fn deactivate(&mut self) {
		self.is_active = false;
		self.updated_at = Utc::now();
	}

	pub fn activate(&mut self) {
		self.is_active = true;
		self.updated_at = Utc::now();
	}

	pub fn change_role(&mut self, new_role: UserRole) {
		self.role = new_role;
		self.updated_at = Utc::now();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_invalid_email() {
		assert!(User::new("not-an-email", "hash", UserRole::Participant).is_err());
	}

	#[test]
	fn rejects_empty_password_hash() {
		assert!(User::new("a@b.com", "", UserRole::Participant).is_err());
	}

	#[test]
	fn deactivate_then_activate() {
		let mut u = User::new("a@b.com", "hash", UserRole::Admin).unwrap();
		u.deactivate();
		assert!(!u.is_active);
		u.activate();
		assert!(u.is_active);
	}
}
