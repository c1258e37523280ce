//! The policy gate: role checks and ownership checks that
//! run in front of every workflow operation. Admin is a superset of
//! every other role for every action.

use uuid::Uuid;

use crate::domain::value_objects::UserRole;
use crate::error::{Error, Result};

/// The authenticated principal behind a request, as resolved from a
/// bearer token by whatever transport layer sits in front of this crate
/// (out of scope here; see [`crate::ports::JwtEncoder`]).
#[derive(Debug, Clone, Copy)]
pub struct Subject {
	pub user_id: Uuid,
	pub role: UserRole,
	pub is_active: bool,
}

/// Reject with `Unauthenticated` if no subject is present, `Forbidden`
/// if the subject is inactive or holds none of `allowed` (admin always
/// passes).
pub fn require_role<'a>(subject: Option<&'a Subject>, allowed: &[UserRole]) -> Result<&'a Subject> {
	let subject = subject.ok_or(Error::Unauthenticated)?;
	if !subject.is_active {
		return Err(Error::Forbidden("account is deactivated".into()));
	}
	if subject.role.is_admin() || allowed.contains(&subject.role) {
		Ok(subject)
	} else {
		Err(Error::Forbidden(format!(
			"role {:?} is not permitted to perform this action",
			subject.role
		)))
	}
}

/// A participant may only touch rows whose owning participant's
/// `user_id` matches their own; admin bypasses this check entirely.
pub fn require_owner(subject: &Subject, owner_user_id: Uuid) -> Result<()> {
	if subject.role.is_admin() {
		return Ok(());
	}
	if subject.user_id != owner_user_id {
		return Err(Error::Forbidden(
			"you do not have access to this resource".into(),
		));
	}
	Ok(())
}
