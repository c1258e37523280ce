//! Account registration and login: where a `Subject` first comes from,
//! ahead of the policy gate that checks it on every subsequent call.

use uuid::Uuid;

use crate::domain::entities::{Participant, User};
use crate::domain::value_objects::UserRole;
use crate::error::{Error, Result};
use crate::ports::{JwtEncoder, PasswordHasher};
use crate::repository::{ParticipantRepository, UserRepository};

pub struct RegisterUserResult {
	pub user_id: Uuid,
	pub participant_id: Option<Uuid>,
	pub claims_token: String,
}

/// Register a new account. Participant-role accounts must supply the
/// participant profile fields; other roles carry no participant row.
#[allow(clippy::too_many_arguments)]
pub async fn register_user(
	users: &(impl UserRepository + ?Sized),
	participants: &(impl ParticipantRepository + ?Sized),
	password_hasher: &(impl PasswordHasher + ?Sized),
	jwt_encoder: &(impl JwtEncoder + ?Sized),
	email: &str,
	password: &str,
	role: UserRole,
	full_name: Option<String>,
	school: Option<String>,
	grade: Option<u32>,
) -> Result<RegisterUserResult> {
	if users.exists_by_email(email).await? {
		return Err(Error::DuplicateKey(format!(
			"an account with email '{email}' already exists"
		)));
	}

	let password_hash = password_hasher.hash(password)?;
	let user = User::new(email, password_hash, role)?;
	let user = users.create(user).await?;

	let participant_id = if role == UserRole::Participant {
		let full_name = full_name
			.ok_or_else(|| Error::Validation("full name is required for participant accounts".into()))?;
		let school = school
			.ok_or_else(|| Error::Validation("school is required for participant accounts".into()))?;
		let participant = Participant::new(user.id, full_name, school, grade, None, None)?;
		let participant = participants.create(participant).await?;
		Some(participant.id)
	} else {
		None
	};

	let claims_token = jwt_encoder.encode(&user.id.to_string(), role_label(role))?;

	Ok(RegisterUserResult {
		user_id: user.id,
		participant_id,
		claims_token,
	})
}

pub struct LoginResult {
	pub user_id: Uuid,
	pub role: UserRole,
	pub claims_token: String,
}

pub async fn login_user(
	users: &(impl UserRepository + ?Sized),
	password_hasher: &(impl PasswordHasher + ?Sized),
	jwt_encoder: &(impl JwtEncoder + ?Sized),
	email: &str,
	password: &str,
) -> Result<LoginResult> {
	let user = users
		.get_by_email(email)
		.await?
		.ok_or(Error::Unauthenticated)?;

	if !user.is_active {
		return Err(Error::Forbidden("account is deactivated".into()));
	}
	if !password_hasher.verify(password, &user.password_hash) {
		return Err(Error::Unauthenticated);
	}

	let claims_token = jwt_encoder.encode(&user.id.to_string(), role_label(user.role))?;
	Ok(LoginResult {
		user_id: user.id,
		role: user.role,
		claims_token,
	})
}

fn role_label(role: UserRole) -> &'static str {
	match role {
		UserRole::Admin => "admin",
		UserRole::Admitter => "admitter",
		UserRole::Scanner => "scanner",
		UserRole::Invigilator => "invigilator",
		UserRole::Participant => "participant",
	}
}
