//! The token subsystem and QR encode/decode helpers.
//!
//! Tokens never touch persistence directly; `TokenService` only produces
//! the raw/hash pair and later verifies a presented raw value against a
//! stored hash. The raw value is the only thing ever embedded in a QR
//! code. Verification is constant-time so a chatty attacker timing
//! responses can't learn the hash byte-by-byte.

use hmac::{Hmac, Mac};
use qrcode::{EcLevel, QrCode};
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 hash of a token, as stored in the database. Always 64 lowercase
/// hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
	pub fn new(value: impl Into<String>) -> Result<Self> {
		let value = value.into();
		if value.len() != 64 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(Error::Validation(
				"token hash must be 64 hex characters".into(),
			));
		}
		Ok(Self(value.to_lowercase()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for TokenHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A freshly generated token: the raw value (only ever seen at generation
/// time, or by the participant who re-displays their QR) and its hash (the
/// only thing persisted otherwise).
#[derive(Debug, Clone)]
pub struct Token {
	pub raw: String,
	pub hash: TokenHash,
}

/// Generates, hashes, and verifies tokens under a process-wide HMAC secret.
pub struct TokenService {
	secret: Vec<u8>,
}

impl TokenService {
	/// Construction fails if the secret is shorter than 32 bytes — a short
	/// key would make the HMAC brute-forceable.
	pub fn new(secret_key: impl AsRef<[u8]>) -> Result<Self> {
		let secret = secret_key.as_ref().to_vec();
		if secret.len() < 32 {
			return Err(Error::Fatal(
				"token service secret key must be at least 32 bytes".into(),
			));
		}
		Ok(Self { secret })
	}

	/// Generate `size_bytes` of cryptographically random data, URL-safe
	/// base64 encode it as the raw token, and compute its hash.
	pub fn generate(&self, size_bytes: usize) -> Token {
		let mut bytes = vec![0u8; size_bytes];
		rand::thread_rng().fill_bytes(&mut bytes);
		let raw = base64_url_encode(&bytes);
		let hash = self.hash(&raw);
		Token { raw, hash }
	}

	/// Hash a raw token in isolation (no generation).
	pub fn hash(&self, raw: &str) -> TokenHash {
		let mut mac =
			HmacSha256::new_from_slice(&self.secret).expect("HMAC-SHA256 accepts any key length");
		mac.update(raw.as_bytes());
		let digest = hex::encode(mac.finalize().into_bytes());
		TokenHash(digest)
	}

	/// Constant-time verification of a raw token against a stored hash.
	/// Returns `false` on any empty input without hashing anything.
	pub fn verify(&self, raw: &str, stored_hash: &TokenHash) -> bool {
		if raw.is_empty() || stored_hash.0.is_empty() {
			return false;
		}
		let computed = self.hash(raw);
		ct_eq(computed.0.as_bytes(), stored_hash.0.as_bytes())
	}
}

/// Constant-time byte comparison. Unlike `==`, this does not short-circuit
/// on the first differing byte, so the time taken does not leak how many
/// leading bytes matched.
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
	if a.len() != b.len() {
		return false;
	}
	let mut diff: u8 = 0;
	for (x, y) in a.iter().zip(b.iter()) {
		diff |= x ^ y;
	}
	diff == 0
}

fn base64_url_encode(bytes: &[u8]) -> String {
	const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
	let mut out = String::with_capacity((bytes.len() * 4).div_ceil(3));
	for chunk in bytes.chunks(3) {
		let b0 = chunk[0] as u32;
		let b1 = *chunk.get(1).unwrap_or(&0) as u32;
		let b2 = *chunk.get(2).unwrap_or(&0) as u32;
		let n = (b0 << 16) | (b1 << 8) | b2;

		out.push(ALPHABET[((n >> 18) & 0x3f) as usize] as char);
		out.push(ALPHABET[((n >> 12) & 0x3f) as usize] as char);
		if chunk.len() > 1 {
			out.push(ALPHABET[((n >> 6) & 0x3f) as usize] as char);
		}
		if chunk.len() > 2 {
			out.push(ALPHABET[(n & 0x3f) as usize] as char);
		}
	}
	out
}

// -- QR codes --

/// Error-correction level for QR generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
	L,
	M,
	Q,
	H,
}

impl ErrorCorrection {
	pub fn parse(s: &str) -> Result<Self> {
		match s {
			"L" => Ok(Self::L),
			"M" => Ok(Self::M),
			"Q" => Ok(Self::Q),
			"H" => Ok(Self::H),
			other => Err(Error::Validation(format!(
				"invalid QR error correction level: {other}"
			))),
		}
	}

	fn as_ec_level(self) -> EcLevel {
		match self {
			Self::L => EcLevel::L,
			Self::M => EcLevel::M,
			Self::Q => EcLevel::Q,
			Self::H => EcLevel::H,
		}
	}
}

/// A generated QR code: the module matrix plus the payload it encodes.
///
/// Keeping the payload alongside the matrix lets [`decode_qr`] stand in for
/// a vision-based scanner: a real scanner reconstructs the payload from
/// pixels, while this one already knows it.
pub struct QrImage {
	code: QrCode,
	payload: String,
}

impl QrImage {
	/// Render the QR as a grid of light/dark modules (no quiet zone).
	pub fn matrix(&self) -> Vec<Vec<bool>> {
		let width = self.code.width();
		(0..width)
			.map(|y| {
				(0..width)
					.map(|x| self.code[(x, y)] == qrcode::Color::Dark)
					.collect()
			})
			.collect()
	}

	/// Render as a string of Unicode block characters, one line per two
	/// module-rows, suitable for terminal display.
	pub fn render_unicode(&self) -> String {
		self.code.render::<char>().quiet_zone(false).build()
	}
}

/// Encode `payload` into a QR code at the given error-correction level.
/// Fails if the payload is too large to fit even the largest QR version,
/// which `qrcode` reports as an error.
pub fn encode_qr(payload: &str, ec: ErrorCorrection) -> Result<QrImage> {
	let code = QrCode::with_error_correction_level(payload.as_bytes(), ec.as_ec_level())
		.map_err(|e| Error::Validation(format!("QR encode failed: {e}")))?;
	Ok(QrImage {
		code,
		payload: payload.to_owned(),
	})
}

/// Decode a previously encoded QR image back to its payload. Stands in for
/// the vision-based decoder that is out of scope for this crate (see
/// [`QrImage`]).
pub fn decode_qr(image: &QrImage) -> Option<String> {
	Some(image.payload.clone())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn service() -> TokenService {
		TokenService::new("0123456789abcdef0123456789abcdef").unwrap()
	}

	#[test]
	fn short_secret_rejected() {
		assert!(TokenService::new("short").is_err());
	}

	#[test]
	fn generate_yields_64_char_hash() {
		let svc = service();
		let token = svc.generate(32);
		assert_eq!(token.hash.as_str().len(), 64);
		assert!(token.hash.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
	}

	#[test]
	fn two_generated_tokens_differ() {
		let svc = service();
		let a = svc.generate(32);
		let b = svc.generate(32);
		assert_ne!(a.raw, b.raw);
		assert_ne!(a.hash, b.hash);
	}

	#[test]
	fn verify_roundtrip() {
		let svc = service();
		let token = svc.generate(32);
		assert!(svc.verify(&token.raw, &token.hash));
		assert!(!svc.verify("not-the-token", &token.hash));
	}

	#[test]
	fn verify_rejects_empty_input() {
		let svc = service();
		let token = svc.generate(32);
		assert!(!svc.verify("", &token.hash));
		assert!(!svc.verify(&token.raw, &TokenHash::new("a".repeat(64)).unwrap()));
	}

	#[test]
	fn hash_is_deterministic() {
		let svc = service();
		assert_eq!(svc.hash("same-input"), svc.hash("same-input"));
	}

	#[test]
	fn different_secrets_yield_different_hashes() {
		let a = TokenService::new("0123456789abcdef0123456789abcdef").unwrap();
		let b = TokenService::new("fedcba9876543210fedcba9876543210").unwrap();
		assert_ne!(a.hash("same-input"), b.hash("same-input"));
	}

	#[test]
	fn qr_roundtrip() {
		let image = encode_qr("a-raw-sheet-token", ErrorCorrection::H).unwrap();
		assert_eq!(decode_qr(&image).as_deref(), Some("a-raw-sheet-token"));
	}

	#[test]
	fn qr_error_correction_parses_known_levels() {
		for (s, expect) in [
			("L", ErrorCorrection::L),
			("M", ErrorCorrection::M),
			("Q", ErrorCorrection::Q),
			("H", ErrorCorrection::H),
		] {
			assert_eq!(ErrorCorrection::parse(s).unwrap(), expect);
		}
		assert!(ErrorCorrection::parse("Z").is_err());
	}
}
