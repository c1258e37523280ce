//! Runtime configuration.
//!
//! Covers secrets, storage/queue endpoints, and the tunables for QR
//! generation and OCR auto-apply. Values are persisted to a TOML file on
//! disk under `~/.olympiadqr/config.toml`, falling back to defaults when
//! no file is present yet.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
	pub security: SecurityConfig,
	pub storage: StorageConfig,
	pub queue: QueueConfig,
	pub ocr: OcrConfig,
	pub qr: QrConfig,
	pub entry_token_expire_hours: i64,
	pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
	/// Secret used for JWT-shaped claims encoding (a real JWT library is
	/// out of scope here, but the claims encoder still needs a key).
	pub secret_key: String,
	/// Secret used for HMAC-SHA256 token hashing. Must be >= 32 bytes.
	pub hmac_secret_key: String,
	pub jwt_algorithm: String,
	pub jwt_expire_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
	pub database_url: String,
	pub redis_url: String,
	pub object_store_endpoint: String,
	pub bucket_sheets: String,
	pub bucket_scans: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
	pub broker_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
	pub score_field_x_mm: u32,
	pub score_field_y_mm: u32,
	pub score_field_width_mm: u32,
	pub score_field_height_mm: u32,
	pub confidence_threshold: f64,
	pub use_gpu: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
	pub token_size_bytes: usize,
	/// One of L, M, Q, H.
	pub error_correction: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			security: SecurityConfig {
				secret_key: "change-me-dev-only-change-me-dev".into(),
				hmac_secret_key: "change-me-dev-only-change-me-dev".into(),
				jwt_algorithm: "HS256".into(),
				jwt_expire_minutes: 1440,
			},
			storage: StorageConfig {
				database_url: "postgres://localhost/olympiadqr".into(),
				redis_url: "redis://localhost".into(),
				object_store_endpoint: "localhost:9000".into(),
				bucket_sheets: "answer-sheets".into(),
				bucket_scans: "scans".into(),
			},
			queue: QueueConfig {
				broker_url: "redis://localhost".into(),
			},
			ocr: OcrConfig {
				score_field_x_mm: 140,
				score_field_y_mm: 245,
				score_field_width_mm: 40,
				score_field_height_mm: 15,
				confidence_threshold: 0.7,
				use_gpu: false,
			},
			qr: QrConfig {
				token_size_bytes: 32,
				error_correction: "H".into(),
			},
			entry_token_expire_hours: 24,
			cors_origins: vec!["http://localhost:3000".into()],
		}
	}
}

impl Settings {
	/// Directory where persisted configuration lives (~/.olympiadqr/).
	pub fn dir() -> PathBuf {
		dirs::home_dir()
			.unwrap_or_else(|| PathBuf::from("."))
			.join(".olympiadqr")
	}

	/// Path to the config file.
	pub fn path() -> PathBuf {
		Self::dir().join("config.toml")
	}

	/// Path to the config file under an explicit directory override
	/// (the CLI's global `--config-dir` flag), falling back to
	/// [`Settings::path`] when no override is given.
	pub fn path_in(dir_override: Option<&str>) -> PathBuf {
		match dir_override {
			Some(dir) => PathBuf::from(dir).join("config.toml"),
			None => Self::path(),
		}
	}

	/// Load config from disk, falling back to defaults if no file exists.
	/// Validates the HMAC secret length so a misconfigured deployment
	/// fails fast rather than silently generating forgeable tokens.
	pub fn load() -> Result<Self> {
		Self::load_from(None)
	}

	/// Same as [`Settings::load`], but honors the CLI's global
	/// `--config-dir` override when one is given.
	pub fn load_from(dir_override: Option<&str>) -> Result<Self> {
		let path = Self::path_in(dir_override);
		let settings = if path.exists() {
			let content = std::fs::read_to_string(&path)
				.map_err(|e| Error::Fatal(format!("reading config: {e}")))?;
			toml::from_str(&content).map_err(|e| Error::Fatal(format!("parsing config: {e}")))?
		} else {
			Self::default()
		};
		settings.validate()?;
		Ok(settings)
	}

	/// Persist the current config to disk, creating the directory if needed.
	pub fn save(&self) -> Result<()> {
		let path = Self::path();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| Error::Fatal(format!("creating config dir: {e}")))?;
		}
		let content = toml::to_string_pretty(self)
			.map_err(|e| Error::Fatal(format!("serializing config: {e}")))?;
		std::fs::write(&path, content).map_err(|e| Error::Fatal(format!("writing config: {e}")))?;
		Ok(())
	}

	pub fn validate(&self) -> Result<()> {
		if self.security.hmac_secret_key.len() < 32 {
			return Err(Error::Fatal(
				"hmac_secret_key must be at least 32 bytes".into(),
			));
		}
		Ok(())
	}
}
