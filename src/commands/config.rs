use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::Settings;

pub fn run(cmd: &ConfigCommand, config_dir: Option<&str>) -> Result<()> {
	match cmd {
		ConfigCommand::Show => show(config_dir),
	}
}

fn show(config_dir: Option<&str>) -> Result<()> {
	let settings = Settings::load_from(config_dir)?;
	println!("Config file: {}", Settings::path_in(config_dir).display());
	println!();
	println!("Storage");
	println!("  database_url:          {}", settings.storage.database_url);
	println!("  object_store_endpoint: {}", settings.storage.object_store_endpoint);
	println!("  bucket_sheets:         {}", settings.storage.bucket_sheets);
	println!("  bucket_scans:          {}", settings.storage.bucket_scans);
	println!();
	println!("OCR");
	println!("  confidence_threshold:  {}", settings.ocr.confidence_threshold);
	println!("  use_gpu:               {}", settings.ocr.use_gpu);
	println!();
	println!("QR");
	println!("  token_size_bytes:      {}", settings.qr.token_size_bytes);
	println!("  error_correction:      {}", settings.qr.error_correction);
	println!();
	println!("entry_token_expire_hours: {}", settings.entry_token_expire_hours);
	println!("security.hmac_secret_key: <redacted, {} bytes>", settings.security.hmac_secret_key.len());
	println!("security.secret_key:      <redacted, {} bytes>", settings.security.secret_key.len());
	Ok(())
}
