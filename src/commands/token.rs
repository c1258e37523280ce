use anyhow::Result;

use crate::cli::TokenCommand;
use crate::config::Settings;
use crate::crypto::TokenService;

pub fn run(cmd: &TokenCommand, config_dir: Option<&str>) -> Result<()> {
	match cmd {
		TokenCommand::Generate { size } => generate(*size, config_dir),
	}
}

fn generate(size: usize, config_dir: Option<&str>) -> Result<()> {
	let settings = Settings::load_from(config_dir)?;
	let service = TokenService::new(&settings.security.hmac_secret_key)?;
	let token = service.generate(size);
	println!("Raw:  {}", token.raw);
	println!("Hash: {}", token.hash);
	Ok(())
}
