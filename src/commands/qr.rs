use anyhow::{Context, Result};

use crate::cli::QrCommand;
use crate::crypto::{self, ErrorCorrection};

pub fn run(cmd: &QrCommand) -> Result<()> {
	match cmd {
		QrCommand::Encode { payload, ec } => encode(payload, ec),
	}
}

fn encode(payload: &str, ec: &str) -> Result<()> {
	let ec = ErrorCorrection::parse(ec).context("invalid --ec value")?;
	let image = crypto::encode_qr(payload, ec)?;
	println!("{}", image.render_unicode());
	println!("Payload: {payload}");
	Ok(())
}
