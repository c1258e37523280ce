use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "olympiadqr",
	about = "Paper-based olympiad management: entry tokens, admission, seating, scoring.",
	version
)]
pub struct Cli {
	/// Override the config directory (defaults to ~/.olympiadqr).
	#[arg(long, global = true)]
	pub config_dir: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Run the full participant lifecycle against fresh in-memory
	/// adapters: register an institution and participant, open and run a
	/// competition, admit at the door, score a scan, and publish results.
	Demo,

	/// QR encode/decode utilities.
	Qr {
		#[command(subcommand)]
		command: QrCommand,
	},

	/// Entry/sheet token utilities.
	Token {
		#[command(subcommand)]
		command: TokenCommand,
	},

	/// Inspect the resolved configuration.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

#[derive(Subcommand)]
pub enum QrCommand {
	/// Encode a payload as a QR code and print it to the terminal.
	Encode {
		/// Payload to encode.
		payload: String,

		/// Error-correction level (L, M, Q, H).
		#[arg(long, default_value = "M")]
		ec: String,
	},
}

#[derive(Subcommand)]
pub enum TokenCommand {
	/// Generate a raw/hash token pair under the configured HMAC secret.
	Generate {
		/// Raw token size in bytes.
		#[arg(long, default_value = "32")]
		size: usize,
	},
}

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Print the resolved settings (secrets redacted).
	Show,
}
