use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod crypto;
mod domain;
mod error;
mod ports;
mod repository;
mod seating;
mod workflows;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let cli = Cli::parse();
	let config_dir = cli.config_dir.as_deref();

	match &cli.command {
		Command::Demo => commands::demo::run(config_dir).await,
		Command::Qr { command } => commands::qr::run(command),
		Command::Token { command } => commands::token::run(command, config_dir),
		Command::Config { command } => commands::config::run(command, config_dir),
	}
}
