pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;
pub mod seating;
pub mod workflows;
