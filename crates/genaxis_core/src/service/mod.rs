//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and UCSC client calls into use-case level APIs.
//! - Keep CLI and REST layers decoupled from storage details.

pub mod import_service;
