//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store fetches and engine computations into use-case APIs.
//! - Keep CLI and UI layers decoupled from storage details.

pub mod review_service;
