//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//! - Take "today" as an argument so every view is deterministic.

pub mod auth_service;
pub mod diary_service;
pub mod profile_service;
pub mod quote_service;
pub mod report_service;
pub mod settings_service;
