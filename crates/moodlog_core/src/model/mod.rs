//! Domain model for diary entries, moods, energy and accounts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the fixed vocabularies (mood keys, energy levels, topics) shared by
//!   storage, statistics and coach text.
//!
//! # Invariants
//! - One entry per user per calendar day; the date is the entry identity.
//! - `score` always mirrors `energy`.

pub mod calendar;
pub mod energy;
pub mod entry;
pub mod mood;
pub mod topic;
pub mod user;
