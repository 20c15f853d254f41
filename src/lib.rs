#![forbid(unsafe_code)]

//! `survey-engine` — survey schema and response engine.
//!
//! Creators define surveys made of ordered questions (free text, single
//! choice, multiple choice, 1–5 rating); respondents submit anonymously
//! through a dynamically built form keyed by the survey's public
//! identifier; creators read aggregated results. Persistence is `SQLite`
//! via `sqlx`. HTTP routing, authentication, and markup rendering are the
//! host's concern — this crate exposes plain structured data behind a
//! service-layer API.

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod forms;
pub mod models;
pub mod persistence;
pub mod qr;
pub mod service;
pub mod submission;

pub use config::EngineConfig;
pub use errors::{AppError, Result};
pub use service::SurveyService;
