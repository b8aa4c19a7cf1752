//! SkillSense Backend Library
//!
//! The career-guidance assistant core plus the HTTP surface that hosts it.
//! The server binary is in `src/main.rs`; the desktop shell links this crate
//! directly.

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod websocket;
