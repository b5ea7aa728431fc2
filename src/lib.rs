//! Sales Coach - session core for live sales-coaching calls
//!
//! A trainee talks to a simulated buyer while a coach watches. This crate
//! owns the transcript, derives the conversation state after every turn,
//! enforces the session lifecycle and keeps the live sessions of one process.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
