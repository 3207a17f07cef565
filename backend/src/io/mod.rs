//! # IO Module
//!
//! Everything that talks to the outside world: the REST API served to the
//! frontend and the Gemini client the AI features call out to.

pub mod gemini;
pub mod rest;

pub use gemini::{GeminiClient, TextGenerator};
