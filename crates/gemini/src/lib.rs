//! Gemini `generateContent` client used as the interview question generator.
//!
//! - [`config`] -- API key, model and sampling settings from the environment.
//! - [`api`] -- request/response wire types.
//! - [`client`] -- [`GeminiClient`], the [`TextGenerator`] implementation.
//!
//! [`TextGenerator`]: mockview_core::generator::TextGenerator

pub mod api;
pub mod client;
pub mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
