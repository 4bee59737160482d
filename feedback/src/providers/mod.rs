//! # Provider Implementations
//!
//! This module provides the built-in [`Provider`](crate::traits::provider::Provider)
//! implementations. Each provider turns one prompt + schema pair into one HTTP request
//! and returns the raw response text for downstream validation.
//!
//! ## Available Providers
//!
//! - [`gemini`]: Google's Gemini API with structured JSON output.
//! - [`remote`]: A self-hosted ai-server endpoint authenticated with an API key.

pub mod gemini;
pub mod remote;
