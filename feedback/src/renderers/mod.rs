//! # Renderer Implementations
//!
//! Reference [`Renderer`](crate::traits::render::Renderer) implementations over the
//! logical report structure. Any other output medium can be added by implementing the
//! trait; the report's ordering is already deterministic, so renderers never sort.

pub mod markdown;
pub mod plain;
