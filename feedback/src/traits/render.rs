//!
//! # Renderer Trait
//!
//! This module defines the [`Renderer`] trait for turning a finished
//! [`FeedbackReport`] into a concrete textual output format. The report itself is the
//! contract; renderers only present it and never change its content or ordering.

use crate::report::FeedbackReport;

/// A strategy for presenting a feedback report in one output medium.
pub trait Renderer {
    fn render(&self, report: &FeedbackReport) -> String;
}
