//! Span utilities for cascade tracing.

use tracing::{debug_span, Span};

use crate::loader::CascadeReport;
use crate::version::VersionTag;

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for the standard cascade span.
pub struct CascadeSpan;

impl CascadeSpan {
    /// Create a cascade span.
    ///
    /// Fields included:
    /// - `cascade`: entry point name of the tag, e.g. `gl_4_6_comp`
    /// - `modules`: filled in by [`CascadeSpan::record_report`]
    /// - `failures`: filled in by [`CascadeSpan::record_report`]
    /// - `status`, `error.message`: filled in by [`SpanExt::record_result`]
    pub fn new(tag: VersionTag) -> Span {
        debug_span!(
            "gll.cascade",
            cascade = %tag.entry_name(),
            modules = tracing::field::Empty,
            failures = tracing::field::Empty,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }

    /// Span for setting up a resolver.
    pub fn resolver_setup() -> Span {
        debug_span!(
            "gll.resolver_setup",
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }

    /// Record the module count and failure total of a finished cascade.
    pub fn record_report(span: &Span, report: &CascadeReport) {
        span.record("modules", report.modules.len());
        span.record("failures", report.failures());
        span.record("status", if report.is_complete() { "ok" } else { "incomplete" });
    }
}
