pub mod capture;
pub mod diagnostics;
pub mod errors;
pub mod guard;
pub mod pretty;
pub mod report;
pub mod tracer;

pub use capture::{BacktraceCapture, RawCapture, RawReason, StackCapture};
pub use diagnostics::builder::{RawFrame, build_trace};
pub use diagnostics::format::{Formatter, format_frame, format_trace};
pub use diagnostics::qualified_name::resolve;
pub use diagnostics::stack_trace::{StackFrame, StackTrace};
pub use errors::TraceError;
pub use guard::{invoke_guarded, invoke_guarded_with};
pub use tracer::Tracer;

/// Snapshot of the caller's stack, most recent frame first.
pub fn current_trace() -> StackTrace {
    Tracer::new().current()
}
