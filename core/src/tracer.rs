use crate::capture::{BacktraceCapture, StackCapture};
use crate::diagnostics::builder::build_trace;
use crate::diagnostics::format::Formatter;
use crate::diagnostics::stack_trace::StackTrace;
use crate::guard::failure_trace;

/// Configured entry point for capturing, guarding and rendering traces.
#[derive(Debug, Clone, Default)]
pub struct Tracer<C = BacktraceCapture> {
    capture: C,
    formatter: Formatter,
    max_frames: Option<usize>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: StackCapture> Tracer<C> {
    pub fn with_capture<D: StackCapture>(self, capture: D) -> Tracer<D> {
        Tracer {
            capture,
            formatter: self.formatter,
            max_frames: self.max_frames,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Keeps only the `max` most recent frames of every capture.
    pub fn with_max_frames(mut self, max: usize) -> Self {
        self.max_frames = Some(max);
        self
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn current(&self) -> StackTrace {
        let raw = self.capture.capture_current_stack();
        let frames = raw
            .frames
            .into_iter()
            .take(self.max_frames.unwrap_or(usize::MAX));
        build_trace(&raw.reason, frames)
    }

    pub fn invoke_guarded<T, F>(&self, f: F) -> Result<T, StackTrace>
    where
        F: FnOnce() -> T,
    {
        self.capture
            .capture_on_failure(f)
            .map_err(|raw| failure_trace(raw, self.max_frames))
    }

    pub fn format(&self, trace: &StackTrace) -> String {
        self.formatter.format_trace(trace)
    }
}
