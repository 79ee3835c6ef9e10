use crate::capture::{BacktraceCapture, RawCapture, StackCapture};
use crate::diagnostics::builder::build_trace;
use crate::diagnostics::stack_trace::StackTrace;

/// Builds the trace for a failed guarded call.
///
/// The first raw frame is the boundary's own call and is always dropped.
pub(crate) fn failure_trace(raw: RawCapture, max_frames: Option<usize>) -> StackTrace {
    let RawCapture { reason, frames } = raw;
    let captured = frames.len();
    let frames = frames
        .into_iter()
        .skip(1)
        .take(max_frames.unwrap_or(usize::MAX));

    let trace = build_trace(&reason, frames);
    log::debug!(
        "guarded call failed with '{}', kept {} of {} captured frames",
        trace.reason(),
        trace.size(),
        captured
    );
    trace
}

/// Runs `f` behind `capture`'s failure boundary.
///
/// A panic escaping `f` comes back as `Err` with the stack at the point of
/// failure; this function itself never panics.
pub fn invoke_guarded_with<C, T, F>(capture: &C, f: F) -> Result<T, StackTrace>
where
    C: StackCapture,
    F: FnOnce() -> T,
{
    capture
        .capture_on_failure(f)
        .map_err(|raw| failure_trace(raw, None))
}

/// [`invoke_guarded_with`] using [`BacktraceCapture`].
pub fn invoke_guarded<T, F>(f: F) -> Result<T, StackTrace>
where
    F: FnOnce() -> T,
{
    invoke_guarded_with(&BacktraceCapture, f)
}
