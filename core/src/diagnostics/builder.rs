use crate::diagnostics::stack_trace::{StackFrame, StackTrace};
use crate::pretty::PrettyPrint;

/// One frame as handed over by a capture primitive, before indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Whatever index the primitive assigned. Never read by the builder.
    pub index: usize,
    pub module_name: String,
    pub function_name: String,
    pub arity: usize,
    pub file_name: String,
    pub line_number: usize,
}

/// Builds a [`StackTrace`] from a most-recent-first raw frame sequence.
///
/// The raw indices are discarded; the frame at position `i` of `n` frames gets
/// `stack_index = n - i`. An empty sequence is a valid, empty trace.
pub fn build_trace<R, I>(reason: &R, raw_frames: I) -> StackTrace
where
    R: PrettyPrint + ?Sized,
    I: IntoIterator<Item = RawFrame>,
{
    let raw_frames: Vec<RawFrame> = raw_frames.into_iter().collect();
    let total = raw_frames.len();

    let frames = raw_frames
        .into_iter()
        .enumerate()
        .map(|(position, raw)| StackFrame {
            stack_index: total - position,
            module_name: raw.module_name,
            function_name: raw.function_name,
            arity: raw.arity,
            source_file: raw.file_name,
            source_line: raw.line_number,
        })
        .collect();

    let reason = reason.pretty_print();
    log::trace!("built trace '{reason}' with {total} frames");
    StackTrace::from_parts(reason, frames)
}
