//! The runtime side of tracing: primitives that snapshot the call stack.
//!
//! Everything downstream of [`StackCapture`] works on [`RawCapture`] values and
//! never talks to the runtime directly, so a capture can be replayed or faked.

mod backtrace_capture;
pub mod panic_message;
pub mod symbol;

use std::any::Any;
use std::fmt;

pub use backtrace_capture::BacktraceCapture;

use crate::diagnostics::builder::RawFrame;
use crate::pretty::PrettyPrint;

/// Reason stored on traces taken from the running stack rather than a failure.
pub const CONTINUATION_REASON: &str = "Trace";

/// Why a capture was taken.
pub enum RawReason {
    /// An explicit snapshot of the current stack.
    Continuation,
    /// The payload of a panic that escaped a guarded callable.
    Panic(Box<dyn Any + Send>),
}

impl fmt::Debug for RawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawReason::Continuation => f.write_str("Continuation"),
            RawReason::Panic(payload) => f
                .debug_tuple("Panic")
                .field(&panic_message::format_panic(payload.as_ref()))
                .finish(),
        }
    }
}

impl PrettyPrint for RawReason {
    fn pretty_print(&self) -> String {
        match self {
            RawReason::Continuation => CONTINUATION_REASON.to_string(),
            RawReason::Panic(payload) => panic_message::format_panic(payload.as_ref()),
        }
    }
}

/// Reason plus frames, most recent first, exactly as a primitive produced them.
#[derive(Debug)]
pub struct RawCapture {
    pub reason: RawReason,
    pub frames: Vec<RawFrame>,
}

/// Host primitives for stack introspection and failure recovery.
pub trait StackCapture {
    /// Snapshot of the caller's stack with a [`RawReason::Continuation`] reason.
    fn capture_current_stack(&self) -> RawCapture;

    /// Runs `f`; if it panics, returns the panic payload and the frames at the
    /// point of failure.
    ///
    /// The first frame of a failed capture is always a synthetic one for the
    /// call into this boundary. Consumers are expected to drop it.
    fn capture_on_failure<T, F>(&self, f: F) -> Result<T, RawCapture>
    where
        F: FnOnce() -> T;
}

impl<C: StackCapture> StackCapture for &C {
    fn capture_current_stack(&self) -> RawCapture {
        (**self).capture_current_stack()
    }

    fn capture_on_failure<T, F>(&self, f: F) -> Result<T, RawCapture>
    where
        F: FnOnce() -> T,
    {
        (**self).capture_on_failure(f)
    }
}
