mod trace_error;

pub use trace_error::TraceError;
