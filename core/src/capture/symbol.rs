//! Flattening of demangled Rust symbol paths into raw frames.
//!
//! `frametrace::capture::symbol::raw_frame` becomes module `frametrace@capture@symbol`
//! and function `raw_frame`. Closure segments stay attached to the function
//! they are defined in.

use crate::diagnostics::builder::RawFrame;
use crate::diagnostics::qualified_name::MODULE_SEPARATOR;

/// Module name used for symbols without a path, such as C entry points.
pub const NATIVE_MODULE: &str = "<native>";

/// Rust does not record arity in symbols.
pub const UNKNOWN_ARITY: usize = 0;

/// Splits a demangled path on `::`, keeping `<...>` groups intact.
pub fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` inside fn pointer types is not a closing bracket.
            b'>' if i == 0 || bytes[i - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments
}

/// Closures and shims: `{{closure}}`, `{closure#0}`, `{shim:vtable#0}`.
fn is_anonymous(segment: &str) -> bool {
    segment.starts_with('{')
}

/// Path segments with turbofish arguments (`f::<T, U>`) folded into the
/// segment they parameterize.
fn named_segments(symbol: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for segment in split_path(symbol) {
        match segments.last_mut() {
            Some(previous) if segment.starts_with('<') => {
                previous.push_str("::");
                previous.push_str(segment);
            }
            _ => segments.push(segment.to_string()),
        }
    }
    segments
}

pub fn raw_frame(index: usize, symbol: &str, file_name: String, line_number: usize) -> RawFrame {
    let mut segments = named_segments(symbol);
    let mut function_name = segments.pop().unwrap_or_default();
    while is_anonymous(&function_name) {
        match segments.pop() {
            Some(parent) => function_name = format!("{parent}::{function_name}"),
            None => break,
        }
    }

    let module_name = if segments.is_empty() {
        NATIVE_MODULE.to_string()
    } else {
        segments.join(&MODULE_SEPARATOR.to_string())
    };

    RawFrame {
        index,
        module_name,
        function_name,
        arity: UNKNOWN_ARITY,
        line_number: if file_name.is_empty() { 0 } else { line_number },
        file_name,
    }
}
