use std::fmt::{self, Write};
use std::path::MAIN_SEPARATOR_STR;

use crate::diagnostics::qualified_name;
use crate::diagnostics::stack_trace::{StackFrame, StackTrace};

pub const DEFAULT_SOURCE_ROOT: &str = "src";
pub const DEFAULT_SOURCE_EXTENSION: &str = "rs";

/// Renders frames and traces as text.
///
/// A frame whose module name was rewritten by the resolver is shown as a
/// function inside the module's source file, `<root>/<path>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    source_root: String,
    source_extension: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            source_root: DEFAULT_SOURCE_ROOT.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    pub fn format_frame(&self, frame: &StackFrame) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_frame(&mut out, frame);
        out
    }

    pub fn format_trace(&self, trace: &StackTrace) -> String {
        let mut out = String::new();
        let _ = self.write_trace(&mut out, trace);
        out
    }

    pub fn write_frame<W: Write>(&self, out: &mut W, frame: &StackFrame) -> fmt::Result {
        let qualified = qualified_name::resolve(&frame.module_name);

        write!(out, "# {:02}\t", frame.stack_index)?;
        if qualified != frame.module_name {
            write!(
                out,
                "{}() of {}/{}.{}",
                frame.function_name,
                self.source_root,
                qualified.replace('/', MAIN_SEPARATOR_STR),
                self.source_extension
            )?;
        } else {
            write!(out, "{}:{}/{}", qualified, frame.function_name, frame.arity)?;
        }

        if frame.has_location() {
            write!(out, "\n    \tin {}:{}", frame.source_file, frame.source_line)?;
        }
        Ok(())
    }

    pub fn write_trace<W: Write>(&self, out: &mut W, trace: &StackTrace) -> fmt::Result {
        out.write_str(trace.reason())?;
        for frame in trace {
            out.write_char('\n')?;
            self.write_frame(out, frame)?;
        }
        Ok(())
    }
}

/// Renders one frame with the default source root and extension.
pub fn format_frame(frame: &StackFrame) -> String {
    Formatter::default().format_frame(frame)
}

/// Renders the reason followed by every frame, most recent first.
pub fn format_trace(trace: &StackTrace) -> String {
    Formatter::default().format_trace(trace)
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Formatter::default().write_frame(f, self)
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Formatter::default().write_trace(f, self)
    }
}
