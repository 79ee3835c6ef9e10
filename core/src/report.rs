//! Console output for traces.
//!
//! Prints from different threads are serialized by one process-wide lock so
//! a multi-line trace is never interleaved with another.

use std::fmt;
use std::io::{self, Write};

use parking_lot::Mutex;

use crate::diagnostics::stack_trace::StackTrace;
use crate::pretty::PrettyPrint;

static OUTPUT_LOCK: Mutex<()> = parking_lot::const_mutex(());

pub fn write_trace<W: Write>(out: &mut W, trace: &StackTrace) -> io::Result<()> {
    writeln!(out, "{trace}")
}

pub fn write_trace_with_context<W, T>(
    out: &mut W,
    trace: &StackTrace,
    context: &T,
) -> io::Result<()>
where
    W: Write,
    T: fmt::Debug,
{
    let context: &dyn fmt::Debug = context;
    writeln!(out, "{trace}\nContext: {}", context.pretty_print())
}

pub fn print_trace(trace: &StackTrace) -> io::Result<()> {
    let _guard = OUTPUT_LOCK.lock();
    let mut stdout = io::stdout().lock();
    write_trace(&mut stdout, trace)?;
    stdout.flush()
}

pub fn print_trace_with_context<T: fmt::Debug>(trace: &StackTrace, context: &T) -> io::Result<()> {
    let _guard = OUTPUT_LOCK.lock();
    let mut stdout = io::stdout().lock();
    write_trace_with_context(&mut stdout, trace, context)?;
    stdout.flush()
}
