use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use backtrace::Backtrace;

use super::symbol;
use super::{RawCapture, RawReason, StackCapture};
use crate::diagnostics::builder::RawFrame;

/// Frames belonging to the capture machinery itself, skipped from the top of
/// a snapshot of the current stack.
const CAPTURE_PREFIXES: &[&str] = &[
    "backtrace::",
    "frametrace::capture::",
    "<frametrace::capture::",
    "frametrace::tracer::",
    "<frametrace::tracer::",
    "frametrace::current_trace",
];

/// The last frame of the panic runtime before the failing call. Everything up
/// to and including the newest match belongs to the runtime and the hook.
const PANIC_ENTRY_PREFIXES: &[&str] = &[
    "rust_begin_unwind",
    "__rustc::rust_begin_unwind",
    "core::panicking::",
    "std::panicking::begin_panic",
    "std::panic::panic_any",
];

/// Frames marking the `catch_unwind` boundary; they and everything older are
/// outside the guarded callable.
const BOUNDARY_PREFIXES: &[&str] = &[
    "<core::panic::unwind_safe::AssertUnwindSafe<F>",
    "std::panicking::try",
    "std::panicking::catch_unwind",
    "std::panic::catch_unwind",
    "__rust_try",
];

const BOUNDARY_MODULE: &str = "frametrace@capture";
const BOUNDARY_FUNCTION: &str = "capture_on_failure";

static PANIC_HOOK: Once = Once::new();

thread_local! {
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    static PANIC_FRAMES: RefCell<Option<Vec<RawFrame>>> = const { RefCell::new(None) };
}

/// [`StackCapture`] backed by the `backtrace` crate and `catch_unwind`.
///
/// Failed captures need the frames at the panic site, which are gone by the
/// time `catch_unwind` returns. A process-wide panic hook records them for
/// threads currently inside a guarded call and defers to the previous hook
/// everywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl BacktraceCapture {
    pub fn new() -> Self {
        Self
    }
}

struct ResolvedSymbol {
    name: String,
    file: String,
    line: usize,
}

fn resolve_symbols(backtrace: &Backtrace) -> Vec<ResolvedSymbol> {
    let mut symbols = Vec::new();
    for frame in backtrace.frames() {
        // Inlined calls show up as several symbols on one frame, innermost first.
        for symbol in frame.symbols() {
            let name = symbol
                .name()
                .map(|name| format!("{name:#}"))
                .unwrap_or_else(|| "<unknown>".to_string());
            let file = symbol
                .filename()
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            let line = symbol.lineno().unwrap_or(0) as usize;
            symbols.push(ResolvedSymbol { name, file, line });
        }
    }
    symbols
}

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix))
}

fn to_raw_frames<I>(symbols: I, first_index: usize) -> Vec<RawFrame>
where
    I: IntoIterator<Item = ResolvedSymbol>,
{
    symbols
        .into_iter()
        .enumerate()
        .map(|(offset, sym)| {
            symbol::raw_frame(first_index + offset, &sym.name, sym.file, sym.line)
        })
        .collect()
}

/// Cuts a panic-hook backtrace down to the frames of the guarded callable.
fn panic_site(mut symbols: Vec<ResolvedSymbol>) -> Vec<ResolvedSymbol> {
    let boundary = symbols
        .iter()
        .position(|sym| has_prefix(&sym.name, BOUNDARY_PREFIXES))
        .unwrap_or(symbols.len());
    symbols.truncate(boundary);

    let start = symbols
        .iter()
        .rposition(|sym| has_prefix(&sym.name, PANIC_ENTRY_PREFIXES))
        .map_or(0, |entry| entry + 1);
    symbols.split_off(start)
}

fn capture_panic_site() -> Vec<RawFrame> {
    let inside = panic_site(resolve_symbols(&Backtrace::new()));
    // Index 0 is reserved for the boundary frame.
    to_raw_frames(inside, 1)
}

fn take_panic_frames() -> Option<Vec<RawFrame>> {
    PANIC_FRAMES.with(|slot| slot.borrow_mut().take())
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARD_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            log::debug!("guarded panic: {info}");
            let frames = capture_panic_site();
            PANIC_FRAMES.with(|slot| *slot.borrow_mut() = Some(frames));
        }));
    });
}

/// Keeps [`GUARD_DEPTH`] balanced even if the callable unwinds.
struct GuardScope;

impl GuardScope {
    fn enter() -> Self {
        GUARD_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Placeholder for the call into the boundary. It carries no location since
/// consumers drop it before building a trace.
fn boundary_frame() -> RawFrame {
    RawFrame {
        index: 0,
        module_name: BOUNDARY_MODULE.to_string(),
        function_name: BOUNDARY_FUNCTION.to_string(),
        arity: 1,
        file_name: String::new(),
        line_number: 0,
    }
}

impl StackCapture for BacktraceCapture {
    fn capture_current_stack(&self) -> RawCapture {
        let symbols = resolve_symbols(&Backtrace::new());
        let frames = to_raw_frames(
            symbols
                .into_iter()
                .skip_while(|sym| has_prefix(&sym.name, CAPTURE_PREFIXES)),
            0,
        );
        log::trace!("captured {} frames from the current stack", frames.len());
        RawCapture {
            reason: RawReason::Continuation,
            frames,
        }
    }

    fn capture_on_failure<T, F>(&self, f: F) -> Result<T, RawCapture>
    where
        F: FnOnce() -> T,
    {
        install_panic_hook();
        // Frames left by a panic that was caught inside an earlier guarded call.
        take_panic_frames();

        let result = {
            let _scope = GuardScope::enter();
            panic::catch_unwind(AssertUnwindSafe(f))
        };

        // A panic without a hook run (`resume_unwind`) has no recorded site.
        let site = take_panic_frames();
        result.map_err(|payload| {
            let site = site.unwrap_or_default();
            let mut frames = Vec::with_capacity(site.len() + 1);
            frames.push(boundary_frame());
            frames.extend(site);
            RawCapture {
                reason: RawReason::Panic(payload),
                frames,
            }
        })
    }
}
