use std::cell::RefCell;

use frametrace::{
    RawCapture, RawFrame, RawReason, StackCapture, StackTrace, Tracer, invoke_guarded,
    invoke_guarded_with,
};

fn raw(index: usize, function_name: &str) -> RawFrame {
    RawFrame {
        index,
        module_name: "scripted".to_string(),
        function_name: function_name.to_string(),
        arity: 0,
        file_name: String::new(),
        line_number: 0,
    }
}

/// Replays a fixed failure capture instead of talking to the runtime.
struct ScriptedCapture {
    frames: Vec<RawFrame>,
    calls: RefCell<usize>,
}

impl ScriptedCapture {
    fn new(names: &[&str]) -> Self {
        let mut frames = vec![raw(0, "boundary")];
        frames.extend(names.iter().enumerate().map(|(i, name)| raw(i + 1, name)));
        Self {
            frames,
            calls: RefCell::new(0),
        }
    }
}

impl StackCapture for ScriptedCapture {
    fn capture_current_stack(&self) -> RawCapture {
        RawCapture {
            reason: RawReason::Continuation,
            frames: self.frames[1..].to_vec(),
        }
    }

    fn capture_on_failure<T, F>(&self, f: F) -> Result<T, RawCapture>
    where
        F: FnOnce() -> T,
    {
        *self.calls.borrow_mut() += 1;
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => Err(RawCapture {
                reason: RawReason::Panic(payload),
                frames: self.frames.clone(),
            }),
        }
    }
}

fn function_names(trace: &StackTrace) -> Vec<&str> {
    trace.iter().map(|frame| frame.function_name.as_str()).collect()
}

#[inline(never)]
fn explode() -> u32 {
    panic!("boom");
}

#[inline(never)]
fn call_explode() -> u32 {
    explode() + 1
}

#[test]
fn normal_return_is_success() {
    let capture = ScriptedCapture::new(&["inner"]);
    let result = invoke_guarded_with(&capture, || 6 * 7);

    assert_eq!(result, Ok(42));
    assert_eq!(*capture.calls.borrow(), 1);
}

#[test]
fn boundary_frame_is_dropped_from_failures() {
    let capture = ScriptedCapture::new(&["inner", "middle", "outer"]);
    let trace = invoke_guarded_with(&capture, || -> u32 { panic!("scripted failure") })
        .expect_err("callable panics");

    assert_eq!(trace.size(), capture.frames.len() - 1);
    assert_eq!(function_names(&trace), vec!["inner", "middle", "outer"]);
    assert_eq!(trace.frame_at_position(0).stack_index, 3);
    assert_eq!(trace.reason(), "panic: scripted failure");
}

#[test]
fn failure_with_only_the_boundary_frame_is_an_empty_trace() {
    let capture = ScriptedCapture::new(&[]);
    let trace = invoke_guarded_with(&capture, || -> u32 { panic!("no frames") })
        .expect_err("callable panics");

    assert!(trace.is_empty());
    assert_eq!(trace.to_string(), "panic: no frames");
}

#[test]
fn non_string_payload_still_has_a_reason() {
    let capture = ScriptedCapture::new(&["inner"]);
    let trace = invoke_guarded_with(&capture, || -> u32 { std::panic::panic_any(17_u8) })
        .expect_err("callable panics");

    assert_eq!(trace.reason(), "panic with a non-string payload");
}

#[test]
fn tracer_limits_guarded_frames() {
    let tracer = Tracer::new()
        .with_capture(ScriptedCapture::new(&["a", "b", "c", "d"]))
        .with_max_frames(2);
    let trace = tracer
        .invoke_guarded(|| -> u32 { panic!("limited") })
        .expect_err("callable panics");

    assert_eq!(function_names(&trace), vec!["a", "b"]);
    let indices: Vec<usize> = trace.iter().map(|frame| frame.stack_index).collect();
    assert_eq!(indices, vec![2, 1]);
}

#[test]
fn tracer_current_uses_the_continuation_reason() {
    let tracer = Tracer::new().with_capture(ScriptedCapture::new(&["x", "y"]));
    let trace = tracer.current();

    assert_eq!(trace.reason(), "Trace");
    assert_eq!(function_names(&trace), vec!["x", "y"]);
}

#[test]
fn runtime_guard_returns_value() {
    assert_eq!(invoke_guarded(|| "fine"), Ok("fine"));
}

#[test]
fn runtime_guard_converts_panics_into_traces() {
    let trace = invoke_guarded(call_explode).expect_err("explode panics");

    assert_eq!(trace.reason(), "panic: boom");
    assert_eq!(trace.frame_at_position(0).function_name, "explode");
    assert_eq!(trace.frame_at_position(1).function_name, "call_explode");
    assert!(
        trace
            .iter()
            .all(|frame| !frame.module_name.starts_with("std@panicking")),
        "panic runtime frames leaked into:\n{trace}"
    );
    let total = trace.size();
    for (position, frame) in trace.iter().enumerate() {
        assert_eq!(frame.stack_index, total - position);
    }
}

#[inline(never)]
fn recover_locally() -> u32 {
    panic!("handled inside the callable");
}

#[test]
fn caught_panic_does_not_leak_into_a_later_failure() {
    let first = invoke_guarded(|| {
        std::panic::catch_unwind(recover_locally).unwrap_or(1)
    });
    assert_eq!(first, Ok(1));

    // `resume_unwind` skips the panic hook, so no site is recorded for this call.
    let trace = invoke_guarded(|| -> u32 {
        std::panic::resume_unwind(Box::new("resumed"))
    })
    .expect_err("callable unwinds");

    assert_eq!(trace.reason(), "panic: resumed");
    assert!(
        trace.iter().all(|frame| frame.function_name != "recover_locally"),
        "stale frames from the first call:\n{trace}"
    );
    assert!(trace.is_empty());
}

#[test]
fn runtime_guard_can_be_nested() {
    let outer = invoke_guarded(|| -> u32 {
        let inner =
            invoke_guarded(|| -> u32 { panic!("inner failure") }).expect_err("inner panics");
        assert_eq!(inner.reason(), "panic: inner failure");
        panic!("outer failure");
    })
    .expect_err("outer panics");

    assert_eq!(outer.reason(), "panic: outer failure");
}
