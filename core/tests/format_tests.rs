use frametrace::{Formatter, RawFrame, StackFrame, build_trace, format_frame, format_trace};
use pretty_assertions::assert_eq;

fn frame(module_name: &str, source_file: &str, source_line: usize) -> RawFrame {
    RawFrame {
        index: 0,
        module_name: module_name.to_string(),
        function_name: "f".to_string(),
        arity: 2,
        file_name: source_file.to_string(),
        line_number: source_line,
    }
}

fn single(raw: RawFrame) -> StackFrame {
    build_trace("Trace", vec![raw]).frame_at_position(0).clone()
}

#[test]
fn frame_without_location_has_one_line() {
    assert_eq!(format_frame(&single(frame("m", "", 0))), "# 01\tm:f/2");
}

#[test]
fn frame_with_location_has_second_line() {
    assert_eq!(
        format_frame(&single(frame("m", "m.src", 10))),
        "# 01\tm:f/2\n    \tin m.src:10"
    );
}

#[test]
fn trace_renders_reason_then_frames() {
    let trace = build_trace("Trace", vec![frame("m", "", 0)]);
    assert_eq!(format_trace(&trace), "Trace\n# 01\tm:f/2");
    assert_eq!(trace.to_string(), "Trace\n# 01\tm:f/2");
}

#[test]
fn empty_trace_renders_only_the_reason() {
    let trace = build_trace("panic: boom", Vec::new());
    assert_eq!(format_trace(&trace), "panic: boom");
}

#[cfg(unix)]
#[test]
fn rewritten_module_renders_as_source_file() {
    let rendered = format_frame(&single(frame("app@net@client", "", 0)));
    assert_eq!(rendered, "# 01\tf() of src/app/net/client.rs");
}

#[test]
fn synthesized_module_is_kept_verbatim() {
    let rendered = format_frame(&single(frame("app@@anon", "", 0)));
    assert_eq!(rendered, "# 01\tapp@@anon:f/2");
}

#[test]
fn stack_index_is_zero_padded_to_two_digits() {
    let frames: Vec<RawFrame> = (0..12).map(|_| frame("m", "", 0)).collect();
    let trace = build_trace("Trace", frames);

    assert!(format_frame(trace.frame_at_position(0)).starts_with("# 12\t"));
    assert!(format_frame(trace.frame_at_position(11)).starts_with("# 01\t"));
}

#[cfg(unix)]
#[test]
fn multi_frame_trace_keeps_list_order() {
    let trace = build_trace(
        "Trace",
        vec![
            frame("app@db", "src/db.rs", 31),
            frame("m", "", 0),
            frame("app", "src/main.rs", 7),
        ],
    );

    let expected = "Trace\n\
                    # 03\tf() of src/app/db.rs\n    \tin src/db.rs:31\n\
                    # 02\tm:f/2\n\
                    # 01\tapp:f/2\n    \tin src/main.rs:7";
    assert_eq!(format_trace(&trace), expected);
}

#[cfg(unix)]
#[test]
fn formatter_uses_configured_source_layout() {
    let formatter = Formatter::new()
        .with_source_root("lib")
        .with_source_extension("gleam");
    let rendered = formatter.format_frame(&single(frame("a@b", "", 0)));
    assert_eq!(rendered, "# 01\tf() of lib/a/b.gleam");
}
