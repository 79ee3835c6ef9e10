//! A small call chain that fails on purpose, so guarded traces have something
//! to show.

#[inline(never)]
pub fn run(message: &str) {
    load_settings(message);
}

#[inline(never)]
fn load_settings(message: &str) {
    validate_entry(message);
}

#[inline(never)]
fn validate_entry(message: &str) {
    panic!("{message}");
}
