/// Separator used to flatten a hierarchical module path into one identifier.
pub const MODULE_SEPARATOR: char = '@';

/// Marker found in synthesized names; a module containing it is never split.
pub const SYNTHESIZED_MARKER: &str = "@@";

/// Turns a flattened runtime module identifier such as `a@b@c` into the
/// namespace path `a/b/c`.
///
/// Identifiers containing `@@` are synthesized names and come back unchanged,
/// as do identifiers with no separator at all.
pub fn resolve(module_name: &str) -> String {
    if module_name.contains(SYNTHESIZED_MARKER) || !module_name.contains(MODULE_SEPARATOR) {
        return module_name.to_string();
    }
    module_name.replace(MODULE_SEPARATOR, "/")
}
