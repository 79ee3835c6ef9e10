pub mod builder;
pub mod format;
pub mod qualified_name;
pub mod stack_trace;
