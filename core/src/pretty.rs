//! Stringification of arbitrary values for reasons and print contexts.

use std::fmt;

/// Renders a value as the text stored in a trace or printed next to it.
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for str {
    fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl PrettyPrint for String {
    fn pretty_print(&self) -> String {
        self.clone()
    }
}

impl PrettyPrint for dyn fmt::Debug + '_ {
    fn pretty_print(&self) -> String {
        format!("{self:#?}")
    }
}

impl<T: PrettyPrint + ?Sized> PrettyPrint for &T {
    fn pretty_print(&self) -> String {
        (**self).pretty_print()
    }
}

pub fn pretty_print<T: PrettyPrint + ?Sized>(value: &T) -> String {
    value.pretty_print()
}
