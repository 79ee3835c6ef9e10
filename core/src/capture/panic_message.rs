use std::any::Any;

pub fn format_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return format!("panic: {msg}");
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return format!("panic: {msg}");
    }
    "panic with a non-string payload".to_string()
}
