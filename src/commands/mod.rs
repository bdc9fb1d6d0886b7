//! Built-in command sets, registered once at start-up.

mod lanes;
mod markers;
mod params;
mod system;
mod transport;
mod view;

#[cfg(test)]
mod tests;

use crate::command::{CommandRegistry, Value};

pub fn register_all(registry: &mut CommandRegistry) {
    transport::register(registry);
    params::register(registry);
    lanes::register(registry);
    markers::register(registry);
    view::register(registry);
    system::register(registry);
}

pub(crate) fn number(args: &[Value], index: usize) -> Result<f64, String> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("argument {} must be a number", index + 1))
}

pub(crate) fn integer(args: &[Value], index: usize) -> Result<i64, String> {
    args.get(index)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("argument {} must be an integer", index + 1))
}

pub(crate) fn text(args: &[Value], index: usize) -> Result<String, String> {
    args.get(index)
        .map(Value::as_text)
        .ok_or_else(|| format!("missing argument {}", index + 1))
}

/// Integer argument converted to a lane or table index.
pub(crate) fn index(args: &[Value], position: usize) -> Result<usize, String> {
    let value = integer(args, position)?;
    usize::try_from(value).map_err(|_| format!("index must be >= 0, got {value}"))
}
