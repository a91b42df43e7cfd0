//! JSON renderers for results and errors.

use serde_json::{json, Value};
use std::io::{self, Write};

/// Writes `value` as two-space indented JSON followed by a newline.
pub fn render_json<W: Write + ?Sized>(out: &mut W, value: &Value) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    writeln!(out, "{}", text)
}

/// Writes `{"error": message}` the same way.
pub fn render_error<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    render_json(out, &json!({ "error": message }))
}
