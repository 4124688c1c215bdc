//! CSV rendering of decoded script rows

use std::borrow::Cow;
use super::models::{FieldValue, ScriptRow};

/// Line terminator used by the script files.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Render rows as CSV text, one line per row, each line terminated with
/// `\r\n` including the last. A blank row becomes a bare line terminator.
pub fn render_rows(rows: &[ScriptRow]) -> String {
    let mut out = String::new();
    for row in rows {
        render_row(&mut out, row);
        out.push_str(LINE_TERMINATOR);
    }
    out
}

fn render_row(out: &mut String, row: &ScriptRow) {
    for (i, field) in row.fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match field {
            FieldValue::Integer(v) => out.push_str(&v.to_string()),
            FieldValue::Text(s) => out.push_str(&escape_field(s)),
            FieldValue::Empty => {}
        }
    }
}

/// Quote a field for CSV output.
///
/// A field containing a comma or a double quote is wrapped in one pair of
/// quotes with embedded quotes doubled; anything else passes through.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
