//! Editing of changelist specification forms (`p4 change -o` / `p4 change -i`).

use crate::error::{AppError, Result};

/// Placeholder text in the description of a fresh changelist form.
pub const DEFAULT_DESCRIPTION: &str = "<enter description here>";

const DESCRIPTION_FIELD: &str = "Description:";

/// Form field bodies must be indented with a space or tab.
fn indent(line: &str) -> String {
    if line.starts_with([' ', '\t']) {
        line.to_string()
    } else {
        format!("\t{line}")
    }
}

/// Build the form for a new changelist from the default template.
///
/// Everything from the placeholder onward is replaced by `description`, which
/// also drops the `Files:` section so the new changelist starts empty.
pub fn fill_new_changelist(template: &str, description: &str, line_separator: &str) -> Result<String> {
    let placeholder = template.find(DEFAULT_DESCRIPTION).ok_or_else(|| {
        AppError::Parse(format!(
            "changelist template has no '{DEFAULT_DESCRIPTION}' placeholder"
        ))
    })?;

    let head = template[..placeholder].trim_end_matches([' ', '\t']);
    let body = description
        .lines()
        .map(indent)
        .collect::<Vec<_>>()
        .join(line_separator);

    Ok(format!("{head}{body}{line_separator}"))
}

/// Append one line to the end of the Description field of an existing form.
pub fn append_description_line(form: &str, line: &str, line_separator: &str) -> Result<String> {
    let mut lines: Vec<String> = form.lines().map(str::to_string).collect();

    let field = lines
        .iter()
        .position(|l| l.trim() == DESCRIPTION_FIELD)
        .ok_or_else(|| AppError::Parse("changelist form has no Description field".to_string()))?;

    // The field ends at the next unindented line, e.g. `Files:`.
    let mut end = lines[field + 1..]
        .iter()
        .position(|l| !l.is_empty() && !l.starts_with([' ', '\t']))
        .map_or(lines.len(), |offset| field + 1 + offset);
    while end > field + 1 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    lines.insert(end, indent(line));
    Ok(lines.join(line_separator))
}
