//! Plain-text tables and copy-paste export formats
//!
//! Everything here is pure: same ordered input, same output.

/// Column separator used by [`render_row`].
pub const COLUMN_SEPARATOR: &str = " | ";

/// Width used for columns with no explicit width.
pub const DEFAULT_COLUMN_WIDTH: usize = 20;

/// Pad each cell to its column width and join with `" | "`.
///
/// Cells longer than their width are not truncated.
pub fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(DEFAULT_COLUMN_WIDTH);
            format!("{:<width$}", cell.as_ref(), width = width)
        })
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
}

/// Render several rows, one per line.
pub fn render_table<S: AsRef<str>>(rows: &[Vec<S>], widths: &[usize]) -> String {
    rows.iter()
        .map(|row| render_row(row, widths))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `ch` repeated `length` times.
pub fn render_separator(length: usize, ch: char) -> String {
    std::iter::repeat_n(ch, length).collect()
}

/// Replace everything outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Array literal of quoted ids, optionally commented with names:
///
/// ```text
/// const roleIds = [
///     "1", // Admin
///     "2" // Mod
/// ];
/// ```
pub fn render_array_export<T>(
    binding: &str,
    items: &[T],
    id_of: impl Fn(&T) -> String,
    name_of: Option<&dyn Fn(&T) -> String>,
) -> String {
    let mut output = format!("const {} = [\n", binding);
    for (index, item) in items.iter().enumerate() {
        let comma = if index + 1 < items.len() { "," } else { "" };
        let comment = name_of
            .map(|f| f(item))
            .filter(|name| !name.is_empty())
            .map(|name| format!(" // {}", name))
            .unwrap_or_default();
        output.push_str(&format!("    \"{}\"{}{}\n", id_of(item), comma, comment));
    }
    output.push_str("];\n");
    output
}

/// Ids joined by `", "`.
pub fn render_comma_list<T>(items: &[T], id_of: impl Fn(&T) -> String) -> String {
    items.iter().map(id_of).collect::<Vec<_>>().join(", ")
}

/// Object literal keyed by sanitized names.
///
/// Two names that sanitize to the same key produce duplicate keys; the
/// last one wins wherever the literal is evaluated.
pub fn render_map_export<T>(
    binding: &str,
    items: &[T],
    id_of: impl Fn(&T) -> String,
    name_of: impl Fn(&T) -> String,
) -> String {
    let mut output = format!("const {} = {{\n", binding);
    for (index, item) in items.iter().enumerate() {
        let comma = if index + 1 < items.len() { "," } else { "" };
        let name = name_of(item);
        output.push_str(&format!(
            "    {}: \"{}\"{} // {}\n",
            sanitize_identifier(&name),
            id_of(item),
            comma,
            name
        ));
    }
    output.push_str("};\n");
    output
}
