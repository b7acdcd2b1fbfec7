//! Elastic text table rendering for the interactive viewer.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::project::{TableView, strip_size_tags};

pub fn render_table(view: &TableView) -> String {
    let headers: Vec<String> = view
        .columns
        .iter()
        .map(|col| strip_size_tags(&col.label))
        .collect();
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in &view.rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let _ = writeln!(output, "{}", format_row(&headers, &widths));

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));

    for row in &view.rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }

    output
}

pub fn print_table(view: &TableView) {
    print!("{}", render_table(view));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = display_width(sanitized.as_ref());
        let mut cell = sanitized.into_owned();
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Column;

    fn view() -> TableView {
        TableView {
            columns: vec![
                Column {
                    label: "[size=20]Anrufer[/size]".to_string(),
                    width: Some(35.0),
                },
                Column {
                    label: "[size=20]Dauer[/size]".to_string(),
                    width: Some(25.0),
                },
            ],
            rows: vec![
                vec!["030123456".to_string(), "00:05:30".to_string()],
                vec!["42".to_string(), String::new()],
            ],
        }
    }

    #[test]
    fn renders_stripped_headers_and_padded_rows() {
        let rendered = render_table(&view());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Anrufer    Dauer");
        assert!(lines[1].starts_with("---------"));
        assert_eq!(lines[2], "030123456  00:05:30");
        assert_eq!(lines[3], "42");
    }

    #[test]
    fn control_characters_collapse_to_spaces() {
        assert_eq!(sanitize_cell("a\tb\nc"), "a b c");
        assert!(matches!(sanitize_cell("plain"), Cow::Borrowed(_)));
    }
}
