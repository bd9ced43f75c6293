//! Aligned text tables for static listings.

/// One table column.
pub struct Column<T> {
    pub header: &'static str,
    pub min_width: usize,
    pub extract: fn(&T) -> String,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, extract: fn(&T) -> String) -> Self {
        Self {
            header,
            min_width: 0,
            extract,
        }
    }

    pub fn min_width(mut self, width: usize) -> Self {
        self.min_width = width;
        self
    }
}

/// Columns rendered tab-separated and left-aligned.
pub struct Table<T> {
    columns: Vec<Column<T>>,
}

impl<T> Table<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    /// Header line plus one line per row; empty for no rows.
    pub fn render(&self, rows: &[T]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| self.columns.iter().map(|c| (c.extract)(row)).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain([column.header.chars().count(), column.min_width])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        push_line(&mut out, &headers, &widths);
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(&padded.join("\t"));
    out.push('\n');
}
