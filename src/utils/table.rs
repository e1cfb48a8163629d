//! Table rendering utilities for CLI outputs.

pub struct Column {
    pub header: String,
    pub width: usize,
    pub right: bool,
}

impl Column {
    pub fn left(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            right: false,
        }
    }

    pub fn right(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            right: true,
        }
    }

    fn cell(&self, text: &str) -> String {
        if self.right {
            format!("{:>width$} ", text, width = self.width)
        } else {
            format!("{:<width$} ", text, width = self.width)
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&col.cell(&col.header));
        }
        out.push('\n');

        // Rows; missing cells render blank
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                out.push_str(&col.cell(row.get(i).map(String::as_str).unwrap_or("")));
            }
            out.push('\n');
        }

        out
    }
}
