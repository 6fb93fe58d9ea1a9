pub const DEFAULT_RULE_WIDTH: usize = 36;

pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// `Label:              value` with the label padded to `width`.
pub fn detail_line(label: &str, value: &str, width: usize) -> String {
    format!("{label:<width$}{value}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct ColumnLayout {
    header: &'static str,
    width: usize,
    align: Align,
}

/// Fixed-width column layout for record listings.
#[derive(Debug, Clone, Default)]
pub struct TableLayout {
    columns: Vec<ColumnLayout>,
}

impl TableLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, header: &'static str, width: usize) -> Self {
        self.columns.push(ColumnLayout {
            header,
            width,
            align: Align::Left,
        });
        self
    }

    pub fn right(mut self, header: &'static str, width: usize) -> Self {
        self.columns.push(ColumnLayout {
            header,
            width,
            align: Align::Right,
        });
        self
    }

    pub fn header(&self) -> String {
        let cells: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        self.row(&cells)
    }

    /// Cells beyond the declared columns are ignored; wider cells are not
    /// truncated.
    pub fn row<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let line = self
            .columns
            .iter()
            .zip(cells.iter())
            .map(|(col, cell)| {
                let cell = cell.as_ref();
                let width = col.width;
                match col.align {
                    Align::Left => format!("{cell:<width$}"),
                    Align::Right => format!("{cell:>width$}"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        line.trim_end().to_string()
    }
}
