use crate::{DataSet, Table};

const TRUNCATION_MARKER: &str = "[...]";
pub const DEFAULT_MIN_COLUMN_WIDTH: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub row_delimiter: String,
    pub min_column_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            row_delimiter: "\n".to_string(),
            min_column_width: DEFAULT_MIN_COLUMN_WIDTH,
        }
    }
}

/// Fixed-width text rendering of tables, for logs and failure diagnostics.
pub struct TableRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> TableRenderer<'a> {
    #[must_use]
    pub const fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn render_data_set(&self, data_set: &DataSet) -> String {
        let mut rendered = String::new();
        for table in data_set {
            rendered.push_str(&self.render_table(table));
            rendered.push_str(&self.options.row_delimiter);
        }
        rendered
    }

    #[must_use]
    pub fn render_table(&self, table: &Table) -> String {
        let delimiter = &self.options.row_delimiter;
        let mut rendered = format!("Table: {}{delimiter}{delimiter}", table.name());

        let names = table.metadata().column_names();
        let width = names
            .iter()
            .map(|name| name.chars().count())
            .fold(self.options.min_column_width, usize::max);

        self.push_line(&mut rendered, names.iter().map(String::as_str), width);
        for row in table.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|value| truncate(&value.to_string(), width))
                .collect();
            self.push_line(&mut rendered, cells.iter().map(String::as_str), width);
        }

        rendered
    }

    fn push_line<'c>(
        &self,
        rendered: &mut String,
        cells: impl Iterator<Item = &'c str>,
        width: usize,
    ) {
        rendered.push('|');
        for cell in cells {
            rendered.push_str(&format!("{cell:<width$}|"));
        }
        rendered.push_str(&self.options.row_delimiter);
    }
}

#[must_use]
pub fn render_table(table: &Table, options: &RenderOptions) -> String {
    TableRenderer::new(options).render_table(table)
}

#[must_use]
pub fn render_data_set(data_set: &DataSet, options: &RenderOptions) -> String {
    TableRenderer::new(options).render_data_set(data_set)
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }

    let keep = width.saturating_sub(TRUNCATION_MARKER.len());
    let mut truncated: String = cell.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
