use once_cell::sync::Lazy;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Boxed table layout shared by every table of the run summary.
///
/// ```text
/// ┌──────────────┬───────┐
/// │ Total images │ 1077  │
/// │ Static pages │ 4     │
/// └──────────────┴───────┘
/// ```
pub static TABLE_FORMAT: Lazy<TableFormat> = Lazy::new(|| {
    FormatBuilder::new()
        .column_separator('│')
        .borders('│')
        .separators(&[LinePosition::Top], LineSeparator::new('─', '┬', '┌', '┐'))
        .separators(
            &[LinePosition::Title],
            LineSeparator::new('─', '┼', '├', '┤'),
        )
        .separators(
            &[LinePosition::Bottom],
            LineSeparator::new('─', '┴', '└', '┘'),
        )
        .padding(1, 1)
        .build()
});

/// One labelled value, rendered as a table row in text mode and as a
/// `json_label: json_value` pair in JSON mode.
#[derive(Debug)]
pub struct Entry {
    pub label: &'static str,
    pub value: String,
    pub json_label: &'static str,
    pub json_value: serde_json::Value,
}

#[derive(Debug)]
pub struct Metrics(pub Vec<Entry>);

impl Metrics {
    pub fn build_table(&self) -> String {
        let mut table = Table::new();
        table.set_format(*TABLE_FORMAT);
        for entry in &self.0 {
            table.add_row(Row::new(vec![
                Cell::new(entry.label),
                Cell::new(&entry.value),
            ]));
        }
        table.to_string()
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(entry.json_label, &entry.json_value)?;
        }
        map.end()
    }
}
