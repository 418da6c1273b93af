use crate::core::report::ReportTable;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Right-aligned columns: number, count, price, amount.
const NUMERIC_COLUMNS: [usize; 4] = [0, 3, 5, 6];
/// Terminals cannot merge cells, so the total label goes in the program
/// column, which is already the widest.
const TOTAL_LABEL_COLUMN: usize = 2;

pub fn render_screen(report: &ReportTable) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled);

    table.set_header(report.header.iter().map(Cell::new));

    for row in &report.rows {
        table.add_row(row.iter().map(Cell::new));
    }

    let last = report.column_count().saturating_sub(1);
    let mut total_row: Vec<Cell> = (0..report.column_count()).map(|_| Cell::new("")).collect();
    let label_column = TOTAL_LABEL_COLUMN.min(last);
    if let Some(cell) = total_row.get_mut(label_column) {
        *cell = Cell::new(&report.total_label);
    }
    if let Some(cell) = total_row.get_mut(last) {
        *cell = Cell::new(&report.total_amount).set_alignment(CellAlignment::Right);
    }
    table.add_row(total_row);

    for idx in NUMERIC_COLUMNS {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    format!("{}\n{}", report.heading, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReportTable {
        ReportTable {
            heading: "Specification".to_string(),
            header: vec!["No.", "Holder", "Program", "Count", "Term", "Price", "Amount"]
                .into_iter()
                .map(String::from)
                .collect(),
            rows: vec![vec![
                "1",
                "JSC \"Pravo.ru\"",
                "Program «Doc.one»",
                "3",
                "from 01.01.2024 to 31.12.2024",
                "1 000,00",
                "3 000,00",
            ]
            .into_iter()
            .map(String::from)
            .collect()],
            total_label: "Grand total".to_string(),
            total_amount: "3 000,00".to_string(),
        }
    }

    #[test]
    fn test_screen_contains_every_cell() {
        let table = sample_table();
        let output = render_screen(&table);

        assert!(output.starts_with("Specification\n"));
        for cell in table.rows[0].iter().chain(table.header.iter()) {
            assert!(output.contains(cell.as_str()), "missing cell {cell}");
        }
        assert!(output.contains("Grand total"));
        assert_eq!(output.matches("3 000,00").count(), 2);
    }
}
