//! Spreadsheet export: one sheet per market, header row plus data rows.

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::models::{CellValue, MarketKey, Row};
use crate::state::aggregator::Aggregator;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Workbook error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// A rectangular view of a row sequence.
///
/// Columns are the union of every row's columns in first-seen order. Cells a
/// row does not carry are `Blank`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for column in row.columns() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows written per sheet, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub sheets: Vec<(MarketKey, usize)>,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|(_, n)| n).sum()
    }
}

/// Writes an `Aggregator` as an `.xlsx` workbook.
pub struct WorkbookExporter {
    header_format: Format,
}

impl Default for WorkbookExporter {
    fn default() -> Self {
        Self {
            header_format: Format::new().set_bold(),
        }
    }
}

impl WorkbookExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables for all six markets in sheet order, empty ones included.
    pub fn tables(aggregator: &Aggregator) -> Vec<(MarketKey, Table)> {
        aggregator
            .sheets()
            .map(|(key, rows)| (key, Table::from_rows(rows)))
            .collect()
    }

    /// Build the workbook in memory.
    pub fn build(&self, aggregator: &Aggregator) -> Result<(Workbook, ExportSummary), ExportError> {
        let mut workbook = Workbook::new();
        let mut summary = ExportSummary::default();

        for (key, table) in Self::tables(aggregator) {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(key.as_str())?;
            self.write_table(worksheet, &table)?;
            debug!(sheet = %key, rows = table.rows.len(), columns = table.columns.len(), "Sheet built");
            summary.sheets.push((key, table.rows.len()));
        }

        Ok((workbook, summary))
    }

    /// Build and save the workbook to `path`.
    pub fn export(&self, aggregator: &Aggregator, path: &Path) -> Result<ExportSummary, ExportError> {
        let (mut workbook, summary) = self.build(aggregator)?;
        workbook.save(path)?;
        info!(
            path = %path.display(),
            sheets = summary.sheets.len(),
            rows = summary.total_rows(),
            "Workbook saved"
        );
        Ok(summary)
    }

    fn write_table(&self, worksheet: &mut Worksheet, table: &Table) -> Result<(), ExportError> {
        for (c, name) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, c as ColNum, name, &self.header_format)?;
        }

        for (r, cells) in table.rows.iter().enumerate() {
            let row = (r + 1) as RowNum;
            for (c, cell) in cells.iter().enumerate() {
                let col = c as ColNum;
                match cell {
                    CellValue::Blank => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    CellValue::Number(n) => match n.to_f64() {
                        Some(f) => {
                            worksheet.write_number(row, col, f)?;
                        }
                        None => {
                            worksheet.write_string(row, col, n.to_string())?;
                        }
                    },
                }
            }
        }

        if !table.columns.is_empty() {
            worksheet.autofit();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::aggregator::BookSource;
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_columns_are_union_in_first_seen_order() {
        let rows = vec![
            Row::new()
                .with("Player", "A".into())
                .with("DraftKings Over Odds", CellValue::Number(dec!(-110))),
            Row::new()
                .with("Player", "B".into())
                .with("FanDuel Over Odds", CellValue::Number(dec!(-105))),
        ];
        let table = Table::from_rows(&rows);

        assert_eq!(
            table.columns,
            vec!["Player", "DraftKings Over Odds", "FanDuel Over Odds"]
        );
        assert_eq!(table.rows[0][2], CellValue::Blank);
        assert_eq!(table.rows[1][1], CellValue::Blank);
        assert_eq!(table.rows[1][2], CellValue::Number(dec!(-105)));
    }

    #[test]
    fn test_empty_rows_give_empty_table() {
        let table = Table::from_rows(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_build_always_has_six_sheets() {
        let mut agg = Aggregator::default();
        agg.absorb(
            MarketKey::AnytimeTd,
            BookSource::Primary,
            vec![Row::new().with("Player", "A".into()).with("DraftKings Odds", "N/A".into())],
        );

        let (_, summary) = WorkbookExporter::new().build(&agg).unwrap();
        let names: Vec<_> = summary.sheets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "player_receptions",
                "player_anytime_td",
                "player_pass_tds",
                "player_pass_yds",
                "player_rush_yds",
                "player_reception_yds",
            ]
        );
        assert_eq!(summary.total_rows(), 1);
    }
}
