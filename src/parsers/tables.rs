use crate::error::ScrapeError;
use crate::parsers::{selector, trimmed_text};
use crate::results::Table;
use scraper::Html;

/// Extracts tables as a header row plus data rows.
///
/// Rows without any `<td>`/`<th>` cells are dropped. A table left with no
/// data rows, header only or nothing at all, is omitted.
pub fn extract_tables(doc: &Html) -> Result<Vec<Table>, ScrapeError> {
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td, th")?;

    let mut tables = Vec::new();
    for table in doc.select(&table_selector) {
        let rows = table
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(trimmed_text)
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect::<Vec<_>>();

        if rows.len() < 2 {
            ::log::trace!("Skipping table with {} row(s)", rows.len());
            continue;
        }

        let total_rows = rows.len();
        let mut rows = rows.into_iter();
        let headers = rows.next().unwrap_or_default();

        tables.push(Table {
            headers,
            rows: rows.collect(),
            total_rows,
        });
    }

    Ok(tables)
}
