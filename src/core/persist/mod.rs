//! Output persistence: CSV writing, row counting and zip archiving

pub mod archive;
pub mod csv;

pub use self::archive::{archive_file, count_archived_rows, restore_from_archive};
pub use self::csv::{count_rows, count_rows_in, render_cell, CsvSink, WriteMode};

use crate::domain::{FlatRow, Page};

/// Concatenate pages in ascending offset order
///
/// Workers finish in any order; sorting by offset makes the output order
/// independent of scheduling.
pub fn concat_pages(mut pages: Vec<Page>) -> Vec<FlatRow> {
    pages.sort_by_key(|page| page.offset);
    let total: usize = pages.iter().map(Page::row_count).sum();

    let mut rows = Vec::with_capacity(total);
    for page in pages {
        rows.extend(page.rows);
    }
    rows
}
