//! Spreadsheet export of summaries using rust_xlsxwriter.

use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use tracing::debug;

use crate::error::ExportError;
use crate::models::config::ExportConfig;

/// Longest string an xlsx cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// An in-memory workbook ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested file name, `<original>_summary.xlsx`.
    pub file_name: String,
    /// Workbook bytes.
    pub bytes: Vec<u8>,
}

/// Download name for the export of `source_name`.
pub fn export_file_name(source_name: &str) -> String {
    format!("{}_summary.xlsx", source_name)
}

/// Build a one-sheet workbook of `(label, value)` rows for a summary.
///
/// Reached through the success types only: `SummaryOutcome::export` and
/// `ServerSummary::export`.
pub(crate) fn export_summary(
    summary: &str,
    source_name: &str,
    config: &ExportConfig,
) -> Result<ExportArtifact, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let wrapped = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;
    worksheet.set_column_width(0, 12)?;
    worksheet.set_column_width(1, 100)?;

    let mut row = 0;
    if config.include_header {
        worksheet.write_string_with_format(row, 0, "Field", &bold)?;
        worksheet.write_string_with_format(row, 1, "Value", &bold)?;
        row += 1;
    }

    worksheet.write_string_with_format(row, 0, "File", &bold)?;
    worksheet.write_string(row, 1, clamp_cell(source_name))?;
    row += 1;

    worksheet.write_string_with_format(row, 0, "Summary", &bold)?;
    worksheet.write_string_with_format(row, 1, clamp_cell(summary), &wrapped)?;

    let bytes = workbook.save_to_buffer()?;
    debug!("Built summary workbook ({} bytes) for {}", bytes.len(), source_name);

    Ok(ExportArtifact {
        file_name: export_file_name(source_name),
        bytes,
    })
}

fn clamp_cell(text: &str) -> &str {
    crate::summarize::truncate_chars(text, MAX_CELL_CHARS)
}
