//! CSV to replication-table conversion.
mod document;
mod mode;
mod output;
mod reader;
mod table_ref;

use std::fs;
use std::path::Path;

use log::info;

use crate::core::TabconvError;

pub use document::{ConfigDocument, ROOT_KEY, TABLES_KEY};
pub use mode::Mode;
pub use output::{AsciiFormatter, render_pretty, render_table_list};
pub use reader::{parse_table_refs, read_table_refs};
pub use table_ref::TableRef;

/// Converts the CSV at `csv_path` and writes the result to `output_path`.
///
/// Without `json_input` the output is the bare table list. With it, the
/// document is loaded, its table list merged or replaced according to
/// `mode`, and the whole document written back out. Nothing is written
/// unless every step before the final write succeeds.
pub fn convert(
    csv_path: &Path,
    output_path: &Path,
    has_header: bool,
    json_input: Option<&Path>,
    mode: Mode,
) -> Result<(), TabconvError> {
    let refs = read_table_refs(csv_path, has_header)?;

    let bytes = match json_input {
        None => render_table_list(&refs)?,
        Some(json_path) => {
            let mut document = ConfigDocument::from_path(json_path)?;
            let total = document.apply(mode, &refs)?;
            log::debug!(
                "{} {} tables into {} ({} total)",
                mode,
                refs.len(),
                json_path.display(),
                total
            );
            document.to_pretty_bytes()?
        }
    };

    fs::write(output_path, bytes).map_err(|e| {
        TabconvError::IoError(format!("writing {}: {}", output_path.display(), e))
    })?;

    info!(
        "converted {} rows from {} into {}",
        refs.len(),
        csv_path.display(),
        output_path.display()
    );
    Ok(())
}
