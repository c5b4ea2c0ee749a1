use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use log::{debug, info, warn};

use crate::error::AppError;

/// Build the identifier -> client name map from one sheet of the registry
/// workbook. Columns are discovered by exact header text; later duplicates of an
/// identifier overwrite earlier ones.
pub fn load_registry(
    path: &Path,
    sheet_name: &str,
    id_header: &str,
    name_header: &str,
) -> Result<HashMap<String, String>, AppError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| AppError::WorkbookOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|source| AppError::SheetRead {
            sheet: sheet_name.to_string(),
            source,
        })?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        warn!("Sheet '{sheet_name}' is empty, no mappings loaded");
        return Ok(HashMap::new());
    };

    let (id_idx, name_idx) = locate_columns(header, id_header, name_header);
    info!("Identifier column: {id_idx}, name column: {name_idx}");

    let mut registry = HashMap::new();
    for (i, row) in rows.enumerate() {
        let sheet_row = i + 2; // 1-based, first data row sits under the header
        let Some(id) = cell_string(row, id_idx) else {
            warn!("Row {sheet_row}: no cell at identifier column {id_idx}, skipping");
            continue;
        };
        let Some(name) = cell_string(row, name_idx) else {
            warn!("Row {sheet_row}: no cell at name column {name_idx}, skipping");
            continue;
        };
        if id.trim().is_empty() {
            warn!("Row {sheet_row}: empty identifier, skipping");
            continue;
        }
        debug!("Row {sheet_row}: {id} -> {name}");
        registry.insert(id, name);
    }

    info!(
        "Loaded {} client mappings from sheet '{sheet_name}'",
        registry.len()
    );
    Ok(registry)
}

fn locate_columns(header: &[Data], id_header: &str, name_header: &str) -> (usize, usize) {
    let mut id_idx = None;
    let mut name_idx = None;

    for (col, cell) in header.iter().enumerate() {
        let text = cell.to_string();
        debug!("Header cell {col}: {text}");
        if text == id_header {
            id_idx = Some(col);
        } else if text == name_header {
            name_idx = Some(col);
        }
    }

    let id_idx = id_idx.unwrap_or_else(|| {
        warn!("Header '{id_header}' not found, falling back to column 0");
        0
    });
    let name_idx = name_idx.unwrap_or_else(|| {
        warn!("Header '{name_header}' not found, falling back to column 0");
        0
    });

    (id_idx, name_idx)
}

/// Cell text at `col`, or None when the row has no such cell. Identifier codes
/// are routinely stored as numbers, so whole floats render as integer text.
fn cell_string(row: &[Data], col: usize) -> Option<String> {
    row.get(col).map(|cell| match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
