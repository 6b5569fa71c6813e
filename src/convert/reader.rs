use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::convert::TableRef;
use crate::core::TabconvError;

/// Reads every row of the CSV at `path` into table refs, in file order.
///
/// Columns are mapped by position only: column 0 is the owner and column 1
/// the table name. With `has_header` the first row is skipped for data
/// purposes but must still carry two columns; its text is never inspected.
/// Blank lines are skipped after a header. Without one, a blank line is a
/// row with zero columns and fails like any other short row.
pub fn read_table_refs(path: &Path, has_header: bool) -> Result<Vec<TableRef>, TabconvError> {
    let file = File::open(path).map_err(|e| TabconvError::opening(path, e))?;
    let refs = parse_table_refs(file, has_header)?;
    log::debug!("parsed {} rows from {}", refs.len(), path.display());
    Ok(refs)
}

pub fn parse_table_refs<R: Read>(
    mut reader: R,
    has_header: bool,
) -> Result<Vec<TableRef>, TabconvError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    // The csv reader drops empty lines silently, so find them up front.
    let blank_line = if has_header {
        None
    } else {
        first_blank_line(&input)
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(input.as_slice());

    if has_header {
        let headers = rdr.headers()?;
        if headers.len() < 2 {
            return Err(TabconvError::MalformedRow {
                line: 1,
                columns: headers.len(),
            });
        }
    }

    let mut refs = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() < 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(match blank_line {
                Some(blank) if blank < line => TabconvError::MalformedRow {
                    line: blank,
                    columns: 0,
                },
                _ => TabconvError::MalformedRow {
                    line,
                    columns: record.len(),
                },
            });
        }
        refs.push(TableRef::new(&record[0], &record[1]));
    }

    match blank_line {
        Some(line) => Err(TabconvError::MalformedRow { line, columns: 0 }),
        None => Ok(refs),
    }
}

/// 1-based line number of the first empty line outside quoted fields.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final terminator at the
/// end of input does not start a new line.
fn first_blank_line(input: &[u8]) -> Option<u64> {
    let mut line = 1;
    let mut in_quotes = false;
    let mut at_line_start = true;
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'"' => in_quotes = !in_quotes,
            b @ (b'\r' | b'\n') if !in_quotes => {
                if at_line_start {
                    return Some(line);
                }
                if b == b'\r' && input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                line += 1;
                at_line_start = true;
                i += 1;
                continue;
            }
            b'\n' => line += 1,
            _ => {}
        }
        at_line_start = false;
        i += 1;
    }
    None
}
