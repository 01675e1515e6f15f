use super::SheetError;
use calamine::Reader;
use std::path::Path;

pub(super) fn read_workbook_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = calamine::open_workbook_auto(path).map_err(|e| SheetError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let available = workbook.sheet_names().to_vec();
    if !available.iter().any(|name| name == sheet) {
        return Err(SheetError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| SheetError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

pub(super) fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let read_error = |e: csv::Error| SheetError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = rows.first_mut().and_then(|header| header.first_mut()) {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_read_csv_rows_with_multiline_cell() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(
            &path,
            "\u{feff}Test Case ID,Steps\nTC-1,\"1. Open\n2. Close\"\n",
        )
        .unwrap();

        let rows = read_csv_rows(&path).unwrap();

        assert_eq!(rows[0], vec!["Test Case ID", "Steps"]);
        assert_eq!(rows[1][1], "1. Open\n2. Close");
    }

    #[test]
    fn test_read_missing_workbook() {
        let dir = TempDir::new().unwrap();
        let result = read_workbook_rows(&dir.path().join("missing.xlsx"), "Sheet1");
        assert!(matches!(result, Err(SheetError::Read { .. })));
    }

    #[test]
    fn test_read_workbook_rows() {
        let rows = read_workbook_rows(&fixture("cases.xlsx"), "Sheet1").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec!["Test Case ID", "Test Description", "Steps", "Expected Result", "Actual Result"]
        );
        assert_eq!(rows[2][0], "TC-102");
    }

    #[test]
    fn test_integral_numeric_id_has_no_fraction() {
        let rows = read_workbook_rows(&fixture("cases.xlsx"), "Sheet1").unwrap();
        assert_eq!(rows[1][0], "101");
    }

    #[test]
    fn test_multiline_steps_cell_keeps_line_breaks() {
        let rows = read_workbook_rows(&fixture("cases.xlsx"), "Sheet1").unwrap();
        assert_eq!(
            rows[1][2],
            "1. Open login page\n2. Enter credentials\n3. Click submit"
        );
    }

    #[test]
    fn test_unknown_sheet_lists_available_sheets() {
        match read_workbook_rows(&fixture("cases.xlsx"), "Regression") {
            Err(SheetError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "Regression");
                assert_eq!(available, vec!["Sheet1"]);
            }
            other => panic!("expected SheetNotFound, got {:?}", other),
        }
    }
}
