use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};
use log::{error, info};
use regex::Regex;

/// Standard VIN alphabet: 17 characters, letters I, O and Q excluded.
const VIN_PATTERN: &str = r"(?i)^[a-hj-npr-z0-9]{17}$";

/// Loads the candidate VIN list from a CSV or XLSX file. The file must have
/// a header row with a column whose name contains "VIN"; cells that do not
/// look like a VIN are dropped, duplicates keep their first occurrence.
pub fn load_vins<P: AsRef<Path>>(filename: P) -> Vec<String> {
    let path = filename.as_ref();

    if !path.exists() {
        error!("Input file {:?} does not exist.", path);
        return Vec::new();
    }

    let is_excel = path
        .extension()
        .map_or(false, |ext| ext == "xlsx" || ext == "xls");

    let cells = if is_excel {
        load_excel(path)
    } else {
        load_csv(path)
    };

    let vins = normalize(cells);
    info!("Loaded {} unique VINs from {:?}", vins.len(), path);
    vins
}

fn load_csv(path: &Path) -> Vec<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("Could not open CSV file: {}", e);
            return Vec::new();
        }
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let vin_col = match rdr.headers() {
        Ok(headers) => headers.iter().position(|h| h.contains("VIN")),
        Err(e) => {
            error!("Error reading CSV header: {}", e);
            return Vec::new();
        }
    };
    let vin_col = match vin_col {
        Some(col) => col,
        None => {
            error!("No VIN column found in {:?}", path);
            return Vec::new();
        }
    };

    let mut cells = Vec::new();
    for result in rdr.records() {
        match result {
            Ok(record) => {
                if let Some(cell) = record.get(vin_col) {
                    cells.push(cell.to_string());
                }
            }
            Err(e) => error!("Error parsing CSV record: {}", e),
        }
    }
    cells
}

fn load_excel(path: &Path) -> Vec<String> {
    let mut excel: Xlsx<_> = match open_workbook(path) {
        Ok(wb) => wb,
        Err(e) => {
            error!("Could not open Excel file: {}", e);
            return Vec::new();
        }
    };

    let mut cells = Vec::new();
    let worksheets = excel.worksheets();
    if let Some((_name, range)) = worksheets.get(0) {
        let mut vin_col = None;
        for (row_idx, row) in range.rows().enumerate() {
            if row_idx == 0 {
                for (col_idx, cell) in row.iter().enumerate() {
                    if cell.to_string().contains("VIN") {
                        vin_col = Some(col_idx);
                        break;
                    }
                }
                if vin_col.is_none() {
                    error!("Excel header missing a VIN column in {:?}", path);
                    return Vec::new();
                }
                continue;
            }

            if let Some(col) = vin_col {
                if let Some(cell) = row.get(col) {
                    cells.push(cell.to_string());
                }
            }
        }
    }
    cells
}

fn normalize(cells: Vec<String>) -> Vec<String> {
    let pattern = Regex::new(VIN_PATTERN).unwrap();
    let mut seen = HashSet::new();
    let mut vins = Vec::new();
    for cell in cells {
        let vin = cell.trim().to_string();
        if pattern.is_match(&vin) && seen.insert(vin.clone()) {
            vins.push(vin);
        }
    }
    vins
}
