use std::cmp::Ordering;

use crate::data_types::Dataset;

/// Display order for the columns of a dataset, derived from the first row:
/// headers that do not read as a number come first, numeric headers (the
/// year columns) after them. Same-class headers compare equal, and the sort
/// is stable, so the server order survives within each group.
pub fn ordered_headers(dataset: &Dataset) -> Vec<String> {
    let first = match dataset.rows.first() {
        Some(row) => row,
        None => return Vec::new(),
    };

    let mut headers: Vec<String> = first.keys().cloned().collect();
    headers.sort_by(|a, b| compare_headers(a, b));
    headers
}

fn compare_headers(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

pub fn is_numeric(header: &str) -> bool {
    header.trim().parse::<f64>().is_ok()
}
