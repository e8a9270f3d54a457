
use crate::{TerrainGrid, TerrainKind};

pub(crate) const EPS: f64 = 1e-9;

/// Parse a compact grid literal such as `["NHN", "TBN"]`.
pub(crate) fn grid_from(rows: &[&str]) -> TerrainGrid {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| TerrainKind::from_code(c).expect("valid terrain code"))
                .collect()
        })
        .collect();
    TerrainGrid::from_rows(rows).expect("valid grid")
}

pub(crate) fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < EPS, "cell {i}: got {a}, expected {e}");
    }
}
