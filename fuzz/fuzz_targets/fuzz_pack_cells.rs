#![no_main]

use cellgrid::{CellRequest, GridConstraints, place_grid_cells};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First three bytes pick the container width (0..=2047) and an optional
    // column cap (1..=8); each following pair of bytes becomes one request.
    if data.len() < 3 {
        return;
    }
    let parent_width = u32::from(u16::from_le_bytes([data[0], data[1]])) % 2048;
    let mut constraints = GridConstraints::new(parent_width);
    if data[2] & 1 == 1 {
        constraints = constraints.with_max_columns(usize::from(data[2] >> 1) % 8 + 1);
    }

    let requests: Vec<CellRequest> = data[3..]
        .chunks_exact(2)
        .take(64)
        .map(|pair| {
            let min_width = (pair[0] > 0).then(|| u32::from(pair[0]));
            let max_width = (pair[1] > 0).then(|| u32::from(pair[1]).max(min_width.unwrap_or(1)));
            CellRequest {
                min_width,
                max_width,
            }
        })
        .collect();

    let rows = place_grid_cells(&requests, constraints).expect("constructed input is valid");

    // Post-conditions that must always hold:
    let flat: Vec<usize> = rows.iter().flatten().map(|p| p.index).collect();
    let expected: Vec<usize> = (0..requests.len()).collect();
    assert_eq!(flat, expected, "indices must cover the input in order");

    for row in &rows {
        assert!(!row.is_empty(), "empty row emitted");
        if let Some(cap) = constraints.max_columns {
            assert!(row.len() <= cap, "column cap violated");
        }
        let total: u64 = row.iter().map(|p| u64::from(p.width)).sum();
        assert!(total <= u64::from(parent_width), "row overflows container");
        for placement in row {
            let request = requests[placement.index];
            let floor = request.resolved_min_width(parent_width).min(parent_width);
            assert!(placement.width >= floor, "width below resolved minimum");
            if let Some(max) = request.max_width {
                assert!(placement.width <= max, "width above max");
            }
        }
    }
});
