//! Integration test: large inputs against a row-wise reference parse.
//!
//! Validates correctness under load, not performance. The reference splits
//! lines and fields with std iterators and converts each field on its own;
//! the columnar result must match it exactly whatever the initial capacity.

use tip::{parse_with, ColumnSet, ColumnType, ParseOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TYPES: [ColumnType; 4] = [
    ColumnType::Integer,
    ColumnType::String,
    ColumnType::Float,
    ColumnType::String,
];

#[derive(Debug, PartialEq)]
struct Row {
    id: i64,
    name: String,
    value: f64,
    tag: String,
}

fn make_input(rows: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"id,name,value,tag\n");
    for i in 0..rows {
        let sign = if i % 3 == 0 { "-" } else { "" };
        // Every 17th tag is empty to exercise zero-length strings.
        let tag = if i % 17 == 0 { String::new() } else { format!("t{}", i % 97) };
        out.extend_from_slice(
            format!("{}{},name_{},{}.{}e{},{}\n", sign, i, i, i % 1000, i % 10, i % 5, tag)
                .as_bytes(),
        );
    }
    out
}

fn reference_rows(input: &[u8]) -> Vec<Row> {
    let text = std::str::from_utf8(input).unwrap();
    text.lines()
        .skip(1)
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            Row {
                id: fields[0].parse().unwrap(),
                name: fields[1].to_string(),
                value: fields[2].parse().unwrap(),
                tag: fields[3].to_string(),
            }
        })
        .collect()
}

fn columnar_rows(columns: &ColumnSet) -> Vec<Row> {
    (0..columns.len())
        .map(|row| Row {
            id: columns.get_int(0, row).unwrap(),
            name: columns.get_str(1, row).unwrap().to_string(),
            value: columns.get_float(2, row).unwrap(),
            tag: columns.get_str(3, row).unwrap().to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn stress_300k_rows_matches_reference() {
    let rows = 300_000;
    let input = make_input(rows);
    let expected = reference_rows(&input);
    assert_eq!(expected.len(), rows);

    let opts = ParseOptions::new(TYPES.to_vec()).skip_records(1).initial_rows(16);
    let parsed = parse_with(&input, &opts).unwrap();

    assert_eq!(parsed.record_count, rows as u64);
    for column in parsed.columns.columns() {
        assert_eq!(column.len(), rows);
        assert!(column.len() <= column.capacity_rows());
    }
    // Geometric growth: 16 -> 300K rows is ~15 doublings.
    assert!(parsed.stats.row_growths <= 20, "row growths: {}", parsed.stats.row_growths);

    assert_eq!(columnar_rows(&parsed.columns), expected);
}

#[test]
fn stress_result_independent_of_initial_capacity() {
    let input = make_input(50_000);
    let baseline = parse_with(&input, &ParseOptions::new(TYPES.to_vec()).skip_records(1)).unwrap();

    for initial in [1usize, 7, 1000, 49_999, 50_000, 1_000_000] {
        let opts = ParseOptions::new(TYPES.to_vec())
            .skip_records(1)
            .initial_rows(initial);
        let parsed = parse_with(&input, &opts).unwrap();
        assert_eq!(parsed.record_count, baseline.record_count, "initial {}", initial);
        assert_eq!(parsed.columns.columns(), baseline.columns.columns(), "initial {}", initial);
    }
}

#[test]
fn stress_string_offsets_consistent() {
    let input = make_input(100_000);
    let opts = ParseOptions::new(TYPES.to_vec()).skip_records(1);
    let parsed = parse_with(&input, &opts).unwrap();

    for col in [1, 3] {
        let strings = parsed.columns.column(col).unwrap().as_string().unwrap();
        let offsets = strings.offsets();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*offsets.last().unwrap() as usize, strings.len_bytes());
        let mut start = 0usize;
        for (row, &end) in offsets.iter().enumerate() {
            assert_eq!(strings.get_bytes(row).unwrap(), &strings.data()[start..end as usize]);
            start = end as usize;
        }
    }
}

#[test]
fn stress_parse_twice_is_deterministic() {
    let input = make_input(20_000);
    let opts = ParseOptions::new(TYPES.to_vec()).skip_records(1);
    let a = parse_with(&input, &opts).unwrap();
    let b = parse_with(&input, &opts).unwrap();
    assert_eq!(a.record_count, b.record_count);
    assert_eq!(a.columns, b.columns);
}
