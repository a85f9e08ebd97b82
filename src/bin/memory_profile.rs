//! Memory profile: RSS measurement at various input sizes.
//!
//! Measures process-specific RSS delta of loading the same generated input
//! (a) into a `ColumnSet` and (b) into one `Vec<String>` per row, at 10K,
//! 100K, and 1M rows. Prints a comparison table to stdout.
//!
//! Run: cargo run --release --bin memory_profile

use sysinfo::{ProcessRefreshKind, RefreshKind, System};
use tip::{parse, ColumnType};

const TYPES: [ColumnType; 4] = [
    ColumnType::Integer,
    ColumnType::Float,
    ColumnType::String,
    ColumnType::String,
];

// ── Input generator ────────────────────────────────────────────────────

fn make_input(rows: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(rows * 40);
    for i in 0..rows {
        out.extend_from_slice(
            format!("{},{}.{},user_{},src/file_{}.js\n", i, i % 1000, i % 7, i, i % 100).as_bytes(),
        );
    }
    out
}

/// Row-at-a-time baseline: every field becomes its own heap string.
fn load_rows(input: &[u8]) -> Vec<Vec<String>> {
    input
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split(|&b| b == b',')
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect()
        })
        .collect()
}

// ── RSS measurement ────────────────────────────────────────────────────

fn get_process_rss() -> u64 {
    let mut sys = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::everything()),
    );
    sys.refresh_all();
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(_) => return 0,
    };
    sys.process(pid).map(|p| p.memory()).unwrap_or(0)
}

fn measure_columnar_rss(input: &[u8]) -> u64 {
    // Let OS settle RSS from prior allocations
    std::thread::sleep(std::time::Duration::from_millis(100));
    let baseline = get_process_rss();

    let parsed = match parse(input, &TYPES, b',', b'\n', 0) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("parse failed: {}", e);
            return 0;
        }
    };

    let after = get_process_rss();

    // Keep columns alive until after measurement
    parsed.columns.free();

    after.saturating_sub(baseline)
}

fn measure_rows_rss(input: &[u8]) -> u64 {
    std::thread::sleep(std::time::Duration::from_millis(100));
    let baseline = get_process_rss();

    let rows = load_rows(input);

    let after = get_process_rss();

    drop(rows);

    after.saturating_sub(baseline)
}

// ── Main ───────────────────────────────────────────────────────────────

fn main() {
    println!("TIP Memory Profile (process RSS delta)");
    println!("======================================");
    println!();
    println!(
        "{:<12} {:>16} {:>16} {:>10}",
        "Rows", "Columnar (MB)", "Row Vec (MB)", "Ratio"
    );
    println!("{:-<58}", "");

    for size in [10_000, 100_000, 1_000_000] {
        eprint!("Measuring {}... ", size);

        let input = make_input(size);
        let columnar_bytes = measure_columnar_rss(&input);
        let rows_bytes = measure_rows_rss(&input);

        let columnar_mb = columnar_bytes as f64 / (1024.0 * 1024.0);
        let rows_mb = rows_bytes as f64 / (1024.0 * 1024.0);
        let ratio = if rows_mb > 0.0 {
            format!("{:.2}x", columnar_mb / rows_mb)
        } else {
            "N/A".to_string()
        };

        println!("{:<12} {:>16.1} {:>16.1} {:>10}", size, columnar_mb, rows_mb, ratio);
        eprintln!("done");
    }

    println!();
    println!("Note: RSS deltas include allocator slack and are relative, not absolute.");
}
