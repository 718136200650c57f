//! Plain-text depth ladder for the terminal.

use std::fmt::Write;

use orderbook::{OrderBookEngine, PriceLevel};

/// Width of a full (100%) depth bar in characters.
const BAR_WIDTH: usize = 20;

fn depth_bar(level: &PriceLevel) -> String {
    let filled = (level.depth_percent_f64() / 100.0 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

fn write_row(out: &mut String, level: &PriceLevel) {
    let _ = writeln!(
        out,
        "{:>12} {:>12} {:>12}  {:<width$}",
        level.price.to_string(),
        level.size.to_string(),
        level.cumulative_size.to_string(),
        depth_bar(level),
        width = BAR_WIDTH
    );
}

/// Renders up to `rows` levels per side: asks above the spread (highest
/// first), bids below (highest first).
pub fn render(engine: &OrderBookEngine, rows: usize) -> String {
    let state = engine.state();
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", state.instrument());
    let _ = writeln!(
        out,
        "{:>12} {:>12} {:>12}  depth",
        "price", "size", "total"
    );

    let asks = state.asks().sorted_by_price();
    for level in asks.iter().take(rows).rev() {
        write_row(&mut out, level);
    }

    match engine.spread() {
        Some(spread) => {
            let _ = writeln!(out, "{:>12} spread", spread.to_string());
        }
        None => {
            let _ = writeln!(out, "{:>12} spread", "-");
        }
    }

    for level in state.bids().sorted_by_price().iter().take(rows) {
        write_row(&mut out, level);
    }

    out
}
