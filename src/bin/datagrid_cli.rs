//! CLI tool for datagrid - renders a CSV/TSV table headlessly
//!
//! Usage:
//!   datagrid_cli <table.csv>                        # Visible range and frame stats
//!   datagrid_cli <table.csv> --json                 # Recorded draw list as JSON
//!   datagrid_cli <table.tsv> --config grid.json --width 800 --height 600 --scroll 0,400
//!
//! Set `RUST_LOG=datagrid=debug` for engine logs on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use datagrid::csv::{parse_delimited, Delimiter};
use datagrid::{create_grid, GridConfig, RecordingSurface, Table};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: datagrid_cli <table.csv|table.tsv|table.json> [--config grid.json] \
[--width W] [--height H] [--scroll X,Y] [--precision P] [--json]";

struct Args {
    input: String,
    config: Option<String>,
    width: f64,
    height: f64,
    scroll: (f64, f64),
    precision: Option<u8>,
    json: bool,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn parse_args() -> Args {
    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|a| a == "-h" || a == "--help") {
        fail(USAGE);
    }
    let mut args = Args {
        input: String::new(),
        config: None,
        width: 800.0,
        height: 600.0,
        scroll: (0.0, 0.0),
        precision: None,
        json: false,
    };
    let mut i = 0;
    while i < raw.len() {
        let flag = raw[i].as_str();
        let mut value = || {
            i += 1;
            raw.get(i)
                .cloned()
                .unwrap_or_else(|| fail(&format!("{flag} needs a value\n{USAGE}")))
        };
        match flag {
            "--config" => args.config = Some(value()),
            "--width" => args.width = number(&value(), flag),
            "--height" => args.height = number(&value(), flag),
            "--precision" => {
                let v = value();
                args.precision = Some(v.parse().unwrap_or_else(|_| fail(&format!("bad {flag}: {v}"))));
            }
            "--scroll" => {
                let v = value();
                let (x, y) = v
                    .split_once(',')
                    .unwrap_or_else(|| fail(&format!("--scroll expects X,Y, got {v}")));
                args.scroll = (number(x, flag), number(y, flag));
            }
            "--json" => args.json = true,
            other if other.starts_with("--") => fail(&format!("unknown flag {other}\n{USAGE}")),
            other => args.input = other.to_string(),
        }
        i += 1;
    }
    if args.input.is_empty() {
        fail(USAGE);
    }
    args
}

fn number(text: &str, flag: &str) -> f64 {
    text.trim()
        .parse()
        .unwrap_or_else(|_| fail(&format!("bad {flag}: {text}")))
}

fn load_table(path: &str) -> Table {
    let text = fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
    let parsed = if path.to_ascii_lowercase().ends_with(".json") {
        Table::from_json(&text)
    } else {
        parse_delimited(&text, Delimiter::for_path(path))
    };
    parsed.unwrap_or_else(|e| fail(&format!("Error parsing {path}: {e}")))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    let table = load_table(&args.input);
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
            GridConfig::from_json(&text).unwrap_or_else(|e| fail(&format!("Error in {path}: {e}")))
        }
        None => GridConfig::default(),
    };

    let mut grid = create_grid(
        table.into_shared(),
        args.width,
        args.height,
        config.options,
        config.theme,
        RecordingSurface::new(args.width, args.height),
    )
    .unwrap_or_else(|e| fail(&format!("Error creating grid: {e}")));
    if let Some(p) = args.precision {
        grid.set_precision(p)
            .unwrap_or_else(|e| fail(&format!("Error: {e}")));
    }
    grid.set_scroll(args.scroll.0, args.scroll.1);
    let stats = grid.render_frame();

    let mut out = io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(grid.surface().ops())
            .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")));
        writeln!(out, "{json}").unwrap();
        return;
    }

    let range = grid.visible_range();
    let (sx, sy) = grid.scroll_offset();
    let geom = grid.geometry();
    writeln!(out, "table: {} rows x {} columns", geom.rows.len(), geom.columns.len()).unwrap();
    writeln!(out, "content: {:.0} x {:.0} px", geom.total_width(), geom.total_height()).unwrap();
    writeln!(out, "scroll: {sx:.0},{sy:.0}").unwrap();
    writeln!(
        out,
        "visible: rows {}..{} cols {}..{}",
        range.row_start, range.row_end, range.col_start, range.col_end
    )
    .unwrap();
    if let Some(stats) = stats {
        writeln!(out, "frame: {:?}, {} cells drawn, {} draw ops", stats.kind, stats.cells_drawn, grid.surface().ops().len()).unwrap();
    }
}
