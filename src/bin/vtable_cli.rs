//! CLI tool for vtable - computes one table frame and outputs JSON
//!
//! Usage:
//!   vtable_cli <table.json>              # Output JSON to stdout
//!   vtable_cli <table.json> -o out.json  # Output JSON to file
//!
//! The input describes a table:
//!
//! ```json
//! {
//!   "config": { "scrollY": 400, "itemHeight": 24 },
//!   "columns": [{ "key": "name", "width": 120, "fixed": "start" }],
//!   "data": [{ "key": 1, "name": "a", "children": [{ "key": 2 }] }],
//!   "expandedKeys": [1],
//!   "viewport": { "width": 800, "scrollTop": 0, "scrollLeft": 0 }
//! }
//! ```
//!
//! Set `RUST_LOG=vtable=debug` to see layout diagnostics on stderr.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Deserialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use vtable::error::Result;
use vtable::render::ScrollHandle;
use vtable::{ColumnDescriptor, RowKey, ScrollConfig, TableConfig, VirtualTable};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TableInput {
    config: TableConfig,
    columns: Vec<ColumnDescriptor>,
    data: Vec<Value>,
    expanded_keys: Vec<RowKey>,
    viewport: ViewportInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ViewportInput {
    width: Option<f32>,
    height: Option<f32>,
    scroll_top: f32,
    scroll_left: f32,
}

fn compute_frame(input: TableInput) -> Result<String> {
    let mut table = VirtualTable::json(input.config)?;
    table.set_columns(input.columns);
    table.set_expanded_keys(input.expanded_keys.into_iter().collect());
    table.set_data(input.data);

    let list = table.renderer().list();
    let width = input.viewport.width.unwrap_or(list.viewport_width);
    let height = input.viewport.height.unwrap_or(list.viewport_height);
    table.resize(width, height);
    table.scroll_to(&ScrollConfig::top(input.viewport.scroll_top));
    table.set_scroll_left(input.viewport.scroll_left);

    Ok(serde_json::to_string_pretty(&table.frame())?)
}

/// Read a table description, compute its frame and write the JSON out.
fn run(input_path: &str, output_path: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(input_path)?;
    let input: TableInput = serde_json::from_str(&text)?;
    let json = compute_frame(input)?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: vtable_cli <table.json> [-o output.json]");
        std::process::exit(1);
    };
    let output_path = match (args.get(2), args.get(3)) {
        (Some(flag), Some(path)) if flag == "-o" => Some(path.as_str()),
        _ => None,
    };

    if let Err(e) = run(input_path, output_path) {
        tracing::error!(input = %input_path, error = %e, "vtable_cli failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use vtable::VtableError;

    #[test]
    fn test_missing_input_is_io_error() {
        let err = run("/nonexistent/vtable/table.json", None).unwrap_err();
        assert!(matches!(err, VtableError::Io(_)));
    }

    #[test]
    fn test_malformed_input_is_json_error() {
        let path = env::temp_dir().join(format!("vtable_cli_bad_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = run(path.to_str().unwrap(), None).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, VtableError::Json(_)));
    }

    #[test]
    fn test_frame_written_to_output_file() {
        let dir = env::temp_dir();
        let input = dir.join(format!("vtable_cli_in_{}.json", std::process::id()));
        let output = dir.join(format!("vtable_cli_out_{}.json", std::process::id()));
        fs::write(
            &input,
            r#"{
                "config": {"itemHeight": 20, "scrollY": 40},
                "columns": [{"key": "a", "width": 100}],
                "data": [{"key": 1}, {"key": 2}, {"key": 3}],
                "viewport": {"width": 400, "scrollTop": 20}
            }"#,
        )
        .unwrap();

        run(input.to_str().unwrap(), Some(output.to_str().unwrap())).unwrap();
        let frame: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        fs::remove_file(&input).unwrap();
        fs::remove_file(&output).unwrap();

        assert_eq!(frame["body"]["offsetY"], serde_json::json!(20.0));
        assert_eq!(frame["body"]["visibleRows"][0]["key"], serde_json::json!(2));
    }
}
