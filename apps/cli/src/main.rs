// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! rackmap - resolve a stock snapshot against the warehouse layout.
//!
//! Prints occupancy indicators and optionally a slot detail, and exports
//! the resolved table (JSON) and the rack scene (OBJ).
//!
//! Usage:
//!   rackmap [STOCK_FILE] [options]

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rackmap_geometry::RackDimensions;
use rackmap_processing::{
    area_options, build_scene, expiry_options, stocked_quantity, top_products, write_mtl,
    write_obj, AreaPalette, OccupancySummary, Pipeline, ResolvedSlot, SceneView, SlotFilter,
    Upload,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

mod config;

use config::Config;

#[derive(Debug, Default)]
struct Args {
    stock: Option<PathBuf>,
    layout: Option<PathBuf>,
    filter: SlotFilter,
    detail: Option<String>,
    top: usize,
    json: Option<PathBuf>,
    obj: Option<PathBuf>,
}

fn print_usage() {
    println!("Usage: rackmap [STOCK_FILE] [options]");
    println!();
    println!("Options:");
    println!("  --layout PATH         Layout file (default: $RACKMAP_LAYOUT or layout.csv)");
    println!("  --aisle N             Show a single aisle");
    println!("  --area A              Only slots of area A");
    println!("  --product P           Occupied slots whose product code contains P");
    println!("  --address S           Occupied slots whose address contains S");
    println!("  --expiry YYYY-MM-DD   Occupied slots expiring on that date");
    println!("  --hide-structure      Drop empty slots");
    println!("  --detail ADDRESS      Print one slot in full");
    println!("  --top N               Number of top products to list (default: 5)");
    println!("  --json PATH           Write the resolved table as JSON");
    println!("  --obj PATH            Write the rack scene as Wavefront OBJ (plus a .mtl)");
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        top: 5,
        ..Default::default()
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("missing value for {name}"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--layout" => parsed.layout = Some(value("--layout")?.into()),
            "--aisle" => {
                let aisle = value("--aisle")?;
                parsed.filter.aisle =
                    Some(aisle.parse().with_context(|| format!("invalid aisle: {aisle}"))?);
            }
            "--area" => parsed.filter.area = Some(value("--area")?),
            "--product" => parsed.filter.product = Some(value("--product")?),
            "--address" => parsed.filter.address = Some(value("--address")?),
            "--expiry" => {
                let expiry = value("--expiry")?;
                parsed.filter.expiry = Some(
                    NaiveDate::parse_from_str(&expiry, "%Y-%m-%d")
                        .with_context(|| format!("invalid expiry date: {expiry}"))?,
                );
            }
            "--hide-structure" => parsed.filter.show_structure = false,
            "--detail" => parsed.detail = Some(value("--detail")?),
            "--top" => {
                let top = value("--top")?;
                parsed.top = top.parse().with_context(|| format!("invalid count: {top}"))?;
            }
            "--json" => parsed.json = Some(value("--json")?.into()),
            "--obj" => parsed.obj = Some(value("--obj")?.into()),
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => {
                if parsed.stock.is_some() {
                    bail!("unexpected argument: {other}");
                }
                parsed.stock = Some(other.into());
            }
        }
    }
    Ok(Some(parsed))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,rackmap_processing=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    let config = Config::from_env();
    let layout_path = args.layout.clone().unwrap_or_else(|| config.layout_path.clone());

    tracing::info!(
        layout = %layout_path.display(),
        worker_threads = config.worker_threads,
        "Starting rackmap"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("failed to initialize worker pool")?;

    let mut pipeline = Pipeline::open(&layout_path, config.layout)
        .with_context(|| format!("cannot open layout {}", layout_path.display()))?;

    let upload = match &args.stock {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Some(Upload::new(file_name, bytes))
        }
        None => None,
    };

    let now = chrono::Local::now().naive_local();
    let table = pipeline.resolve(upload.as_ref(), now)?;
    let visible = table.filter(&args.filter);

    print_summary(table.slots(), &visible, args.top);

    if let Some(address) = &args.detail {
        match table.get_slot_detail(address) {
            Some(slot) => print_detail(slot),
            None => println!("\nNo slot at address {address}"),
        }
    }

    if let Some(path) = &args.json {
        fs::write(path, table.to_json()?)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("\nResolved table written to {}", path.display());
    }

    if let Some(path) = &args.obj {
        let view = match args.filter.aisle {
            Some(aisle) => SceneView::Aisle(aisle),
            None => SceneView::Warehouse,
        };
        let scene = build_scene(visible.iter().copied(), view, &RackDimensions::default())?;
        let mtl_path = path.with_extension("mtl");
        let mtl = File::create(&mtl_path)
            .with_context(|| format!("cannot create {}", mtl_path.display()))?;
        write_mtl(&scene, BufWriter::new(mtl))?;

        let mtl_name = mtl_path.file_name().map(|n| n.to_string_lossy().into_owned());
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        write_obj(&scene, mtl_name.as_deref(), BufWriter::new(file))?;
        println!(
            "\nScene written to {} ({} boxes, {} draw calls)",
            path.display(),
            scene.box_count(),
            scene.draw_calls()
        );
    }

    Ok(())
}

/// Whole number with `.` as thousands separator, as in `1.474`.
fn format_br(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn print_summary(all: &[ResolvedSlot], visible: &[&ResolvedSlot], top: usize) {
    let summary = OccupancySummary::from_slots(all);

    println!("=== Warehouse Indicators ===");
    println!("  Occupied:   {}", format_br(summary.occupied as f64));
    println!("  Empty:      {}", format_br(summary.empty as f64));
    println!("  Occupancy:  {:.1}%", summary.occupancy_rate());
    println!("  Expired:    {}", format_br(summary.expired as f64));
    println!(
        "  Filtered:   {} slots, quantity {}",
        format_br(visible.len() as f64),
        format_br(stocked_quantity(visible.iter().copied()))
    );

    let products = top_products(all, top);
    if !products.is_empty() {
        println!();
        println!("=== Top {} Products ===", products.len());
        for product in &products {
            let label: String = product.description.chars().take(20).collect();
            println!("  {:>12}  {} - {}", format_br(product.quantity), product.product_code, label);
        }
    }

    let palette = AreaPalette::new(area_options(all));
    println!();
    println!("=== Areas ===");
    for (area, [r, g, b, a]) in palette.entries() {
        println!(
            "  {:<20} rgba({:.0}, {:.0}, {:.0}, {:.1})",
            area,
            r * 255.0,
            g * 255.0,
            b * 255.0,
            a
        );
    }

    let dates = expiry_options(all);
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!();
        println!("Expiry dates: {} distinct, {} to {}", dates.len(), first, last);
    }
}

fn print_detail(slot: &ResolvedSlot) {
    println!();
    println!("=== Slot {} ===", slot.address);
    println!("  Area:         {}", slot.area_code);
    println!("  Status:       {}", slot.status.as_str());
    println!("  Product:      {}", slot.product_code);
    println!("  Description:  {}", slot.description);
    println!("  Quantity:     {} un", format_br(slot.quantity));
    match slot.expiry_date {
        Some(expiry) if slot.is_expired => {
            println!("  Expiry:       {} (EXPIRED)", expiry.format("%d/%m/%Y"))
        }
        Some(expiry) => println!("  Expiry:       {}", expiry.format("%d/%m/%Y")),
        None => println!("  Expiry:       N/A"),
    }
    println!(
        "  Position:     x {:.2}, y {:.2}, z {:.2} (level height {:.2})",
        slot.geometry.x, slot.geometry.y_macro, slot.geometry.z_base, slot.geometry.level_height
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = parse_args(&args(&[
            "estoque.xlsx",
            "--aisle",
            "25",
            "--product",
            "1002",
            "--expiry",
            "2029-01-01",
            "--hide-structure",
            "--top",
            "3",
            "--obj",
            "scene.obj",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(parsed.stock, Some(PathBuf::from("estoque.xlsx")));
        assert_eq!(parsed.filter.aisle, Some(25));
        assert_eq!(parsed.filter.product.as_deref(), Some("1002"));
        assert_eq!(parsed.filter.expiry, NaiveDate::from_ymd_opt(2029, 1, 1));
        assert!(!parsed.filter.show_structure);
        assert_eq!(parsed.top, 3);
        assert_eq!(parsed.obj, Some(PathBuf::from("scene.obj")));
    }

    #[test]
    fn test_defaults_without_arguments() {
        let parsed = parse_args(&[]).unwrap().unwrap();
        assert!(parsed.stock.is_none());
        assert!(parsed.filter.show_structure);
        assert_eq!(parsed.top, 5);
    }

    #[test]
    fn test_format_br() {
        assert_eq!(format_br(1474.0), "1.474");
        assert_eq!(format_br(1234567.0), "1.234.567");
        assert_eq!(format_br(999.0), "999");
        assert_eq!(format_br(12.4), "12");
        assert_eq!(format_br(0.0), "0");
        assert_eq!(format_br(-1500.0), "-1.500");
        assert_eq!(format_br(-0.2), "0");
    }

    #[test]
    fn test_help_and_errors() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["--aisle"])).is_err());
        assert!(parse_args(&args(&["--aisle", "x"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a.csv", "b.csv"])).is_err());
    }
}
