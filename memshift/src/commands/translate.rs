//! `memshift translate`: relocate a payload between two layouts

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use memshift::cli::TranslateArgs;
use memshift::domain::{MapsFormat, Mismatch, Shift};
use memshift::layout::{validate, MatchedGroup, TranslationTable, ValidatedLayout};
use memshift::maps::{group_by_path, parse_maps_file, ParsedMaps};
use memshift::relocate;

pub fn run(args: &TranslateArgs) -> Result<()> {
    let quiet = args.quiet;
    let src_format = MapsFormat::from_gdb_flag(args.src_gdb);
    let dst_format = MapsFormat::from_gdb_flag(args.dst_gdb);

    let src = load_layout("source", &args.src_maps, src_format, quiet)?;
    let dst = load_layout("destination", &args.dst_maps, dst_format, quiet)?;

    let src_groups = group_by_path(&src.regions);
    let dst_groups = group_by_path(&dst.regions);
    info!("{} source and {} destination path groups", src_groups.len(), dst_groups.len());

    let layout = match validate(&src_groups, &dst_groups) {
        Ok(layout) => layout,
        Err(mismatch) => {
            print_warnings(&mismatch.warnings);
            return Err(mismatch).context("Refusing to translate between incompatible layouts");
        }
    };
    print_warnings(&layout.warnings);

    let table = TranslationTable::from_layout(&layout);
    if !quiet {
        println!("Address size: {}", args.bits);
        print_layout(&layout);
    }

    let input = File::open(&args.input)
        .with_context(|| format!("Failed to open input file {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("Failed to create output file {}", args.output.display()))?;

    let stats = relocate(BufReader::new(input), BufWriter::new(output), &table, args.bits)
        .with_context(|| format!("Failed to relocate {} into {}", args.input.display(), args.output.display()))?;

    if !quiet {
        println!(
            "Relocated {} of {} words using {} translation entries",
            stats.relocated,
            stats.words,
            table.len()
        );
        if stats.trailing_bytes > 0 {
            println!("Copied {} trailing byte(s) unchanged", stats.trailing_bytes);
        }
        println!("Wrote {}", args.output.display());
    }
    Ok(())
}

/// Parse one listing and refuse to continue if nothing usable came out of it
fn load_layout(side: &str, path: &Path, format: MapsFormat, quiet: bool) -> Result<ParsedMaps> {
    if !quiet {
        println!("Reading {side} mappings from {} ({format} format)", path.display());
    }
    let parsed = parse_maps_file(path, format)?;

    for skipped in &parsed.skipped {
        eprintln!("warning: {}:{}: {}", path.display(), skipped.line_number, skipped.error);
    }
    if parsed.regions.is_empty() {
        bail!("No valid {side} mappings found in {}", path.display());
    }
    if !quiet {
        println!("  {} entries", parsed.regions.len());
    }
    Ok(parsed)
}

fn print_warnings(warnings: &[Mismatch]) {
    for warning in warnings {
        warn!("special region mismatch on {}", warning.path());
        eprintln!("warning: {warning}");
    }
}

fn print_layout(layout: &ValidatedLayout) {
    for group in layout.sorted_groups() {
        print_group(group);
    }
}

fn print_group(group: &MatchedGroup) {
    println!();
    println!("File: {}", group.key);
    let (src_path, dst_path) = (group.src_path().unwrap_or_default(), group.dst_path().unwrap_or_default());
    if src_path != dst_path {
        println!("  Source path:      {src_path}");
        println!("  Destination path: {dst_path}");
    }

    for (idx, (src, dst)) in group.pairs.iter().enumerate() {
        let shift = Shift::between(src.start, dst.start);
        println!("  Region {}:", idx + 1);
        println!("    Source:      {:#x}-{:#x} (size {:#x})", src.start, src.end, src.size());
        println!("    Destination: {:#x}-{:#x} (size {:#x})", dst.start, dst.end, dst.size());
        println!("    Shift:       {shift}");
        println!("    Permissions: {} -> {}", src.perms, dst.perms);
    }
}
