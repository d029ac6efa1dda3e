//! `memshift page-offset`: where a virtual page landed in a checkpoint

use anyhow::{bail, Context, Result};
use std::fs;

use memshift::cli::PageOffsetArgs;
use memshift_criu::{crit, find_pagemap_image, CriuImage, PageIndex, PagemapImage, PAGE_SIZE};

pub fn run(args: &PageOffsetArgs) -> Result<()> {
    let dir = &args.checkpoint_dir;
    if !dir.is_dir() {
        bail!("Checkpoint directory {} does not exist", dir.display());
    }

    let json = match &args.decoded {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read decoded pagemap {}", path.display()))?,
        None => crit::decode(find_pagemap_image(dir)?)?,
    };
    let image = PagemapImage::from_json(&json).context("Failed to parse pagemap image")?;
    let index = PageIndex::from_image(&image)?;

    if !args.result_only {
        println!("{:<20} {:<20} {:>10} {:>12}", "Start", "End", "Pages", "Offset");
        for run in index.runs() {
            println!(
                "{:<20} {:<20} {:>10} {:>#12x}",
                format!("{:#x}", run.vaddr),
                format!("{:#x}", run.vaddr_end()),
                run.nr_pages,
                run.pages_offset()
            );
        }
        println!();
    }

    let Some(offset) = index.lookup(args.virtual_address) else {
        bail!("Address {:#x} is not within any known range", args.virtual_address);
    };

    if args.result_only {
        println!("{offset:#x}");
    } else {
        println!(
            "Address {:#x} is at offset {offset:#x} (page {}) of the pages image",
            args.virtual_address,
            offset / PAGE_SIZE
        );
    }
    Ok(())
}
