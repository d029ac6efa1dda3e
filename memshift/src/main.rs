//! # memshift - Main Entry Point
//!
//! Dispatches the subcommands:
//! - **translate**: relocate a payload from a source to a destination layout
//! - **page-offset**: locate a virtual address inside a checkpoint's pages image
//! - **check-range**: scan addresses on stdin for a range hit
//! - **meta**: patch decoded checkpoint metadata images

mod commands;

use anyhow::Result;
use clap::Parser;
use std::io::ErrorKind;

use memshift::cli::{Args, Command};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code_for(&e)
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let denied = err.chain().any(|cause| {
        cause.downcast_ref::<std::io::Error>().is_some_and(|io| io.kind() == ErrorKind::PermissionDenied)
    });
    if denied {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

/// Run the selected subcommand and return the process exit status
fn run() -> Result<i32> {
    // clap exits with status 2 on usage errors
    let args = Args::parse();

    match args.command {
        Command::Translate(translate) => commands::translate::run(&translate)?,
        Command::PageOffset(page_offset) => commands::page_offset::run(&page_offset)?,
        Command::CheckRange { lower, upper } => return commands::check_range::run(lower, upper),
        Command::Meta { action } => commands::meta::run(action)?,
    }

    Ok(EXIT_SUCCESS)
}
