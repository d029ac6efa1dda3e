//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::WordWidth;
use crate::range_check::parse_hex_address;

#[derive(Parser)]
#[command(
    name = "memshift",
    version,
    about = "Relocate pointers in memory images between process address layouts",
    after_help = "\
EXAMPLES:
    memshift translate in.img out.img --src-maps src.maps --dst-maps dst.maps
    memshift translate in.img out.img --src-maps src.maps --dst-maps gdb.txt --dst-gdb --bits 32
    memshift page-offset ./checkpoint 0x7f3a2c001000
    memshift meta set-alive core-1234.json"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate addresses in a binary file based on memory mappings
    Translate(TranslateArgs),

    /// Translate a virtual address to an offset inside the checkpoint's pages image
    PageOffset(PageOffsetArgs),

    /// Exit with status 1 if any hex address read from stdin is within [LOWER, UPPER]
    CheckRange {
        /// Lower bound (hex, inclusive)
        #[arg(value_parser = parse_hex_arg)]
        lower: u64,

        /// Upper bound (hex, inclusive)
        #[arg(value_parser = parse_hex_arg)]
        upper: u64,
    },

    /// Edit decoded checkpoint metadata images
    Meta {
        #[command(subcommand)]
        action: MetaAction,
    },
}

#[derive(clap::Args)]
pub struct TranslateArgs {
    /// Input binary file path
    pub input: PathBuf,

    /// Output binary file path
    pub output: PathBuf,

    /// Source process memory mappings file
    #[arg(long, value_name = "FILE")]
    pub src_maps: PathBuf,

    /// Destination process memory mappings file
    #[arg(long, value_name = "FILE")]
    pub dst_maps: PathBuf,

    /// Address size in bits (32 or 64)
    #[arg(long, default_value = "64", value_parser = parse_word_width)]
    pub bits: WordWidth,

    /// Parse source mapping file in GDB "info proc mappings" format
    #[arg(long)]
    pub src_gdb: bool,

    /// Parse destination mapping file in GDB "info proc mappings" format
    #[arg(long)]
    pub dst_gdb: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::Args)]
pub struct PageOffsetArgs {
    /// Directory containing the pagemap-*.img file
    pub checkpoint_dir: PathBuf,

    /// Virtual address to look up (decimal, or hex with 0x prefix)
    #[arg(value_parser = parse_address)]
    pub virtual_address: u64,

    /// Only print the result of the address lookup
    #[arg(long)]
    pub result_only: bool,

    /// Use an already decoded pagemap JSON file instead of running crit
    #[arg(long, value_name = "FILE")]
    pub decoded: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum MetaAction {
    /// Mark every task in a decoded core image as alive
    SetAlive {
        /// Decoded core-*.json file
        core_json: PathBuf,
    },

    /// Rename the file entry of a library
    SetName {
        /// Decoded files.json file
        files_json: PathBuf,
        /// Substring of the entry's current name
        library: String,
        new_name: String,
    },

    /// Update the recorded size of a library
    SetSize {
        /// Decoded files.json file
        files_json: PathBuf,
        /// Substring of the entry's current name
        library: String,
        size: u64,
    },

    /// Record the build id of LIBRARY (read from the file itself)
    SetBuildId {
        /// Decoded files.json file
        files_json: PathBuf,
        /// Library file; also matched as a substring of the entry name
        library: PathBuf,
    },
}

fn parse_word_width(s: &str) -> Result<WordWidth, String> {
    let bits: u32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    WordWidth::from_bits(bits).map_err(|e| e.to_string())
}

fn parse_hex_arg(s: &str) -> Result<u64, String> {
    parse_hex_address(s).ok_or_else(|| format!("invalid hex value '{s}'"))
}

/// Hex with a `0x` prefix, decimal otherwise
fn parse_address(s: &str) -> Result<u64, String> {
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_hex_arg(s)
    } else {
        s.parse().map_err(|_| format!("invalid address '{s}'"))
    }
}
