use clap::builder::styling::{AnsiColor, Color};
use clap::builder::styling::{Style, Styles};
use clap::{ColorChoice, Parser, Subcommand};

use crate::config;

pub const BANNER: &str = "\x1b[0;91m██   ██  ██████      ███    ██  ██████  ██████\x1b[0m\n\
                      \x1b[0;93m ██ ██  ██    ██     ████   ██ ██      ██    ██\x1b[0m\n\
                      \x1b[0;92m  ███   ██    ██     ██ ██  ██ ██      ██    ██\x1b[0m\n\
                      \x1b[0;96m ██ ██  ██    ██     ██  ██ ██ ██      ██    ██\x1b[0m\n\
                      \x1b[0;95m██   ██  ██████      ██   ████  ██████  ██████\x1b[0m\n";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "xo",
    version = env!("CARGO_PKG_VERSION"),
    about = BANNER,
    color = ColorChoice::Always,
    styles = get_styles(),
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Find blocks around ancestry-switch peaks in the SNP data
    #[command(alias = "p")]
    Peaks {
        /// Marker file (CSV, optionally gzipped)
        #[arg(short, long)]
        snps: String,

        /// File with crossover locations (CSV, optionally gzipped)
        #[arg(short, long)]
        crossovers: Option<String>,

        /// Output file
        #[arg(short, long, default_value_t = String::from("peaks.csv"))]
        output: String,

        /// Max number of SNPs in a block
        #[arg(long, default_value_t = config::DEFAULT_MAX_BLOCK_SIZE)]
        max_snps: usize,

        /// Write the first records of the input to this file and exit
        #[arg(long)]
        sample: Option<String>,

        /// Number of records to write in the sample
        #[arg(long, default_value_t = config::DEFAULT_SAMPLE_SIZE)]
        size: usize,
    },

    /// Apply filters to blocks
    #[command(alias = "f")]
    Filter {
        /// Blocks saved by the peaks command
        #[arg(short, long, default_value_t = String::from("peaks.csv"))]
        blocks: String,

        /// Output file
        #[arg(short, long, default_value_t = String::from("filtered.csv"))]
        output: String,

        /// Write per-block summaries to this file
        #[arg(long)]
        summary: Option<String>,

        /// Chromosome name pattern
        #[arg(long, default_value_t = String::from(config::DEFAULT_CHROMOSOME_PATTERN))]
        chromosomes: String,

        /// Block size range (#SNPs)
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"],
              default_values_t = [config::DEFAULT_BLOCK_SIZE_RANGE.0, config::DEFAULT_BLOCK_SIZE_RANGE.1])]
        size: Vec<u64>,

        /// Block length range (bp)
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"],
              default_values_t = [config::DEFAULT_BLOCK_LENGTH_RANGE.0, config::DEFAULT_BLOCK_LENGTH_RANGE.1])]
        length: Vec<u64>,

        /// Minimum coverage, 0 disables the filter
        #[arg(long, default_value_t = config::DEFAULT_COVERAGE)]
        coverage: u32,

        /// Keep only SNPs whose base genotype matches the HMM state
        #[arg(long = "match", default_value_t = false)]
        matched: bool,
    },

    /// Postprocessing of filtered blocks: locate candidate NCOs
    Post {
        /// File with filtered blocks
        #[arg(short, long, default_value_t = String::from("filtered.csv"))]
        blocks: String,

        /// Output file
        #[arg(short, long, default_value_t = String::from("ncos.csv"))]
        output: String,

        /// Homozygosity floor for Type A blocks
        #[arg(long, default_value_t = config::DEFAULT_MIN_Z)]
        min_z: f64,

        /// Homozygosity band around 0.5 for Type B blocks
        #[arg(long, default_value_t = config::DEFAULT_DELTA_Z)]
        delta_z: f64,

        /// Minimum number of reads of each type
        #[arg(long, default_value_t = config::DEFAULT_MIN_COVER)]
        min_cover: u32,

        /// Minimum run length in SNPs
        #[arg(long, default_value_t = config::DEFAULT_RUN_SIZE)]
        size: usize,
    },
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
