use clap::Parser;
use xo_nco::cli::{Args, Commands};
use xo_nco::helper::filters::FilterCriteria;
use xo_nco::helper::scan::RunScanConfig;
use xo_nco::pipelines::{filter, peaks, post};

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Peaks {
            snps,
            crossovers,
            output,
            max_snps,
            sample,
            size,
        } => peaks::peaks(
            &snps,
            crossovers.as_deref(),
            &output,
            max_snps,
            sample.as_deref().map(|path| (path, size)),
        ),
        Commands::Filter {
            blocks,
            output,
            summary,
            chromosomes,
            size,
            length,
            coverage,
            matched,
        } => FilterCriteria::new(
            &chromosomes,
            (size[0], size[1]),
            (length[0], length[1]),
            coverage,
            matched,
        )
        .map_err(Into::into)
        .and_then(|criteria| filter::filter(&blocks, &output, summary.as_deref(), &criteria)),
        Commands::Post {
            blocks,
            output,
            min_z,
            delta_z,
            min_cover,
            size,
        } => {
            let config = RunScanConfig {
                min_z,
                delta_z,
                min_cover,
                size,
            };
            post::post(&blocks, &output, &config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
