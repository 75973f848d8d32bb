use clap::{Parser, Subcommand};
use rsu_tax_calculator::commands::lots::lots;
use rsu_tax_calculator::commands::report::report;
use rsu_tax_calculator::load_calc_config;

fn main() {
    let command = Cli::parse();
    let config = load_calc_config();
    match command.subcommand {
        Command::Report {
            individual,
            eac,
            rates,
            out,
        } => {
            match report(&individual, &eac, &rates, &out, &config) {
                Ok(_) => {
                    println!("Capital gains tax report saved to {:?}", out)
                }
                Err(e) => {
                    eprintln!("Error creating tax report: {}", e)
                }
            };
        }
        Command::Lots { individual, eac } => {
            if let Err(e) = lots(&individual, &eac, &config) {
                eprintln!("Error reconstructing lots: {}", e)
            }
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build the EUR capital-gains report from brokerage history exports
    Report {
        /// Individual-account history JSON export
        #[clap(long)]
        individual: std::path::PathBuf,
        /// Equity Award Center history JSON export
        #[clap(long)]
        eac: std::path::PathBuf,
        /// Prefetched ECB eurofxref-hist.csv with daily USD reference rates
        #[clap(long)]
        rates: std::path::PathBuf,
        /// Where to write the report CSV
        #[clap(long, default_value = "tax-report.csv")]
        out: std::path::PathBuf,
    },
    /// Print the reconstructed acquisition lots as CSV
    Lots {
        /// Individual-account history JSON export
        #[clap(long)]
        individual: std::path::PathBuf,
        /// Equity Award Center history JSON export
        #[clap(long)]
        eac: std::path::PathBuf,
    },
}

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    subcommand: Command,
}
