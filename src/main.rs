use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use benef_report::config::ServerConfig;
use benef_report::report::{self, ReportParameters};
use benef_report::server;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the upload-and-download web server
    Serve(ServerConfig),

    /// Build a report from local workbooks
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Models workbook path
    #[arg(long)]
    models: PathBuf,

    /// Brands workbook path
    #[arg(long)]
    brands: PathBuf,

    /// Country code used in the report name, e.g. ES
    #[arg(long)]
    country: String,

    /// Report year, e.g. 2024
    #[arg(long)]
    year: String,

    /// Report month, 1-12
    #[arg(long)]
    month: String,

    #[arg(long, default_value = "1")]
    day: String,

    /// "English" translates numeric month labels
    #[arg(long, default_value = "English")]
    language: String,

    /// Segment descriptor; containing "Passenger Cars" selects PC, else LCV
    #[arg(long, default_value = "Passenger Cars")]
    segments: String,

    /// "VOLKSWAGEN" selects the branded report name
    #[arg(long, default_value = "GENERIC")]
    segmentation: String,

    #[arg(long, env = "BENEF_OUTPUT_DIR", default_value = "generated_reports")]
    output_dir: PathBuf,

    /// Print a JSON summary instead of the output path
    #[arg(long, short = 'j')]
    json: bool,
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let params = ReportParameters {
        country: args.country,
        year: args.year,
        month: args.month,
        day: args.day,
        language: args.language,
        segments: args.segments,
        segmentation: args.segmentation,
    };

    let outcome = report::generate_report(&params, &args.models, &args.brands, &args.output_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.output_path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => server::serve(config).await,
        Command::Generate(args) => run_generate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn required_generate_arguments_have_help() {
        let mut cli = Cli::command();
        cli.build();
        let generate = cli.find_subcommand("generate").unwrap();
        for arg in generate.get_arguments().filter(|arg| arg.is_required_set()) {
            assert!(arg.get_help().is_some(), "--{} has no help", arg.get_id());
        }
    }
}
