use clap::{Parser, Subcommand};
use parking_site::{config, load, output, pipeline, search};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parking-site")]
#[command(about = "Static site generator for public parking-facility data")]
#[command(long_about = "\
Static site generator for public parking-facility data

Drop the latest export from a public-data portal into the data directory and
build. Header names are matched by keyword (주차장명, 주소, 위도, ...) or by
English alias (name, address, lat, ...), so column order does not matter.
UTF-8 (with or without BOM), CP949 and EUC-KR tables are accepted.

Project layout:

  data/
  ├── source.csv                   # Real data (preferred)
  └── parking_sample.csv           # Used when source.csv is absent
  site_template/
  ├── template.html                # Page shell with {{PLACEHOLDERS}}
  ├── config.toml                  # Site settings (or config.json)
  └── assets/                      # Copied to site/assets/

Output:

  site/
  ├── index.html                   # Search page
  ├── about/index.html
  ├── regions/index.html           # Region list with counts
  ├── regions/<region>/index.html
  ├── p/<id>/index.html            # One page per facility
  ├── data/parking.json            # Search feed
  └── sitemap.xml, robots.txt      # Only when base_url is set

Run 'parking-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory searched for source.csv / parking_sample.csv
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Source table (overrides the data directory lookup)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Template directory (template.html, config.toml, assets/)
    #[arg(long, default_value = "site_template", global = true)]
    template_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full site
    Build,
    /// Validate the template and source table without building
    Check,
    /// Run the landing-page search against the source table
    Search {
        /// Text matched against name, address and managing organization
        #[arg(default_value = "")]
        query: String,
        /// Only show records from this region (exact match)
        #[arg(long, default_value = "")]
        region: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

impl Cli {
    fn paths(&self) -> pipeline::BuildPaths {
        pipeline::BuildPaths {
            input: pipeline::resolve_input(&self.data_dir, self.input.as_deref()),
            template_dir: self.template_dir.clone(),
            output: self.output.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let paths = cli.paths();
            println!("==> Building {}", paths.output.display());
            let report = pipeline::build(&paths)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let paths = cli.paths();
            println!("==> Checking {}", paths.input.display());
            let inputs = pipeline::load_inputs(&paths)?;
            output::print_check_output(&inputs.table);
            println!("==> Inputs are valid");
        }
        Command::Search { query, region } => {
            let input = pipeline::resolve_input(&cli.data_dir, cli.input.as_deref());
            let records = load::load_records(&input)?;
            let results = search::filter(&records, query, region);
            let total = search::count_matches(&records, query, region);
            output::print_search_output(&results, total);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
