use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yearnav::{config, output, readme, scan, sidebar, site, stats};

#[derive(Parser)]
#[command(name = "yearnav", version)]
#[command(about = "Sidebar and README tree generator for year-grouped document archives")]
#[command(long_about = "\
Sidebar and README tree generator for year-grouped document archives

Top-level directories named like a year (2024) are groups. Every file inside
a group gets a sidebar link titled after its name, newest year first.
Configured collections follow the years.

Content structure:

  content/
  ├── yearnav.toml                 # Optional config
  ├── README.md                    # File tree kept between readme-tree markers
  ├── assets/                      # Ignored (not a group)
  ├── docs/                        # Not a year: left out of the sidebar
  ├── 2024/                        # Group
  │   ├── 0_cover.jpg              # 0_ prefix = published, not linked
  │   ├── A_Signal_Source.pdf      # → [A Signal Source](#/2024/A_Signal_Source.pdf)
  │   └── B_Power_Supply.pdf
  └── 2023/

Run 'yearnav gen-config' to print a documented yearnav.toml.")]
struct Cli {
    /// Content directory (checked-out content branch)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Config file (defaults to <source>/yearnav.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the sidebar into the content directory
    Sidebar,
    /// Print the sidebar to stdout without writing anything
    Check,
    /// Update the file tree in the README
    Tree,
    /// Print content statistics
    Stats {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Merge template and content into an output directory, sidebar included
    Assemble {
        /// Site shell directory (checked-out template branch)
        #[arg(long)]
        template: PathBuf,
        /// Output directory; must be empty or absent
        #[arg(long)]
        output: PathBuf,
    },
    /// Run tree, sidebar, and stats in order
    Build,
    /// Print a stock yearnav.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let load = || config::load_config(&cli.source, cli.config.as_deref());

    match &cli.command {
        Command::Sidebar => {
            let written = sidebar::generate_to_root(&cli.source, &load()?)?;
            output::print_sidebar_output(&written.tree, &written.path);
        }
        Command::Check => {
            let nav_config = load()?;
            let tree = scan::scan(&cli.source, &nav_config.content)?;
            let nav = sidebar::Sidebar::build(&tree, &nav_config.sidebar);
            print!("{}", nav.render());
        }
        Command::Tree => {
            let update = readme::update_readme(&cli.source, &load()?)?;
            output::print_readme_output(&update);
        }
        Command::Stats { json } => {
            let content_stats = stats::collect_stats(&cli.source, &load()?)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&content_stats)?);
            } else {
                output::print_stats_output(&content_stats);
            }
        }
        Command::Assemble {
            template,
            output: out_dir,
        } => {
            let result = site::assemble(template, &cli.source, out_dir, &load()?)?;
            output::print_assemble_output(&result, out_dir);
        }
        Command::Build => {
            let nav_config = load()?;

            println!("==> Stage 1: README tree");
            let update = readme::update_readme(&cli.source, &nav_config)?;
            output::print_readme_output(&update);

            println!("==> Stage 2: Sidebar");
            let written = sidebar::generate_to_root(&cli.source, &nav_config)?;
            output::print_sidebar_output(&written.tree, &written.path);

            println!("==> Stage 3: Stats");
            let content_stats = stats::collect_stats(&cli.source, &nav_config)?;
            output::print_stats_output(&content_stats);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `-v` enables info, `-vv` debug; otherwise `RUST_LOG`, falling back to warn.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
