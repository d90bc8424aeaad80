use clap::{Parser, Subcommand};
use docsite::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docsite")]
#[command(about = "Static documentation site generator")]
#[command(long_about = "\
Static documentation site generator

Markdown documents, declarative sidebars, and a declarative homepage become a
static documentation site with a navbar, per-section sidebars, generated
category index pages, and an optional set of versioned snapshots.

Site structure:

  site/
  ├── site.toml                    # Site config (navbar, theme, snippets, ...)
  ├── sidebars.toml                # Navigation roots: one sidebar per root
  ├── homepage.toml                # Hero and homepage sections (optional)
  ├── static/                      # Assets referenced by name → copied to output
  │   └── img/wordmark-light.svg
  ├── docs/                        # Documents; id = path without extension
  │   ├── introduction.md          # → introduction
  │   └── 02-planning/             # Ordering prefixes are stripped from ids
  │       └── snapshots.md         # → planning/snapshots
  └── versioned/                   # Frozen snapshots, one directory per version
      └── 1.0.0/
          ├── sidebars.toml
          └── docs/

Every document listed in a sidebar must exist, and no document may appear
twice within one root. A fenced code block with remote=<url> is filled with
the fetched text at build time; a failed fetch renders an empty block.

Run 'docsite gen-config' to print a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "build", global = true)]
    output: PathBuf,

    /// Log at info level (otherwise RUST_LOG decides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the full site into the output directory
    Build,
    /// Validate config, navigation, assets, and cross-links without writing
    Check,
    /// Print the resolved sidebars of one snapshot
    Nav {
        /// Versioned snapshot to show (default: current docs)
        #[arg(long)]
        snapshot: Option<String>,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::build(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", report.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            if let Some(current) = report.snapshots.first() {
                output::print_nav_output(&current.trees);
                println!();
            }
            output::print_check_output(&report);
            println!("==> Site is valid");
        }
        Command::Nav { snapshot } => {
            let report = generate::check(&cli.source)?;
            let found = report
                .snapshots
                .iter()
                .find(|s| s.version == snapshot)
                .ok_or_else(|| {
                    let available: Vec<&str> = report
                        .snapshots
                        .iter()
                        .filter_map(|s| s.version.as_deref())
                        .collect();
                    format!(
                        "no snapshot {:?}; versioned snapshots: {:?}",
                        snapshot.as_deref().unwrap_or("current"),
                        available
                    )
                })?;
            output::print_nav_output(&found.trees);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
