//! bookdex CLI
//!
//! Builds a client-side search index for a rendered book or site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for bookdex.
#[derive(Parser)]
#[command(
    name = "bookdex",
    version,
    about = "Client-side search indexing for static sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bookdex.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Index a rendered site and write the search scripts into it
    Build {
        /// Directory holding the rendered HTML site
        #[arg(short, long, default_value = "book")]
        site: PathBuf,
        /// Directory of search runtime scripts to copy
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Override the document count warning threshold
        #[arg(long)]
        max_index_size: Option<usize>,
        /// Skip indexing even if the configuration enables it
        #[arg(long)]
        disable: bool,
        /// Site title for log output
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Validate configuration and search runtime assets
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    bookdex::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            site,
            assets,
            max_index_size,
            disable,
            title,
        } => {
            let options = bookdex::cmd::build::BuildOptions {
                site,
                assets,
                max_index_size,
                disable,
                title,
            };
            bookdex::cmd::build::run(&cli.config, &options)?;
        }
        Commands::Check { strict } => {
            bookdex::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["bookdex", "build", "--site", "public"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("bookdex.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                site,
                assets,
                max_index_size,
                disable,
                title,
            } => {
                assert_eq!(site, PathBuf::from("public"));
                assert!(assets.is_none());
                assert!(max_index_size.is_none());
                assert!(!disable);
                assert!(title.is_empty());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_defaults() {
        let cli = Cli::parse_from(["bookdex", "build"]);

        match cli.command {
            Commands::Build { site, .. } => assert_eq!(site, PathBuf::from("book")),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_overrides() {
        let args = [
            "bookdex",
            "build",
            "--assets",
            "theme/search",
            "--max-index-size",
            "500",
            "--disable",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                assets,
                max_index_size,
                disable,
                ..
            } => {
                assert_eq!(assets, Some(PathBuf::from("theme/search")));
                assert_eq!(max_index_size, Some(500));
                assert!(disable);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["bookdex", "check", "--strict"]);

        match cli.command {
            Commands::Check { strict } => assert!(strict),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["bookdex", "-vvv", "build"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["bookdex", "--config", "site.toml", "build"]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
