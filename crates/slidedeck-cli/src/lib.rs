pub mod commands;
pub mod configuration;

mod clierror;
pub use clierror::*;
pub use configuration::get_configuration;

use std::net::IpAddr;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum, command};
use slidedeck_seed::SeedOrder;

#[derive(Parser)]
#[command(version, about, long_about = None, before_help = r"
     _ _     _           _           _
 ___| (_) __| | ___  __| | ___  ___| | __
/ __| | |/ _` |/ _ \/ _` |/ _ \/ __| |/ /
\__ \ | | (_| |  __/ (_| |  __/ (__|   <
|___/_|_|\__,_|\___|\__,_|\___|\___|_|\_\
")]
pub struct Cli {
    #[arg(long = "log-level", default_value = "INFO", global = true)]
    pub loglevel: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serves the read-only slides API.
    Serve {
        /// Interface to listen on.
        #[clap(short = 'I', long)]
        interface: Option<IpAddr>,

        /// Port to listen on.
        #[clap(short = 'P', long)]
        port: Option<u16>,

        /// Path prefix for the slide routes, e.g. `/api/slides`.
        #[arg(long)]
        mount_path: Option<String>,
    },
    /// Inserts every JSON file of the slides directory as a new slide.
    Seed {
        /// Directory holding the slide files.
        #[arg(short = 'D', long)]
        dir: Option<Utf8PathBuf>,

        /// Order in which the files are inserted.
        #[arg(value_enum, short = 'O', long)]
        order: Option<Order>,

        /// How many files are inserted at the same time.
        #[arg(short = 'C', long)]
        concurrency: Option<usize>,
    },
    /// Checks the connection to the document store and lists its collections.
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    Listing,
    SlideNumber,
}

impl From<Order> for SeedOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Listing => SeedOrder::Listing,
            Order::SlideNumber => SeedOrder::SlideNumber,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("slidedeck").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn serve_flags_are_optional_overrides() {
        let cli = parse(&["serve"]);
        assert_eq!(cli.loglevel, "INFO");
        assert!(matches!(
            cli.command,
            Command::Serve {
                interface: None,
                port: None,
                mount_path: None
            }
        ));

        let cli = parse(&["--log-level", "debug", "serve", "-P", "8080", "--mount-path", "/api/slides"]);
        assert_eq!(cli.loglevel, "debug");
        let Command::Serve {
            port, mount_path, ..
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(port, Some(8080));
        assert_eq!(mount_path.as_deref(), Some("/api/slides"));
    }

    #[test]
    fn seed_accepts_directory_order_and_concurrency() {
        let cli = parse(&["seed", "--dir", "decks/q3", "--order", "slide-number", "-C", "4"]);

        let Command::Seed {
            dir,
            order,
            concurrency,
        } = cli.command
        else {
            panic!("expected seed");
        };
        assert_eq!(dir, Some(Utf8PathBuf::from("decks/q3")));
        assert_eq!(order.map(SeedOrder::from), Some(SeedOrder::SlideNumber));
        assert_eq!(concurrency, Some(4));
    }

    #[test]
    fn unknown_order_is_rejected() {
        let result = Cli::try_parse_from(["slidedeck", "seed", "--order", "random"]);
        assert!(result.is_err());
    }

    #[test]
    fn ping_takes_no_arguments() {
        assert!(matches!(parse(&["ping"]).command, Command::Ping));
    }
}
