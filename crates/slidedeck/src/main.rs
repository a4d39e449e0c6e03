use clap::Parser;
use slidedeck_cli::commands::{ping, seed, server::ServerOverrides};
use slidedeck_cli::{Cli, CliError, Command, ExitOnError, commands, get_configuration};
use slidedeck_server::telemetry::{get_subscriber, init_subscriber};
use tracing::{debug, warn};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    init_subscriber(get_subscriber(&cli.loglevel))?;

    match dotenv {
        Ok(path) => debug!("Loaded environment from `{}`", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("Could not load `.env`: {err}"),
    }

    if let Err(e) = run_cli(cli) {
        e.exit_with_tips();
    }

    Ok(())
}

fn run_cli(cli: Cli) -> Result<(), CliError> {
    let settings = get_configuration()?;

    match cli.command {
        Command::Serve {
            interface,
            port,
            mount_path,
        } => {
            let overrides = ServerOverrides::new(interface, port, mount_path);
            commands::server::start_server(&settings.app_settings, &settings.database, overrides)?;
        }
        Command::Seed {
            dir,
            order,
            concurrency,
        } => {
            let options =
                seed::merge_options(settings.seed, dir, order.map(Into::into), concurrency);
            seed::handle(&options, &settings.database)?;
        }
        Command::Ping => ping::handle(&settings.database).or_exit(),
    }

    Ok(())
}
