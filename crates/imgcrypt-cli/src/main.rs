//! imgcrypt CLI - Password-based encryption for image files
//!
//! This is the command-line interface for imgcrypt. It reads and writes
//! files and hands the crypto work to the core library's worker.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod logging;
mod mime;
mod paths;
mod ui;

use clap::Parser;
use imgcrypt_core::{CryptError, VERSION};

use crate::app::AppContext;
use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::commands::{config as config_cmd, decrypt, encrypt, inspect, misc};
use crate::errors::{exit_code_for, CliError};
use crate::ui::{print_error, UiContext};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let ctx = match AppContext::load(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            logging::init(cli.verbose, "warn");
            report_and_exit(&cli, &e);
        }
    };
    logging::init(cli.verbose, &ctx.config().log.level);

    if let Err(e) = run(&ctx).await {
        report_and_exit(&cli, &e);
    }
}

async fn run(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Some(Commands::Encrypt(args)) => {
            encrypt::handle_encrypt(ctx, args).await?;
        }
        Some(Commands::Decrypt(args)) => {
            decrypt::handle_decrypt(ctx, args).await?;
        }
        Some(Commands::Inspect(args)) => {
            inspect::handle_inspect(ctx, args)?;
        }
        Some(Commands::Config(args)) => match &args.command {
            ConfigSubcommand::Init { force } => {
                config_cmd::handle_init(ctx, *force)?;
            }
            ConfigSubcommand::Show => {
                config_cmd::handle_show(ctx)?;
            }
        },
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("imgcrypt v{}", VERSION);
            println!("\nQuickstart:");
            println!("  imgcrypt encrypt photo.png");
            println!("  imgcrypt inspect photo.png.json");
            println!("  imgcrypt decrypt photo.png.json -o restored.png");
            println!("\nRun `imgcrypt --help` for full usage.");
        }
    }

    Ok(())
}

fn report_and_exit(cli: &Cli, err: &anyhow::Error) -> ! {
    let ui = UiContext::from_env(false, cli.no_color, cli.quiet);

    let message = match err.downcast_ref::<CryptError>().and_then(CliError::from_crypt) {
        Some(cli_err) => cli_err.to_string(),
        None => format!("{:#}", err),
    };
    let (message, hint) = split_hint(&message);
    print_error(&ui, message, hint);

    std::process::exit(exit_code_for(err));
}

/// Split a trailing "Hint: ..." line off an error message.
fn split_hint(message: &str) -> (&str, Option<&str>) {
    match message.find("\nHint:") {
        Some(idx) => (&message[..idx], Some(&message[idx + 1..])),
        None => (message, None),
    }
}
