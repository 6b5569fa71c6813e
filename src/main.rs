use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use tabconv::api::TabconvApi;
use tabconv::conf::Config;
use tabconv::convert;
use tabconv::core::{CliArgs, Command, TabconvError, setup_logging};

async fn run(args: CliArgs) -> Result<(), TabconvError> {
    match args.command {
        Command::Serve => {
            let config = Config::load(args.config.as_deref())?;
            TabconvApi::new(config.server).await?.serve().await
        }
        Command::Convert(opts) => convert::convert(
            &opts.csv,
            &opts.output,
            !opts.no_header,
            opts.json.as_deref(),
            opts.mode,
        ),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Tabconv started.");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
