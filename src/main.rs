use anyhow::Context;
use bracket_css::{handle_compile_command, handle_pipe_command, Cli, Commands};
use clap::Parser;

fn setup_logging(verbose_count: u8) {
    let log_level = match verbose_count {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Compile(args) => handle_compile_command(args)
            .await
            .context("Failed to compile classes")?,
        Commands::Pipe(args) => handle_pipe_command(args)
            .await
            .context("Failed to process stdin")?,
    }

    Ok(())
}
