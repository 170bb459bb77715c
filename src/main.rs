//! LectureScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lecture_scribe::cli::{
    app::{run_list, run_record, run_show, EXIT_ERROR},
    args::{Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use lecture_scribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Record {
            title,
            presenter: presenter_name,
            language,
            chunk_seconds,
        } => {
            run_record(RecordOptions {
                title,
                presenter: presenter_name,
                language,
                chunk_seconds,
            })
            .await
        }
        Commands::List => run_list().await,
        Commands::Show { id } => run_show(&id).await,
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
