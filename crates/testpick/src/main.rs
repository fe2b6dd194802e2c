use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use testpick::ui::app::{CliApp, exit_code_for};
use testpick::ui::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    testpick::init(&cli.log_level);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "testpick", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    match CliApp::bootstrap().and_then(|mut app| app.run(&cli)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("testpick: {err:#}");
            exit_code_for(&err)
        }
    }
}
