//! Command dispatch

use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::script::{Runner, DEMO_SCRIPT};
use crate::tree::PathTree;

#[instrument(level = "debug", skip(cli))]
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_values {
        settings.show_values = false;
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Run { file }) => _run(file.as_deref(), &settings),
        Some(Commands::Demo) => _demo(&settings),
        Some(Commands::Config { command }) => _config(command, &settings),
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn read_source(file: Option<&Path>) -> CliResult<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Input {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Runs `source` on a fresh tree and prints everything it produced.
pub fn run_source(source: &str, settings: &Settings) -> CliResult<PathTree> {
    let mut tree = PathTree::new();
    let runner = Runner::new(settings.render_options(), settings.keep_going);
    let report = runner.run(&mut tree, source)?;

    for text in &report.output {
        output::info(text);
    }
    for err in &report.errors {
        output::warning(err);
    }
    debug!(
        "executed {} command(s), {} error(s), {} node(s)",
        report.executed,
        report.errors.len(),
        tree.len()
    );
    Ok(tree)
}

fn _run(file: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let source = read_source(file)?;
    run_source(&source, settings)?.delete();
    Ok(())
}

fn _demo(settings: &Settings) -> CliResult<()> {
    output::header("script");
    output::info(DEMO_SCRIPT.trim_end());
    output::header("output");
    run_source(DEMO_SCRIPT, settings)?.delete();
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(settings.to_toml()?.trim_end()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "no home directory, global config unavailable".to_string(),
                ))
            }
        },
    }
    Ok(())
}
