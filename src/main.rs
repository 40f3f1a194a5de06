use anyhow::Result;
use clap::Parser;
use log::error;
use std::process::ExitCode;
use timelapse_builder::cli::Cli;
use timelapse_builder::component::TimelapseRunner;
use timelapse_builder::config::load_settings;
use timelapse_builder::init;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init::init(cli.verbose, cli.quiet);

    let settings = load_settings(&cli.settings)?;
    let config = cli.job_config(&settings);
    let runner = TimelapseRunner::new(config, cli.input_resolver()).with_quiet(cli.quiet);

    let summary = runner.run(&cli.videos)?;
    if !summary.is_success() {
        error!("未產生影片");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
