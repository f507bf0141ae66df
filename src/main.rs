use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, Write};

use laboral_intake::config::{build_intake, config_stub, default_config, load_config};
use laboral_intake::demo::run_demo;
use laboral_intake::session::run_session;
use laboral_intake::templates::render_operator_instructions;
use laboral_intake::Intake;

mod cli;
use cli::{Command, ConfigArgs, DemoArgs, IntakeOptions, RootArgs, SessionArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Session(args) => cmd_session(args),
        Command::Demo(args) => cmd_demo(args),
        Command::Instructions(_) => cmd_instructions(),
        Command::Config(args) => cmd_config(args),
    }
}

fn intake_from_options(options: &IntakeOptions) -> Result<Intake> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    if let Some(narratives) = &options.narratives {
        config.narratives_path = Some(narratives.clone());
    }
    if options.strict {
        config.strict_transitions = true;
    }
    build_intake(&config)
}

fn cmd_session(args: SessionArgs) -> Result<()> {
    let mut intake = intake_from_options(&args.intake)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut intake, stdin.lock(), stdout.lock())?;
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> Result<()> {
    let mut intake = intake_from_options(&args.intake)?;
    let results = run_demo(&mut intake, &args.case_id);
    let mut out = io::stdout().lock();

    if args.json {
        for result in &results {
            writeln!(out, "{}", serde_json::to_string(result)?)?;
        }
        return Ok(());
    }

    for result in &results {
        if result["status"] != "ok" {
            let message = result["error_message"].as_str().unwrap_or("unknown error");
            writeln!(out, "warning: {message}")?;
        }
    }
    let expediente = results
        .iter()
        .find_map(|result| result.get("expediente").and_then(|text| text.as_str()))
        .ok_or_else(|| anyhow!("demo produced no expediente"))?;
    writeln!(out, "{expediente}")?;
    if let Some(state) = results.last().and_then(|result| result["state"].as_str()) {
        writeln!(out, "\nFinal state: {state}")?;
    }
    Ok(())
}

fn cmd_instructions() -> Result<()> {
    print!("{}", render_operator_instructions());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> Result<()> {
    let stub = config_stub()?;
    let Some(out) = &args.out else {
        println!("{stub}");
        return Ok(());
    };
    if out.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            out.display()
        ));
    }
    std::fs::write(out, format!("{stub}\n"))
        .with_context(|| format!("write config {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote config stub");
    Ok(())
}
