//! Scenario command handlers.

use super::resolve_config_path;
use shoprag_core::{LogFormat, init_tracing};
use shoprag_scenario::{Script, ScriptValidator, ToolRegistry};
use shoprag_server::{ScenarioSettings, Settings, build_driver, build_scenario_runner};
use std::path::PathBuf;

/// Loads a scenario and prints its validation issues.
///
/// Issues are warnings unless `strict` is set; a scenario that fails to load
/// is always an error.
pub fn handle_validate_command(file: PathBuf, strict: bool) -> anyhow::Result<()> {
    init_tracing(LogFormat::Pretty).map_err(anyhow::Error::msg)?;

    let script = Script::from_file(&file)?;
    let tools = ToolRegistry::with_defaults();
    let validator = ScriptValidator::new(&tools);
    let issues = validator.validate(&script);

    println!("{}: {} top-level nodes", file.display(), script.len());
    if issues.is_empty() {
        println!("No issues found");
    } else {
        for (i, issue) in issues.iter().enumerate() {
            println!("Issue {}: {}", i + 1, issue);
        }
    }

    if strict {
        validator.ensure_valid(&script)?;
    }
    Ok(())
}

/// Runs a scenario once and prints the emitted context and last step.
pub async fn handle_run_command(
    file: PathBuf,
    message: String,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = Settings::load(resolve_config_path(config).as_deref())?;
    init_tracing(settings.log_format).map_err(anyhow::Error::msg)?;

    let scenario = ScenarioSettings {
        file,
        ..settings.scenario.clone()
    };
    let runner = build_scenario_runner(&scenario, build_driver(&settings.llm)?)?;
    let outcome = runner.run(&message).await?;

    println!("Context:\n{}", outcome.context());
    println!("Last step: {}", outcome.last_step());
    Ok(())
}
