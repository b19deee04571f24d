//! Config command implementation.

use crate::cli::{CliFormat, ConfigAction, ConfigArgs};
use crate::error::Result;
use crate::output::Formatter;
use serde_json::json;
use std::path::Path;
use swarmboard_domain::{clamp_max_specialists, SettingsStore};
use swarmboard_orchestrator::FileSettingsStore;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, settings_path: &Path, formatter: &Formatter) -> Result<()> {
    println!("{}", apply_config(args.action, settings_path, formatter)?);
    Ok(())
}

fn apply_config(action: ConfigAction, settings_path: &Path, formatter: &Formatter) -> Result<String> {
    let mut store = FileSettingsStore::open(settings_path)?;

    let message = match action {
        ConfigAction::Show => None,
        ConfigAction::SetMaxSpecialists { value } => {
            let clamped = clamp_max_specialists(value);
            store.set_max_specialists(clamped)?;
            if clamped as i64 == value {
                Some(formatter.success(&format!("max_specialists set to {}", clamped)))
            } else {
                Some(formatter.warning(&format!(
                    "max_specialists {} clamped to {}",
                    value, clamped
                )))
            }
        }
    };

    if formatter.format() == CliFormat::Json {
        let body = json!({
            "path": store.path().display().to_string(),
            "max_specialists": store.max_specialists(),
        });
        return Ok(serde_json::to_string_pretty(&body)?);
    }

    let mut lines: Vec<String> = message.into_iter().collect();
    lines.push(format!("Settings file: {}", store.path().display()));
    lines.push(format!("max_specialists = {}", store.max_specialists()));
    Ok(lines.join("\n"))
}
