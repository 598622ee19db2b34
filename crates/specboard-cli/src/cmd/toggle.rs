use crate::output::print_json;
use anyhow::{bail, Context};
use specboard_core::checkbox::toggle_file;
use std::path::Path;

pub fn run(file: &Path, line: i64, json: bool) -> anyhow::Result<()> {
    let outcome =
        toggle_file(file, line).with_context(|| format!("cannot toggle {}", file.display()))?;

    if json {
        print_json(&outcome)?;
    }
    if !outcome.success {
        bail!("{}", outcome.error.unwrap_or_else(|| "toggle failed".into()));
    }
    if !json {
        let state = if outcome.new_state == Some(true) { "checked" } else { "unchecked" };
        println!("{}:{line} {state}", file.display());
    }
    Ok(())
}
