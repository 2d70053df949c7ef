pub mod config;
pub mod session;
pub mod stats;
pub mod task;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Read a JSON document supplied by the caller.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

/// Like [`read_json`], but a missing file reads as `T::default()`.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> CliResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    read_json(path)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CliResult {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
