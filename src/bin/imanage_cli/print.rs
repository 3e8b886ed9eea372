#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Print a lookup result, turning absence into an error naming `entity`.
pub fn print_found<T: Serialize>(entity: &str, value: Option<T>) -> Result<(), CliError> {
    match value {
        Some(value) => print_json(&value),
        None => Err(CliError::NotFound(entity.to_string())),
    }
}
