#![deny(clippy::all, clippy::pedantic)]

use std::fs;

use serde::de::DeserializeOwned;

use crate::args::Payload;
use crate::client::CliError;

impl Payload {
    /// Raw JSON text; the file wins over the inline value.
    pub fn read(&self) -> Result<Option<String>, CliError> {
        if let Some(path) = &self.data_file {
            let data = fs::read_to_string(path).map_err(|source| CliError::InputFile {
                path: path.display().to_string(),
                source,
            })?;
            return Ok(Some(data));
        }
        Ok(self.data.clone())
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, CliError> {
        let text = self
            .read()?
            .ok_or_else(|| CliError::InvalidInput("--data or --data-file is required".into()))?;
        parse_json(&text)
    }

    pub fn parse_opt<T: DeserializeOwned>(&self) -> Result<Option<T>, CliError> {
        self.read()?.as_deref().map(parse_json).transpose()
    }
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, CliError> {
    serde_json::from_str(text).map_err(|e| CliError::InvalidInput(format!("invalid JSON body: {e}")))
}
