mod config;
mod resource;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use resource::{cmd_add, cmd_delete, cmd_list, cmd_update, parse_ticket_key};

use crate::cli::OutputOptions;
use crate::error::Result;

/// Print a JSON value, pretty-printed
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Command result with a JSON form and an optional human-readable form
pub struct CommandOutput {
    json: serde_json::Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: serde_json::Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as JSON when requested or when there is no text form
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}
