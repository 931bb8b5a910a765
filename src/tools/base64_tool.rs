//! Base64 encoder/decoder.
//!
//! Malformed decode input is a transient user error: the output shows
//! a fixed indicator and nothing propagates to the caller.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::session::ToolKind;
use crate::tools::{Effects, Services, Tool, ToolAction, ToolView};

/// Fixed indicator shown for undecodable input.
pub const INVALID_INPUT: &str = "Error: Invalid Input";

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn decode(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text.trim()).ok()
}

pub struct Base64Tool {
    encoding: bool,
    input: String,
    output: Option<String>,
}

impl Base64Tool {
    pub fn new() -> Self {
        Self {
            encoding: true,
            input: String::new(),
            output: None,
        }
    }

    fn run(&mut self) {
        let result = if self.encoding {
            encode(self.input.as_bytes())
        } else {
            decode(&self.input)
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| INVALID_INPUT.to_string())
        };
        self.output = Some(result);
    }
}

impl Default for Base64Tool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for Base64Tool {
    fn kind(&self) -> ToolKind {
        ToolKind::Base64Tool
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, services: &mut Services) -> Result<Effects> {
        match action {
            ToolAction::Input(c) => {
                self.input.push(*c);
                self.output = None;
            }
            ToolAction::Backspace => {
                self.input.pop();
                self.output = None;
            }
            ToolAction::ToggleMode => {
                self.encoding = !self.encoding;
                self.output = None;
            }
            ToolAction::Submit => self.run(),
            ToolAction::Copy => {
                if let Some(output) = self.output.as_deref() {
                    if output != INVALID_INPUT {
                        services.clipboard.set(output);
                        return Ok(Effects::notice("Output copied"));
                    }
                }
            }
            _ => {}
        }
        Ok(Effects::none())
    }

    fn on_close(&mut self, _services: &mut Services) -> Result<()> {
        Ok(())
    }

    fn view(&self) -> ToolView {
        ToolView::Base64 {
            encoding: self.encoding,
            input: self.input.clone(),
            output: self.output.clone(),
        }
    }
}
