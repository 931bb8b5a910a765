//! Color picker.
//!
//! The native color-selection dialog is an external service; its
//! observable result (cancel, or a `#rrggbb` value) is fed from a hex
//! input in the tool pane. A valid submission is normalized and
//! forwarded to the shared clipboard slot.

use anyhow::Result;

use crate::session::ToolKind;
use crate::tools::{Effects, Services, Tool, ToolAction, ToolView};

pub struct ColorPickerTool {
    input: String,
    invalid: bool,
    last_copied: Option<String>,
}

impl ColorPickerTool {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            invalid: false,
            last_copied: None,
        }
    }
}

impl Default for ColorPickerTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ColorPickerTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ColorPicker
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, services: &mut Services) -> Result<Effects> {
        match action {
            ToolAction::Input(c) => {
                self.input.push(*c);
                self.invalid = false;
            }
            ToolAction::Backspace => {
                self.input.pop();
                self.invalid = false;
            }
            ToolAction::Submit => match normalize_hex(&self.input) {
                Some(color) => {
                    services.clipboard.set(&color);
                    self.invalid = false;
                    self.input.clear();
                    let notice = format!("Copied {color} to clipboard");
                    self.last_copied = Some(color);
                    return Ok(Effects::notice(notice));
                }
                None => self.invalid = true,
            },
            _ => {}
        }
        Ok(Effects::none())
    }

    fn on_close(&mut self, _services: &mut Services) -> Result<()> {
        Ok(())
    }

    fn view(&self) -> ToolView {
        ToolView::Color {
            input: self.input.clone(),
            invalid: self.invalid,
            last_copied: self.last_copied.clone(),
        }
    }
}

/// Normalize user input to `#rrggbb`. Accepts an optional leading `#`
/// and any hex case; anything else is rejected.
pub fn normalize_hex(input: &str) -> Option<String> {
    let hex = input.trim().strip_prefix('#').unwrap_or(input.trim());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", hex.to_ascii_lowercase()))
}
