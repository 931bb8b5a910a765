//! Password generator.

use anyhow::Result;
use rand::Rng;

use crate::session::ToolKind;
use crate::tools::{Effects, Services, Tool, ToolAction, ToolView};

pub const MIN_LENGTH: u8 = 6;
pub const MAX_LENGTH: u8 = 30;
pub const DEFAULT_LENGTH: u8 = 12;

const CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub struct PasswordTool {
    length: u8,
    generated: Option<String>,
}

impl PasswordTool {
    pub fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            generated: None,
        }
    }

    fn adjust_length(&mut self, delta: i8) {
        let length = self.length.saturating_add_signed(delta);
        self.length = length.clamp(MIN_LENGTH, MAX_LENGTH);
    }
}

impl Default for PasswordTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PasswordTool {
    fn kind(&self) -> ToolKind {
        ToolKind::PasswordGen
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, services: &mut Services) -> Result<Effects> {
        match action {
            ToolAction::LengthDelta(delta) => self.adjust_length(*delta),
            ToolAction::Generate => self.generated = Some(generate(self.length)),
            ToolAction::Copy => {
                if let Some(password) = self.generated.as_deref() {
                    services.clipboard.set(password);
                    return Ok(Effects::notice("Copied to clipboard"));
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
        ToolView::Password {
            length: self.length,
            generated: self.generated.clone(),
        }
    }
}

fn generate(length: u8) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
