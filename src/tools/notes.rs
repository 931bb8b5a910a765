//! Sticky notes.
//!
//! The note text lives in memory while the session is open and is
//! written back as a single blob at finalize. Last writer wins across
//! concurrently open note sessions.

use anyhow::{Context, Result};

use crate::session::ToolKind;
use crate::store::NOTES_KEY;
use crate::tools::{Effects, Services, Tool, ToolAction, ToolView};

pub struct NotesTool {
    text: String,
}

impl NotesTool {
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for NotesTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for NotesTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Notes
    }

    fn on_open(&mut self, services: &mut Services) -> Result<Effects> {
        self.text = services
            .store
            .load(NOTES_KEY)
            .context("Failed to load notes")?;
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, _services: &mut Services) -> Result<Effects> {
        match action {
            ToolAction::Input(c) => self.text.push(*c),
            ToolAction::Newline => self.text.push('\n'),
            ToolAction::Backspace => {
                self.text.pop();
            }
            _ => {}
        }
        Ok(Effects::none())
    }

    fn on_close(&mut self, services: &mut Services) -> Result<()> {
        services
            .store
            .save(NOTES_KEY, &self.text)
            .context("Failed to save notes")
    }

    fn view(&self) -> ToolView {
        ToolView::Notes {
            text: self.text.clone(),
        }
    }
}
