//! Kilometers-to-miles converter.

use anyhow::Result;

use crate::session::ToolKind;
use crate::tools::{Effects, Services, Tool, ToolAction, ToolView};

const KM_TO_MILES: f64 = 0.621371;

/// Fixed indicator shown for non-numeric input.
pub const INVALID_INPUT: &str = "Invalid";

pub struct ConverterTool {
    input: String,
    result: Option<String>,
}

impl ConverterTool {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            result: None,
        }
    }

    fn convert(&mut self) {
        self.result = Some(match self.input.trim().parse::<f64>() {
            Ok(km) => format!("{:.2} Miles", km * KM_TO_MILES),
            Err(_) => INVALID_INPUT.to_string(),
        });
    }
}

impl Default for ConverterTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ConverterTool {
    fn kind(&self) -> ToolKind {
        ToolKind::UnitConverter
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, _services: &mut Services) -> Result<Effects> {
        match action {
            ToolAction::Input(c) => self.input.push(*c),
            ToolAction::Backspace => {
                self.input.pop();
            }
            ToolAction::Submit => self.convert(),
            _ => {}
        }
        Ok(Effects::none())
    }

    fn on_close(&mut self, _services: &mut Services) -> Result<()> {
        Ok(())
    }

    fn view(&self) -> ToolView {
        ToolView::Converter {
            input: self.input.clone(),
            result: self.result.clone().unwrap_or_else(|| "-- Miles".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::time::Duration;

    use crate::clipboard::ClipboardBridge;
    use crate::store::PersistenceStore;
    use crate::tools::monitor::testing::FakeStats;

    fn services() -> Services {
        Services {
            clipboard: ClipboardBridge::in_memory(),
            store: PersistenceStore::at(std::env::temp_dir()),
            stats: Rc::new(FakeStats::unavailable()),
            monitor_interval: Duration::from_millis(1500),
        }
    }

    fn convert(text: &str) -> String {
        let mut tool = ConverterTool::new();
        let mut services = services();
        for c in text.chars() {
            tool.on_action(&ToolAction::Input(c), &mut services).unwrap();
        }
        tool.on_action(&ToolAction::Submit, &mut services).unwrap();
        match tool.view() {
            ToolView::Converter { result, .. } => result,
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn converts_km_to_miles() {
        assert_eq!(convert("100"), "62.14 Miles");
        assert_eq!(convert("1"), "0.62 Miles");
        assert_eq!(convert("0"), "0.00 Miles");
        assert_eq!(convert("2.5"), "1.55 Miles");
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(convert(" 10 "), "6.21 Miles");
    }

    #[test]
    fn non_numeric_input_shows_fixed_indicator() {
        assert_eq!(convert("ten"), INVALID_INPUT);
        assert_eq!(convert(""), INVALID_INPUT);
        assert_eq!(convert("1.2.3"), INVALID_INPUT);
    }

    #[test]
    fn invalid_input_does_not_stick_after_correction() {
        let mut tool = ConverterTool::new();
        let mut services = services();

        tool.on_action(&ToolAction::Input('x'), &mut services)
            .unwrap();
        tool.on_action(&ToolAction::Submit, &mut services).unwrap();
        tool.on_action(&ToolAction::Backspace, &mut services)
            .unwrap();
        tool.on_action(&ToolAction::Input('4'), &mut services)
            .unwrap();
        tool.on_action(&ToolAction::Submit, &mut services).unwrap();

        match tool.view() {
            ToolView::Converter { result, .. } => assert_eq!(result, "2.49 Miles"),
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
