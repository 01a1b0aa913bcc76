//! The expression being typed on the keypad.

use calcpad_core::KeyCommand;

/// Functions that take the `INV`/`HYP` modifiers.
const TRIG_FUNCTIONS: [&str; 3] = ["sin", "cos", "tan"];

/// Text buffer fed by key commands.
///
/// Only builds the text; nothing is ever evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    text: String,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply one key command. `trig_mode` is the active key of the trig
    /// group (`BASE`, `INV` or `HYP`).
    pub fn apply(&mut self, command: &KeyCommand, trig_mode: Option<&str>) {
        match command {
            KeyCommand::Insert { text } => self.text.push_str(text),
            KeyCommand::Function { name } => {
                self.text.push_str(&function_name(name, trig_mode));
                self.text.push('(');
            }
            KeyCommand::Delete => {
                self.text.pop();
            }
            KeyCommand::Clear => self.text.clear(),
            KeyCommand::Evaluate => {
                log::info!("Evaluation requested for '{}' (not supported)", self.text);
            }
            KeyCommand::TogglePage | KeyCommand::SelectMode { .. } => {}
        }
    }

    /// The last `max_chars` characters, for a display of fixed width.
    pub fn tail(&self, max_chars: usize) -> &str {
        let count = self.text.chars().count();
        if count <= max_chars {
            return &self.text;
        }
        let skip = count - max_chars;
        match self.text.char_indices().nth(skip) {
            Some((index, _)) => &self.text[index..],
            None => "",
        }
    }
}

/// Resolve a function name against the trig mode: `INV` gives `asin`,
/// `HYP` gives `sinh`.
fn function_name(name: &str, trig_mode: Option<&str>) -> String {
    if !TRIG_FUNCTIONS.contains(&name) {
        return name.to_string();
    }
    match trig_mode {
        Some("INV") => format!("a{name}"),
        Some("HYP") => format!("{name}h"),
        _ => name.to_string(),
    }
}
