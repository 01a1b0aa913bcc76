//! Declarative layout table for the keypad.
//!
//! The keypad is built once from a [`LayoutSpec`]: one [`WidgetSpec`] per key
//! describing where it sits, how it looks, which page it belongs to and what
//! a click means. Layouts can be loaded from JSON, which makes page contents
//! easy to swap in tests.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::ConfigResult;
use crate::draw::FontId;
use crate::error::{KeypadError, KeypadResult};
use crate::page::PageId;
use crate::widget::KeyId;

/// Font for digits, operators and function names.
pub const KEY_FONT: FontId = FontId(0);
/// Font for mode toggles and control keys.
pub const CONTROL_FONT: FontId = FontId(1);

/// Name of the trigonometric mode group.
pub const TRIG_GROUP: &str = "trig";
/// Name of the angle unit mode group.
pub const ANGLE_GROUP: &str = "angle";

/// Translucent panel the keys sit on.
pub const PANEL_RECT: Rect = Rect::new(50.0, 75.0, 700.0, 1125.0);
/// Area at the top of the panel reserved for the expression display.
pub const DISPLAY_RECT: Rect = Rect::new(88.0, 100.0, 663.0, 240.0);

const KEY: f64 = 125.0;
const COLUMNS: [f64; 4] = [88.0, 238.0, 388.0, 538.0];
const ROWS: [f64; 4] = [350.0, 500.0, 650.0, 800.0];
const CONTROL_ROW: f64 = 950.0;
const MODE_ROW: f64 = 265.0;
const MODE_SIZE: Size = Size::new(100.0, 60.0);

/// What clicking a key means.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyAction {
    /// Append literal text to the expression.
    Insert { text: String },
    /// Append a function call; the application decides the final name from
    /// the active modes.
    Function { name: String },
    /// Remove the last character.
    Delete,
    /// Empty the expression.
    Clear,
    /// The equals key. Never evaluates anything.
    Evaluate,
    /// Switch between the base and extended pages.
    TogglePage,
    /// Select this key within a mode group.
    Mode { group: String },
    /// Does nothing.
    #[default]
    Inert,
}

/// Where a key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// On one of the switchable pages.
    Page(PageId),
    /// Always visible, never animated by page transitions.
    Fixed,
}

fn default_label_size() -> f64 {
    70.0
}

fn default_roundness() -> f64 {
    0.5
}

/// One entry of the layout table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    pub key: KeyId,
    pub label: String,
    /// Top-left corner in virtual coordinates.
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub font: FontId,
    #[serde(default = "default_label_size")]
    pub label_size: f64,
    #[serde(default = "default_roundness")]
    pub corner_roundness: f64,
    #[serde(default)]
    pub action: KeyAction,
    pub placement: Placement,
    /// Initial value of the sticky `active` flag.
    #[serde(default)]
    pub active: bool,
}

impl WidgetSpec {
    pub fn new(
        key: &str,
        label: &str,
        position: Point,
        size: Size,
        action: KeyAction,
        placement: Placement,
    ) -> Self {
        Self {
            key: KeyId::from(key),
            label: label.to_string(),
            position,
            size,
            font: KEY_FONT,
            label_size: default_label_size(),
            corner_roundness: default_roundness(),
            action,
            placement,
            active: false,
        }
    }

    pub fn with_font(mut self, font: FontId, label_size: f64) -> Self {
        self.font = font;
        self.label_size = label_size;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// The full layout table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub widgets: Vec<WidgetSpec>,
}

impl LayoutSpec {
    /// Parse a layout table from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Entries placed on `page`, in table order.
    pub fn page(&self, page: PageId) -> impl Iterator<Item = &WidgetSpec> {
        self.widgets
            .iter()
            .filter(move |w| w.placement == Placement::Page(page))
    }

    /// Always-visible entries, in table order.
    pub fn fixed(&self) -> impl Iterator<Item = &WidgetSpec> {
        self.widgets
            .iter()
            .filter(|w| w.placement == Placement::Fixed)
    }

    /// Check keys are unique, geometry fits the canvas and mode keys are fixed.
    pub fn validate(&self, virtual_size: Size) -> KeypadResult<()> {
        let canvas = Rect::from_origin_size(Point::ZERO, virtual_size);
        let mut seen = HashSet::new();

        for spec in &self.widgets {
            if !seen.insert(spec.key.as_str()) {
                return Err(KeypadError::DuplicateKey(spec.key.to_string()));
            }

            let invalid = |reason: &str| KeypadError::InvalidGeometry {
                key: spec.key.to_string(),
                reason: reason.to_string(),
            };
            let finite = spec.position.is_finite() && spec.size.is_finite();
            if !finite || spec.size.width <= 0.0 || spec.size.height <= 0.0 {
                return Err(invalid("size must be positive"));
            }
            if canvas.union(spec.bounds()) != canvas {
                return Err(invalid("key extends past the virtual canvas"));
            }
            if matches!(spec.action, KeyAction::Mode { .. }) && spec.placement != Placement::Fixed {
                return Err(invalid("mode keys must be always visible"));
            }
        }
        Ok(())
    }

    /// The built-in calculator layout.
    pub fn calculator() -> Self {
        let mut widgets = Vec::new();

        let insert = |text: &str| KeyAction::Insert {
            text: text.to_string(),
        };
        let function = |name: &str| KeyAction::Function {
            name: name.to_string(),
        };

        // Base page: digits and arithmetic.
        let base: [[(&str, KeyAction); 4]; 4] = [
            [("1", insert("1")), ("2", insert("2")), ("3", insert("3")), ("+", insert("+"))],
            [("4", insert("4")), ("5", insert("5")), ("6", insert("6")), ("-", insert("-"))],
            [("7", insert("7")), ("8", insert("8")), ("9", insert("9")), ("×", insert("×"))],
            [(".", insert(".")), ("0", insert("0")), ("^", insert("^")), ("÷", insert("÷"))],
        ];
        for (row, keys) in base.into_iter().enumerate() {
            for (col, (label, action)) in keys.into_iter().enumerate() {
                widgets.push(WidgetSpec::new(
                    label,
                    label,
                    Point::new(COLUMNS[col], ROWS[row]),
                    Size::new(KEY, KEY),
                    action,
                    Placement::Page(PageId::Base),
                ));
            }
        }

        // Extended page: functions and constants.
        let extended: [[(&str, &str, KeyAction); 4]; 4] = [
            [
                ("sin", "sin", function("sin")),
                ("cos", "cos", function("cos")),
                ("tan", "tan", function("tan")),
                ("pi", "π", insert("π")),
            ],
            [
                ("ln", "ln", function("ln")),
                ("log", "log", function("log")),
                ("sqrt", "√", function("√")),
                ("e", "e", insert("e")),
            ],
            [
                ("lparen", "(", insert("(")),
                ("rparen", ")", insert(")")),
                ("fact", "!", insert("!")),
                ("square", "x²", insert("^2")),
            ],
            [
                ("abs", "abs", function("abs")),
                ("mod", "mod", insert(" mod ")),
                ("recip", "1/x", insert("1/")),
                ("percent", "%", insert("%")),
            ],
        ];
        for (row, keys) in extended.into_iter().enumerate() {
            for (col, (key, label, action)) in keys.into_iter().enumerate() {
                widgets.push(
                    WidgetSpec::new(
                        key,
                        label,
                        Point::new(COLUMNS[col], ROWS[row]),
                        Size::new(KEY, KEY),
                        action,
                        Placement::Page(PageId::Extended),
                    )
                    .with_font(KEY_FONT, 48.0),
                );
            }
        }

        // Mode toggles.
        let modes = [
            ("BASE", TRIG_GROUP, 88.0, true),
            ("INV", TRIG_GROUP, 198.0, false),
            ("HYP", TRIG_GROUP, 308.0, false),
            ("DEG", ANGLE_GROUP, 443.0, true),
            ("RAD", ANGLE_GROUP, 553.0, false),
        ];
        for (key, group, x, active) in modes {
            widgets.push(
                WidgetSpec::new(
                    key,
                    key,
                    Point::new(x, MODE_ROW),
                    MODE_SIZE,
                    KeyAction::Mode {
                        group: group.to_string(),
                    },
                    Placement::Fixed,
                )
                .with_font(CONTROL_FONT, 28.0)
                .with_active(active),
            );
        }

        // Control row.
        let controls = [
            ("more", "more", KeyAction::TogglePage, 36.0),
            ("clear", "C", KeyAction::Clear, 70.0),
            ("delete", "DEL", KeyAction::Delete, 36.0),
            ("equals", "=", KeyAction::Evaluate, 70.0),
        ];
        for (col, (key, label, action, size)) in controls.into_iter().enumerate() {
            let font = if size < 70.0 { CONTROL_FONT } else { KEY_FONT };
            widgets.push(
                WidgetSpec::new(
                    key,
                    label,
                    Point::new(COLUMNS[col], CONTROL_ROW),
                    Size::new(KEY, KEY),
                    action,
                    Placement::Fixed,
                )
                .with_font(font, size)
                .with_active(key == "equals"),
            );
        }

        Self { widgets }
    }
}
