//! CalcPad Application
//!
//! The application shell: windowing, pointer capture, frame timing and the
//! expression buffer driven by the keypad.

mod app;
mod expression;

pub use app::{App, AppConfig};
pub use expression::Expression;
