//! Layout core
//!
//! Parses declarative panel-layout scripts into a normalized, immutable
//! [`LayoutDescriptor`] and renders descriptors back to canonical script
//! text. The interpreter is pure: text in, descriptor out, no I/O.

pub mod lexer;
pub mod model;
pub mod parser;
pub mod render;
pub mod units;

pub use model::{
    ConfigEntries, ConfigGroup, HidingMode, LayoutDescriptor, LengthMode, PanelAlignment,
    PanelLocation, PanelSpec, Value, WidgetSpec,
};
pub use parser::Interpreter;
pub use render::render;
pub use units::{UnitResolver, Units};
