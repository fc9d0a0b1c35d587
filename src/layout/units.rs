//! Unit constant resolution
//!
//! Scripts size the panel in host-shell units (`2 * gridUnit`). The concrete
//! pixel size of a unit is a property of the host shell, not of the script,
//! so the interpreter resolves unit names through this trait.

use std::collections::HashMap;

/// Shell default when no configuration overrides it (Plasma gridUnit for a
/// 10pt default font).
pub const DEFAULT_GRID_UNIT: f64 = 18.0;
pub const DEFAULT_SMALL_SPACING: f64 = 4.0;
pub const DEFAULT_LARGE_SPACING: f64 = 18.0;

/// Maps a unit constant name to its resolved size, if known.
pub trait UnitResolver {
    fn resolve(&self, name: &str) -> Option<f64>;
}

impl<F> UnitResolver for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn resolve(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// Table-backed resolver covering the standard shell units, extensible with
/// arbitrary named constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Units {
    table: HashMap<String, f64>,
}

impl Units {
    /// Empty table; resolves nothing.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn with_unit(mut self, name: impl Into<String>, size: f64) -> Self {
        self.table.insert(name.into(), size);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, size: f64) {
        self.table.insert(name.into(), size);
    }

    /// Standard units with `gridUnit` overridden.
    pub fn with_grid_unit(grid_unit: f64) -> Self {
        Self::default().with_unit("gridUnit", grid_unit)
    }

    pub fn grid_unit(&self) -> f64 {
        self.table
            .get("gridUnit")
            .copied()
            .unwrap_or(DEFAULT_GRID_UNIT)
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::empty()
            .with_unit("gridUnit", DEFAULT_GRID_UNIT)
            .with_unit("smallSpacing", DEFAULT_SMALL_SPACING)
            .with_unit("largeSpacing", DEFAULT_LARGE_SPACING)
    }
}

impl UnitResolver for Units {
    fn resolve(&self, name: &str) -> Option<f64> {
        self.table.get(name).copied()
    }
}
