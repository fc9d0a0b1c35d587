//! Layout data model
//!
//! The descriptor tree produced by the interpreter. Everything here is plain
//! data: immutable after parsing, `Serialize`/`Deserialize` for the JSON
//! export shape, `PartialEq` for round-trip tests.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A leniently typed configuration value.
///
/// Boolean and numeric literals map to their semantic types; everything else
/// is carried as an opaque string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Format a float the way the script syntax writes it: no trailing `.0`
/// for integral values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Screen edge the panel is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelLocation {
    Top,
    Bottom,
    Left,
    Right,
}

impl PanelLocation {
    pub fn from_value(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Panel alignment along its screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelAlignment {
    Left,
    Center,
    Right,
}

impl PanelAlignment {
    pub fn from_value(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Auto-hide behavior of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HidingMode {
    None,
    Autohide,
    DodgeWindows,
    WindowsBelow,
}

impl HidingMode {
    pub fn from_value(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "autohide" => Some(Self::Autohide),
            "dodgewindows" => Some(Self::DodgeWindows),
            "windowsbelow" => Some(Self::WindowsBelow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Autohide => "autohide",
            Self::DodgeWindows => "dodgewindows",
            Self::WindowsBelow => "windowsbelow",
        }
    }
}

/// How the panel claims length along its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    Fill,
    Fit,
    Custom,
}

impl LengthMode {
    pub fn from_value(s: &str) -> Option<Self> {
        match s {
            "fill" => Some(Self::Fill),
            "fit" => Some(Self::Fit),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Custom => "custom",
        }
    }
}

/// Positional and visual properties of the single panel in a layout.
///
/// Height is stored fully resolved (grid-unit expressions are evaluated at
/// parse time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub location: PanelLocation,
    pub height: f64,
    pub floating: bool,
    pub alignment: PanelAlignment,
    pub hiding: HidingMode,
    #[serde(rename = "lengthMode")]
    pub length_mode: LengthMode,
}

impl PanelSpec {
    /// Panel with the shell defaults, height resolved against `grid_unit`.
    pub fn with_grid_unit(grid_unit: f64) -> Self {
        Self {
            location: PanelLocation::Bottom,
            height: 2.0 * grid_unit,
            floating: false,
            alignment: PanelAlignment::Center,
            hiding: HidingMode::None,
            length_mode: LengthMode::Fill,
        }
    }
}

/// Insertion-ordered key/value entries of one config group.
///
/// Repeated writes to the same key overwrite the value in place, keeping the
/// first write's position, so script order stays stable under re-rendering.
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigEntries(Vec<(String, Value)>);

impl ConfigEntries {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Last write wins.
    pub fn write(&mut self, key: &str, value: Value) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ConfigEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ConfigEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of config entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = ConfigEntries::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    entries.write(&key, value);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A named, path-addressed bucket of key/value settings scoped to one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigGroup {
    pub path: Vec<String>,
    pub entries: ConfigEntries,
}

impl ConfigGroup {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            entries: ConfigEntries::new(),
        }
    }
}

/// One ordered entry in the panel's widget sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(rename = "configGroups")]
    pub config_groups: Vec<ConfigGroup>,
}

impl WidgetSpec {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            config_groups: Vec::new(),
        }
    }

    /// The group at `path`, created on first use (first-use order is the
    /// serialization order).
    pub fn group_mut(&mut self, path: &[String]) -> &mut ConfigGroup {
        let idx = match self.config_groups.iter().position(|g| g.path == path) {
            Some(idx) => idx,
            None => {
                self.config_groups.push(ConfigGroup::new(path.to_vec()));
                self.config_groups.len() - 1
            }
        };
        &mut self.config_groups[idx]
    }

    pub fn group(&self, path: &[String]) -> Option<&ConfigGroup> {
        self.config_groups.iter().find(|g| g.path == path)
    }
}

/// Root of a parsed layout: exactly one panel plus its ordered widgets.
/// Produced only by the interpreter and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub panel: PanelSpec,
    pub widgets: Vec<WidgetSpec>,
}
