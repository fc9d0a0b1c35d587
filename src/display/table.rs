use crate::error::AppError;
use crate::layout::model::{PanelSpec, WidgetSpec, format_number};
use comfy_table::{Attribute, Cell, Color, Table, presets};
use crossterm::terminal;
use unicode_width::UnicodeWidthStr;

/// Formatter and utilities for table display
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl TableDisplay {
    /// Create a new TableDisplay instance
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Detect terminal width
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => {
                let width = cols as usize;
                // Clamp for stability on very narrow or very wide terminals
                Some(width.clamp(40, 200))
            }
            Err(_) => Some(80), // Default width
        }
    }

    /// Create a TableDisplay instance with maximum width setting
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Render the panel properties as a two-column Field | Value table
    pub fn render_panel(&self, panel: &PanelSpec) -> Result<String, AppError> {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);

        table.set_header(self.header_cells(&["Property", "Value"]));

        let fields = vec![
            ("location", panel.location.as_str().to_string()),
            ("height", format_number(panel.height)),
            ("floating", panel.floating.to_string()),
            ("alignment", panel.alignment.as_str().to_string()),
            ("hiding", panel.hiding.as_str().to_string()),
            ("lengthMode", panel.length_mode.as_str().to_string()),
        ];

        for (name, value) in fields {
            let row = vec![
                if self.use_colors {
                    Cell::new(name).fg(Color::Yellow)
                } else {
                    Cell::new(name)
                },
                Cell::new(value),
            ];
            table.add_row(row);
        }

        Ok(table.to_string())
    }

    /// Render the widget sequence in table format (position, type, config
    /// group count, key count)
    pub fn render_widget_list(&self, widgets: &[WidgetSpec]) -> Result<String, AppError> {
        if widgets.is_empty() {
            return Ok("Panel has no widgets.".to_string());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);

        table.set_header(self.header_cells(&["#", "Type", "Groups", "Keys"]));

        let type_width = self.type_column_width();
        for (idx, widget) in widgets.iter().enumerate() {
            let key_count: usize = widget
                .config_groups
                .iter()
                .map(|g| g.entries.len())
                .sum();

            let row = vec![
                if self.use_colors {
                    Cell::new(idx.to_string()).fg(Color::Cyan)
                } else {
                    Cell::new(idx.to_string())
                },
                Cell::new(self.truncate_text(&widget.type_id, type_width)),
                Cell::new(widget.config_groups.len().to_string()),
                Cell::new(key_count.to_string()),
            ];
            table.add_row(row);
        }

        Ok(table.to_string())
    }

    fn header_cells(&self, headers: &[&str]) -> Vec<Cell> {
        headers
            .iter()
            .map(|h| {
                if self.use_colors {
                    Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan)
                } else {
                    Cell::new(h).add_attribute(Attribute::Bold)
                }
            })
            .collect()
    }

    /// Set table width to match the terminal size
    fn configure_table_width(&self, table: &mut Table) {
        if let Some(terminal_width) = self.max_width {
            let available_width = if terminal_width > 20 {
                terminal_width - 6 // Consider borders, padding, margins
            } else {
                terminal_width.max(40)
            };
            table.set_width(available_width as u16);
        } else {
            table.set_width(80);
        }
    }

    fn type_column_width(&self) -> usize {
        let terminal_width = self.max_width.unwrap_or(80);
        if terminal_width < 60 {
            20
        } else if terminal_width < 100 {
            40
        } else {
            60
        }
    }

    /// Truncate text to specified width and add ellipsis
    fn truncate_text(&self, text: &str, max_width: usize) -> String {
        if text.width() <= max_width {
            return text.to_string();
        }

        let ellipsis = "...";
        if max_width <= ellipsis.len() {
            return ellipsis[..max_width].to_string();
        }

        let target_width = max_width - ellipsis.len();
        let truncated: String = text.chars().take(target_width).collect();
        format!("{}{}", truncated, ellipsis)
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::model::{
        HidingMode, LengthMode, PanelAlignment, PanelLocation, Value,
    };

    fn test_panel() -> PanelSpec {
        PanelSpec {
            location: PanelLocation::Top,
            height: 44.0,
            floating: true,
            alignment: PanelAlignment::Center,
            hiding: HidingMode::None,
            length_mode: LengthMode::Fill,
        }
    }

    #[test]
    fn test_render_panel() {
        let display = TableDisplay::new().with_max_width(100).with_colors(false);
        let rendered = display.render_panel(&test_panel()).expect("render panel");
        assert!(rendered.contains("location"));
        assert!(rendered.contains("top"));
        assert!(rendered.contains("lengthMode"));
        assert!(rendered.contains("44"));
    }

    #[test]
    fn test_render_widget_list() {
        let mut kickoff = WidgetSpec::new("org.kde.plasma.kickoff");
        kickoff
            .group_mut(&["General".to_string()])
            .entries
            .write("icon", Value::Str("arxisos-start".to_string()));
        let widgets = vec![kickoff, WidgetSpec::new("org.kde.plasma.pager")];

        let display = TableDisplay::new().with_max_width(120).with_colors(false);
        let rendered = display.render_widget_list(&widgets).expect("render widgets");
        assert!(rendered.contains("org.kde.plasma.kickoff"));
        assert!(rendered.contains("org.kde.plasma.pager"));
    }

    #[test]
    fn test_render_empty_widget_list() {
        let display = TableDisplay::new().with_colors(false);
        let rendered = display.render_widget_list(&[]).expect("render empty");
        assert_eq!(rendered, "Panel has no widgets.");
    }

    #[test]
    fn test_truncate_text() {
        let display = TableDisplay::new().with_max_width(80);
        assert_eq!(display.truncate_text("short", 10), "short");
        assert_eq!(
            display.truncate_text("org.kde.plasma.digitalclock", 15),
            "org.kde.plas..."
        );
    }
}
