//! Canonical script rendering
//!
//! Renders a descriptor back to the declarative script style, deterministic
//! enough for round-trip testing: panel properties in fixed order, widgets in
//! sequence order, groups and entries in insertion order.

use crate::layout::model::{LayoutDescriptor, Value, WidgetSpec, format_number};

/// Render the descriptor as canonical layout script text.
pub fn render(descriptor: &LayoutDescriptor) -> String {
    let mut out = String::new();

    out.push_str("var panel = new Panel\n");
    let panel = &descriptor.panel;
    out.push_str(&format!("panel.location = {}\n", quote(panel.location.as_str())));
    out.push_str(&format!("panel.height = {}\n", format_number(panel.height)));
    out.push_str(&format!("panel.floating = {}\n", panel.floating));
    out.push_str(&format!(
        "panel.alignment = {}\n",
        quote(panel.alignment.as_str())
    ));
    out.push_str(&format!("panel.hiding = {}\n", quote(panel.hiding.as_str())));
    out.push_str(&format!(
        "panel.lengthMode = {}\n",
        quote(panel.length_mode.as_str())
    ));

    for (idx, widget) in descriptor.widgets.iter().enumerate() {
        out.push('\n');
        render_widget(&mut out, idx, widget);
    }

    out
}

fn render_widget(out: &mut String, idx: usize, widget: &WidgetSpec) {
    if widget.config_groups.is_empty() {
        out.push_str(&format!("panel.addWidget({})\n", quote(&widget.type_id)));
        return;
    }

    let handle = format!("widget{}", idx);
    out.push_str(&format!(
        "var {} = panel.addWidget({})\n",
        handle,
        quote(&widget.type_id)
    ));
    for group in &widget.config_groups {
        let path = group
            .path
            .iter()
            .map(|s| quote(s))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("{}.currentConfigGroup = [{}]\n", handle, path));
        for (key, value) in group.entries.iter() {
            out.push_str(&format!(
                "{}.writeConfig({}, {})\n",
                handle,
                quote(key),
                literal(value)
            ));
        }
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Str(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::parser::Interpreter;
    use crate::layout::units::Units;

    const EXAMPLE: &str = r#"
var panel = new Panel
panel.location = "top"
panel.height = 2 * gridUnit
panel.floating = true

var kickoff = panel.addWidget("org.kde.plasma.kickoff")
kickoff.currentConfigGroup = ["Shortcuts"]
kickoff.writeConfig("global", "Alt+F1")
kickoff.currentConfigGroup = ["General"]
kickoff.writeConfig("icon", "arxisos-start")
kickoff.writeConfig("favoritesPortedToKAstats", true)

panel.addWidget("org.kde.plasma.pager")

var clock = panel.addWidget("org.kde.plasma.digitalclock")
clock.currentConfigGroup = ["Appearance"]
clock.writeConfig("showDate", true)
"#;

    #[test]
    fn test_round_trip_idempotence() {
        let units = Units::with_grid_unit(22.0);
        let interpreter = Interpreter::new(&units);
        let descriptor = interpreter.parse(EXAMPLE).expect("parse example");

        let rendered = render(&descriptor);
        let reparsed = interpreter.parse(&rendered).expect("reparse rendered script");
        assert_eq!(reparsed, descriptor);

        // canonical output is a fixed point
        assert_eq!(render(&reparsed), rendered);
    }

    #[test]
    fn test_rendered_script_shape() {
        let units = Units::with_grid_unit(22.0);
        let descriptor = Interpreter::new(&units).parse(EXAMPLE).expect("parse");
        let rendered = render(&descriptor);

        assert!(rendered.starts_with("var panel = new Panel\n"));
        // resolved at parse time, rendered as a plain number
        assert!(rendered.contains("panel.height = 44\n"));
        assert!(rendered.contains("panel.location = \"top\"\n"));
        // widget without config stays a bare addWidget call
        assert!(rendered.contains("panel.addWidget(\"org.kde.plasma.pager\")\n"));
        assert!(rendered.contains("widget0.writeConfig(\"icon\", \"arxisos-start\")\n"));
        assert!(rendered.contains("widget0.writeConfig(\"favoritesPortedToKAstats\", true)\n"));
    }

    #[test]
    fn test_group_order_preserved() {
        let units = Units::default();
        let descriptor = Interpreter::new(&units).parse(EXAMPLE).expect("parse");
        let rendered = render(&descriptor);
        let shortcuts = rendered.find("[\"Shortcuts\"]").expect("Shortcuts group");
        let general = rendered.find("[\"General\"]").expect("General group");
        assert!(shortcuts < general);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_fractional_height_survives() {
        let units = Units::with_grid_unit(22.5);
        let interpreter = Interpreter::new(&units);
        let descriptor = interpreter
            .parse("var panel = new Panel\npanel.height = gridUnit")
            .expect("parse");
        let rendered = render(&descriptor);
        assert!(rendered.contains("panel.height = 22.5\n"));
        let reparsed = interpreter.parse(&rendered).expect("reparse");
        assert_eq!(reparsed.panel.height, 22.5);
    }
}
