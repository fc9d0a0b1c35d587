//! Layout script interpreter
//!
//! Statement-per-line recursive descent over the token stream. The parser
//! keeps a handle symbol table and a per-widget "active group" cursor; both
//! exist only during parsing and never reach the returned descriptor.
//!
//! `parse` is a pure transformation: it performs no I/O and holds no state
//! across calls.

use crate::error::ParseError;
use crate::layout::lexer::{Lexer, Token, TokenKind};
use crate::layout::model::{
    HidingMode, LayoutDescriptor, LengthMode, PanelAlignment, PanelLocation, PanelSpec, Value,
    WidgetSpec,
};
use crate::layout::units::{DEFAULT_GRID_UNIT, UnitResolver};
use std::collections::HashMap;

/// The layout interpreter. Unit constants (`gridUnit` etc.) are resolved at
/// parse time through the configured [`UnitResolver`].
pub struct Interpreter<'u> {
    units: &'u dyn UnitResolver,
}

impl<'u> Interpreter<'u> {
    pub fn new(units: &'u dyn UnitResolver) -> Self {
        Self { units }
    }

    /// Parse one layout script into a fully resolved descriptor.
    pub fn parse(&self, source: &str) -> Result<LayoutDescriptor, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(&tokens, self.units).run()
    }
}

/// What a script-level name is bound to.
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Panel,
    Widget(usize),
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    units: &'a dyn UnitResolver,
    panel: Option<PanelSpec>,
    widgets: Vec<WidgetSpec>,
    // parse-phase active group cursor per widget, never part of the output
    cursors: Vec<Option<Vec<String>>>,
    // handle display name per widget, for error reporting
    handle_names: Vec<String>,
    symbols: HashMap<String, Binding>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], units: &'a dyn UnitResolver) -> Self {
        Self {
            tokens,
            pos: 0,
            units,
            panel: None,
            widgets: Vec::new(),
            cursors: Vec::new(),
            handle_names: Vec::new(),
            symbols: HashMap::new(),
        }
    }

    fn run(mut self) -> Result<LayoutDescriptor, ParseError> {
        loop {
            self.skip_newlines();
            if self.peek() == &TokenKind::Eof {
                break;
            }
            self.parse_statement()?;
            self.expect_statement_end()?;
        }

        let line = self.line();
        let panel = self.panel.take().ok_or(ParseError::Syntax {
            message: "missing panel declaration (new Panel)".to_string(),
            line,
        })?;
        Ok(LayoutDescriptor {
            panel,
            widgets: self.widgets,
        })
    }

    // token access

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn line(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].line
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos.min(self.tokens.len() - 1)].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn skip_newlines(&mut self) {
        while self.peek() == &TokenKind::Newline {
            self.advance();
        }
    }

    fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            line: self.line(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.peek() == &kind {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax(format!("expected {}", what)))
        }
    }

    fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.syntax("expected end of statement")),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.syntax(format!("expected {}", what))),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek().clone() {
            TokenKind::Str(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.syntax(format!("expected {}", what))),
        }
    }

    fn lookup(&self, name: &str) -> Result<Binding, ParseError> {
        self.symbols
            .get(name)
            .cloned()
            .ok_or_else(|| self.syntax(format!("unknown identifier '{}'", name)))
    }

    // statements

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        match self.peek().clone() {
            TokenKind::KwVar => {
                self.advance();
                let name = self.expect_ident("a handle name after 'var'")?;
                self.expect(TokenKind::Equal, "'=' after handle name")?;
                self.parse_binding_rhs(Some(name))
            }
            TokenKind::KwNew => self.parse_new_panel(None),
            TokenKind::Ident(name) => {
                self.advance();
                match self.peek() {
                    TokenKind::Equal => {
                        // `var` is optional on rebinding, JS-style
                        self.advance();
                        self.parse_binding_rhs(Some(name))
                    }
                    TokenKind::Dot => {
                        self.advance();
                        let member = self.expect_ident("a property or method name after '.'")?;
                        match self.peek() {
                            TokenKind::Equal => {
                                self.advance();
                                self.parse_property_assignment(&name, &member)
                            }
                            TokenKind::LeftParen => self.parse_method_call(&name, &member, None),
                            _ => Err(self.syntax(format!(
                                "expected '=' or '(' after '{}.{}'",
                                name, member
                            ))),
                        }
                    }
                    _ => Err(self.syntax(format!("unexpected token after '{}'", name))),
                }
            }
            _ => Err(self.syntax("expected a statement")),
        }
    }

    fn parse_binding_rhs(&mut self, name: Option<String>) -> Result<(), ParseError> {
        match self.peek().clone() {
            TokenKind::KwNew => self.parse_new_panel(name),
            TokenKind::Ident(obj) => {
                self.advance();
                self.expect(TokenKind::Dot, "'.' after object name")?;
                let method = self.expect_ident("a method name")?;
                self.parse_method_call(&obj, &method, name)
            }
            _ => Err(self.syntax("expected 'new Panel' or a method call")),
        }
    }

    fn parse_new_panel(&mut self, name: Option<String>) -> Result<(), ParseError> {
        self.expect(TokenKind::KwNew, "'new'")?;
        let class = self.expect_ident("a type name after 'new'")?;
        if class != "Panel" {
            return Err(self.syntax(format!("unknown type '{}'", class)));
        }
        if self.panel.is_some() {
            return Err(self.syntax("multiple panel declarations"));
        }

        let grid_unit = self.units.resolve("gridUnit").unwrap_or(DEFAULT_GRID_UNIT);
        self.panel = Some(PanelSpec::with_grid_unit(grid_unit));
        if let Some(name) = name {
            self.symbols.insert(name, Binding::Panel);
        }
        Ok(())
    }

    fn parse_method_call(
        &mut self,
        obj: &str,
        method: &str,
        binding: Option<String>,
    ) -> Result<(), ParseError> {
        let target = self.lookup(obj)?;
        match (target, method) {
            (Binding::Panel, "addWidget") => self.parse_add_widget(binding),
            (Binding::Widget(idx), "writeConfig") => {
                if binding.is_some() {
                    return Err(self.syntax("writeConfig does not return a handle"));
                }
                self.parse_write_config(idx)
            }
            (Binding::Widget(_), "addWidget") => {
                Err(self.syntax("addWidget is only valid on the panel"))
            }
            (Binding::Panel, "writeConfig") => {
                Err(self.syntax("writeConfig is only valid on a widget handle"))
            }
            (_, other) => Err(self.syntax(format!("unknown method '{}'", other))),
        }
    }

    fn parse_add_widget(&mut self, binding: Option<String>) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftParen, "'(' after addWidget")?;
        let type_id = self.expect_string("a quoted widget type id")?;
        self.expect(TokenKind::RightParen, "')' after widget type id")?;

        let idx = self.widgets.len();
        self.widgets.push(WidgetSpec::new(type_id.clone()));
        self.cursors.push(None);
        self.handle_names
            .push(binding.clone().unwrap_or(type_id));
        if let Some(name) = binding {
            self.symbols.insert(name, Binding::Widget(idx));
        }
        Ok(())
    }

    fn parse_write_config(&mut self, idx: usize) -> Result<(), ParseError> {
        let line = self.line();
        self.expect(TokenKind::LeftParen, "'(' after writeConfig")?;
        let key = self.expect_string("a quoted config key")?;
        self.expect(TokenKind::Comma, "',' between key and value")?;
        let value = self.parse_value()?;
        self.expect(TokenKind::RightParen, "')' after config value")?;

        let path = self.cursors[idx]
            .clone()
            .ok_or_else(|| ParseError::NoActiveGroup {
                handle: self.handle_names[idx].clone(),
                line,
            })?;
        self.widgets[idx].group_mut(&path).entries.write(&key, value);
        Ok(())
    }

    fn parse_property_assignment(&mut self, obj: &str, member: &str) -> Result<(), ParseError> {
        match self.lookup(obj)? {
            Binding::Panel => self.parse_panel_property(member),
            Binding::Widget(idx) => {
                if member == "currentConfigGroup" {
                    let path = self.parse_group_path()?;
                    self.cursors[idx] = Some(path);
                    Ok(())
                } else {
                    Err(ParseError::UnknownProperty {
                        field: member.to_string(),
                        line: self.line(),
                    })
                }
            }
        }
    }

    /// Fixed schema of panel properties; anything outside it is rejected
    /// rather than stored as an open-ended attribute.
    fn parse_panel_property(&mut self, field: &str) -> Result<(), ParseError> {
        let line = self.line();
        match field {
            "location" => {
                let value = self.parse_enum_value(field)?;
                let location = PanelLocation::from_value(&value).ok_or_else(|| {
                    ParseError::InvalidValue {
                        field: field.to_string(),
                        value,
                        line,
                    }
                })?;
                self.panel_mut()?.location = location;
            }
            "alignment" => {
                let value = self.parse_enum_value(field)?;
                let alignment = PanelAlignment::from_value(&value).ok_or_else(|| {
                    ParseError::InvalidValue {
                        field: field.to_string(),
                        value,
                        line,
                    }
                })?;
                self.panel_mut()?.alignment = alignment;
            }
            "hiding" => {
                let value = self.parse_enum_value(field)?;
                let hiding =
                    HidingMode::from_value(&value).ok_or_else(|| ParseError::InvalidValue {
                        field: field.to_string(),
                        value,
                        line,
                    })?;
                self.panel_mut()?.hiding = hiding;
            }
            "lengthMode" => {
                let value = self.parse_enum_value(field)?;
                let mode =
                    LengthMode::from_value(&value).ok_or_else(|| ParseError::InvalidValue {
                        field: field.to_string(),
                        value,
                        line,
                    })?;
                self.panel_mut()?.length_mode = mode;
            }
            "height" => {
                let height = match self.parse_value()? {
                    Value::Number(n) => n,
                    other => {
                        return Err(ParseError::InvalidValue {
                            field: field.to_string(),
                            value: other.to_string(),
                            line,
                        });
                    }
                };
                self.panel_mut()?.height = height;
            }
            "floating" => {
                let floating = match self.parse_value()? {
                    Value::Bool(b) => b,
                    other => {
                        return Err(ParseError::InvalidValue {
                            field: field.to_string(),
                            value: other.to_string(),
                            line,
                        });
                    }
                };
                self.panel_mut()?.floating = floating;
            }
            _ => {
                return Err(ParseError::UnknownProperty {
                    field: field.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    fn panel_mut(&mut self) -> Result<&mut PanelSpec, ParseError> {
        let line = self.line();
        self.panel.as_mut().ok_or(ParseError::Syntax {
            message: "panel property set before 'new Panel'".to_string(),
            line,
        })
    }

    /// Enumerated panel properties take a quoted string; any other literal is
    /// reported as out of domain, not as a syntax error.
    fn parse_enum_value(&mut self, field: &str) -> Result<String, ParseError> {
        let line = self.line();
        match self.parse_value()? {
            Value::Str(s) => Ok(s),
            other => Err(ParseError::InvalidValue {
                field: field.to_string(),
                value: other.to_string(),
                line,
            }),
        }
    }

    /// `["General"]`, `["plasma", "org.kde"]`, or `[]` for the root group.
    fn parse_group_path(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::LeftBracket, "'[' to open a group path")?;
        let mut path = Vec::new();
        if self.peek() == &TokenKind::RightBracket {
            self.advance();
            return Ok(path);
        }
        loop {
            path.push(self.expect_string("a quoted group name")?);
            match self.advance() {
                TokenKind::Comma => continue,
                TokenKind::RightBracket => return Ok(path),
                _ => return Err(self.syntax("expected ',' or ']' in group path")),
            }
        }
    }

    // values and numeric expressions

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek().clone() {
            TokenKind::Str(s) => {
                self.advance();
                Ok(Value::Str(s))
            }
            TokenKind::True => {
                self.advance();
                Ok(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Value::Bool(false))
            }
            TokenKind::Number(_)
            | TokenKind::Ident(_)
            | TokenKind::Minus
            | TokenKind::LeftParen => Ok(Value::Number(self.parse_expr()?)),
            _ => Err(self.syntax("expected a value")),
        }
    }

    fn parse_expr(&mut self) -> Result<f64, ParseError> {
        let mut value = self.parse_term()?;
        loop {
            match self.peek() {
                TokenKind::Plus => {
                    self.advance();
                    value += self.parse_term()?;
                }
                TokenKind::Minus => {
                    self.advance();
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64, ParseError> {
        let mut value = self.parse_factor()?;
        loop {
            match self.peek() {
                TokenKind::Star => {
                    self.advance();
                    value *= self.parse_factor()?;
                }
                TokenKind::Slash => {
                    self.advance();
                    value /= self.parse_factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_factor(&mut self) -> Result<f64, ParseError> {
        let line = self.line();
        match self.peek().clone() {
            TokenKind::Minus => {
                self.advance();
                Ok(-self.parse_factor()?)
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(n)
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.units
                    .resolve(&name)
                    .ok_or(ParseError::UnresolvedUnit { name, line })
            }
            TokenKind::LeftParen => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "')' to close the expression")?;
                Ok(value)
            }
            _ => Err(self.syntax("expected a numeric expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::units::Units;

    fn parse(source: &str) -> Result<LayoutDescriptor, ParseError> {
        let units = Units::with_grid_unit(22.0);
        Interpreter::new(&units).parse(source)
    }

    const EXAMPLE: &str = r#"
// Default desktop layout
var panel = new Panel
panel.location = "top"
panel.height = 2 * gridUnit
panel.floating = true
panel.alignment = "center"
panel.hiding = "none"
panel.lengthMode = "fill"

var kickoff = panel.addWidget("org.kde.plasma.kickoff")
kickoff.currentConfigGroup = ["Shortcuts"]
kickoff.writeConfig("global", "Alt+F1")
kickoff.currentConfigGroup = ["General"]
kickoff.writeConfig("icon", "arxisos-start")
kickoff.writeConfig("favoritesPortedToKAstats", true)

panel.addWidget("org.kde.plasma.pager")

var taskManager = panel.addWidget("org.kde.plasma.taskmanager")
taskManager.currentConfigGroup = ["General"]
taskManager.writeConfig("launchers", "")

var clock = panel.addWidget("org.kde.plasma.digitalclock")
clock.currentConfigGroup = ["Appearance"]
clock.writeConfig("showDate", true)
"#;

    #[test]
    fn test_worked_example() {
        let descriptor = parse(EXAMPLE).expect("parse example layout");

        assert_eq!(descriptor.panel.location, PanelLocation::Top);
        assert_eq!(descriptor.panel.height, 44.0);
        assert!(descriptor.panel.floating);
        assert_eq!(descriptor.panel.hiding, HidingMode::None);
        assert_eq!(descriptor.panel.length_mode, LengthMode::Fill);

        assert_eq!(descriptor.widgets.len(), 4);
        assert_eq!(descriptor.widgets[0].type_id, "org.kde.plasma.kickoff");
        let general = descriptor.widgets[0]
            .group(&["General".to_string()])
            .expect("General group");
        assert_eq!(
            general.entries.get("icon"),
            Some(&Value::Str("arxisos-start".to_string()))
        );
        assert_eq!(
            general.entries.get("favoritesPortedToKAstats"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_widget_order_matches_add_widget_order() {
        let descriptor = parse(EXAMPLE).expect("parse example layout");
        let types: Vec<&str> = descriptor
            .widgets
            .iter()
            .map(|w| w.type_id.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "org.kde.plasma.kickoff",
                "org.kde.plasma.pager",
                "org.kde.plasma.taskmanager",
                "org.kde.plasma.digitalclock",
            ]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let descriptor = parse(
            r#"
var panel = new Panel
var w = panel.addWidget("org.kde.plasma.kickoff")
w.currentConfigGroup = ["General"]
w.writeConfig("icon", "first")
w.writeConfig("icon", "second")
"#,
        )
        .expect("parse");
        let group = descriptor.widgets[0]
            .group(&["General".to_string()])
            .expect("group");
        assert_eq!(group.entries.len(), 1);
        assert_eq!(
            group.entries.get("icon"),
            Some(&Value::Str("second".to_string()))
        );
    }

    #[test]
    fn test_write_config_before_group_is_error() {
        let result = parse(
            r#"
var panel = new Panel
var w = panel.addWidget("org.kde.plasma.kickoff")
w.writeConfig("icon", "x")
"#,
        );
        match result {
            Err(ParseError::NoActiveGroup { handle, line }) => {
                assert_eq!(handle, "w");
                assert_eq!(line, 4);
            }
            other => panic!("expected NoActiveGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_panel_property() {
        let result = parse("var panel = new Panel\npanel.rotation = 90");
        match result {
            Err(ParseError::UnknownProperty { field, line }) => {
                assert_eq!(field, "rotation");
                assert_eq!(line, 2);
            }
            other => panic!("expected UnknownProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_enum_value() {
        let result = parse("var panel = new Panel\npanel.location = \"middle\"");
        match result {
            Err(ParseError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "location");
                assert_eq!(value, "middle");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_value_for_enum_property() {
        let result = parse("var panel = new Panel\npanel.location = 90");
        assert!(matches!(
            result,
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unresolved_unit() {
        let result = parse("var panel = new Panel\npanel.height = 2 * megaUnit");
        match result {
            Err(ParseError::UnresolvedUnit { name, line }) => {
                assert_eq!(name, "megaUnit");
                assert_eq!(line, 2);
            }
            other => panic!("expected UnresolvedUnit, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_expression_arithmetic() {
        let descriptor =
            parse("var panel = new Panel\npanel.height = gridUnit * 2 + smallSpacing").expect("parse");
        // gridUnit 22, smallSpacing default 4
        assert_eq!(descriptor.panel.height, 48.0);
    }

    #[test]
    fn test_closure_resolver_is_accepted() {
        let resolver = |name: &str| (name == "gridUnit").then_some(10.0);
        let descriptor = Interpreter::new(&resolver)
            .parse("var panel = new Panel\npanel.height = 3 * gridUnit")
            .expect("parse");
        assert_eq!(descriptor.panel.height, 30.0);
    }

    #[test]
    fn test_missing_panel_declaration() {
        assert!(matches!(parse(""), Err(ParseError::Syntax { .. })));
        assert!(matches!(
            parse("// just a comment\n"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_multiple_panels_rejected() {
        let result = parse("var a = new Panel\nvar b = new Panel");
        match result {
            Err(ParseError::Syntax { message, line }) => {
                assert_eq!(message, "multiple panel declarations");
                assert_eq!(line, 2);
            }
            other => panic!("expected Syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let result = parse("var panel = new Panel\nghost.writeConfig(\"a\", 1)");
        assert!(matches!(result, Err(ParseError::Syntax { line: 2, .. })));
    }

    #[test]
    fn test_add_widget_on_widget_rejected() {
        let result = parse(
            "var panel = new Panel\nvar w = panel.addWidget(\"a\")\nw.addWidget(\"b\")",
        );
        assert!(matches!(result, Err(ParseError::Syntax { line: 3, .. })));
    }

    #[test]
    fn test_empty_group_path_is_root() {
        let descriptor = parse(
            r#"
var panel = new Panel
var w = panel.addWidget("org.kde.plasma.pager")
w.currentConfigGroup = []
w.writeConfig("enabled", true)
"#,
        )
        .expect("parse");
        let root = descriptor.widgets[0].group(&[]).expect("root group");
        assert_eq!(root.entries.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_defaults_applied_for_unset_properties() {
        let descriptor = parse("var panel = new Panel").expect("parse");
        assert_eq!(descriptor.panel.location, PanelLocation::Bottom);
        assert_eq!(descriptor.panel.alignment, PanelAlignment::Center);
        assert_eq!(descriptor.panel.height, 44.0); // 2 * gridUnit(22)
        assert!(!descriptor.panel.floating);
        assert!(descriptor.widgets.is_empty());
    }

    #[test]
    fn test_anonymous_panel_and_widget() {
        // the panel handle is optional; widgets can be added without binding
        let units = Units::default();
        let descriptor = Interpreter::new(&units)
            .parse("var p = new Panel\np.addWidget(\"org.kde.plasma.systemtray\")")
            .expect("parse");
        assert_eq!(descriptor.widgets.len(), 1);
    }

    #[test]
    fn test_nested_group_path() {
        let descriptor = parse(
            r#"
var panel = new Panel
var w = panel.addWidget("org.kde.plasma.systemtray")
w.currentConfigGroup = ["Containments", "General"]
w.writeConfig("shownItems", "battery")
"#,
        )
        .expect("parse");
        let group = &descriptor.widgets[0].config_groups[0];
        assert_eq!(group.path, vec!["Containments".to_string(), "General".to_string()]);
    }

    #[test]
    fn test_height_rejects_string() {
        let result = parse("var panel = new Panel\npanel.height = \"tall\"");
        match result {
            Err(ParseError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "height");
                assert_eq!(value, "tall");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}
