//! Parser for the JavaScript data files Doxygen writes.
//!
//! Only the subset those files use is accepted: a sequence of
//! `var NAME = <literal>;` statements with comments in between. Literals
//! are arrays, objects (bare or quoted keys), strings in either quote
//! style, numbers, `true`, `false` and `null`. Trailing commas are allowed.

use serde_json::{Map, Number, Value};

/// Maximum nesting of arrays and objects in one literal.
///
/// A navigation tree level takes two levels of nesting, so this admits trees
/// 128 levels deep.
pub const MAX_NESTING: usize = 256;

/// Error returned when a data file is not a valid literal script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based column of the offending character.
    pub column: usize,
    /// What was expected or found.
    pub message: String,
}

/// Variable bindings of a parsed script, in source order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Script {
    bindings: Vec<(String, Value)>,
}

impl Script {
    /// Value bound to `name`. The last binding wins when a name repeats.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Value of the first binding.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.bindings.first().map(|(_, v)| v)
    }

    /// Bound names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(n, _)| n.as_str())
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the script binds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Parse a script of `var NAME = <literal>;` statements.
pub fn parse_script(src: &str) -> Result<Script, ParseError> {
    Parser::new(src).script()
}

/// Parse a single literal, e.g. `[ "Home", "index.html", null ]`.
pub fn parse_value(src: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(src);
    let value = parser.value()?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open arrays and objects.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{expected}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{expected}`, found end of input"))),
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                let end = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += end;
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                let Some(end) = body.find("*/") else {
                    return Err(self.error("unterminated comment"));
                };
                self.pos += 2 + end + 2;
            } else {
                return Ok(());
            }
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_ident_start(c) => {}
            _ => return None,
        }
        let end = chars
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Some(&rest[..end])
    }

    fn script(mut self) -> Result<Script, ParseError> {
        let mut bindings = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => break,
                Some(';') => {
                    self.bump();
                    continue;
                }
                Some(_) => {}
            }

            let start = self.pos;
            let keyword = self
                .ident()
                .ok_or_else(|| self.error("expected variable declaration"))?;
            if !matches!(keyword, "var" | "let" | "const") {
                return Err(self.error_at(start, format!("unsupported statement `{keyword}`")));
            }

            self.skip_trivia()?;
            let name = self
                .ident()
                .ok_or_else(|| self.error("expected variable name"))?
                .to_owned();
            self.skip_trivia()?;
            self.expect('=')?;
            let value = self.value()?;
            self.skip_trivia()?;
            if self.peek() == Some(';') {
                self.bump();
            }

            bindings.push((name, value));
        }

        Ok(Script { bindings })
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(open @ ('[' | '{')) => {
                if self.depth >= MAX_NESTING {
                    return Err(self.error(format!(
                        "nesting exceeds maximum depth of {MAX_NESTING}"
                    )));
                }
                self.depth += 1;
                let value = if open == '[' {
                    self.array()
                } else {
                    self.object()
                };
                self.depth -= 1;
                value
            }
            Some(quote @ ('"' | '\'')) => self.string(quote).map(Value::String),
            Some(c) if c == '-' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                match self.ident() {
                    Some("null") => Ok(Value::Null),
                    Some("true") => Ok(Value::Bool(true)),
                    Some("false") => Ok(Value::Bool(false)),
                    Some(other) => {
                        Err(self.error_at(start, format!("unexpected identifier `{other}`")))
                    }
                    None => Err(self.error_at(start, "expected a value")),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character `{c}`"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                break;
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("expected `,` or `]`")),
            }
        }

        Ok(Value::Array(items))
    }

    fn object(&mut self) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(quote @ ('"' | '\'')) => self.string(quote)?,
                Some(c) if c.is_ascii_digit() => self.number()?.to_string(),
                Some(_) => self
                    .ident()
                    .ok_or_else(|| self.error("expected property name"))?
                    .to_owned(),
                None => return Err(self.error("unterminated object")),
            };
            self.skip_trivia()?;
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("expected `,` or `}`")),
            }
        }

        Ok(Value::Object(map))
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error_at(start, "unterminated string")),
                Some(c) if c == quote => break,
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }

        Ok(out)
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let start = self.pos - 1;
        match self.bump() {
            None => return Err(self.error_at(start, "unterminated escape sequence")),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            // Line continuation
            Some('\n') => {}
            Some('\r') => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            Some('x') => {
                let code = self.hex(2)?;
                out.push(char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid escape"))?);
            }
            Some('u') => {
                let mut code = self.hex(4)?;
                if (0xD800..0xDC00).contains(&code) {
                    if !self.rest().starts_with("\\u") {
                        return Err(self.error_at(start, "unpaired surrogate in unicode escape"));
                    }
                    self.pos += 2;
                    let low = self.hex(4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error_at(start, "invalid low surrogate in unicode escape"));
                    }
                    code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                }
                out.push(
                    char::from_u32(code)
                        .ok_or_else(|| self.error_at(start, "invalid unicode escape"))?,
                );
            }
            Some(c) => out.push(c),
        }
        Ok(())
    }

    fn hex(&mut self, digits: usize) -> Result<u32, ParseError> {
        let mut code = 0;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("expected hexadecimal digit"))?;
            self.bump();
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
            .unwrap_or(rest.len());
        let text = &rest[..end];
        self.pos += end;

        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error_at(start, format!("invalid number `{text}`")))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_navtree_entry() {
        let value = parse_value(r#"[ "Welcome!", "index.html#home_welcome", null ]"#).unwrap();

        assert_eq!(value, json!(["Welcome!", "index.html#home_welcome", null]));
    }

    #[test]
    fn test_parse_script_bindings_in_order() {
        let script = parse_script(
            r"var A = [1, 2];
let B = 'two';
const C = {x: true};",
        )
        .unwrap();

        let names: Vec<_> = script.names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(script.get("A"), Some(&json!([1, 2])));
        assert_eq!(script.get("B"), Some(&json!("two")));
        assert_eq!(script.get("C"), Some(&json!({"x": true})));
        assert_eq!(script.first(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = parse_script(
            "/*\n @licstart license\n*/\n// generated\nvar X = /* inline */ null; // done\n",
        )
        .unwrap();

        assert_eq!(script.len(), 1);
        assert_eq!(script.get("X"), Some(&Value::Null));
    }

    #[test]
    fn test_parse_script_semicolon_optional() {
        let script = parse_script("var A = 1\nvar B = 2").unwrap();

        assert_eq!(script.get("B"), Some(&json!(2)));
    }

    #[test]
    fn test_parse_script_last_binding_wins() {
        let script = parse_script("var A = 1; var A = 2;").unwrap();

        assert_eq!(script.get("A"), Some(&json!(2)));
    }

    #[test]
    fn test_parse_object_with_bare_and_quoted_keys() {
        let value = parse_value(r#"{text:"Install",'url':"saa_installation.html","children":[]}"#)
            .unwrap();

        assert_eq!(
            value,
            json!({"text": "Install", "url": "saa_installation.html", "children": []})
        );
    }

    #[test]
    fn test_parse_trailing_commas() {
        let value = parse_value("[1, [2,], {a: 3,},]").unwrap();

        assert_eq!(value, json!([1, [2], {"a": 3}]));
    }

    #[test]
    fn test_parse_string_escapes() {
        let value = parse_value(r#""a\"b\'c\\d\/e\n\t\x41é😀""#).unwrap();

        assert_eq!(value, json!("a\"b'c\\d/e\n\tA\u{e9}\u{1F600}"));
    }

    #[test]
    fn test_parse_line_continuation() {
        let value = parse_value("['Random \\\nWalks', 'Emulator \\\r\nmanual']").unwrap();

        assert_eq!(value, json!(["Random Walks", "Emulator manual"]));
    }

    #[test]
    fn test_parse_single_quoted_string_with_double_quotes() {
        let value = parse_value(r#"'say "hi"'"#).unwrap();

        assert_eq!(value, json!("say \"hi\""));
    }

    #[test]
    fn test_parse_numbers() {
        let value = parse_value("[0, -3, 2.5, 1e3]").unwrap();

        assert_eq!(value, json!([0, -3, 2.5, 1000.0]));
    }

    #[test]
    fn test_parse_unicode_labels() {
        let value = parse_value(r#"[ "Théorie — définitions", null, null ]"#).unwrap();

        assert_eq!(value[0], "Théorie — définitions");
    }

    #[test]
    fn test_error_unterminated_string_reports_position() {
        let err = parse_script("var A =\n  [ \"open, null ];").unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn test_error_missing_separator() {
        let err = parse_value(r#"[ "a" "b" ]"#).unwrap_err();

        assert_eq!(err.to_string(), "line 1, column 7: expected `,` or `]`");
    }

    #[test]
    fn test_error_unsupported_statement() {
        let err = parse_script("function f() {}").unwrap_err();

        assert_eq!(err.message, "unsupported statement `function`");
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_error_unknown_identifier_value() {
        let err = parse_script("var A = undefined;").unwrap_err();

        assert_eq!(err.message, "unexpected identifier `undefined`");
    }

    #[test]
    fn test_error_unterminated_comment() {
        let err = parse_script("/* never closed").unwrap_err();

        assert_eq!(err.message, "unterminated comment");
    }

    #[test]
    fn test_error_trailing_input() {
        let err = parse_value("[] []").unwrap_err();

        assert_eq!(err.message, "unexpected trailing input");
    }

    #[test]
    fn test_empty_script() {
        let script = parse_script("  \n// nothing\n").unwrap();

        assert!(script.is_empty());
        assert!(script.first().is_none());
    }

    #[test]
    fn test_parse_nesting_at_limit() {
        let src = format!("{}{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));

        assert!(parse_value(&src).is_ok());
    }

    #[test]
    fn test_error_nesting_too_deep() {
        let depth = 3000;
        let src = format!("var NAVTREE = {}{};", "[".repeat(depth), "]".repeat(depth));

        let err = parse_script(&src).unwrap_err();

        assert_eq!(err.line, 1);
        assert_eq!(err.column, 15 + MAX_NESTING);
        assert_eq!(err.message, "nesting exceeds maximum depth of 256");
    }

    #[test]
    fn test_error_nesting_too_deep_in_objects() {
        let depth = MAX_NESTING + 1;
        let src = format!("{}1{}", "{a: ".repeat(depth), "}".repeat(depth));

        let err = parse_value(&src).unwrap_err();

        assert!(err.message.starts_with("nesting exceeds maximum depth"));
    }
}
