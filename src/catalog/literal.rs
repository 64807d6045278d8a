//! Parser for the cast/crew columns of the credits file
//!
//! Those columns hold lists of dictionaries written in Python literal syntax:
//!
//! ```text
//! [{'cast_id': 14, 'character': 'Woody (voice)', 'name': 'Tom Hanks', 'profile_path': None}]
//! ```
//!
//! Strings may use either quote style (`"Bill O'Reilly"`), and values can be
//! numbers, `None`, `True`/`False`, or nested lists/dicts. The parser accepts
//! that grammar and nothing else; no code is ever evaluated.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::models::{CastMember, CrewMember};

/// Deepest list/dict nesting accepted before the input is rejected
const MAX_DEPTH: usize = 64;

/// Error raised for malformed literals
#[derive(Debug, Error, PartialEq)]
#[error("invalid literal at byte {position}: {message}")]
pub struct LiteralError {
    pub position: usize,
    pub message: String,
}

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Dict(BTreeMap<String, Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parses a complete literal; trailing input other than whitespace is an error
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.chars.peek().copied() {
        None => Ok(value),
        Some((pos, _)) => Err(parser.error_at(pos, "unexpected trailing input")),
    }
}

/// Parses a cast column into cast members
///
/// Blank input is an empty cast. Entries without a `name` are skipped.
pub fn parse_cast(input: &str) -> Result<Vec<CastMember>, LiteralError> {
    Ok(dict_entries(input)?
        .into_iter()
        .filter_map(|entry| {
            let name = string_field(&entry, "name")?;
            Some(CastMember {
                name,
                character: string_field(&entry, "character").unwrap_or_default(),
            })
        })
        .collect())
}

/// Parses a crew column into crew members
pub fn parse_crew(input: &str) -> Result<Vec<CrewMember>, LiteralError> {
    Ok(dict_entries(input)?
        .into_iter()
        .filter_map(|entry| {
            let name = string_field(&entry, "name")?;
            Some(CrewMember {
                name,
                job: string_field(&entry, "job").unwrap_or_default(),
                department: string_field(&entry, "department").unwrap_or_default(),
            })
        })
        .collect())
}

fn dict_entries(input: &str) -> Result<Vec<BTreeMap<String, Literal>>, LiteralError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    match parse(input)? {
        Literal::List(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Literal::Dict(map) => Some(map),
                _ => None,
            })
            .collect()),
        _ => Err(LiteralError {
            position: 0,
            message: "expected a list".to_string(),
        }),
    }
}

fn string_field(entry: &BTreeMap<String, Literal>, key: &str) -> Option<String> {
    entry.get(key).and_then(Literal::as_str).map(str::to_string)
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error_at(&self, position: usize, message: &str) -> LiteralError {
        LiteralError {
            position,
            message: message.to_string(),
        }
    }

    fn eof(&self) -> LiteralError {
        self.error_at(self.input.len(), "unexpected end of input")
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, _)) => Err(self.error_at(pos, &format!("expected '{}'", expected))),
            None => Err(self.eof()),
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_whitespace();
        let (pos, c) = self.chars.peek().copied().ok_or_else(|| self.eof())?;
        match c {
            '[' => self.nested(pos, |p| p.sequence('[', ']')).map(Literal::List),
            '(' => self.nested(pos, |p| p.sequence('(', ')')).map(Literal::List),
            '{' => self.nested(pos, Self::dict),
            '\'' | '"' => self.string().map(Literal::Str),
            '-' | '+' | '0'..='9' | '.' => self.number(),
            c if c.is_alphabetic() => self.keyword(),
            _ => Err(self.error_at(pos, "unexpected character")),
        }
    }

    fn nested<T>(
        &mut self,
        position: usize,
        parse: impl FnOnce(&mut Self) -> Result<T, LiteralError>,
    ) -> Result<T, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at(position, "nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Literal>, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if matches!(self.chars.peek(), Some(&(_, c)) if c == close) {
                self.chars.next();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, c)) if c == close => return Ok(items),
                Some((pos, _)) => return Err(self.error_at(pos, "expected ',' or closing bracket")),
                None => return Err(self.eof()),
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut map = BTreeMap::new();
        loop {
            self.skip_whitespace();
            if matches!(self.chars.peek(), Some((_, '}'))) {
                self.chars.next();
                return Ok(Literal::Dict(map));
            }
            let key_pos = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
            let key = match self.value()? {
                Literal::Str(s) => s,
                Literal::Int(i) => i.to_string(),
                _ => return Err(self.error_at(key_pos, "unsupported dictionary key")),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, '}')) => return Ok(Literal::Dict(map)),
                Some((pos, _)) => return Err(self.error_at(pos, "expected ',' or '}'")),
                None => return Err(self.eof()),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let (_, quote) = self.chars.next().ok_or_else(|| self.eof())?;
        let mut out = String::new();
        loop {
            let (pos, c) = self.chars.next().ok_or_else(|| self.eof())?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let (_, escaped) = self.chars.next().ok_or_else(|| self.eof())?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        'x' => out.push(self.hex_escape(pos, 2)?),
                        'u' => out.push(self.hex_escape(pos, 4)?),
                        'U' => out.push(self.hex_escape(pos, 8)?),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, start: usize, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let (_, c) = self.chars.next().ok_or_else(|| self.eof())?;
            let digit = c
                .to_digit(16)
                .ok_or_else(|| self.error_at(start, "invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid code point"))
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.input[start..end];
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Literal::Int(i));
        }
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| self.error_at(start, "invalid number"))
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        match &self.input[start..end] {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "nan" | "NaN" => Ok(Literal::Float(f64::NAN)),
            _ => Err(self.error_at(start, "unknown identifier")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cast_list() {
        let raw = "[{'cast_id': 14, 'character': 'Woody (voice)', 'credit_id': '52fe4284c3a36847f8024f95', \
                   'gender': 2, 'id': 31, 'name': 'Tom Hanks', 'order': 0, 'profile_path': '/pQFoyx7rp09CJTAb932F2g8Nlho.jpg'}, \
                   {'cast_id': 15, 'character': 'Buzz Lightyear (voice)', 'name': 'Tim Allen', 'profile_path': None}]";

        let cast = parse_cast(raw).unwrap();
        assert_eq!(cast.len(), 2);
        assert_eq!(cast[0].name, "Tom Hanks");
        assert_eq!(cast[0].character, "Woody (voice)");
        assert_eq!(cast[1].name, "Tim Allen");
    }

    #[test]
    fn test_parse_crew_with_double_quoted_names() {
        let raw = r#"[{'department': 'Directing', 'job': 'Director', 'name': "Conan O'Brien"}, {'job': 'Editor', 'name': 'Lee Unkrich'}]"#;

        let crew = parse_crew(raw).unwrap();
        assert_eq!(crew.len(), 2);
        assert_eq!(crew[0].name, "Conan O'Brien");
        assert!(crew[0].is_director());
        assert_eq!(crew[1].department, "");
    }

    #[test]
    fn test_escapes_inside_strings() {
        let value = parse(r"'It\'s ét\xe9\n'").unwrap();
        assert_eq!(value, Literal::Str("It's été\n".to_string()));
    }

    #[test]
    fn test_nested_values_and_scalars() {
        let value = parse("{'a': [1, -2.5, (True, False)], 'b': None, 'c': {}}").unwrap();
        let Literal::Dict(map) = value else {
            panic!("expected a dict");
        };
        assert_eq!(
            map["a"],
            Literal::List(vec![
                Literal::Int(1),
                Literal::Float(-2.5),
                Literal::List(vec![Literal::Bool(true), Literal::Bool(false)]),
            ])
        );
        assert_eq!(map["b"], Literal::None);
        assert_eq!(map["c"], Literal::Dict(BTreeMap::new()));
    }

    #[test]
    fn test_trailing_comma_is_accepted() {
        let cast = parse_cast("[{'name': 'Tom Hanks',},]").unwrap();
        assert_eq!(cast.len(), 1);
    }

    #[test]
    fn test_blank_and_empty_lists() {
        assert!(parse_cast("").unwrap().is_empty());
        assert!(parse_cast("   ").unwrap().is_empty());
        assert!(parse_crew("[]").unwrap().is_empty());
    }

    #[test]
    fn test_entries_without_name_are_skipped() {
        let cast = parse_cast("[{'character': 'Extra'}, 'stray', {'name': 'Tom Hanks'}]").unwrap();
        assert_eq!(cast.len(), 1);
        assert_eq!(cast[0].character, "");
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(parse_cast("[{'name': 'Tom Hanks'").is_err());
        assert!(parse_cast("{'name': 'Tom Hanks'}").is_err());
        assert!(parse_cast("[{'name': __import__('os')}]").is_err());
        assert!(parse("[1, 2] extra").is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let err = parse_cast(&"[".repeat(100_000)).unwrap_err();
        assert_eq!(err.message, "nesting too deep");
        assert!(parse(&"{'a': ".repeat(100_000)).is_err());

        let shallow = format!("{}1{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&shallow).is_ok());
    }
}
