//! A small BibTeX reader.
//!
//! The parser walks the text once, collecting regular entries in source order.
//! `@string` definitions feed a macro table used by later bare-word values,
//! `@comment` and `@preamble` become keyless entries, and anything outside a
//! directive is ignored.

use crate::entry::{Entry, Field};
use crate::error::ParseError;
use std::str::FromStr;

/// Month abbreviations BibTeX styles predefine. They are kept verbatim.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Characters that can never be part of a type, field or macro name.
const NAME_STOP: &[char] = &['{', '}', '(', ')', ',', '=', '#', '"', '@'];

/// The ordered result of parsing a bibliography file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: Vec<Entry>,
    strings: Vec<Field>,
}

impl Bibliography {
    /// Every parsed record, including keyless `@comment`/`@preamble` ones.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The `@string` macros defined in the text, in definition order.
    pub fn strings(&self) -> &[Field] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Bibliography {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromStr for Bibliography {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse(input)
    }
}

/// Parses BibTeX text into a [`Bibliography`].
pub fn parse(input: &str) -> Result<Bibliography, ParseError> {
    Parser::new(input).run()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    entries: Vec<Entry>,
    strings: Vec<Field>,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            entries: Vec::new(),
            strings: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Bibliography, ParseError> {
        while self.skip_to_at() {
            self.pos += 1;
            self.directive()?;
        }

        Ok(Bibliography {
            entries: self.entries,
            strings: self.strings,
        })
    }

    fn directive(&mut self) -> Result<(), ParseError> {
        let at = self.pos - 1;
        self.skip_ws();
        let kind = self.name();

        if kind.is_empty() {
            log::debug!("Ignoring stray '@' at {}", self.describe(at));
            return Ok(());
        }

        self.skip_ws();
        let lowered = kind.to_ascii_lowercase();
        let Some(close) = self.open_delimiter() else {
            if lowered == "comment" {
                self.skip_line();
            } else {
                log::debug!("Ignoring '@{kind}' without a body at {}", self.describe(at));
            }
            return Ok(());
        };

        match lowered.as_str() {
            "comment" => {
                self.raw_body(close, at)?;
                self.entries.push(Entry {
                    entry_type: kind,
                    ..Entry::default()
                });
            }
            "preamble" => {
                self.skip_ws();
                self.value()?;
                self.skip_ws();
                self.expect(close, at)?;
                self.entries.push(Entry {
                    entry_type: kind,
                    ..Entry::default()
                });
            }
            "string" => self.string_definition(close, at)?,
            _ => {
                let entry = self.entry(kind, close, at)?;
                self.entries.push(entry);
            }
        }

        Ok(())
    }

    fn string_definition(&mut self, close: char, at: usize) -> Result<(), ParseError> {
        self.skip_ws();
        let name = self.name();
        if name.is_empty() {
            return Err(self.error("expected a macro name in @string"));
        }
        self.skip_ws();
        self.expect('=', at)?;
        let value = self.value()?;
        self.skip_ws();
        if self.peek() == Some(',') {
            self.pos += 1;
            self.skip_ws();
        }
        self.expect(close, at)?;

        match self
            .strings
            .iter_mut()
            .find(|field| field.name.eq_ignore_ascii_case(&name))
        {
            Some(field) => field.value = value,
            None => self.strings.push(Field::new(name, value)),
        }
        Ok(())
    }

    fn entry(&mut self, kind: String, close: char, at: usize) -> Result<Entry, ParseError> {
        let citation_key = self.citation_key(&kind, close, at)?;
        let mut entry = Entry {
            entry_type: kind,
            citation_key,
            tags: Vec::new(),
        };

        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(entry);
                }
                None => {
                    return Err(
                        self.error_at(at, format!("unterminated @{} entry", entry.entry_type))
                    )
                }
                _ => {}
            }

            let name = self.name();
            if name.is_empty() {
                return Err(self.error("expected a field name"));
            }
            self.skip_ws();
            if self.peek() != Some('=') {
                return Err(self.error(format!("expected '=' after field name `{name}`")));
            }
            self.pos += 1;

            let value = self.value()?;
            entry.set_tag(name, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                None => {}
                Some(c) => {
                    return Err(self.error(format!(
                        "expected ',' or '{close}' after field value, found '{c}'"
                    )))
                }
            }
        }
    }

    /// Reads the key up to the first `,`, consuming the comma.
    ///
    /// Returns `None` without consuming anything when the body opens straight
    /// into a `name = value` field.
    fn citation_key(
        &mut self,
        kind: &str,
        close: char,
        at: usize,
    ) -> Result<Option<String>, ParseError> {
        let key_start = self.pos;
        self.skip_ws();
        let word_start = self.pos;
        let word = self.name();
        self.skip_ws();
        if !word.is_empty() && self.peek() == Some('=') {
            self.pos = word_start;
            return Ok(None);
        }

        self.pos = key_start;
        while let Some(c) = self.peek() {
            match c {
                ',' => break,
                c if c == close => break,
                '{' | '}' | '=' => {
                    return Err(self.error(format!(
                        "unexpected '{c}' in citation key of @{kind} entry (missing ',' after the key?)"
                    )))
                }
                _ => self.pos += 1,
            }
        }
        if self.at_end() {
            return Err(self.error_at(at, format!("unterminated @{kind} entry")));
        }

        let key: String = self.chars[key_start..self.pos].iter().collect();
        if self.peek() == Some(',') {
            self.pos += 1;
        }
        Ok(Some(key.trim().to_string()))
    }

    /// Reads one value: parts joined with `#`.
    fn value(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            self.skip_ws();
            out.push_str(&self.value_part()?);
            self.skip_ws();
            if self.peek() == Some('#') {
                self.pos += 1;
            } else {
                return Ok(out);
            }
        }
    }

    fn value_part(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('{') => {
                let open = self.pos;
                self.pos += 1;
                self.braced(open)
            }
            Some('"') => {
                let open = self.pos;
                self.pos += 1;
                self.quoted(open)
            }
            Some(_) => {
                let word = self.name();
                if word.is_empty() {
                    return Err(self.error("expected a field value"));
                }
                Ok(self.resolve(word))
            }
            None => Err(self.error("unexpected end of input, expected a field value")),
        }
    }

    fn resolve(&self, word: String) -> String {
        if word.chars().all(|c| c.is_ascii_digit()) {
            return word;
        }
        if let Some(field) = self
            .strings
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(&word))
        {
            return field.value.clone();
        }
        if !MONTHS.contains(&word.to_ascii_lowercase().as_str()) {
            log::warn!("Unknown macro `{word}` kept as a literal value");
        }
        word
    }

    /// Content of a `{...}` group, with `pos` just past the opening brace.
    fn braced(&mut self, open: usize) -> Result<String, ParseError> {
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let content: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        return Ok(content);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error_at(open, "unbalanced braces in value"))
    }

    /// Content of a `"..."` value, with `pos` just past the opening quote.
    fn quoted(&mut self, open: usize) -> Result<String, ParseError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => depth += 1,
                '}' => {
                    if depth == 0 {
                        return Err(self.error("unbalanced braces in quoted value"));
                    }
                    depth -= 1;
                }
                '"' if depth == 0 => {
                    let content: String = self.chars[start..self.pos].iter().collect();
                    self.pos += 1;
                    return Ok(content);
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error_at(open, "unterminated quoted value"))
    }

    /// Skips a `@comment` body without interpreting it.
    fn raw_body(&mut self, close: char, at: usize) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_at(at, "unterminated @comment"))
    }

    fn open_delimiter(&mut self) -> Option<char> {
        let close = match self.peek()? {
            '{' => '}',
            '(' => ')',
            _ => return None,
        };
        self.pos += 1;
        Some(close)
    }

    fn expect(&mut self, expected: char, at: usize) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error_at(at, format!("expected '{expected}' before end of input"))),
        }
    }

    fn name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || NAME_STOP.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_to_at(&mut self) -> bool {
        while let Some(c) = self.peek() {
            if c == '@' {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn position(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for &c in &self.chars[..pos.min(self.chars.len())] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    fn describe(&self, pos: usize) -> String {
        let (line, column) = self.position(pos);
        format!("line {line}, column {column}")
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        let (line, column) = self.position(pos);
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(entry: &Entry) -> Vec<(&str, &str)> {
        entry
            .tags
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }

    #[test]
    fn parses_entry_with_braced_and_quoted_values() {
        let bib = parse(
            r#"@Article{smith2020,
  author = {Smith, John},
  title = "A {Study} of Things",
  year = 2020,
}"#,
        )
        .unwrap();

        assert_eq!(bib.len(), 1);
        let entry = &bib.entries()[0];
        assert_eq!(entry.entry_type, "Article");
        assert_eq!(entry.key(), Some("smith2020"));
        assert_eq!(
            tags(entry),
            [
                ("author", "Smith, John"),
                ("title", "A {Study} of Things"),
                ("year", "2020"),
            ]
        );
    }

    #[test]
    fn keeps_field_order_from_source() {
        let bib = parse("@misc{k, zeta = {1}, alpha = {2}, mid = {3}}").unwrap();
        let names: Vec<_> = bib.entries()[0].tags.iter().map(|f| &f.name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn nested_braces_are_kept_verbatim() {
        let bib = parse("@book{k, title = {The {LaTeX} {Comp{an}ion}}}").unwrap();
        assert_eq!(
            bib.entries()[0].tag("title"),
            Some("The {LaTeX} {Comp{an}ion}")
        );
    }

    #[test]
    fn string_macros_expand_and_concatenate() {
        let bib = parse(
            r#"@string{ jn = "Journal of Nothing" }
@STRING(pub = {ACME})
@article{k, journal = JN # { Letters}, publisher = pub, month = jan}"#,
        )
        .unwrap();

        let entry = &bib.entries()[0];
        assert_eq!(entry.tag("journal"), Some("Journal of Nothing Letters"));
        assert_eq!(entry.tag("publisher"), Some("ACME"));
        assert_eq!(entry.tag("month"), Some("jan"));
        assert_eq!(bib.strings().len(), 2);
    }

    #[test]
    fn comments_and_preambles_have_no_key() {
        let bib = parse(
            "@comment{ignore {this} please}\n@preamble{\"\\newcommand{\\x}{y}\"}\n@misc{k, note={n}}",
        )
        .unwrap();

        let kinds: Vec<_> = bib.iter().map(|e| (e.entry_type.as_str(), e.key())).collect();
        assert_eq!(
            kinds,
            [("comment", None), ("preamble", None), ("misc", Some("k"))]
        );
    }

    #[test]
    fn text_outside_entries_is_ignored() {
        let bib = parse("Exported by a tool.\nContact: me@example.org\n\n@misc{k,}\n").unwrap();
        assert_eq!(bib.len(), 1);
        assert_eq!(bib.entries()[0].key(), Some("k"));
    }

    #[test]
    fn parenthesised_entry_and_entry_without_fields() {
        let bib = parse("@misc(a, title = {T})\n@misc{b}").unwrap();
        assert_eq!(bib.entries()[0].tag("title"), Some("T"));
        assert_eq!(bib.entries()[1].key(), Some("b"));
        assert!(bib.entries()[1].tags.is_empty());
    }

    #[test]
    fn duplicate_field_keeps_first_position_and_last_value() {
        let bib = parse("@misc{k, a = {1}, b = {2}, a = {3}}").unwrap();
        assert_eq!(tags(&bib.entries()[0]), [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn entry_opening_with_a_field_has_no_key() {
        let bib = parse("@misc{title = {No key}, year = {2020}}\n@misc{k, note = {n}}").unwrap();

        let keyless = &bib.entries()[0];
        assert_eq!(keyless.citation_key, None);
        assert_eq!(tags(keyless), [("title", "No key"), ("year", "2020")]);
        assert_eq!(bib.entries()[1].key(), Some("k"));
    }

    #[test]
    fn keyless_detection_allows_space_before_equals() {
        let bib = parse("@misc{\n  title\t= \"T\"\n}").unwrap();
        assert_eq!(bib.entries()[0].citation_key, None);
        assert_eq!(bib.entries()[0].tag("title"), Some("T"));
    }

    #[test]
    fn key_with_inner_space_is_still_a_key() {
        let bib = parse("@book{Knuth 1984, title = {T}}").unwrap();
        assert_eq!(bib.entries()[0].key(), Some("Knuth 1984"));
    }

    #[test]
    fn key_missing_its_comma_is_an_error() {
        let err = parse("@misc{k title = {T}}").unwrap_err();
        assert_eq!((err.line, err.column), (1, 15));
        assert!(err.message.contains("citation key"), "{}", err.message);
    }

    #[test]
    fn braces_in_key_are_an_error() {
        let err = parse("@misc{a{b}, title = {T}}").unwrap_err();
        assert!(err.message.contains("unexpected '{'"), "{}", err.message);
    }

    #[test]
    fn unterminated_entry_reports_its_start() {
        let err = parse("\n\n@article{k, title = {T}").unwrap_err();
        assert_eq!((err.line, err.column), (3, 1));
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn missing_equals_is_an_error() {
        let err = parse("@article{k,\n  title {T}\n}").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected '='"), "{}", err.message);
    }

    #[test]
    fn unbalanced_braces_are_an_error() {
        let err = parse("@article{k, title = {a {b}").unwrap_err();
        assert!(err.message.contains("unbalanced"), "{}", err.message);

        let err = parse("@article{k, title = \"a}\"}").unwrap_err();
        assert!(err.message.contains("unbalanced"), "{}", err.message);
    }

    #[test]
    fn from_str_matches_parse() {
        let text = "@misc{k, a = {1}}";
        assert_eq!(text.parse::<Bibliography>().unwrap(), parse(text).unwrap());
    }
}
