//! Bundled ICU message-format subset.
//!
//! Templates are parsed into a small tree and evaluated against the
//! parameters. Supported arguments are `{name}`, `{name, number[, style]}`,
//! `{name, plural, …}`, `{name, selectordinal, …}` and `{name, select, …}`;
//! branches nest arbitrarily. Apostrophe quoting is not recognised.

use super::{FormatError, MessageFormatter, ParamValue, Params, plural_category};

/// Default [`MessageFormatter`].
///
/// ```
/// use lexis::format::{IcuFormatter, MessageFormatter, params};
///
/// let rendered = IcuFormatter
///     .format(
///         "{count, plural, =0{no files} one{# file} other{# files}}",
///         &params([("count", 3)]),
///         "en",
///     )
///     .unwrap();
/// assert_eq!(rendered, "3 files");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct IcuFormatter;

impl MessageFormatter for IcuFormatter {
    fn format(
        &self,
        template: &str,
        params: &Params,
        language: &str,
    ) -> Result<String, FormatError> {
        let nodes = Parser::new(template).parse()?;
        let mut output = String::with_capacity(template.len());
        Evaluator { params, language }.render(&nodes, None, &mut output)?;
        Ok(output)
    }
}

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    /// `#` inside a plural branch.
    Hash,
    Argument(String),
    Number {
        name: String,
        style: NumberStyle,
    },
    Plural {
        name: String,
        ordinal: bool,
        offset: f64,
        branches: Vec<(Selector, Vec<Node>)>,
    },
    Select {
        name: String,
        branches: Vec<(String, Vec<Node>)>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberStyle {
    Plain,
    Integer,
    Percent,
}

#[derive(Debug, PartialEq)]
enum Selector {
    Exact(f64),
    Keyword(String),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(template: &str) -> Self {
        Self {
            chars: template.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Vec<Node>, FormatError> {
        let nodes = self.parse_message(false)?;
        if self.pos < self.chars.len() {
            return Err(FormatError::UnbalancedBraces { offset: self.pos });
        }
        Ok(nodes)
    }

    /// Parse text and arguments up to the end of input or an unconsumed `}`.
    fn parse_message(&mut self, in_plural: bool) -> Result<Vec<Node>, FormatError> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(current) = self.peek() {
            match current {
                '}' => break,
                '{' => {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(self.parse_argument(in_plural)?);
                }
                '#' if in_plural => {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(Node::Hash);
                    self.pos += 1;
                }
                other => {
                    text.push(other);
                    self.pos += 1;
                }
            }
        }

        flush_text(&mut text, &mut nodes);
        Ok(nodes)
    }

    fn parse_argument(&mut self, in_plural: bool) -> Result<Node, FormatError> {
        let open = self.pos;
        self.pos += 1;
        self.skip_whitespace();
        let name = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
        if name.is_empty() {
            return Err(self.malformed_or_unbalanced(open, "expected an argument name"));
        }
        self.skip_whitespace();

        match self.peek() {
            Some('}') => {
                self.pos += 1;
                return Ok(Node::Argument(name));
            }
            Some(',') => self.pos += 1,
            None => return Err(FormatError::UnbalancedBraces { offset: open }),
            Some(_) => return Err(self.malformed("expected `,` or `}` after the argument name")),
        }

        self.skip_whitespace();
        let kind = self.take_while(char::is_alphanumeric);
        self.skip_whitespace();

        match kind.as_str() {
            "number" => self.parse_number(open, name),
            "plural" | "selectordinal" => {
                self.expect_comma(open)?;
                let ordinal = kind == "selectordinal";
                let (offset, branches) = self.parse_plural_branches(open)?;
                let has_other = branches.iter().any(|(selector, _)| {
                    matches!(selector, Selector::Keyword(keyword) if keyword == "other")
                });
                ensure_other(&name, has_other)?;
                Ok(Node::Plural {
                    name,
                    ordinal,
                    offset,
                    branches,
                })
            }
            "select" => {
                self.expect_comma(open)?;
                let branches = self.parse_select_branches(open, in_plural)?;
                ensure_other(&name, branches.iter().any(|(key, _)| key == "other"))?;
                Ok(Node::Select { name, branches })
            }
            "" if self.peek().is_none() => Err(FormatError::UnbalancedBraces { offset: open }),
            _ => Err(FormatError::UnknownType {
                argument: name,
                kind,
            }),
        }
    }

    fn parse_number(&mut self, open: usize, name: String) -> Result<Node, FormatError> {
        let style = match self.peek() {
            Some('}') => NumberStyle::Plain,
            Some(',') => {
                self.pos += 1;
                self.skip_whitespace();
                let style = self.take_while(char::is_alphanumeric);
                self.skip_whitespace();
                match style.as_str() {
                    "integer" => NumberStyle::Integer,
                    "percent" => NumberStyle::Percent,
                    _ => {
                        return Err(FormatError::UnknownType {
                            argument: name,
                            kind: format!("number, {style}"),
                        });
                    }
                }
            }
            None => return Err(FormatError::UnbalancedBraces { offset: open }),
            Some(_) => return Err(self.malformed("expected `,` or `}` after `number`")),
        };
        self.expect_close(open)?;
        Ok(Node::Number { name, style })
    }

    fn parse_plural_branches(
        &mut self,
        open: usize,
    ) -> Result<(f64, Vec<(Selector, Vec<Node>)>), FormatError> {
        let mut offset = 0.0;
        let mut branches = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(FormatError::UnbalancedBraces { offset: open }),
                Some('}') => {
                    self.pos += 1;
                    return Ok((offset, branches));
                }
                Some('=') => {
                    self.pos += 1;
                    let value = self.parse_number_literal()?;
                    let body = self.parse_branch_body(open, true)?;
                    branches.push((Selector::Exact(value), body));
                }
                Some(_) => {
                    let keyword = self.take_while(|c| c.is_alphanumeric() || c == '_');
                    if keyword.is_empty() {
                        return Err(self.malformed("expected a plural selector"));
                    }
                    if keyword == "offset" && self.peek() == Some(':') {
                        self.pos += 1;
                        self.skip_whitespace();
                        offset = self.parse_number_literal()?;
                        continue;
                    }
                    let body = self.parse_branch_body(open, true)?;
                    branches.push((Selector::Keyword(keyword), body));
                }
            }
        }
    }

    fn parse_select_branches(
        &mut self,
        open: usize,
        in_plural: bool,
    ) -> Result<Vec<(String, Vec<Node>)>, FormatError> {
        let mut branches = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(FormatError::UnbalancedBraces { offset: open }),
                Some('}') => {
                    self.pos += 1;
                    return Ok(branches);
                }
                Some(_) => {
                    let key = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '-');
                    if key.is_empty() {
                        return Err(self.malformed("expected a select key"));
                    }
                    let body = self.parse_branch_body(open, in_plural)?;
                    branches.push((key, body));
                }
            }
        }
    }

    fn parse_branch_body(&mut self, open: usize, in_plural: bool) -> Result<Vec<Node>, FormatError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.pos += 1,
            None => return Err(FormatError::UnbalancedBraces { offset: open }),
            Some(_) => return Err(self.malformed("expected `{` to open a branch")),
        }
        let branch_open = self.pos - 1;
        let body = self.parse_message(in_plural)?;
        if self.peek() != Some('}') {
            return Err(FormatError::UnbalancedBraces {
                offset: branch_open,
            });
        }
        self.pos += 1;
        Ok(body)
    }

    fn parse_number_literal(&mut self) -> Result<f64, FormatError> {
        let start = self.pos;
        let literal = self.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-');
        literal.parse().map_err(|_| FormatError::Malformed {
            offset: start,
            reason: format!("`{literal}` is not a number"),
        })
    }

    fn expect_comma(&mut self, open: usize) -> Result<(), FormatError> {
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                Ok(())
            }
            None => Err(FormatError::UnbalancedBraces { offset: open }),
            Some(_) => Err(self.malformed("expected `,` before the branches")),
        }
    }

    fn expect_close(&mut self, open: usize) -> Result<(), FormatError> {
        match self.peek() {
            Some('}') => {
                self.pos += 1;
                Ok(())
            }
            None => Err(FormatError::UnbalancedBraces { offset: open }),
            Some(_) => Err(self.malformed("expected `}`")),
        }
    }

    fn malformed(&self, reason: &str) -> FormatError {
        FormatError::Malformed {
            offset: self.pos,
            reason: reason.to_owned(),
        }
    }

    fn malformed_or_unbalanced(&self, open: usize, reason: &str) -> FormatError {
        if self.peek().is_none() {
            FormatError::UnbalancedBraces { offset: open }
        } else {
            self.malformed(reason)
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(current) = self.peek().filter(|c| accept(*c)) {
            taken.push(current);
            self.pos += 1;
        }
        taken
    }
}

fn flush_text(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

fn ensure_other(argument: &str, has_other: bool) -> Result<(), FormatError> {
    if has_other {
        Ok(())
    } else {
        Err(FormatError::MissingOther {
            argument: argument.to_owned(),
        })
    }
}

struct Evaluator<'a> {
    params: &'a Params,
    language: &'a str,
}

impl Evaluator<'_> {
    /// Append the rendering of `nodes`; `hash` is the value `#` prints.
    fn render(
        &self,
        nodes: &[Node],
        hash: Option<f64>,
        output: &mut String,
    ) -> Result<(), FormatError> {
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Hash => output.push_str(&hash.map_or_else(
                    || String::from("#"),
                    |value| format_number(value, NumberStyle::Plain),
                )),
                Node::Argument(name) => output.push_str(
                    &self
                        .params
                        .get(name)
                        .map_or_else(|| format!("{{{name}}}"), ToString::to_string),
                ),
                Node::Number { name, style } => {
                    let rendered = match self.params.get(name) {
                        Some(value) => format_number(numeric(name, value)?, *style),
                        None => format!("{{{name}}}"),
                    };
                    output.push_str(&rendered);
                }
                Node::Plural {
                    name,
                    ordinal,
                    offset,
                    branches,
                } => {
                    let value = numeric(name, self.required(name)?)?;
                    let shifted = apply_offset(value, *offset);
                    let category = plural_category(self.language, shifted, *ordinal);
                    let body = branches
                        .iter()
                        .find(|(selector, _)| {
                            matches!(selector, Selector::Exact(exact) if exact.total_cmp(&value).is_eq())
                        })
                        .or_else(|| {
                            branches.iter().find(|(selector, _)| {
                                matches!(selector, Selector::Keyword(keyword) if keyword == category.as_str())
                            })
                        })
                        .or_else(|| {
                            branches.iter().find(|(selector, _)| {
                                matches!(selector, Selector::Keyword(keyword) if keyword == "other")
                            })
                        });
                    if let Some((_, body)) = body {
                        self.render(body, Some(shifted), output)?;
                    }
                }
                Node::Select { name, branches } => {
                    let key = self.required(name)?.to_string();
                    let body = branches
                        .iter()
                        .find(|(candidate, _)| *candidate == key)
                        .or_else(|| branches.iter().find(|(candidate, _)| candidate == "other"));
                    if let Some((_, body)) = body {
                        self.render(body, hash, output)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn required(&self, name: &str) -> Result<&ParamValue, FormatError> {
        self.params
            .get(name)
            .ok_or_else(|| FormatError::MissingArgument {
                argument: name.to_owned(),
            })
    }
}

fn numeric(name: &str, value: &ParamValue) -> Result<f64, FormatError> {
    value.as_number().ok_or_else(|| FormatError::NotANumber {
        argument: name.to_owned(),
    })
}

#[expect(clippy::float_arithmetic, reason = "plural offsets are subtracted from the operand")]
const fn apply_offset(value: f64, offset: f64) -> f64 {
    value - offset
}

#[expect(clippy::float_arithmetic, reason = "percent style scales the value by 100")]
fn format_number(value: f64, style: NumberStyle) -> String {
    match style {
        NumberStyle::Plain => format!("{value}"),
        NumberStyle::Integer => format!("{}", value.round()),
        NumberStyle::Percent => format!("{}%", (value * 100.0).round()),
    }
}
