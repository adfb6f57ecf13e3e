//! A small CSS selector engine.
//!
//! Supported grammar: type and universal selectors, `.class`, `#id`,
//! attribute selectors (`[a]`, `[a=v]`, `[a*=v]`, `[a~=v]`, `[a^=v]`),
//! the `:checked`, `:disabled` and `:not(<compound>)` pseudo-classes,
//! descendant and child combinators, and comma-separated lists.
//!
//! Matching always considers the full ancestor chain of a node, so a
//! selector evaluated from a scoped query can match ancestors outside the
//! scope, as `Element.querySelectorAll` does.

use crate::{Document, Id};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedEnd,
    UnexpectedChar { position: usize, found: char },
    UnsupportedPseudo(String),
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorError::Empty => f.write_str("empty selector"),
            SelectorError::UnexpectedEnd => f.write_str("unexpected end of selector"),
            SelectorError::UnexpectedChar { position, found } => {
                write!(f, "unexpected `{found}` at byte {position}")
            }
            SelectorError::UnsupportedPseudo(name) => {
                write!(f, "unsupported pseudo-class `:{name}`")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Contains,
    Includes,
    Prefix,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    test: Option<(AttrOp, String)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Pseudo {
    Checked,
    Disabled,
    Not(Box<Compound>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
    pseudos: Vec<Pseudo>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudos.is_empty()
    }
}

/// One complex selector, stored left to right. The combinator of the first
/// step is unused.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    steps: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    pub fn matches(&self, doc: &Document, id: Id) -> bool {
        if !doc.is_element(id) {
            return false;
        }
        self.selectors
            .iter()
            .any(|complex| matches_step(doc, id, &complex.steps, complex.steps.len() - 1))
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn matches_step(doc: &Document, id: Id, steps: &[(Combinator, Compound)], idx: usize) -> bool {
    let (combinator, compound) = &steps[idx];
    if !matches_compound(doc, id, compound) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    match combinator {
        Combinator::Child => doc
            .parent(id)
            .is_some_and(|p| doc.is_element(p) && matches_step(doc, p, steps, idx - 1)),
        Combinator::Descendant => doc
            .ancestors(id)
            .filter(|a| doc.is_element(*a))
            .any(|a| matches_step(doc, a, steps, idx - 1)),
    }
}

fn matches_compound(doc: &Document, id: Id, compound: &Compound) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    if let Some(tag) = &compound.tag
        && !el.name.eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(want) = &compound.id
        && el.attr("id") != Some(want.as_str())
    {
        return false;
    }
    if !compound.classes.iter().all(|c| doc.has_class(id, c)) {
        return false;
    }
    for attr in &compound.attrs {
        let Some(value) = el.attr(&attr.name) else {
            return false;
        };
        let ok = match &attr.test {
            None => true,
            Some((AttrOp::Equals, want)) => value == want,
            Some((AttrOp::Contains, want)) => !want.is_empty() && value.contains(want.as_str()),
            Some((AttrOp::Includes, want)) => value.split_ascii_whitespace().any(|t| t == want),
            Some((AttrOp::Prefix, want)) => !want.is_empty() && value.starts_with(want.as_str()),
        };
        if !ok {
            return false;
        }
    }
    compound.pseudos.iter().all(|pseudo| match pseudo {
        Pseudo::Checked => doc.is_checked(id),
        Pseudo::Disabled => doc.is_disabled(id),
        Pseudo::Not(inner) => !matches_compound(doc, id, inner),
    })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::UnexpectedChar {
                position: self.pos,
                found,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let mut selectors = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            self.skip_ws();
            selectors.push(self.parse_complex()?);
        }
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut steps = vec![(Combinator::Descendant, self.parse_compound()?)];
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(')') => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            steps.push((combinator, self.parse_compound()?));
        }
        Ok(Complex { steps })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                universal = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.pseudos.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() && !universal {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_attr(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector { name, test: None });
            }
            Some('=') => AttrOp::Equals,
            Some('*') => AttrOp::Contains,
            Some('~') => AttrOp::Includes,
            Some('^') => AttrOp::Prefix,
            _ => return Err(self.unexpected()),
        };
        if op != AttrOp::Equals {
            self.pos += 1;
        }
        self.expect('=')?;
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some(_) => {}
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                self.input[start..self.pos - 1].to_string()
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(AttrSelector {
            name,
            test: Some((op, value)),
        })
    }

    fn parse_pseudo(&mut self) -> Result<Pseudo, SelectorError> {
        let name = self.parse_ident()?;
        match name.to_ascii_lowercase().as_str() {
            "checked" => Ok(Pseudo::Checked),
            "disabled" => Ok(Pseudo::Disabled),
            "not" => {
                self.expect('(')?;
                self.skip_ws();
                let inner = self.parse_compound()?;
                self.skip_ws();
                self.expect(')')?;
                Ok(Pseudo::Not(Box::new(inner)))
            }
            _ => Err(SelectorError::UnsupportedPseudo(name)),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl Document {
    pub fn matches(&self, id: Id, selector: &SelectorList) -> bool {
        selector.matches(self, id)
    }

    /// Matching descendants of `scope` in document order. `scope` itself is
    /// never part of the result.
    pub fn query_selector_all(&self, scope: Id, selector: &SelectorList) -> Vec<Id> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn query_selector(&self, scope: Id, selector: &SelectorList) -> Option<Id> {
        self.descendants(scope)
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }
}
