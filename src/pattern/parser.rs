//! Recursive descent parser for mask strings.
//!
//! ```text
//! pattern      := segment*
//! segment      := literal | alternatives | charclass
//! literal      := char+                         not starting with '(' '[' '{'
//! alternatives := '(' option ('|' option)* ')' modifier?
//! charclass    := '[' classitem ('|'? classitem)* ']' modifier?
//! classitem    := cchar '-' cchar | cchar | keyword
//! cchar        := char | '\' char                only classes have escapes
//! modifier     := '{' number (',' number)? '}'
//! ```

use log::debug;

use crate::error::{MaskError, SyntaxError};
use crate::limits::Limits;

use super::char_class::{self, Universe, named_class};
use super::node::{Alternatives, Bounds, CharClass, Node, ValueList};

/// Parse a whole mask into its node sequence and total combination count.
pub fn parse(mask: &str, limits: &Limits) -> Result<(Vec<Node>, u64), MaskError> {
    let mut nodes = Vec::new();
    let mut total = 1u64;
    let mut rest = mask;
    while !rest.is_empty() {
        let base = mask.len() - rest.len();
        let (node, remaining) = parse_node(rest, limits).map_err(|e| e.offset_by(base))?;
        total = total
            .checked_mul(node.count())
            .filter(|&t| t <= limits.max_total)
            .ok_or(MaskError::Overflow { position: base })?;
        debug!(
            "node {} at byte {base}: {} value(s), running total {total}",
            nodes.len(),
            node.count()
        );
        nodes.push(node);
        rest = remaining;
    }
    Ok((nodes, total))
}

/// Parse the node at the start of `input`. Positions in errors are relative
/// to `input`.
pub fn parse_node<'a>(input: &'a str, limits: &Limits) -> Result<(Node, &'a str), MaskError> {
    let mut parser = Parser {
        input,
        pos: 0,
        limits,
    };
    let node = parser.parse_segment()?;
    Ok((node, &input[parser.pos..]))
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    limits: &'a Limits,
}

impl Parser<'_> {
    fn parse_segment(&mut self) -> Result<Node, MaskError> {
        match self.peek() {
            None => Err(self.error(SyntaxError::UnexpectedEnd)),
            Some('(') => self.parse_alternatives(),
            Some('[') => self.parse_class(),
            Some('{') => Err(self.error(SyntaxError::StrayModifier)),
            Some(_) => self.parse_literal(),
        }
    }

    /// Consume text up to the next `(`, `[`, `{` or end of input. `\` is an
    /// ordinary character here, so Windows-style paths pass through.
    fn parse_literal(&mut self) -> Result<Node, MaskError> {
        let len = self
            .rest()
            .find(['(', '[', '{'])
            .unwrap_or(self.rest().len());
        let text = self.rest()[..len].to_string();
        self.pos += len;
        Ok(Node::Literal(text))
    }

    fn parse_alternatives(&mut self) -> Result<Node, MaskError> {
        let start = self.pos;
        self.bump(); // consume '('
        let mut options = Vec::new();
        let mut current = String::new();
        loop {
            match self.peek() {
                None => return Err(MaskError::syntax(start, SyntaxError::UnclosedAlternatives)),
                Some(')') => {
                    self.bump();
                    options.push(current);
                    break;
                }
                Some('|') => {
                    self.bump();
                    options.push(std::mem::take(&mut current));
                }
                Some(c) => {
                    self.bump();
                    current.push(c);
                }
            }
        }
        // `()`, `(|)`, `(||)`... offer nothing but the empty string
        if options.iter().all(String::is_empty) {
            return Err(MaskError::syntax(start, SyntaxError::EmptyAlternatives));
        }

        let bounds = self.parse_modifier()?;
        self.check_node_size(start, options.len(), bounds)?;
        let values = char_class::expand(&options, bounds);
        debug!(
            "alternatives {options:?}{{{},{}}} -> {} value(s)",
            bounds.min,
            bounds.max,
            values.len()
        );
        Ok(Node::Alternatives(Alternatives {
            options,
            bounds,
            list: ValueList::new(values),
        }))
    }

    fn parse_class(&mut self) -> Result<Node, MaskError> {
        let start = self.pos;
        self.bump(); // consume '['
        let mut universe = Universe::new();
        loop {
            match self.peek() {
                None => return Err(MaskError::syntax(start, SyntaxError::UnclosedClass)),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('|') => {
                    self.bump();
                }
                Some(_) => self.parse_class_item(&mut universe)?,
            }
        }
        if universe.is_empty() {
            // `[]` names nothing at all; `[|]` has separators but no items
            return Err(if self.pos - start == 2 {
                MaskError::syntax(start, SyntaxError::EmptyClass)
            } else {
                MaskError::EmptyUniverse { position: start }
            });
        }

        let bounds = self.parse_modifier()?;
        self.check_node_size(start, universe.len(), bounds)?;
        let values = char_class::expand(&universe.symbols(), bounds);
        debug!(
            "class of {} char(s){{{},{}}} -> {} value(s)",
            universe.len(),
            bounds.min,
            bounds.max,
            values.len()
        );
        Ok(Node::CharClass(CharClass {
            universe,
            bounds,
            list: ValueList::new(values),
        }))
    }

    /// One class item: a keyword, a range `x-y`, or a single character.
    ///
    /// A run of lowercase ASCII letters is a keyword only when it names a
    /// class; otherwise each letter is an item of its own, so `[abc]` is the
    /// three letters. A word that sits against a `|` separator must name a
    /// class, which catches typos such as `[a-z|greek]`.
    fn parse_class_item(&mut self, universe: &mut Universe) -> Result<(), MaskError> {
        let item_start = self.pos;
        let word_len = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_lowercase())
            .count();
        if word_len >= 2 {
            let word = &self.input[self.pos..self.pos + word_len];
            if let Some(class) = named_class(word) {
                self.pos += word_len;
                universe.insert_class(class);
                return Ok(());
            }
            let after_bar = self.input[..self.pos].ends_with('|');
            let before_bar = self.input[self.pos + word_len..].starts_with('|');
            if after_bar || before_bar {
                return Err(MaskError::syntax(
                    item_start,
                    SyntaxError::UnknownClass(word.to_string()),
                ));
            }
        }

        let lo = self.parse_class_char()?;
        if self.peek() != Some('-') {
            universe.insert(lo);
            return Ok(());
        }
        self.bump(); // consume '-'
        let hi = match self.peek() {
            None => return Err(self.error(SyntaxError::UnexpectedEnd)),
            Some(']') => return Err(self.error(SyntaxError::UnexpectedChar(']'))),
            Some(_) => self.parse_class_char()?,
        };
        if hi < lo {
            return Err(MaskError::syntax(
                item_start,
                SyntaxError::InvertedCharRange(lo, hi),
            ));
        }
        universe.insert_range(lo, hi);
        Ok(())
    }

    fn parse_class_char(&mut self) -> Result<char, MaskError> {
        match self.peek() {
            Some('\\') => self.parse_escape(),
            Some(c) => {
                self.bump();
                Ok(c)
            }
            None => Err(self.error(SyntaxError::UnexpectedEnd)),
        }
    }

    /// `\c` inside a class yields `c` verbatim.
    fn parse_escape(&mut self) -> Result<char, MaskError> {
        let start = self.pos;
        self.bump(); // consume '\'
        self.bump()
            .ok_or(MaskError::syntax(start, SyntaxError::DanglingEscape))
    }

    /// Parse an optional `{min,max}` or `{n}` suffix.
    fn parse_modifier(&mut self) -> Result<Bounds, MaskError> {
        if self.peek() != Some('{') {
            return Ok(Bounds::default());
        }
        let start = self.pos;
        self.bump(); // consume '{'
        let min = self.parse_number(start)?;
        let max = match self.bump() {
            Some('}') => min,
            Some(',') => {
                let max = self.parse_number(start)?;
                match self.bump() {
                    Some('}') => max,
                    Some(c) => {
                        return Err(MaskError::syntax(
                            self.pos - c.len_utf8(),
                            SyntaxError::UnexpectedChar(c),
                        ));
                    }
                    None => return Err(MaskError::syntax(start, SyntaxError::UnclosedModifier)),
                }
            }
            Some(c) => {
                return Err(MaskError::syntax(
                    self.pos - c.len_utf8(),
                    SyntaxError::UnexpectedChar(c),
                ));
            }
            None => return Err(MaskError::syntax(start, SyntaxError::UnclosedModifier)),
        };
        Bounds::new(min, max).ok_or(MaskError::InvertedBounds {
            position: start,
            min,
            max,
        })
    }

    /// A decimal `u32`, optionally surrounded by spaces.
    fn parse_number(&mut self, modifier_start: usize) -> Result<u32, MaskError> {
        self.skip_space();
        let digits_start = self.pos;
        let len = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return Err(match self.peek() {
                None => MaskError::syntax(modifier_start, SyntaxError::UnclosedModifier),
                Some(_) => self.error(SyntaxError::InvalidNumber),
            });
        }
        self.pos += len;
        let n = self.input[digits_start..self.pos]
            .parse::<u32>()
            .map_err(|_| MaskError::syntax(digits_start, SyntaxError::InvalidNumber))?;
        self.skip_space();
        Ok(n)
    }

    fn check_node_size(&self, start: usize, symbols: usize, bounds: Bounds) -> Result<(), MaskError> {
        char_class::power_count(symbols as u64, bounds)
            .filter(|&n| n <= self.limits.max_node_values)
            .map(|_| ())
            .ok_or(MaskError::Overflow { position: start })
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, reason: SyntaxError) -> MaskError {
        MaskError::syntax(self.pos, reason)
    }
}
