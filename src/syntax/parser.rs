//! Character-level recursive-descent stylesheet parser.
//!
//! Lenient where recovery is local (a declaration without a colon, an
//! at-rule outside the supported grammar) and failing only on
//! structurally unrecoverable input: an unterminated comment or block.

use smallvec::SmallVec;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::errors::ParseError;

/// Parse stylesheet text into an AST.
pub fn parse(input: &str) -> Result<Ast, ParseError> {
    Parser::new(input).parse_stylesheet()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    ast: Ast,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            ast: Ast::new(),
        }
    }

    fn parse_stylesheet(mut self) -> Result<Ast, ParseError> {
        let root = self.ast.root();
        self.parse_rule_list(root, true)?;
        Ok(self.ast)
    }

    /// Parse rules, at-rules, and comments into `parent`'s container.
    /// At top level this runs to EOF; nested it consumes the closing `}`.
    fn parse_rule_list(&mut self, parent: NodeId, top_level: bool) -> Result<(), ParseError> {
        let block_start = self.pos;
        loop {
            self.skip_whitespace();
            if self.eof() {
                if top_level {
                    return Ok(());
                }
                return Err(ParseError::UnterminatedBlock { offset: block_start });
            }
            if self.peek() == Some('}') {
                self.bump();
                if !top_level {
                    return Ok(());
                }
                // stray close brace at top level, drop it
                continue;
            }
            if self.starts_with("/*") {
                let comment = self.parse_comment()?;
                self.ast.push_child(parent, comment);
            } else if self.peek() == Some('@') {
                self.parse_at_rule(parent)?;
            } else {
                self.parse_rule(parent)?;
            }
        }
    }

    fn parse_comment(&mut self) -> Result<NodeId, ParseError> {
        let start = self.pos;
        self.pos += 2; // "/*"
        match self.input[self.pos..].find("*/") {
            Some(rel) => {
                let text = self.input[self.pos..self.pos + rel].to_string();
                self.pos += rel + 2;
                Ok(self.ast.alloc(NodeKind::Comment { text }, None))
            }
            None => Err(ParseError::UnterminatedComment { offset: start }),
        }
    }

    fn parse_at_rule(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.bump(); // '@'
        let name = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '-');

        if name == "media" {
            let query = self.consume_until(&['{', ';']).trim().to_string();
            if !self.consume_char('{') {
                // malformed prelude, drop it
                self.consume_char(';');
                return Ok(());
            }
            let media = self.ast.alloc(
                NodeKind::Media {
                    query,
                    rules: Vec::new(),
                },
                None,
            );
            self.ast.push_child(parent, media);
            self.parse_rule_list(media, false)
        } else if name == "keyframes" || (name.starts_with('-') && name.ends_with("-keyframes")) {
            let vendor = name
                .strip_suffix("keyframes")
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string);
            let kf_name = self.consume_until(&['{', ';']).trim().to_string();
            if !self.consume_char('{') {
                self.consume_char(';');
                return Ok(());
            }
            let keyframes = self.ast.alloc(
                NodeKind::Keyframes {
                    name: kf_name,
                    vendor,
                    frames: Vec::new(),
                },
                None,
            );
            self.ast.push_child(parent, keyframes);
            self.parse_keyframe_list(keyframes)
        } else if matches!(name.as_str(), "import" | "charset" | "namespace") {
            let params = self.consume_until(&[';', '{']).trim().to_string();
            self.consume_char(';');
            let at_rule = self.ast.alloc(NodeKind::AtRule { name, params }, None);
            self.ast.push_child(parent, at_rule);
            Ok(())
        } else {
            // outside the supported grammar: skip the statement or block
            self.skip_unknown_at_rule()
        }
    }

    /// Parse `selector, selector { declarations }` into `parent`.
    fn parse_rule(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let selector_text = self.consume_until(&['{', '}']).trim().to_string();
        if !self.consume_char('{') {
            // malformed fragment; any `}` stays for the enclosing list
            return Ok(());
        }
        if selector_text.is_empty() {
            return self.skip_block(self.pos);
        }
        let selectors = split_commas(&selector_text);
        let rule = self.ast.alloc(
            NodeKind::Rule {
                selectors,
                declarations: Vec::new(),
            },
            None,
        );
        self.ast.push_child(parent, rule);
        self.parse_declaration_list(rule)
    }

    /// Parse keyframe selector groups until the closing `}` of the block.
    fn parse_keyframe_list(&mut self, keyframes: NodeId) -> Result<(), ParseError> {
        let block_start = self.pos;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnterminatedBlock { offset: block_start }),
                Some('}') => {
                    self.bump();
                    return Ok(());
                }
                _ if self.starts_with("/*") => {
                    let comment = self.parse_comment()?;
                    self.ast.push_child(keyframes, comment);
                }
                _ => {
                    let selector_text = self.consume_until(&['{', '}']).trim().to_string();
                    if !self.consume_char('{') {
                        // malformed fragment; resync on the next `}`
                        continue;
                    }
                    let selectors: SmallVec<[String; 2]> = selector_text
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    let frame = self.ast.alloc(
                        NodeKind::Keyframe {
                            selectors,
                            declarations: Vec::new(),
                        },
                        None,
                    );
                    self.ast.push_child(keyframes, frame);
                    self.parse_declaration_list(frame)?;
                }
            }
        }
    }

    /// Parse `property: value;` pairs until the closing `}`.
    fn parse_declaration_list(&mut self, owner: NodeId) -> Result<(), ParseError> {
        let block_start = self.pos;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnterminatedBlock { offset: block_start }),
                Some('}') => {
                    self.bump();
                    return Ok(());
                }
                _ if self.starts_with("/*") => {
                    let comment = self.parse_comment()?;
                    self.ast.push_child(owner, comment);
                }
                _ => {
                    let property = self.consume_until(&[':', ';', '}']).trim().to_string();
                    match self.peek() {
                        Some(':') => {
                            self.bump();
                            let value = self.consume_value();
                            self.consume_char(';');
                            if !property.is_empty() {
                                let decl = self
                                    .ast
                                    .alloc(NodeKind::Declaration { property, value }, None);
                                self.ast.push_child(owner, decl);
                            }
                        }
                        // missing colon: drop the fragment and resync
                        Some(';') => {
                            self.bump();
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Consume a declaration value up to `;` or `}`, honoring parentheses
    /// and quoted strings.
    fn consume_value(&mut self) -> String {
        let start = self.pos;
        let mut depth: i32 = 0;
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    depth += 1;
                    self.bump();
                }
                ')' => {
                    depth -= 1;
                    self.bump();
                }
                '"' | '\'' => {
                    self.bump();
                    self.skip_string(c);
                }
                ';' | '}' if depth <= 0 => break,
                _ => {
                    self.bump();
                }
            }
        }
        self.input[start..self.pos].trim().to_string()
    }

    fn skip_string(&mut self, quote: char) {
        while let Some(c) = self.peek() {
            self.bump();
            if c == '\\' {
                self.bump();
            } else if c == quote {
                break;
            }
        }
    }

    /// Skip an at-rule we do not model: through `;` for statements, or a
    /// balanced `{ ... }` block.
    fn skip_unknown_at_rule(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                None => return Ok(()),
                Some(';') => {
                    self.bump();
                    return Ok(());
                }
                Some('{') => {
                    let offset = self.pos;
                    self.bump();
                    return self.skip_block(offset);
                }
                Some(quote @ ('"' | '\'')) => {
                    self.bump();
                    self.skip_string(quote);
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Skip until the `}` matching an already-consumed `{`.
    fn skip_block(&mut self, offset: usize) -> Result<(), ParseError> {
        let mut depth = 1;
        while let Some(c) = self.peek() {
            self.bump();
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' => self.skip_string(c),
                _ => {}
            }
        }
        Err(ParseError::UnterminatedBlock { offset })
    }

    // cursor helpers

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&mut pred) {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    /// Consume up to (not including) the first of `stops`, honoring quoted
    /// strings.
    fn consume_until(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            self.bump();
            if c == '"' || c == '\'' {
                self.skip_string(c);
            }
        }
        self.input[start..self.pos].to_string()
    }
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
