use super::{PResult, Parser};
use crate::token::{Token, TokenKind};
use crate::tree::NodeKind;

impl<'a> Parser<'a> {
    /// `<Tag ...>children</Tag>`, `<Tag />` or a fragment. The current token is
    /// the opening `<`.
    pub(super) fn parse_jsx_element(&mut self) -> PResult<()> {
        self.descend()?;
        let result = self.jsx_element();
        self.ascend();
        result
    }

    fn jsx_element(&mut self) -> PResult<()> {
        let id = self.start_node(NodeKind::Jsx, self.tok.span.start);
        self.expect("<")?;

        if self.at_gt() {
            // Fragment.
            self.tok = self.scanner.rescan_gt(self.tok);
            self.prev_end = self.tok.span.end;
            self.parse_jsx_children(self.tok.span.end)?;
            self.finish_node(id);
            return Ok(());
        }

        self.parse_jsx_element_name(true)?;
        if self.dialect.typescript && self.at("<") {
            self.skip_balanced(false)?;
        }
        self.parse_jsx_attributes()?;

        if self.eat("/") {
            self.expect_gt()?;
        } else if self.at_gt() {
            self.tok = self.scanner.rescan_gt(self.tok);
            self.prev_end = self.tok.span.end;
            self.parse_jsx_children(self.tok.span.end)?;
        } else {
            return self.unexpected_expecting(">");
        }
        self.finish_node(id);
        Ok(())
    }

    fn at_gt(&self) -> bool {
        self.tok.kind == TokenKind::Punct && self.text(self.tok).starts_with('>')
    }

    fn rescan_jsx_name(&mut self) -> PResult<Token> {
        if self.tok.kind != TokenKind::Ident {
            return self.unexpected_expecting("JSX name");
        }
        self.tok = self.scanner.rescan_jsx_identifier(self.tok);
        Ok(self.tok)
    }

    /// `name`, `ns:name` or `a.b.c`. Component names in opening tags are
    /// references; intrinsic element names are not.
    fn parse_jsx_element_name(&mut self, opening: bool) -> PResult<()> {
        let first = self.rescan_jsx_name()?;
        self.bump();
        if self.eat(":") {
            self.rescan_jsx_name()?;
            self.bump();
            return Ok(());
        }
        let member = self.at(".");
        while self.eat(".") {
            self.rescan_jsx_name()?;
            self.bump();
        }
        if opening {
            let name = self.text(first);
            let component = member || !name.starts_with(|c: char| c.is_ascii_lowercase());
            if component && name != "this" && !name.contains('-') {
                self.reference(first);
            }
        }
        Ok(())
    }

    fn parse_jsx_attributes(&mut self) -> PResult<()> {
        loop {
            if self.at("/") || self.at_gt() {
                return Ok(());
            }
            if self.eat("{") {
                self.expect("...")?;
                self.parse_assignment(false)?;
                self.expect("}")?;
                continue;
            }
            self.rescan_jsx_name()?;
            self.bump();
            if self.eat(":") {
                self.rescan_jsx_name()?;
                self.bump();
            }
            if self.eat("=") {
                self.parse_jsx_attribute_value()?;
            }
        }
    }

    fn parse_jsx_attribute_value(&mut self) -> PResult<()> {
        let starts_quoted = matches!(
            self.src.as_bytes().get(self.tok.span.start as usize),
            Some(b'"' | b'\'')
        );
        if starts_quoted {
            self.tok = self.scanner.rescan_jsx_string(self.tok);
            if self.tok.kind != TokenKind::String {
                return self.unexpected();
            }
            self.bump();
            return Ok(());
        }
        if self.eat("{") {
            self.parse_assignment(false)?;
            return self.expect("}");
        }
        if self.at("<") {
            return self.parse_jsx_element();
        }
        self.unexpected_expecting("attribute value")
    }

    /// Children up to and including the closing tag, scanning from `pos`.
    fn parse_jsx_children(&mut self, mut pos: u32) -> PResult<()> {
        loop {
            let child = self.scanner.scan_jsx_child(pos);
            self.tok = child;
            match child.kind {
                TokenKind::Eof => return self.unexpected_expecting("closing tag"),
                TokenKind::JsxText => {
                    pos = child.span.end;
                    self.prev_end = pos;
                }
                _ if self.at("{") => {
                    self.bump();
                    if !self.at("}") {
                        self.eat("...");
                        self.parse_expression(false)?;
                    }
                    if !self.at("}") {
                        return self.unexpected_expecting("}");
                    }
                    pos = self.tok.span.end;
                    self.prev_end = pos;
                }
                _ => {
                    let mut ahead = self.scanner;
                    if self.tok_is(ahead.scan(), "/") {
                        self.bump();
                        self.bump();
                        if !self.at_gt() {
                            self.parse_jsx_element_name(false)?;
                        }
                        return self.expect_gt();
                    }
                    self.parse_jsx_element()?;
                    pos = self.prev_end;
                }
            }
        }
    }
}
