use super::{PResult, Parser};
use crate::token::TokenKind;
use crate::tree::{BindingKind, BindingSite};

impl<'a> Parser<'a> {
    /// Identifier, array pattern or object pattern; every name it introduces is
    /// bound as `kind`.
    pub(super) fn parse_binding_target(&mut self, kind: BindingKind) -> PResult<()> {
        self.descend()?;
        let result = self.binding_target(kind);
        self.ascend();
        result
    }

    fn binding_target(&mut self, kind: BindingKind) -> PResult<()> {
        if self.at_binding_ident() {
            let tok = self.tok;
            self.bind(tok, BindingSite::new(kind));
            self.bump();
            return Ok(());
        }
        if self.at("[") {
            return self.parse_array_pattern(kind);
        }
        if self.at("{") {
            return self.parse_object_pattern(kind);
        }
        self.unexpected_expecting("binding")
    }

    fn parse_array_pattern(&mut self, kind: BindingKind) -> PResult<()> {
        self.expect("[")?;
        while !self.at("]") {
            if self.eat(",") {
                continue;
            }
            if self.eat("...") {
                self.parse_binding_target(kind)?;
            } else {
                self.parse_binding_target(kind)?;
                if self.eat("=") {
                    self.parse_initializer()?;
                }
            }
            if !self.at("]") {
                self.expect(",")?;
            }
        }
        self.expect("]")
    }

    fn parse_object_pattern(&mut self, kind: BindingKind) -> PResult<()> {
        self.expect("{")?;
        while !self.at("}") {
            if self.eat("...") {
                self.parse_binding_target(kind)?;
            } else {
                let key = self.tok;
                let shorthand = key.kind == TokenKind::Ident
                    && !self.peek_is(":")
                    && self.at_binding_ident();
                if shorthand {
                    let mut site = BindingSite::new(kind);
                    site.shorthand = true;
                    self.bind(key, site);
                    self.bump();
                } else {
                    self.parse_property_key()?;
                    self.expect(":")?;
                    self.parse_binding_target(kind)?;
                }
                if self.eat("=") {
                    self.parse_initializer()?;
                }
            }
            if !self.at("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")
    }
}
