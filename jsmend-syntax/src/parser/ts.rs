//! TypeScript syntax the rewriter has no use for: types are consumed token-wise,
//! declarations only contribute the names they bind.

use super::{PResult, Parser, is_kw};
use crate::token::{TemplatePart, TokenKind};
use crate::tree::{BindingKind, BindingSite, NodeKind};

impl<'a> Parser<'a> {
    /// Consumes a bracketed group starting at the current `(`, `[`, `{` or `<`,
    /// including anything nested. With `strict_types`, operators that cannot
    /// appear in type arguments abort the skip while a `<` is innermost.
    pub(super) fn skip_balanced(&mut self, strict_types: bool) -> PResult<()> {
        let mut stack: Vec<u8> = Vec::new();
        loop {
            let tok = self.tok;
            match tok.kind {
                TokenKind::Eof | TokenKind::Invalid => return self.unexpected(),
                TokenKind::Template(TemplatePart::Head) => stack.push(b'$'),
                TokenKind::Punct => {
                    let p = self.text(tok);
                    match p {
                        "(" | "[" | "{" | "<" => stack.push(p.as_bytes()[0]),
                        ")" | "]" => {
                            while stack.last() == Some(&b'<') {
                                stack.pop();
                            }
                            let open = if p == ")" { b'(' } else { b'[' };
                            if stack.pop() != Some(open) {
                                return self.unexpected();
                            }
                        }
                        "}" => {
                            while stack.last() == Some(&b'<') {
                                stack.pop();
                            }
                            match stack.last() {
                                Some(b'$') => {
                                    self.tok = self.scanner.rescan_template_continuation(tok);
                                    match self.tok.kind {
                                        TokenKind::Template(TemplatePart::Middle) => {}
                                        TokenKind::Template(TemplatePart::Tail) => {
                                            stack.pop();
                                        }
                                        _ => return self.unexpected(),
                                    }
                                }
                                Some(b'{') => {
                                    stack.pop();
                                }
                                _ => return self.unexpected(),
                            }
                        }
                        _ if p.starts_with('>') && stack.last() == Some(&b'<') => {
                            self.tok = self.scanner.rescan_gt(tok);
                            stack.pop();
                        }
                        _ if strict_types
                            && stack.last() == Some(&b'<')
                            && !is_type_argument_punct(p) =>
                        {
                            return self.unexpected();
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            self.bump();
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    pub(super) fn skip_type(&mut self) -> PResult<()> {
        self.descend()?;
        let result = self.type_expression();
        self.ascend();
        result
    }

    fn type_expression(&mut self) -> PResult<()> {
        if !self.eat("|") {
            self.eat("&");
        }
        loop {
            self.skip_type_operand()?;
            if !(self.eat("|") || self.eat("&")) {
                break;
            }
        }
        if self.at_kw("extends") && !self.tok.nl_before {
            self.bump();
            self.skip_type_operand()?;
            self.expect("?")?;
            self.skip_type()?;
            self.expect(":")?;
            self.skip_type()?;
        }
        Ok(())
    }

    fn skip_type_operand(&mut self) -> PResult<()> {
        self.descend()?;
        let result = self.type_operand();
        self.ascend();
        result
    }

    fn type_operand(&mut self) -> PResult<()> {
        let tok = self.tok;
        match tok.kind {
            TokenKind::Ident => {
                let next = self.peek();
                let prefix = !tok.escaped
                    && matches!(next.kind, TokenKind::Ident | TokenKind::Punct)
                    && !matches!(
                        self.text(next),
                        "," | ")" | "]" | "}" | ">" | ";" | "=" | "|" | "&" | "?" | ":" | "."
                    );
                match self.text(tok) {
                    "keyof" | "unique" | "readonly" if prefix => {
                        self.bump();
                        return self.skip_type_operand();
                    }
                    "infer" if prefix => {
                        self.bump();
                        self.bump();
                        if self.at_kw("extends") && !self.peek_is("?") {
                            self.bump();
                            self.skip_type_operand()?;
                        }
                        return Ok(());
                    }
                    "typeof" if prefix => {
                        self.bump();
                        if self.at_kw("import") {
                            self.bump();
                            self.skip_balanced(false)?;
                        } else {
                            self.skip_entity_name()?;
                        }
                    }
                    "new" => {
                        self.bump();
                        return self.skip_function_type();
                    }
                    "abstract" if is_kw(self.src, next, "new") => {
                        self.bump();
                        self.bump();
                        return self.skip_function_type();
                    }
                    "asserts" if next.kind == TokenKind::Ident && !next.nl_before => {
                        self.bump();
                        self.bump();
                        if self.eat_kw("is") {
                            self.skip_type()?;
                        }
                        return Ok(());
                    }
                    "import" if self.tok_is(next, "(") => {
                        self.bump();
                        self.skip_balanced(false)?;
                        while self.eat(".") {
                            self.bump();
                        }
                    }
                    _ => self.skip_entity_name()?,
                }
                if self.at("<") && !self.tok.nl_before {
                    self.skip_balanced(false)?;
                }
                if self.at_kw("is") && !self.tok.nl_before {
                    self.bump();
                    self.skip_type()?;
                    return Ok(());
                }
            }
            TokenKind::String | TokenKind::Number | TokenKind::Template(TemplatePart::Full) => {
                self.bump();
            }
            TokenKind::Template(TemplatePart::Head) => self.skip_balanced(false)?,
            TokenKind::Punct => match self.text(tok) {
                "(" => {
                    self.skip_balanced(false)?;
                    if self.eat("=>") {
                        return self.skip_type();
                    }
                }
                "<" => return self.skip_function_type(),
                "{" | "[" => self.skip_balanced(false)?,
                "-" => {
                    self.bump();
                    if self.tok.kind != TokenKind::Number {
                        return self.unexpected();
                    }
                    self.bump();
                }
                _ => return self.unexpected_expecting("type"),
            },
            _ => return self.unexpected_expecting("type"),
        }
        while self.at("[") && !self.tok.nl_before {
            self.skip_balanced(false)?;
        }
        Ok(())
    }

    /// `<T>(params) => Ret` after any `new` keyword.
    fn skip_function_type(&mut self) -> PResult<()> {
        if self.at("<") {
            self.skip_balanced(false)?;
        }
        if !self.at("(") {
            return self.unexpected_expecting("(");
        }
        self.skip_balanced(false)?;
        self.expect("=>")?;
        self.skip_type()
    }

    /// `A.B.C`
    pub(super) fn skip_entity_name(&mut self) -> PResult<()> {
        if self.tok.kind != TokenKind::Ident {
            return self.unexpected_expecting("name");
        }
        self.bump();
        while self.eat(".") {
            if !matches!(self.tok.kind, TokenKind::Ident | TokenKind::PrivateName) {
                return self.unexpected_expecting("name");
            }
            self.bump();
        }
        Ok(())
    }

    /// `@decorator` and `@decorator(args)` sequences.
    pub(super) fn skip_decorators(&mut self) -> PResult<()> {
        while self.eat("@") {
            self.parse_call_member()?;
        }
        Ok(())
    }

    /// Constructor parameter properties: `private readonly x`.
    pub(super) fn skip_parameter_modifiers(&mut self) {
        loop {
            let modifier = self.tok.kind == TokenKind::Ident
                && !self.tok.escaped
                && matches!(
                    self.text(self.tok),
                    "public" | "private" | "protected" | "readonly" | "override"
                );
            if !modifier {
                return;
            }
            let next = self.peek();
            let binds = next.kind == TokenKind::Ident
                || self.tok_is(next, "{")
                || self.tok_is(next, "[");
            if !binds {
                return;
            }
            self.bump();
        }
    }

    /// `const enum E {}` or `enum E {}`.
    pub(super) fn parse_ts_enum(&mut self) -> PResult<()> {
        let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
        self.eat_kw("const");
        self.expect_kw("enum")?;
        self.bind_ambient_name()?;
        self.skip_balanced(false)?;
        self.finish_node(id);
        Ok(())
    }

    fn bind_ambient_name(&mut self) -> PResult<()> {
        if !self.at_binding_ident() {
            return self.unexpected_expecting("name");
        }
        let tok = self.tok;
        self.bind(tok, BindingSite::new(BindingKind::Ambient));
        self.bump();
        Ok(())
    }

    /// Interfaces, type aliases, enums, namespaces and `declare` forms. Returns
    /// `false` without consuming anything when the keyword is used as a plain
    /// identifier.
    pub(super) fn try_parse_ts_declaration(&mut self) -> PResult<bool> {
        let word = self.text(self.tok);
        let (next, after) = self.peek2();
        let names_next = next.kind == TokenKind::Ident && !next.nl_before;
        match word {
            "interface" if names_next => {
                let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
                self.bump();
                self.bump();
                if self.at("<") {
                    self.skip_balanced(false)?;
                }
                if self.eat_kw("extends") {
                    loop {
                        self.skip_type()?;
                        if !self.eat(",") {
                            break;
                        }
                    }
                }
                if !self.at("{") {
                    return self.unexpected_expecting("{");
                }
                self.skip_balanced(false)?;
                self.finish_node(id);
                Ok(true)
            }
            "type" if names_next && (self.tok_is(after, "=") || self.tok_is(after, "<")) => {
                let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
                self.bump();
                self.bump();
                if self.at("<") {
                    self.skip_balanced(false)?;
                }
                self.expect("=")?;
                self.skip_type()?;
                self.consume_semicolon()?;
                self.finish_node(id);
                Ok(true)
            }
            "enum" if names_next => {
                self.parse_ts_enum()?;
                Ok(true)
            }
            "abstract" if is_kw(self.src, next, "class") && !next.nl_before => {
                self.parse_class(true, false)?;
                Ok(true)
            }
            "namespace" | "module"
                if names_next || (word == "module" && next.kind == TokenKind::String) =>
            {
                let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
                self.bump();
                self.parse_namespace_rest()?;
                self.finish_node(id);
                Ok(true)
            }
            "global" if self.tok_is(next, "{") => {
                let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
                self.bump();
                self.parse_block_statement()?;
                self.finish_node(id);
                Ok(true)
            }
            "declare" if next.kind == TokenKind::Ident && !next.nl_before => {
                let id = self.start_node(NodeKind::TypeDecl, self.tok.span.start);
                self.bump();
                self.parse_ambient_declaration()?;
                self.finish_node(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Name and body of `namespace A.B {}` or `module "m" {}`.
    fn parse_namespace_rest(&mut self) -> PResult<()> {
        if self.tok.kind == TokenKind::String {
            self.bump();
        } else {
            self.bind_ambient_name()?;
            while self.eat(".") {
                self.bump();
            }
        }
        if self.at("{") {
            self.parse_block_statement()?;
            Ok(())
        } else {
            self.consume_semicolon()
        }
    }

    /// Whatever follows `declare`.
    fn parse_ambient_declaration(&mut self) -> PResult<()> {
        let word = self.text(self.tok);
        match word {
            "var" | "let" | "const" if !self.peek_is_enum() => {
                self.bump();
                loop {
                    self.bind_ambient_name()?;
                    if self.eat(":") {
                        self.skip_type()?;
                    }
                    if self.eat("=") {
                        self.parse_initializer()?;
                    }
                    if !self.eat(",") {
                        break;
                    }
                }
                self.consume_semicolon()
            }
            "const" | "enum" => {
                self.eat_kw("const");
                self.expect_kw("enum")?;
                self.bind_ambient_name()?;
                self.skip_balanced(false)
            }
            "function" | "async" => {
                self.eat_kw("async");
                self.expect_kw("function")?;
                self.eat("*");
                self.bind_ambient_name()?;
                if self.at("<") {
                    self.skip_balanced(false)?;
                }
                if !self.at("(") {
                    return self.unexpected_expecting("(");
                }
                self.skip_balanced(false)?;
                if self.eat(":") {
                    self.skip_type()?;
                }
                self.consume_semicolon()
            }
            "abstract" | "class" => {
                self.eat_kw("abstract");
                self.expect_kw("class")?;
                self.bind_ambient_name()?;
                while !self.at("{") {
                    match self.tok.kind {
                        TokenKind::Eof | TokenKind::Invalid => return self.unexpected_expecting("{"),
                        _ if self.at("<") => self.skip_balanced(false)?,
                        _ => self.bump(),
                    }
                }
                self.skip_balanced(false)
            }
            "namespace" | "module" => {
                self.bump();
                self.parse_namespace_rest()
            }
            "global" => {
                self.bump();
                self.parse_block_statement()?;
                Ok(())
            }
            "interface" | "type" => {
                if self.try_parse_ts_declaration()? {
                    Ok(())
                } else {
                    self.unexpected()
                }
            }
            _ => self.unexpected(),
        }
    }

    fn peek_is_enum(&self) -> bool {
        is_kw(self.src, self.peek(), "enum")
    }
}

/// Punctuators that may appear directly inside `<...>` type arguments.
fn is_type_argument_punct(p: &str) -> bool {
    matches!(
        p,
        "," | "." | "[" | "]" | "(" | ")" | "{" | "}" | "|" | "&" | "?" | ":" | "=>" | "<" | "..."
    )
}
