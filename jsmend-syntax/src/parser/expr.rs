use super::{Expr, PResult, Parser};
use crate::scanner::Scanner;
use crate::scope::ScopeKind;
use crate::token::{
    RELATIONAL_PRECEDENCE, TemplatePart, Token, TokenKind, binary_precedence,
    is_assignment_operator, is_reserved_word,
};
use crate::tree::{BindingKind, BindingSite, FunctionNode, NodeKind};

impl<'a> Parser<'a> {
    /// Comma-separated expression.
    pub(super) fn parse_expression(&mut self, no_in: bool) -> PResult<Expr> {
        let first = self.parse_assignment(no_in)?;
        if !self.at(",") {
            return Ok(first);
        }
        while self.eat(",") {
            self.parse_assignment(no_in)?;
        }
        Ok(Expr::Other)
    }

    /// Default value or initializer; never part of an export's declared names.
    pub(super) fn parse_initializer(&mut self) -> PResult<Expr> {
        let saved = self.exporting;
        self.exporting = false;
        let result = self.parse_assignment(false);
        self.exporting = saved;
        result
    }

    pub(super) fn parse_assignment(&mut self, no_in: bool) -> PResult<Expr> {
        self.descend()?;
        let result = self.assignment(no_in);
        self.ascend();
        result
    }

    fn assignment(&mut self, no_in: bool) -> PResult<Expr> {
        let tok = self.tok;
        if tok.kind == TokenKind::Ident && !tok.escaped {
            match self.text(tok) {
                "async" => {
                    let (next, after) = self.peek2();
                    if !next.nl_before {
                        let single_param = next.kind == TokenKind::Ident
                            && self.tok_is(after, "=>")
                            && !after.nl_before;
                        let paren_params = self.tok_is(next, "(") && {
                            let mut scanner = self.scanner;
                            scanner.scan();
                            self.arrow_follows_paren(scanner)
                        };
                        if single_param || paren_params {
                            return self.parse_arrow_function(true, no_in);
                        }
                    }
                }
                "yield" if self.in_generator => return self.parse_yield(no_in),
                _ => {}
            }
            if self.at_binding_ident() {
                let next = self.peek();
                if self.tok_is(next, "=>") && !next.nl_before {
                    return self.parse_arrow_function(false, no_in);
                }
            }
        }
        if self.at("(") && self.arrow_follows_paren(self.scanner) {
            return self.parse_arrow_function(false, no_in);
        }
        if self.dialect.typescript && self.at("<") && self.generic_arrow_ahead() {
            return self.parse_arrow_function(false, no_in);
        }

        let lhs = self.parse_conditional(no_in)?;
        if self.tok.kind == TokenKind::Punct && is_assignment_operator(self.text(self.tok)) {
            self.bump();
            self.parse_assignment(no_in)?;
            return Ok(Expr::Other);
        }
        Ok(lhs)
    }

    fn parse_yield(&mut self, no_in: bool) -> PResult<Expr> {
        self.bump();
        if self.tok.nl_before || self.tok.kind == TokenKind::Eof {
            return Ok(Expr::Other);
        }
        let delegate = self.eat("*");
        if delegate || self.starts_expression(self.tok) {
            self.parse_assignment(no_in)?;
        }
        Ok(Expr::Other)
    }

    fn parse_conditional(&mut self, no_in: bool) -> PResult<Expr> {
        let test = self.parse_binary(0, no_in)?;
        if !self.eat("?") {
            return Ok(test);
        }
        self.parse_assignment(false)?;
        self.expect(":")?;
        self.parse_assignment(no_in)?;
        Ok(Expr::Other)
    }

    fn parse_binary(&mut self, min_prec: u8, no_in: bool) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let tok = self.tok;
            let op = match tok.kind {
                TokenKind::Punct => self.text(tok),
                TokenKind::Ident if !tok.escaped => {
                    let word = self.text(tok);
                    if self.dialect.typescript
                        && matches!(word, "as" | "satisfies")
                        && !tok.nl_before
                    {
                        if RELATIONAL_PRECEDENCE <= min_prec {
                            break;
                        }
                        self.bump();
                        if !self.eat_kw("const") {
                            self.skip_type()?;
                        }
                        left = Expr::Other;
                        continue;
                    }
                    if word == "in" && no_in {
                        break;
                    }
                    word
                }
                _ => break,
            };
            let Some(prec) = binary_precedence(op) else {
                break;
            };
            if prec <= min_prec {
                break;
            }
            self.bump();
            let next_min = if op == "**" { prec - 1 } else { prec };
            self.parse_binary(next_min, no_in)?;
            left = Expr::Other;
        }
        Ok(left)
    }

    pub(super) fn parse_unary(&mut self) -> PResult<Expr> {
        self.descend()?;
        let result = self.unary();
        self.ascend();
        result
    }

    fn unary(&mut self) -> PResult<Expr> {
        let tok = self.tok;
        match tok.kind {
            TokenKind::Punct if matches!(self.text(tok), "!" | "~" | "+" | "-" | "++" | "--") => {
                self.bump();
                self.parse_unary()?;
                Ok(Expr::Other)
            }
            TokenKind::Ident
                if !tok.escaped && matches!(self.text(tok), "typeof" | "void" | "delete") =>
            {
                self.bump();
                self.parse_unary()?;
                Ok(Expr::Other)
            }
            TokenKind::Ident if self.at_kw("await") && self.await_is_operator() => {
                self.bump();
                self.parse_unary()?;
                Ok(Expr::Other)
            }
            TokenKind::Punct
                if self.dialect.typescript && !self.dialect.jsx && self.text(tok) == "<" =>
            {
                // `<T>value` type assertion.
                self.bump();
                self.skip_type()?;
                self.expect_gt()?;
                self.parse_unary()?;
                Ok(Expr::Other)
            }
            _ => self.parse_postfix(),
        }
    }

    fn await_is_operator(&self) -> bool {
        let next = self.peek();
        match next.kind {
            TokenKind::Eof => false,
            TokenKind::Punct => !matches!(
                self.text(next),
                ")" | "]" | "}" | "," | ";" | ":" | "=" | "=>" | "." | "?." | "?"
            ),
            _ => true,
        }
    }

    /// Consumes one `>` of a possibly merged token (`>>`, `>=`).
    pub(super) fn expect_gt(&mut self) -> PResult<()> {
        if self.tok.kind == TokenKind::Punct && self.text(self.tok).starts_with('>') {
            self.tok = self.scanner.rescan_gt(self.tok);
            self.bump();
            Ok(())
        } else {
            self.unexpected_expecting(">")
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let expr = self.parse_call_member()?;
        if (self.at("++") || self.at("--")) && !self.tok.nl_before {
            self.bump();
            return Ok(Expr::Other);
        }
        Ok(expr)
    }

    /// Primary expression followed by member accesses, calls and tagged
    /// templates.
    pub(super) fn parse_call_member(&mut self) -> PResult<Expr> {
        let mut expr = if self.at_kw("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.eat(".") {
                self.expect_property_name()?;
            } else if self.eat("?.") {
                if self.at("(") {
                    self.parse_arguments()?;
                } else if self.eat("[") {
                    self.parse_expression(false)?;
                    self.expect("]")?;
                } else if self.dialect.typescript && self.at("<") && self.try_skip_type_arguments()
                {
                    continue;
                } else {
                    self.expect_property_name()?;
                }
            } else if self.eat("[") {
                self.parse_expression(false)?;
                self.expect("]")?;
            } else if self.at("(") {
                self.parse_arguments()?;
            } else if self.tok.is_template_start() {
                self.parse_template()?;
            } else if self.dialect.typescript && self.at("!") && !self.tok.nl_before {
                self.bump();
            } else if self.dialect.typescript && self.at("<") && self.try_skip_type_arguments() {
                continue;
            } else {
                break;
            }
            expr = Expr::Other;
        }
        Ok(expr)
    }

    fn parse_new(&mut self) -> PResult<Expr> {
        self.bump();
        if self.eat(".") {
            self.expect_property_name()?;
            return Ok(Expr::Other);
        }
        if self.at_kw("new") {
            self.parse_new()?;
        } else {
            self.parse_primary()?;
        }
        loop {
            if self.eat(".") {
                self.expect_property_name()?;
            } else if self.eat("[") {
                self.parse_expression(false)?;
                self.expect("]")?;
            } else if self.tok.is_template_start() {
                self.parse_template()?;
            } else if self.dialect.typescript && self.at("<") && self.try_skip_type_arguments() {
                continue;
            } else {
                break;
            }
        }
        if self.at("(") {
            self.parse_arguments()?;
        }
        Ok(Expr::Other)
    }

    fn expect_property_name(&mut self) -> PResult<()> {
        match self.tok.kind {
            TokenKind::Ident | TokenKind::PrivateName => {
                self.bump();
                Ok(())
            }
            _ => self.unexpected_expecting("property name"),
        }
    }

    fn parse_arguments(&mut self) -> PResult<()> {
        self.expect("(")?;
        while !self.at(")") {
            self.eat("...");
            self.parse_assignment(false)?;
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let tok = self.tok;
        match tok.kind {
            TokenKind::Ident => {
                if !tok.escaped {
                    match self.text(tok) {
                        "function" => return self.parse_function_expression(false),
                        "async" if self.async_function_ahead() => {
                            return self.parse_function_expression(true);
                        }
                        "class" => {
                            self.parse_class(false, true)?;
                            return Ok(Expr::Other);
                        }
                        "this" | "null" | "true" | "false" | "super" => {
                            self.bump();
                            return Ok(Expr::Other);
                        }
                        "import" => {
                            self.bump();
                            if self.eat(".") {
                                self.expect_property_name()?;
                            } else if self.at("(") {
                                self.parse_arguments()?;
                            } else {
                                return self.unexpected();
                            }
                            return Ok(Expr::Other);
                        }
                        word if is_reserved_word(word) => return self.unexpected(),
                        _ => {}
                    }
                }
                self.reference(tok);
                self.bump();
                Ok(Expr::Other)
            }
            TokenKind::Number | TokenKind::String | TokenKind::PrivateName => {
                self.bump();
                Ok(Expr::Other)
            }
            TokenKind::Template(_) => {
                self.parse_template()?;
                Ok(Expr::Other)
            }
            TokenKind::Punct => match self.text(tok) {
                "(" => {
                    self.bump();
                    let inner = self.parse_expression(false)?;
                    self.expect(")")?;
                    Ok(inner)
                }
                "[" => {
                    self.parse_array_literal()?;
                    Ok(Expr::Other)
                }
                "{" => {
                    self.parse_object_literal()?;
                    Ok(Expr::Other)
                }
                "/" | "/=" => {
                    self.tok = self.scanner.rescan_regex(tok);
                    if self.tok.kind != TokenKind::Regex {
                        return self.unexpected();
                    }
                    self.bump();
                    Ok(Expr::Other)
                }
                "<" if self.dialect.jsx => {
                    self.parse_jsx_element()?;
                    Ok(Expr::Other)
                }
                "@" => {
                    self.skip_decorators()?;
                    self.parse_class(false, true)?;
                    Ok(Expr::Other)
                }
                _ => self.unexpected(),
            },
            _ => self.unexpected(),
        }
    }

    pub(super) fn parse_template(&mut self) -> PResult<()> {
        match self.tok.kind {
            TokenKind::Template(TemplatePart::Full) => {
                self.bump();
                Ok(())
            }
            TokenKind::Template(TemplatePart::Head) => {
                self.bump();
                loop {
                    self.parse_expression(false)?;
                    if !self.at("}") {
                        return self.unexpected_expecting("}");
                    }
                    self.tok = self.scanner.rescan_template_continuation(self.tok);
                    match self.tok.kind {
                        TokenKind::Template(TemplatePart::Middle) => self.bump(),
                        TokenKind::Template(TemplatePart::Tail) => {
                            self.bump();
                            return Ok(());
                        }
                        _ => return self.unexpected(),
                    }
                }
            }
            _ => self.unexpected(),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<()> {
        self.expect("[")?;
        while !self.at("]") {
            if self.eat(",") {
                continue;
            }
            self.eat("...");
            self.parse_assignment(false)?;
            if !self.at("]") {
                self.expect(",")?;
            }
        }
        self.expect("]")
    }

    /// Whether `tok` can begin a property key.
    pub(super) fn starts_property_name(&self, tok: Token) -> bool {
        match tok.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::PrivateName => {
                true
            }
            TokenKind::Punct => self.text(tok) == "[",
            _ => false,
        }
    }

    /// Identifier, string, number, private name or `[computed]` key.
    pub(super) fn parse_property_key(&mut self) -> PResult<()> {
        match self.tok.kind {
            TokenKind::Ident | TokenKind::String | TokenKind::Number | TokenKind::PrivateName => {
                self.bump();
                Ok(())
            }
            TokenKind::Punct if self.at("[") => {
                self.bump();
                self.parse_assignment(false)?;
                self.expect("]")
            }
            _ => self.unexpected_expecting("property name"),
        }
    }

    fn parse_object_literal(&mut self) -> PResult<()> {
        self.expect("{")?;
        while !self.at("}") {
            if self.eat("...") {
                self.parse_assignment(false)?;
            } else {
                self.parse_object_member()?;
            }
            if !self.at("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")
    }

    fn parse_object_member(&mut self) -> PResult<()> {
        let mut is_async = false;
        if self.tok.kind == TokenKind::Ident
            && !self.tok.escaped
            && matches!(self.text(self.tok), "get" | "set" | "async")
        {
            let next = self.peek();
            if self.starts_property_name(next) || self.tok_is(next, "*") {
                is_async = self.at_kw("async");
                self.bump();
            }
        }
        let generator = self.eat("*");
        let key = self.tok;
        if key.kind == TokenKind::Ident && !generator {
            self.bump();
            if self.at("(") || self.at("<") {
                self.parse_method(false, is_async)?;
            } else if self.eat(":") {
                self.parse_assignment(false)?;
            } else {
                // Shorthand `{ name }` or cover-grammar `{ name = value }`.
                self.reference(key);
                if self.eat("=") {
                    self.parse_assignment(false)?;
                }
            }
            return Ok(());
        }
        self.parse_property_key()?;
        if self.at("(") || self.at("<") {
            self.parse_method(generator, is_async)?;
            return Ok(());
        }
        self.expect(":")?;
        self.parse_assignment(false)?;
        Ok(())
    }

    pub(super) fn parse_function_expression(&mut self, is_async: bool) -> PResult<Expr> {
        let start = self.tok.span.start;
        if is_async {
            self.bump();
        }
        self.expect_kw("function")?;
        let generator = self.eat("*");
        let id = self.start_node(
            NodeKind::Function(FunctionNode {
                name: None,
                arrow: false,
                body: None,
            }),
            start,
        );
        let saved = self.scope;
        // The name of a function expression is visible only inside it.
        self.push_scope(ScopeKind::Function);
        let name = if self.at_binding_ident() {
            let tok = self.tok;
            let name = self.bind(tok, BindingSite::new(BindingKind::Function));
            self.bump();
            Some(name)
        } else {
            None
        };
        let body = self.parse_function_rest(generator)?;
        self.scope = saved;
        self.set_kind(
            id,
            NodeKind::Function(FunctionNode {
                name,
                arrow: false,
                body,
            }),
        );
        self.finish_node(id);
        Ok(Expr::Function(id))
    }

    fn parse_arrow_function(&mut self, is_async: bool, no_in: bool) -> PResult<Expr> {
        let start = self.tok.span.start;
        let id = self.start_node(
            NodeKind::Function(FunctionNode {
                name: None,
                arrow: true,
                body: None,
            }),
            start,
        );
        let saved_scope = self.scope;
        let saved_generator = self.in_generator;
        let saved_exporting = self.exporting;
        self.in_generator = false;
        self.exporting = false;
        let scope = self.push_scope(ScopeKind::Function);

        if is_async {
            self.bump();
        }
        if self.dialect.typescript && self.at("<") {
            self.skip_balanced(false)?;
        }
        if self.at("(") {
            self.parse_params()?;
        } else if self.at_binding_ident() {
            let tok = self.tok;
            self.bind(tok, BindingSite::new(BindingKind::Param));
            self.bump();
        } else {
            return self.unexpected();
        }
        if self.dialect.typescript && self.eat(":") {
            self.skip_type()?;
        }
        if self.tok.nl_before && self.at("=>") {
            return self.unexpected();
        }
        self.expect("=>")?;
        let body = if self.at("{") {
            Some(self.parse_function_body(scope)?)
        } else {
            self.parse_assignment(no_in)?;
            None
        };

        self.scope = saved_scope;
        self.in_generator = saved_generator;
        self.exporting = saved_exporting;
        self.set_kind(
            id,
            NodeKind::Function(FunctionNode {
                name: None,
                arrow: true,
                body,
            }),
        );
        self.finish_node(id);
        Ok(Expr::Function(id))
    }

    pub(super) fn starts_expression(&self, tok: Token) -> bool {
        match tok.kind {
            TokenKind::Eof | TokenKind::Invalid | TokenKind::JsxText => false,
            TokenKind::Punct => !matches!(
                self.text(tok),
                ")" | "]" | "}" | "," | ";" | ":" | "=" | "=>" | "?" | "."
            ),
            _ => true,
        }
    }

    // ---- lookahead --------------------------------------------------------

    /// With `scanner` positioned right after a `(`, decides whether the
    /// parenthesized group is an arrow parameter list.
    pub(super) fn arrow_follows_paren(&self, mut scanner: Scanner<'a>) -> bool {
        let mut depth = 1usize;
        let mut templates: Vec<usize> = Vec::new();
        let mut prev_operand = false;
        loop {
            let mut tok = scanner.scan();
            match tok.kind {
                TokenKind::Eof | TokenKind::Invalid => return false,
                TokenKind::Template(TemplatePart::Head) => templates.push(depth),
                TokenKind::Punct => match self.text(tok) {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" => {
                        depth -= 1;
                        if depth == 0 {
                            return self.text(tok) == ")" && self.arrow_after_params(scanner);
                        }
                    }
                    "}" => {
                        if templates.last() == Some(&depth) {
                            tok = scanner.rescan_template_continuation(tok);
                            match tok.kind {
                                TokenKind::Template(TemplatePart::Tail) => {
                                    templates.pop();
                                }
                                TokenKind::Template(TemplatePart::Middle) => {}
                                _ => return false,
                            }
                        } else {
                            depth -= 1;
                            if depth == 0 {
                                return false;
                            }
                        }
                    }
                    "/" | "/=" if !prev_operand => {
                        tok = scanner.rescan_regex(tok);
                        if tok.kind != TokenKind::Regex {
                            return false;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            prev_operand = self.ends_operand(tok);
        }
    }

    fn ends_operand(&self, tok: Token) -> bool {
        match tok.kind {
            TokenKind::Ident => {
                let word = self.text(tok);
                tok.escaped
                    || !is_reserved_word(word)
                    || matches!(word, "this" | "super" | "null" | "true" | "false")
            }
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Regex
            | TokenKind::PrivateName
            | TokenKind::Template(TemplatePart::Full)
            | TokenKind::Template(TemplatePart::Tail) => true,
            TokenKind::Punct => matches!(self.text(tok), ")" | "]" | "}"),
            _ => false,
        }
    }

    /// After a closing `)`: `=>`, or a TypeScript return type followed by `=>`.
    fn arrow_after_params(&self, mut scanner: Scanner<'a>) -> bool {
        let tok = scanner.scan();
        if self.tok_is(tok, "=>") {
            return !tok.nl_before;
        }
        if !(self.dialect.typescript && self.tok_is(tok, ":")) {
            return false;
        }
        let mut depth = 0usize;
        loop {
            let tok = scanner.scan();
            match tok.kind {
                TokenKind::Eof | TokenKind::Invalid => return false,
                _ if depth == 0 && tok.nl_before && !self.tok_is(tok, "=>") => {
                    let continues = tok.kind == TokenKind::Punct
                        && matches!(self.text(tok), "|" | "&" | "." | "<" | "[");
                    if !continues {
                        return false;
                    }
                }
                _ => {}
            }
            if tok.kind != TokenKind::Punct {
                continue;
            }
            match self.text(tok) {
                "(" | "[" | "{" | "<" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                p if p.starts_with('>') && p.chars().all(|c| c == '>') => {
                    depth = depth.saturating_sub(p.len());
                }
                "=>" if depth == 0 => return true,
                ";" | "," | "=" if depth == 0 => return false,
                _ => {}
            }
        }
    }

    /// `<T>(x: T) => x` in TypeScript.
    fn generic_arrow_ahead(&self) -> bool {
        let mut scanner = self.scanner;
        if self.dialect.jsx {
            // In TSX only `<T,>` and `<T extends U>` introduce type parameters.
            let (first, second) = {
                let mut s = scanner;
                (s.scan(), s.scan())
            };
            let generic = first.kind == TokenKind::Ident
                && (self.tok_is(second, ",") || super::is_kw(self.src, second, "extends"));
            if !generic {
                return false;
            }
        }
        let mut depth = 1usize;
        loop {
            let tok = scanner.scan();
            match tok.kind {
                TokenKind::Eof | TokenKind::Invalid => return false,
                TokenKind::Punct => {
                    let p = self.text(tok);
                    if p == "<" {
                        depth += 1;
                    } else if p.starts_with('>') && p.chars().all(|c| c == '>') {
                        if p.len() >= depth {
                            break;
                        }
                        depth -= p.len();
                    } else if matches!(p, ";" | "{" | "}" | ")") && depth == 1 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        let open = scanner.scan();
        self.tok_is(open, "(") && self.arrow_follows_paren(scanner)
    }

    /// Speculatively consumes `<...>` type arguments of a call or `new`. Keeps
    /// them only when followed by `(` or a template.
    fn try_skip_type_arguments(&mut self) -> bool {
        let cp = self.checkpoint();
        if self.skip_balanced(true).is_ok() && (self.at("(") || self.tok.is_template_start()) {
            return true;
        }
        self.restore(cp);
        false
    }
}
