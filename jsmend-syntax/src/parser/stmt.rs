use super::{Expr, PResult, Parser};
use crate::scope::ScopeKind;
use crate::text::Span;
use crate::token::TokenKind;
use crate::tree::{
    BindingKind, BindingSite, DeclaratorNode, FunctionBody, FunctionNode, ImportNode,
    ImportSpecifier, NamedImports, NodeId, NodeKind, VarKind,
};

impl<'a> Parser<'a> {
    pub(super) fn parse_statement_list_item(&mut self) -> PResult<()> {
        self.descend()?;
        let result = self.statement_list_item();
        self.ascend();
        result
    }

    fn statement_list_item(&mut self) -> PResult<()> {
        if self.tok.kind == TokenKind::Ident && !self.tok.escaped {
            match self.text(self.tok) {
                "import" if !self.peek_is("(") && !self.peek_is(".") => {
                    return self.parse_import_declaration();
                }
                "export" => return self.parse_export_declaration(),
                "function" => return self.parse_function_declaration(false, false).map(drop),
                "async" if self.async_function_ahead() => {
                    return self.parse_function_declaration(true, false).map(drop);
                }
                "class" => return self.parse_class(true, false).map(drop),
                "const" if self.dialect.typescript && self.peek_is_kw("enum") => {
                    return self.parse_ts_enum();
                }
                "var" | "const" => return self.parse_var_statement(),
                "let" if self.let_starts_declaration() => return self.parse_var_statement(),
                "interface" | "type" | "enum" | "declare" | "abstract" | "namespace"
                | "module" | "global"
                    if self.dialect.typescript =>
                {
                    if self.try_parse_ts_declaration()? {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        if self.at("@") {
            self.skip_decorators()?;
            return self.statement_list_item();
        }
        self.parse_statement()
    }

    fn peek_is_kw(&self, kw: &str) -> bool {
        super::is_kw(self.src, self.peek(), kw)
    }

    /// `async function` with no line break in between.
    pub(super) fn async_function_ahead(&self) -> bool {
        let next = self.peek();
        !next.nl_before && super::is_kw(self.src, next, "function")
    }

    fn let_starts_declaration(&self) -> bool {
        let next = self.peek();
        match next.kind {
            TokenKind::Ident => !matches!(self.text(next), "in" | "instanceof" | "of"),
            TokenKind::Punct => matches!(self.text(next), "[" | "{"),
            _ => false,
        }
    }

    fn parse_statement(&mut self) -> PResult<()> {
        let tok = self.tok;
        if self.at("{") {
            self.parse_block_statement()?;
            return Ok(());
        }
        let id = self.start_node(NodeKind::Statement, tok.span.start);
        let keyword = if tok.kind == TokenKind::Ident && !tok.escaped {
            self.text(tok)
        } else {
            ""
        };
        match keyword {
            "if" => {
                self.bump();
                self.parse_paren_expression()?;
                self.parse_sub_statement()?;
                if self.eat_kw("else") {
                    self.parse_sub_statement()?;
                }
            }
            "for" => self.parse_for()?,
            "while" | "with" => {
                self.bump();
                self.parse_paren_expression()?;
                self.parse_sub_statement()?;
            }
            "do" => {
                self.bump();
                self.parse_sub_statement()?;
                self.expect_kw("while")?;
                self.parse_paren_expression()?;
                self.eat(";");
            }
            "return" | "throw" => {
                self.bump();
                if !self.at(";")
                    && !self.at("}")
                    && self.tok.kind != TokenKind::Eof
                    && !self.tok.nl_before
                {
                    self.parse_expression(false)?;
                }
                self.consume_semicolon()?;
            }
            "break" | "continue" => {
                self.bump();
                if self.tok.kind == TokenKind::Ident && !self.tok.nl_before {
                    self.bump();
                }
                self.consume_semicolon()?;
            }
            "try" => self.parse_try()?,
            "switch" => self.parse_switch()?,
            "debugger" => {
                self.bump();
                self.consume_semicolon()?;
            }
            _ if self.at(";") => self.bump(),
            _ if self.at_binding_ident() && self.peek_is(":") => {
                // Labels are not bindings.
                self.bump();
                self.bump();
                self.parse_sub_statement()?;
            }
            _ => {
                self.parse_expression(false)?;
                self.consume_semicolon()?;
            }
        }
        self.finish_node(id);
        Ok(())
    }

    fn parse_sub_statement(&mut self) -> PResult<()> {
        self.parse_statement_list_item()
    }

    fn parse_paren_expression(&mut self) -> PResult<()> {
        self.expect("(")?;
        self.parse_expression(false)?;
        self.expect(")")
    }

    pub(super) fn parse_block_statement(&mut self) -> PResult<NodeId> {
        let id = self.start_node(NodeKind::Block, self.tok.span.start);
        self.expect("{")?;
        let saved = self.scope;
        self.push_scope(ScopeKind::Block);
        self.parse_statements_until_close()?;
        self.scope = saved;
        self.finish_node(id);
        Ok(id)
    }

    /// Statements up to and including the closing `}`.
    fn parse_statements_until_close(&mut self) -> PResult<()> {
        while !self.at("}") {
            if self.tok.kind == TokenKind::Eof {
                return self.unexpected_expecting("}");
            }
            self.parse_statement_list_item()?;
        }
        self.bump();
        Ok(())
    }

    fn parse_for(&mut self) -> PResult<()> {
        self.bump();
        self.eat_kw("await");
        self.expect("(")?;
        let saved = self.scope;

        if self.at(";") {
            // no initializer
        } else if self.at_kw("var")
            || self.at_kw("const")
            || (self.at_kw("let") && self.let_starts_declaration())
        {
            if !self.at_kw("var") {
                self.push_scope(ScopeKind::Block);
            }
            let decl = self.parse_var_declarations(true)?;
            self.finish_node(decl);
        } else {
            self.parse_expression(true)?;
        }

        if self.eat_kw("of") {
            self.parse_assignment(false)?;
        } else if self.eat_kw("in") {
            self.parse_expression(false)?;
        } else {
            self.expect(";")?;
            if !self.at(";") {
                self.parse_expression(false)?;
            }
            self.expect(";")?;
            if !self.at(")") {
                self.parse_expression(false)?;
            }
        }
        self.expect(")")?;
        self.parse_sub_statement()?;
        self.scope = saved;
        Ok(())
    }

    fn parse_try(&mut self) -> PResult<()> {
        self.bump();
        self.parse_block_statement()?;
        if self.eat_kw("catch") {
            let saved = self.scope;
            self.push_scope(ScopeKind::Catch);
            if self.eat("(") {
                self.parse_binding_target(BindingKind::CatchParam)?;
                if self.dialect.typescript && self.eat(":") {
                    self.skip_type()?;
                }
                self.expect(")")?;
            }
            self.parse_block_statement()?;
            self.scope = saved;
        }
        if self.eat_kw("finally") {
            self.parse_block_statement()?;
        }
        Ok(())
    }

    fn parse_switch(&mut self) -> PResult<()> {
        self.bump();
        self.parse_paren_expression()?;
        self.expect("{")?;
        let saved = self.scope;
        self.push_scope(ScopeKind::Block);
        while !self.at("}") {
            if self.eat_kw("case") {
                self.parse_expression(false)?;
                self.expect(":")?;
            } else if self.eat_kw("default") {
                self.expect(":")?;
            } else if self.tok.kind == TokenKind::Eof {
                return self.unexpected_expecting("}");
            } else {
                self.parse_statement_list_item()?;
            }
        }
        self.bump();
        self.scope = saved;
        Ok(())
    }

    // ---- declarations -----------------------------------------------------

    fn parse_var_statement(&mut self) -> PResult<()> {
        let id = self.parse_var_declarations(false)?;
        self.consume_semicolon()?;
        self.finish_node(id);
        Ok(())
    }

    /// `var|let|const` declarators, without the terminator. The returned node is
    /// still open.
    pub(super) fn parse_var_declarations(&mut self, no_in: bool) -> PResult<NodeId> {
        let (kind, binding_kind) = match self.text(self.tok) {
            "var" => (VarKind::Var, BindingKind::Var),
            "let" => (VarKind::Let, BindingKind::Let),
            _ => (VarKind::Const, BindingKind::Const),
        };
        let id = self.start_node(NodeKind::VarDecl(kind), self.tok.span.start);
        self.bump();

        loop {
            let decl = self.start_node(
                NodeKind::Declarator(DeclaratorNode {
                    name: None,
                    function: None,
                }),
                self.tok.span.start,
            );
            let name = if self.at_binding_ident() {
                let tok = self.tok;
                let name = self.bind(tok, BindingSite::new(binding_kind));
                self.bump();
                Some(name)
            } else {
                self.parse_binding_target(binding_kind)?;
                None
            };
            if self.dialect.typescript {
                self.eat("!");
                if self.eat(":") {
                    self.skip_type()?;
                }
            }
            let mut function = None;
            if self.eat("=") {
                let saved = self.exporting;
                self.exporting = false;
                let init = self.parse_assignment(no_in)?;
                self.exporting = saved;
                if let Expr::Function(f) = init {
                    function = Some(f);
                }
            }
            self.set_kind(decl, NodeKind::Declarator(DeclaratorNode { name, function }));
            self.finish_node(decl);
            if !self.eat(",") {
                break;
            }
        }
        Ok(id)
    }

    /// `function name() {}` (or `async function`). With `optional_name` the name
    /// may be omitted, as in `export default function () {}`.
    pub(super) fn parse_function_declaration(
        &mut self,
        is_async: bool,
        optional_name: bool,
    ) -> PResult<NodeId> {
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
        let name = if self.at_binding_ident() && !self.at("(") {
            let tok = self.tok;
            let name = self.bind(tok, BindingSite::new(BindingKind::Function));
            self.bump();
            Some(name)
        } else if optional_name {
            None
        } else {
            return self.unexpected();
        };
        let body = self.parse_function_rest(generator)?;
        self.set_kind(
            id,
            NodeKind::Function(FunctionNode {
                name,
                arrow: false,
                body,
            }),
        );
        self.finish_node(id);
        Ok(id)
    }

    /// Type parameters, parameters, return type and body of a function whose
    /// node is already open. Opens the function scope.
    pub(super) fn parse_function_rest(&mut self, generator: bool) -> PResult<Option<FunctionBody>> {
        let saved_scope = self.scope;
        let saved_generator = self.in_generator;
        let saved_exporting = self.exporting;
        self.exporting = false;
        self.in_generator = generator;
        let scope = self.push_scope(ScopeKind::Function);

        if self.dialect.typescript && self.at("<") {
            self.skip_balanced(false)?;
        }
        self.parse_params()?;
        if self.dialect.typescript && self.eat(":") {
            self.skip_type()?;
        }
        let body = if self.at("{") {
            Some(self.parse_function_body(scope)?)
        } else if self.dialect.typescript {
            // Overload signature or abstract method.
            self.consume_semicolon()?;
            None
        } else {
            return self.unexpected_expecting("{");
        };

        self.scope = saved_scope;
        self.in_generator = saved_generator;
        self.exporting = saved_exporting;
        Ok(body)
    }

    /// `{ directives; statements }` in an already-open function scope.
    pub(super) fn parse_function_body(
        &mut self,
        scope: crate::scope::ScopeId,
    ) -> PResult<FunctionBody> {
        let open = self.tok.span.start;
        let block = self.start_node(NodeKind::Block, open);
        self.expect("{")?;
        let directives_end = self.parse_directive_prologue()?;
        let first_statement = (!self.at("}")).then_some(self.tok.span.start);
        while !self.at("}") {
            if self.tok.kind == TokenKind::Eof {
                return self.unexpected_expecting("}");
            }
            self.parse_statement_list_item()?;
        }
        let close = self.tok.span.start;
        self.bump();
        self.finish_node(block);
        Ok(FunctionBody {
            scope,
            open,
            close,
            directives_end,
            first_statement,
        })
    }

    /// `(a, { b }, ...rest)` bound in the current (function) scope.
    pub(super) fn parse_params(&mut self) -> PResult<()> {
        self.expect("(")?;
        while !self.at(")") {
            if self.at("@") {
                self.skip_decorators()?;
            }
            if self.dialect.typescript {
                self.skip_parameter_modifiers();
                if self.at_kw("this") {
                    self.bump();
                    if self.eat(":") {
                        self.skip_type()?;
                    }
                    if !self.eat(",") {
                        break;
                    }
                    continue;
                }
            }
            let rest = self.eat("...");
            self.parse_binding_target(BindingKind::Param)?;
            if self.dialect.typescript {
                self.eat("?");
                if self.eat(":") {
                    self.skip_type()?;
                }
            }
            if !rest && self.eat("=") {
                self.parse_initializer()?;
            }
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")
    }

    /// Class declaration (`is_decl`) or expression.
    pub(super) fn parse_class(&mut self, is_decl: bool, optional_name: bool) -> PResult<NodeId> {
        let start = self.tok.span.start;
        let id = self.start_node(NodeKind::Class, start);
        self.eat_kw("abstract");
        self.expect_kw("class")?;
        let saved_scope = self.scope;
        let names_class = self.at_binding_ident()
            && !self.at_kw("extends")
            && !self.at_kw("implements");

        if is_decl {
            if names_class {
                let tok = self.tok;
                self.bind(tok, BindingSite::new(BindingKind::Class));
                self.bump();
            } else if !optional_name {
                return self.unexpected();
            }
            self.push_scope(ScopeKind::Class);
        } else {
            self.push_scope(ScopeKind::Class);
            if names_class {
                let tok = self.tok;
                self.bind(tok, BindingSite::new(BindingKind::Class));
                self.bump();
            }
        }

        let saved_exporting = self.exporting;
        self.exporting = false;
        if self.dialect.typescript && self.at("<") {
            self.skip_balanced(false)?;
        }
        if self.eat_kw("extends") {
            self.parse_call_member()?;
            if self.dialect.typescript && self.at("<") {
                self.skip_balanced(false)?;
            }
        }
        if self.dialect.typescript && self.eat_kw("implements") {
            loop {
                self.skip_type()?;
                if !self.eat(",") {
                    break;
                }
            }
        }
        self.parse_class_body()?;
        self.exporting = saved_exporting;
        self.scope = saved_scope;
        self.finish_node(id);
        Ok(id)
    }

    fn parse_class_body(&mut self) -> PResult<()> {
        self.expect("{")?;
        while !self.at("}") {
            if self.tok.kind == TokenKind::Eof {
                return self.unexpected_expecting("}");
            }
            if self.eat(";") {
                continue;
            }
            if self.at("@") {
                self.skip_decorators()?;
                continue;
            }
            self.parse_class_member()?;
        }
        self.bump();
        Ok(())
    }

    fn parse_class_member(&mut self) -> PResult<()> {
        let mut is_async = false;
        loop {
            if self.tok.kind != TokenKind::Ident || self.tok.escaped {
                break;
            }
            let word = self.text(self.tok);
            if !is_class_modifier(word) {
                break;
            }
            let next = self.peek();
            if word == "static" && self.tok_is(next, "{") {
                self.bump();
                return self.parse_static_block();
            }
            if !self.starts_property_name(next) && !self.tok_is(next, "*") {
                break;
            }
            if word == "async" {
                is_async = true;
            }
            self.bump();
        }

        if self.dialect.typescript && self.at("[") && self.index_signature_ahead() {
            self.skip_balanced(false)?;
            if self.eat(":") {
                self.skip_type()?;
            }
            return self.consume_semicolon();
        }

        let generator = self.eat("*");
        self.parse_property_key()?;
        if self.dialect.typescript {
            if !self.eat("?") {
                self.eat("!");
            }
        }
        if self.at("(") || self.at("<") {
            self.parse_method(generator, is_async)?;
            return Ok(());
        }
        if self.dialect.typescript && self.eat(":") {
            self.skip_type()?;
        }
        if self.eat("=") {
            let saved = self.scope;
            self.push_scope(ScopeKind::Function);
            self.parse_assignment(false)?;
            self.scope = saved;
        }
        self.consume_semicolon()
    }

    fn parse_static_block(&mut self) -> PResult<()> {
        let saved = self.scope;
        self.push_scope(ScopeKind::Function);
        let id = self.start_node(NodeKind::Block, self.tok.span.start);
        self.expect("{")?;
        self.parse_statements_until_close()?;
        self.finish_node(id);
        self.scope = saved;
        Ok(())
    }

    /// `[key: string]: T` inside a class or type.
    fn index_signature_ahead(&self) -> bool {
        let (first, second) = self.peek2();
        first.kind == TokenKind::Ident && self.tok_is(second, ":")
    }

    /// Method parameters and body; the key has been consumed.
    pub(super) fn parse_method(&mut self, generator: bool, _is_async: bool) -> PResult<NodeId> {
        let id = self.start_node(
            NodeKind::Function(FunctionNode {
                name: None,
                arrow: false,
                body: None,
            }),
            self.tok.span.start,
        );
        let body = self.parse_function_rest(generator)?;
        self.set_kind(
            id,
            NodeKind::Function(FunctionNode {
                name: None,
                arrow: false,
                body,
            }),
        );
        self.finish_node(id);
        Ok(id)
    }

    // ---- modules ----------------------------------------------------------

    fn string_value(&self, tok: crate::token::Token) -> String {
        let text = self.text(tok);
        text.get(1..text.len().saturating_sub(1))
            .unwrap_or_default()
            .to_string()
    }

    fn parse_import_declaration(&mut self) -> PResult<()> {
        let start = self.tok.span.start;
        let id = self.start_node(NodeKind::Statement, start);
        self.bump();

        let mut import = ImportNode {
            source: String::new(),
            type_only: false,
            default: None,
            namespace: None,
            named: None,
            added: Vec::new(),
        };

        if self.dialect.typescript && self.at_kw("type") {
            let next = self.peek();
            let modifies = (next.kind == TokenKind::Ident && self.text(next) != "from")
                || self.tok_is(next, "{")
                || self.tok_is(next, "*");
            if modifies {
                import.type_only = true;
                self.bump();
            }
        }

        if self.tok.kind == TokenKind::String {
            import.source = self.string_value(self.tok);
            self.bump();
        } else {
            if self.at_binding_ident() {
                let tok = self.tok;
                if self.dialect.typescript && self.peek_is("=") {
                    // `import x = require("y")` / `import x = A.B`
                    self.bind(tok, BindingSite::new(BindingKind::Import));
                    self.bump();
                    self.bump();
                    if self.eat_kw("require") {
                        self.skip_balanced(false)?;
                    } else {
                        self.skip_entity_name()?;
                    }
                    self.consume_semicolon()?;
                    self.finish_node(id);
                    return Ok(());
                }
                import.default = Some(self.bind(tok, BindingSite::new(BindingKind::Import)));
                self.bump();
                if self.eat(",") {
                    self.parse_import_clause_rest(&mut import)?;
                }
            } else {
                self.parse_import_clause_rest(&mut import)?;
            }
            self.expect_kw("from")?;
            if self.tok.kind != TokenKind::String {
                return self.unexpected_expecting("module specifier");
            }
            import.source = self.string_value(self.tok);
            self.bump();
        }

        if (self.at_kw("with") || self.at_kw("assert")) && !self.tok.nl_before {
            self.bump();
            self.skip_balanced(false)?;
        }
        self.consume_semicolon()?;
        self.set_kind(id, NodeKind::Import(import));
        self.finish_node(id);
        Ok(())
    }

    fn parse_import_clause_rest(&mut self, import: &mut ImportNode) -> PResult<()> {
        if self.eat("*") {
            self.expect_kw("as")?;
            if !self.at_binding_ident() {
                return self.unexpected();
            }
            let tok = self.tok;
            import.namespace = Some(self.bind(tok, BindingSite::new(BindingKind::Import)));
            self.bump();
            Ok(())
        } else if self.at("{") {
            import.named = Some(self.parse_named_imports()?);
            Ok(())
        } else {
            self.unexpected()
        }
    }

    fn parse_named_imports(&mut self) -> PResult<NamedImports> {
        let open = self.tok.span.start;
        self.expect("{")?;
        let mut specifiers = Vec::new();
        while !self.at("}") {
            let start = self.tok.span.start;
            let mut type_only = false;
            if self.dialect.typescript && self.at_kw("type") {
                let next = self.peek();
                let modifies = (next.kind == TokenKind::Ident && self.text(next) != "as")
                    || next.kind == TokenKind::String;
                if modifies {
                    type_only = true;
                    self.bump();
                }
            }
            let imported_tok = self.tok;
            let imported = match imported_tok.kind {
                TokenKind::Ident => self.ident_name(imported_tok),
                TokenKind::String => self.string_value(imported_tok),
                _ => return self.unexpected(),
            };
            self.bump();
            let (local_tok, unaliased) = if self.eat_kw("as") {
                if !self.at_binding_ident() {
                    return self.unexpected();
                }
                let tok = self.tok;
                self.bump();
                (tok, false)
            } else {
                if imported_tok.kind != TokenKind::Ident {
                    return self.unexpected_expecting("as");
                }
                (imported_tok, true)
            };
            let mut site = BindingSite::new(BindingKind::Import);
            site.import_unaliased = unaliased;
            let local = self.bind(local_tok, site);
            specifiers.push(ImportSpecifier {
                imported,
                local,
                type_only,
                span: Span::new(start, self.prev_end),
            });
            if !self.at("}") {
                self.expect(",")?;
            }
        }
        let close = self.tok.span.start;
        self.bump();
        Ok(NamedImports {
            open,
            close,
            specifiers,
        })
    }

    fn parse_export_declaration(&mut self) -> PResult<()> {
        let start = self.tok.span.start;
        let id = self.start_node(NodeKind::Export { default: false }, start);
        self.bump();

        if self.eat_kw("default") {
            self.set_kind(id, NodeKind::Export { default: true });
            let saved = self.exporting;
            self.exporting = true;
            if self.at_kw("function") {
                self.parse_function_declaration(false, true)?;
            } else if self.at_kw("async") && self.async_function_ahead() {
                self.parse_function_declaration(true, true)?;
            } else if self.at_kw("class") || (self.at_kw("abstract") && self.peek_is_kw("class"))
            {
                self.parse_class(true, true)?;
            } else if self.dialect.typescript
                && self.at_kw("interface")
                && self.try_parse_ts_declaration()?
            {
                // type-only
            } else {
                self.exporting = false;
                self.parse_assignment(false)?;
                self.consume_semicolon()?;
            }
            self.exporting = saved;
        } else if self.eat("*") {
            if self.eat_kw("as") {
                self.bump();
            }
            self.parse_export_from()?;
        } else if self.at("{") || (self.at_kw("type") && self.peek_is("{")) {
            let type_only = self.eat_kw("type");
            self.parse_export_specifiers(type_only)?;
        } else if self.dialect.typescript && self.eat("=") {
            self.parse_assignment(false)?;
            self.consume_semicolon()?;
        } else if self.dialect.typescript && self.at_kw("as") {
            self.bump();
            self.expect_kw("namespace")?;
            self.bump();
            self.consume_semicolon()?;
        } else if self.dialect.typescript && self.at_kw("import") {
            self.bump();
            if !self.at_binding_ident() {
                return self.unexpected();
            }
            let tok = self.tok;
            let mut site = BindingSite::new(BindingKind::Import);
            site.exported = true;
            self.bind(tok, site);
            self.bump();
            self.expect("=")?;
            self.skip_entity_name()?;
            self.consume_semicolon()?;
        } else {
            let saved = self.exporting;
            self.exporting = true;
            self.statement_list_item()?;
            self.exporting = saved;
        }
        self.finish_node(id);
        Ok(())
    }

    fn parse_export_from(&mut self) -> PResult<()> {
        self.expect_kw("from")?;
        if self.tok.kind != TokenKind::String {
            return self.unexpected_expecting("module specifier");
        }
        self.bump();
        if (self.at_kw("with") || self.at_kw("assert")) && !self.tok.nl_before {
            self.bump();
            self.skip_balanced(false)?;
        }
        self.consume_semicolon()
    }

    fn parse_export_specifiers(&mut self, type_only: bool) -> PResult<()> {
        self.expect("{")?;
        let mut locals = Vec::new();
        while !self.at("}") {
            if self.dialect.typescript && self.at_kw("type") {
                let next = self.peek();
                if next.kind == TokenKind::Ident && self.text(next) != "as" {
                    self.bump();
                }
            }
            let tok = self.tok;
            if !matches!(tok.kind, TokenKind::Ident | TokenKind::String) {
                return self.unexpected();
            }
            self.bump();
            if self.eat_kw("as") {
                if !matches!(self.tok.kind, TokenKind::Ident | TokenKind::String) {
                    return self.unexpected();
                }
                self.bump();
            }
            if tok.kind == TokenKind::Ident {
                locals.push(tok);
            }
            if !self.at("}") {
                self.expect(",")?;
            }
        }
        self.bump();
        if self.at_kw("from") {
            return self.parse_export_from();
        }
        if !type_only {
            for tok in locals {
                self.reference(tok);
            }
        }
        self.consume_semicolon()
    }
}

fn is_class_modifier(word: &str) -> bool {
    matches!(
        word,
        "static"
            | "get"
            | "set"
            | "async"
            | "public"
            | "private"
            | "protected"
            | "readonly"
            | "abstract"
            | "override"
            | "declare"
            | "accessor"
    )
}
