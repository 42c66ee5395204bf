use std::rc::Rc;

use crate::{
    ast::{ClassDecl, FunctionDecl, FunctionKind, Param, ParamKind, Stmt},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

/// The members collected from a class or module body.
#[derive(Default)]
struct Members {
    methods: Vec<Rc<FunctionDecl>>,
    statics: Vec<Rc<FunctionDecl>>,
    getters: Vec<Rc<FunctionDecl>>,
    setters: Vec<Rc<FunctionDecl>>,
}

impl Parser<'_> {
    /// Parses a named function after the `fun` keyword.
    ///
    /// Grammar: `funDecl := "fun" IDENT params block`
    pub(in crate::interpreter::parser) fn function_declaration(&mut self) -> ParseResult<Stmt> {
        let line = self.peek().line;
        let name = self.consume_identifier("function name")?;
        self.consume(&TokenKind::LParen, "'(' after function name")?;
        let decl = self.function_body(name, FunctionKind::Function, line)?;
        Ok(Stmt::Function(Rc::new(decl)))
    }

    /// Parses the parameter list and body of a function whose `(` has
    /// already been consumed.
    ///
    /// Loop tracking is reset for the body, so a `break` inside a function
    /// nested in a loop is still an error.
    pub(in crate::interpreter::parser) fn function_body(&mut self,
                                                        name: String,
                                                        kind: FunctionKind,
                                                        line: usize)
                                                        -> ParseResult<FunctionDecl> {
        self.enter_function();
        let result = self.parameters_and_block();
        self.exit_function();
        let (params, body) = result?;
        Ok(FunctionDecl { name,
                          params,
                          body,
                          kind,
                          line })
    }

    fn parameters_and_block(&mut self) -> ParseResult<(Vec<Param>, Vec<Stmt>)> {
        let params = self.comma_separated(&TokenKind::RParen, "')' after parameters", Self::parameter)?;
        self.check_parameter_order(&params);
        let body = self.braced_block("function body")?;
        Ok((params, body))
    }

    /// Parses one parameter.
    ///
    /// Grammar:
    /// ```text
    ///     param := IDENT | IDENT "=" expression | "*" IDENT | IDENT ":" expression
    /// ```
    fn parameter(&mut self) -> ParseResult<Param> {
        if self.matches(&TokenKind::Star) {
            let name = self.consume_identifier("parameter name after '*'")?;
            return Ok(Param { name,
                              kind: ParamKind::Splat });
        }

        let name = self.consume_identifier("parameter name")?;
        let kind = if self.matches(&TokenKind::Equals) {
            ParamKind::Optional(self.logical_or()?)
        } else if self.matches(&TokenKind::Colon) {
            ParamKind::Keyword(self.logical_or()?)
        } else {
            ParamKind::Required
        };
        Ok(Param { name, kind })
    }

    /// Reports required-after-optional, repeated splats and positional
    /// parameters after a splat.
    fn check_parameter_order(&mut self, params: &[Param]) {
        let line = self.previous().line;
        let mut seen_optional = false;
        let mut seen_splat = false;

        for param in params {
            match param.kind {
                ParamKind::Required if seen_optional => {
                    self.report(&ParseError::RequiredAfterOptional { name: param.name.clone(),
                                                                     line });
                },
                ParamKind::Required | ParamKind::Optional(_) if seen_splat => {
                    let expected = "only keyword parameters after a splat parameter";
                    self.report(&ParseError::Expected { expected: expected.to_string(),
                                                        found: format!("'{}'", param.name),
                                                        line });
                },
                ParamKind::Optional(_) => seen_optional = true,
                ParamKind::Splat if seen_splat => {
                    self.report(&ParseError::DuplicateSplat { line });
                },
                ParamKind::Splat => seen_splat = true,
                ParamKind::Required | ParamKind::Keyword(_) => {},
            }
        }
    }

    /// Parses a class after the `class` keyword.
    ///
    /// Grammar: `classDecl := "class" IDENT ( "<" expression )? "{" member* "}"`
    pub(in crate::interpreter::parser) fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let line = self.previous().line;
        let name = self.consume_identifier("class name")?;
        let superclass = if self.matches(&TokenKind::Less) {
            Some(self.call()?)
        } else {
            None
        };
        let members = self.class_body(&name)?;

        Ok(Stmt::Class(Rc::new(ClassDecl { name,
                                           superclass,
                                           methods: members.methods,
                                           statics: members.statics,
                                           getters: members.getters,
                                           setters: members.setters,
                                           line })))
    }

    /// Parses a module after the `module` keyword.
    ///
    /// Grammar: `moduleDecl := "module" IDENT "{" member* "}"`
    pub(in crate::interpreter::parser) fn module_declaration(&mut self) -> ParseResult<Stmt> {
        let line = self.previous().line;
        let name = self.consume_identifier("module name")?;
        let members = self.class_body(&name)?;

        Ok(Stmt::Module(Rc::new(ClassDecl { name,
                                            superclass: None,
                                            methods: members.methods,
                                            statics: members.statics,
                                            getters: members.getters,
                                            setters: members.setters,
                                            line })))
    }

    /// Parses `{ member* }`.
    ///
    /// Grammar:
    /// ```text
    ///     member := "class" IDENT params block      // static method
    ///             | IDENT params block              // method
    ///             | IDENT "=" "(" IDENT ")" block   // setter
    ///             | IDENT block                     // getter
    /// ```
    fn class_body(&mut self, class_name: &str) -> ParseResult<Members> {
        self.consume(&TokenKind::LBrace, &format!("'{{' before body of '{class_name}'"))?;
        let mut members = Members::default();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let line = self.peek().line;

            if self.matches(&TokenKind::Class) {
                let name = self.consume_identifier("static method name")?;
                self.consume(&TokenKind::LParen, "'(' after static method name")?;
                let decl = self.function_body(name, FunctionKind::Static, line)?;
                members.statics.push(Rc::new(decl));
                continue;
            }

            let name = self.consume_identifier("method name")?;
            if self.matches(&TokenKind::LParen) {
                let kind = if name == "init" {
                    FunctionKind::Initializer
                } else {
                    FunctionKind::Method
                };
                members.methods.push(Rc::new(self.function_body(name, kind, line)?));
            } else if self.matches(&TokenKind::Equals) {
                self.consume(&TokenKind::LParen, "'(' after '=' in setter")?;
                let param = self.consume_identifier("setter parameter name")?;
                self.consume(&TokenKind::RParen, "')' after setter parameter")?;
                self.enter_function();
                let body = self.braced_block("setter body");
                self.exit_function();
                members.setters.push(Rc::new(FunctionDecl { name,
                                                            params: vec![Param { name: param,
                                                                                 kind: ParamKind::Required, }],
                                                            body: body?,
                                                            kind: FunctionKind::Setter,
                                                            line }));
            } else if self.check(&TokenKind::LBrace) {
                self.enter_function();
                let body = self.braced_block("getter body");
                self.exit_function();
                members.getters.push(Rc::new(FunctionDecl { name,
                                                            params: Vec::new(),
                                                            body: body?,
                                                            kind: FunctionKind::Getter,
                                                            line }));
            } else {
                return Err(self.error_at_current("'(', '=' or '{' after member name"));
            }
        }

        self.consume(&TokenKind::RBrace, &format!("'}}' after body of '{class_name}'"))?;
        Ok(members)
    }
}
