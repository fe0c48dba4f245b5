use anyhow::{anyhow, bail, Result};

use crate::ast::*;
use crate::diagnostics::Diagnostics;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::source::SourceFile;

#[derive(Copy, Clone, PartialEq, PartialOrd)]
enum Precedence {
    Lowest = 0,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Power,
    Unary,
}

impl Precedence {
    fn of(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PipePipe => Some(Precedence::Or),
            TokenKind::AmpersandAmpersand => Some(Precedence::And),
            TokenKind::DoubleEqual | TokenKind::BangEqual => Some(Precedence::Equality),
            TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => Some(Precedence::Comparison),
            TokenKind::Plus | TokenKind::Minus => Some(Precedence::Term),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(Precedence::Factor),
            TokenKind::StarStar => Some(Precedence::Power),
            _ => None,
        }
    }
}

pub struct Parser<'a> {
    _source: &'a SourceFile,
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a SourceFile, tokens: Vec<Token>) -> Self {
        Self {
            _source: source,
            tokens,
            current: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    fn span_from_token(token: &Token) -> SourceSpan {
        let len = token.lexeme.chars().count().max(1);
        SourceSpan::new(
            token.line,
            token.column,
            token.line,
            token.column + len.saturating_sub(1),
        )
    }

    fn make_expression(span: SourceSpan, kind: ExpressionKind) -> Expression {
        Expression { span, kind }
    }

    fn union_spans(a: &SourceSpan, b: &SourceSpan) -> SourceSpan {
        SourceSpan::union(a, b)
    }

    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program::new(statements))
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek_kind() {
            TokenKind::Keyword(Keyword::Let) => self.parse_binding(false),
            TokenKind::Keyword(Keyword::Const) => self.parse_binding(true),
            TokenKind::Keyword(Keyword::Fnc) => self.parse_function(),
            TokenKind::Keyword(Keyword::Obj) => self.parse_object(),
            TokenKind::Keyword(Keyword::Print) => self.parse_print(),
            TokenKind::Keyword(Keyword::If) => {
                Ok(Statement::Conditional(self.parse_conditional()?))
            }
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_loop(),
            TokenKind::Keyword(Keyword::Break) => {
                let token = self.advance().clone();
                let semicolon = self.expect_semicolon("expected ';' after 'break'")?;
                Ok(Statement::Break(BreakStatement {
                    span: Self::union_spans(&Self::span_from_token(&token), &semicolon),
                }))
            }
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::PlusPlus | TokenKind::MinusMinus => self.parse_prefix_update(),
            TokenKind::Keyword(keyword) => {
                let keyword = *keyword;
                let token = self.peek().clone();
                Err(self.error_at(
                    &token,
                    format!("unexpected keyword '{}'", keyword.as_str()),
                ))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_binding(&mut self, is_const: bool) -> Result<Statement> {
        let keyword_token = self.advance().clone();
        let name_token = self.expect_identifier("expected identifier after declaration keyword")?;
        let name_span = Self::span_from_token(&name_token);

        let type_annotation = if matches!(self.peek_kind(), TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_expression()?)
        } else {
            None
        };

        self.expect_token(
            TokenKind::Equal,
            &format!("expected '=' in declaration of '{}'", name_token.lexeme),
        )?;
        let initializer = self.parse_expression()?;
        let semicolon = self.expect_semicolon("expected ';' after declaration")?;

        Ok(Statement::Var(VarStatement {
            is_const,
            name: name_token.lexeme,
            name_span,
            type_annotation,
            initializer,
            span: Self::union_spans(&Self::span_from_token(&keyword_token), &semicolon),
        }))
    }

    fn parse_function(&mut self) -> Result<Statement> {
        let fnc_token = self.advance().clone();
        let name_token = self.expect_identifier("expected function name after 'fnc'")?;
        let name_span = Self::span_from_token(&name_token);

        self.expect_token(TokenKind::LParen, "expected '(' after function name")?;
        let parameters = self.parse_parameters()?;

        let return_type = if matches!(self.peek_kind(), TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_expression()?)
        } else {
            None
        };

        if matches!(self.peek_kind(), TokenKind::Equal) {
            self.advance();
        }

        let body = self.parse_block()?;
        let span = Self::union_spans(&Self::span_from_token(&fnc_token), &body.span);

        Ok(Statement::Function(FunctionStatement {
            name: name_token.lexeme,
            name_span,
            parameters,
            return_type,
            body,
            span,
        }))
    }

    fn parse_parameters(&mut self) -> Result<Vec<FunctionParameter>> {
        let mut parameters = Vec::new();
        if matches!(self.peek_kind(), TokenKind::RParen) {
            self.advance();
            return Ok(parameters);
        }

        loop {
            let name_token = self.expect_identifier("expected parameter name")?;
            self.expect_token(
                TokenKind::Colon,
                &format!("expected ':' and a type after parameter '{}'", name_token.lexeme),
            )?;
            let type_annotation = self.parse_type_expression()?;
            parameters.push(FunctionParameter {
                span: Self::span_from_token(&name_token),
                name: name_token.lexeme,
                type_annotation,
            });

            match self.peek_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    return Ok(parameters);
                }
                _ => {
                    let token = self.peek().clone();
                    return Err(self.error_at(&token, "expected ',' or ')' in parameter list"));
                }
            }
        }
    }

    fn parse_type_expression(&mut self) -> Result<TypeExpression> {
        let name_token = self.expect_identifier("expected a type name")?;
        let mut span = Self::span_from_token(&name_token);
        let mut dimensions = 0;

        while matches!(self.peek_kind(), TokenKind::LBracket)
            && matches!(self.peek_kind_at(1), Some(TokenKind::RBracket))
        {
            self.advance();
            let closing = self.advance().clone();
            span = Self::union_spans(&span, &Self::span_from_token(&closing));
            dimensions += 1;
        }

        Ok(TypeExpression {
            name: name_token.lexeme,
            dimensions,
            span,
        })
    }

    fn parse_object(&mut self) -> Result<Statement> {
        let obj_token = self.advance().clone();
        let name_token = self.expect_identifier("expected object name after 'obj'")?;
        self.expect_token(TokenKind::Equal, "expected '=' after object name")?;
        let class_token = self.expect_identifier("expected a class name")?;
        self.expect_token(TokenKind::LParen, "expected '(' after class name")?;
        let (arguments, _) = self.parse_arguments()?;
        let semicolon = self.expect_semicolon("expected ';' after object creation")?;

        Ok(Statement::Object(ObjectStatement {
            name_span: Self::span_from_token(&name_token),
            name: name_token.lexeme,
            class_span: Self::span_from_token(&class_token),
            class_name: class_token.lexeme,
            arguments,
            span: Self::union_spans(&Self::span_from_token(&obj_token), &semicolon),
        }))
    }

    fn parse_print(&mut self) -> Result<Statement> {
        let print_token = self.advance().clone();
        self.expect_token(TokenKind::LParen, "expected '(' after 'print'")?;
        let expression = self.parse_expression()?;
        self.expect_token(TokenKind::RParen, "expected ')' after print argument")?;
        let semicolon = self.expect_semicolon("expected ';' after print statement")?;

        Ok(Statement::Print(PrintStatement {
            expression,
            span: Self::union_spans(&Self::span_from_token(&print_token), &semicolon),
        }))
    }

    fn parse_conditional(&mut self) -> Result<ConditionalStatement> {
        let if_token = self.advance().clone();
        let condition = self.parse_expression()?;
        let consequent = self.parse_block()?;
        let mut span = Self::union_spans(&Self::span_from_token(&if_token), &consequent.span);

        let alternative = if matches!(self.peek_kind(), TokenKind::Keyword(Keyword::Else)) {
            self.advance();
            if matches!(self.peek_kind(), TokenKind::Keyword(Keyword::If)) {
                let nested = self.parse_conditional()?;
                span = Self::union_spans(&span, &nested.span);
                Some(ElseBranch::If(Box::new(nested)))
            } else {
                let block = self.parse_block()?;
                span = Self::union_spans(&span, &block.span);
                Some(ElseBranch::Block(block))
            }
        } else {
            None
        };

        Ok(ConditionalStatement {
            condition,
            consequent,
            alternative,
            span,
        })
    }

    fn parse_while(&mut self) -> Result<Statement> {
        let while_token = self.advance().clone();
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = Self::union_spans(&Self::span_from_token(&while_token), &body.span);
        Ok(Statement::While(WhileStatement {
            condition,
            body,
            span,
        }))
    }

    fn parse_for_loop(&mut self) -> Result<Statement> {
        let for_token = self.advance().clone();
        let variable_token = self.expect_identifier("expected loop variable after 'for'")?;
        self.expect_keyword(Keyword::In, "expected 'in' after loop variable")?;

        let domain_token = self.peek().clone();
        if domain_token.kind != TokenKind::Identifier || domain_token.lexeme != "domain" {
            return Err(self.error_at(&domain_token, "expected 'domain(...)' after 'in'"));
        }
        self.advance();
        self.expect_token(TokenKind::LParen, "expected '(' after 'domain'")?;
        let (domain_arguments, closing) = self.parse_arguments()?;
        let domain_span = Self::union_spans(&Self::span_from_token(&domain_token), &closing);

        let body = self.parse_block()?;
        let span = Self::union_spans(&Self::span_from_token(&for_token), &body.span);

        Ok(Statement::For(ForStatement {
            variable: Identifier {
                span: Self::span_from_token(&variable_token),
                name: variable_token.lexeme,
            },
            domain_arguments,
            domain_span,
            body,
            span,
        }))
    }

    fn parse_return(&mut self) -> Result<Statement> {
        let return_token = self.advance().clone();
        let expression = if matches!(self.peek_kind(), TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let semicolon = self.expect_semicolon("expected ';' after return statement")?;
        Ok(Statement::Return(ReturnStatement {
            span: Self::union_spans(&Self::span_from_token(&return_token), &semicolon),
            expression,
        }))
    }

    fn parse_prefix_update(&mut self) -> Result<Statement> {
        let operator_token = self.advance().clone();
        let operator = update_operator_from_token(&operator_token.kind)?;
        let target = self.parse_expression()?;
        self.ensure_target(&target)?;
        let semicolon = self.expect_semicolon("expected ';' after update statement")?;
        Ok(Statement::Update(UpdateStatement {
            operator,
            span: Self::union_spans(&Self::span_from_token(&operator_token), &semicolon),
            target,
        }))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression()?;

        match self.peek_kind() {
            TokenKind::Equal => {
                self.ensure_target(&expression)?;
                self.advance();
                let value = self.parse_expression()?;
                let semicolon = self.expect_semicolon("expected ';' after assignment")?;
                Ok(Statement::Assignment(AssignmentStatement {
                    span: Self::union_spans(&expression.span, &semicolon),
                    target: expression,
                    value,
                }))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.ensure_target(&expression)?;
                let operator = update_operator_from_token(self.peek_kind())?;
                self.advance();
                let semicolon = self.expect_semicolon("expected ';' after update statement")?;
                Ok(Statement::Update(UpdateStatement {
                    operator,
                    span: Self::union_spans(&expression.span, &semicolon),
                    target: expression,
                }))
            }
            _ => {
                if !matches!(
                    expression.kind,
                    ExpressionKind::Call(_) | ExpressionKind::MethodCall(_)
                ) {
                    self.diagnostics.push_error_with_span(
                        "only calls can be used as statements",
                        Some(expression.span),
                    );
                    bail!(
                        "only calls can be used as statements at line {}, column {}",
                        expression.span.line,
                        expression.span.column
                    );
                }
                self.expect_semicolon("expected ';' after expression")?;
                Ok(Statement::Expression(ExpressionStatement { expression }))
            }
        }
    }

    /// Assignment and update targets are a variable optionally followed by subscripts.
    fn ensure_target(&mut self, expression: &Expression) -> Result<()> {
        let mut current = expression;
        loop {
            match &current.kind {
                ExpressionKind::Identifier(_) => return Ok(()),
                ExpressionKind::Index(index) => current = &index.object,
                _ => {
                    self.diagnostics
                        .push_error_with_span("invalid assignment target", Some(expression.span));
                    bail!(
                        "invalid assignment target at line {}, column {}",
                        expression.span.line,
                        expression.span.column
                    );
                }
            }
        }
    }

    fn parse_block(&mut self) -> Result<Block> {
        let open_token = self.peek().clone();
        self.expect_token(TokenKind::LBrace, "expected '{' to start block")?;

        let mut statements = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(self.error_at(&open_token, "unterminated block, expected '}'"));
            }
            statements.push(self.parse_statement()?);
        }
        let close_token = self.advance().clone();

        Ok(Block {
            statements,
            span: Self::union_spans(
                &Self::span_from_token(&open_token),
                &Self::span_from_token(&close_token),
            ),
        })
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_expression_prec(Precedence::Lowest)
    }

    fn parse_expression_prec(&mut self, precedence: Precedence) -> Result<Expression> {
        let mut expr = self.parse_prefix_expression()?;

        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    expr = self.finish_call(expr)?;
                    continue;
                }
                TokenKind::LBracket => {
                    expr = self.finish_index(expr)?;
                    continue;
                }
                TokenKind::Dot => {
                    expr = self.finish_method_call(expr)?;
                    continue;
                }
                _ => {}
            }

            let next_precedence = match Precedence::of(self.peek_kind()) {
                Some(p) => p,
                None => break,
            };

            if precedence >= next_precedence {
                break;
            }

            expr = self.parse_infix_expression(expr, next_precedence)?;
        }

        Ok(expr)
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let token = self.advance().clone();
        let token_span = Self::span_from_token(&token);
        match token.kind {
            TokenKind::Identifier => Ok(Self::make_expression(
                token_span,
                ExpressionKind::Identifier(Identifier {
                    name: token.lexeme,
                    span: token_span,
                }),
            )),
            TokenKind::IntegerLiteral(value) => Ok(Self::make_expression(
                token_span,
                ExpressionKind::Literal(Literal::Integer(value)),
            )),
            TokenKind::FloatLiteral(value) => Ok(Self::make_expression(
                token_span,
                ExpressionKind::Literal(Literal::Float(value)),
            )),
            TokenKind::StringLiteral(ref string) => Ok(Self::make_expression(
                token_span,
                ExpressionKind::Literal(Literal::String(string.clone())),
            )),
            TokenKind::BooleanLiteral(value) => Ok(Self::make_expression(
                token_span,
                ExpressionKind::Literal(Literal::Boolean(value)),
            )),
            TokenKind::Minus | TokenKind::Bang | TokenKind::Hash => {
                let operator = match token.kind {
                    TokenKind::Minus => UnaryOperator::Negative,
                    TokenKind::Bang => UnaryOperator::Not,
                    _ => UnaryOperator::Length,
                };
                let operand = self.parse_expression_prec(Precedence::Unary)?;
                let span = Self::union_spans(&token_span, &operand.span);
                Ok(Self::make_expression(
                    span,
                    ExpressionKind::Unary(UnaryExpression {
                        operator,
                        operand: Box::new(operand),
                    }),
                ))
            }
            TokenKind::LParen => {
                let expr = self.parse_expression()?;
                let closing_token = self.peek().clone();
                self.expect_token(TokenKind::RParen, "expected ')' after expression")?;
                let closing_span = Self::span_from_token(&closing_token);
                let span =
                    Self::union_spans(&token_span, &Self::union_spans(&expr.span, &closing_span));
                Ok(Self::make_expression(
                    span,
                    ExpressionKind::Grouping(Box::new(expr)),
                ))
            }
            TokenKind::LBracket => self.parse_array_literal(token_span),
            _ => {
                let message = if matches!(token.kind, TokenKind::Eof) {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected token '{}'", token.lexeme)
                };
                Err(self.error_at(&token, message))
            }
        }
    }

    fn parse_array_literal(&mut self, opening_span: SourceSpan) -> Result<Expression> {
        let mut elements = Vec::new();

        if !matches!(self.peek_kind(), TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if matches!(self.peek_kind(), TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }

        let closing_token = self.peek().clone();
        self.expect_token(TokenKind::RBracket, "expected ']' to close array literal")?;
        let span = Self::union_spans(&opening_span, &Self::span_from_token(&closing_token));

        Ok(Self::make_expression(
            span,
            ExpressionKind::Array(ArrayLiteral { elements }),
        ))
    }

    fn parse_infix_expression(
        &mut self,
        left: Expression,
        precedence: Precedence,
    ) -> Result<Expression> {
        let operator_token = self.advance().clone();
        let operator = binary_operator_from_token(&operator_token.kind)?;
        // `**` is right associative: the right operand may contain another `**`.
        let right_precedence = if operator == BinaryOperator::Power {
            Precedence::Factor
        } else {
            precedence
        };
        let right = self.parse_expression_prec(right_precedence)?;
        let span = Self::union_spans(&left.span, &right.span);

        Ok(Self::make_expression(
            span,
            ExpressionKind::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
        ))
    }

    /// Consumes arguments up to and including the closing `)`, which must follow an
    /// already consumed `(`. Returns the span of the closing parenthesis.
    fn parse_arguments(&mut self) -> Result<(Vec<Expression>, SourceSpan)> {
        let mut arguments = Vec::new();

        if !matches!(self.peek_kind(), TokenKind::RParen) {
            loop {
                arguments.push(self.parse_argument()?);
                match self.peek_kind() {
                    TokenKind::Comma => {
                        self.advance();
                    }
                    TokenKind::RParen => break,
                    _ => {
                        let token = self.peek().clone();
                        return Err(self.error_at(
                            &token,
                            format!(
                                "expected ',' or ')' in argument list, found '{}'",
                                token.lexeme
                            ),
                        ));
                    }
                }
            }
        }

        let closing_token = self.advance().clone();
        Ok((arguments, Self::span_from_token(&closing_token)))
    }

    fn parse_argument(&mut self) -> Result<Expression> {
        let is_lambda = matches!(self.peek_kind(), TokenKind::Identifier)
            && matches!(self.peek_kind_at(1), Some(TokenKind::Colon));
        if !is_lambda {
            return self.parse_expression();
        }

        let parameter_token = self.advance().clone();
        let parameter_span = Self::span_from_token(&parameter_token);
        self.advance(); // consume ':'
        let type_annotation = self.parse_type_expression()?;
        self.expect_token(TokenKind::FatArrow, "expected '=>' after lambda parameter")?;
        let body = self.parse_expression()?;
        let span = Self::union_spans(&parameter_span, &body.span);

        Ok(Self::make_expression(
            span,
            ExpressionKind::Lambda(LambdaExpression {
                parameter: Identifier {
                    name: parameter_token.lexeme,
                    span: parameter_span,
                },
                type_annotation,
                body: Box::new(body),
            }),
        ))
    }

    fn finish_call(&mut self, callee: Expression) -> Result<Expression> {
        let open_token = self.advance().clone();
        let callee = match callee.kind {
            ExpressionKind::Identifier(identifier) => identifier,
            _ => return Err(self.error_at(&open_token, "only named functions can be called")),
        };
        let (arguments, closing_span) = self.parse_arguments()?;
        let span = Self::union_spans(&callee.span, &closing_span);

        Ok(Self::make_expression(
            span,
            ExpressionKind::Call(CallExpression { callee, arguments }),
        ))
    }

    fn finish_index(&mut self, object: Expression) -> Result<Expression> {
        self.advance(); // consume '['
        let index = self.parse_expression()?;
        let closing_token = self.peek().clone();
        self.expect_token(TokenKind::RBracket, "expected ']' after index expression")?;
        let span = Self::union_spans(&object.span, &Self::span_from_token(&closing_token));

        Ok(Self::make_expression(
            span,
            ExpressionKind::Index(IndexExpression {
                object: Box::new(object),
                index: Box::new(index),
            }),
        ))
    }

    fn finish_method_call(&mut self, receiver: Expression) -> Result<Expression> {
        self.advance(); // consume '.'
        let name_token = self.expect_identifier("expected method name after '.'")?;
        let method = Identifier {
            span: Self::span_from_token(&name_token),
            name: name_token.lexeme,
        };
        self.expect_token(
            TokenKind::LParen,
            &format!("expected '(' after method name '{}'", method.name),
        )?;
        let (arguments, closing_span) = self.parse_arguments()?;
        let span = Self::union_spans(&receiver.span, &closing_span);

        Ok(Self::make_expression(
            span,
            ExpressionKind::MethodCall(MethodCallExpression {
                receiver: Box::new(receiver),
                method,
                arguments,
            }),
        ))
    }

    fn error_at(&mut self, token: &Token, message: impl Into<String>) -> anyhow::Error {
        let message = message.into();
        self.diagnostics
            .push_error_with_span(message.clone(), Some(Self::span_from_token(token)));
        anyhow!(
            "{} at line {}, column {}",
            message,
            token.line,
            token.column
        )
    }

    fn expect_token(&mut self, expected: TokenKind, message: &str) -> Result<()> {
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(&expected) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(self.error_at(&token, format!("{} (found '{}')", message, token.lexeme)))
        }
    }

    fn expect_semicolon(&mut self, message: &str) -> Result<SourceSpan> {
        let token = self.peek().clone();
        self.expect_token(TokenKind::Semicolon, message)?;
        Ok(Self::span_from_token(&token))
    }

    fn expect_identifier(&mut self, message: &str) -> Result<Token> {
        let token = self.peek().clone();
        if matches!(token.kind, TokenKind::Identifier) {
            self.advance();
            Ok(token)
        } else {
            Err(self.error_at(&token, format!("{} (found '{}')", message, token.lexeme)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword, message: &str) -> Result<()> {
        if matches!(self.peek_kind(), TokenKind::Keyword(kw) if *kw == keyword) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek().clone();
            Err(self.error_at(&token, message))
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.current].kind
    }

    fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens
            .get(self.current + offset)
            .map(|token| token.kind.clone())
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
            &self.tokens[self.current - 1]
        } else {
            &self.tokens[self.current]
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }
}

fn update_operator_from_token(kind: &TokenKind) -> Result<UpdateOperator> {
    match kind {
        TokenKind::PlusPlus => Ok(UpdateOperator::Increment),
        TokenKind::MinusMinus => Ok(UpdateOperator::Decrement),
        other => bail!("unsupported update operator {:?}", other),
    }
}

fn binary_operator_from_token(kind: &TokenKind) -> Result<BinaryOperator> {
    let operator = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulo,
        TokenKind::StarStar => BinaryOperator::Power,
        TokenKind::DoubleEqual => BinaryOperator::Equal,
        TokenKind::BangEqual => BinaryOperator::NotEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::AmpersandAmpersand => BinaryOperator::And,
        TokenKind::PipePipe => BinaryOperator::Or,
        other => bail!("unsupported binary operator {:?}", other),
    };
    Ok(operator)
}
