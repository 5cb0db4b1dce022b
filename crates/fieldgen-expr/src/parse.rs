//! Recursive-descent parser over the lexed token stream.
//!
//! The grammar is three productions:
//!
//! ```text
//! expr := string | 'tag' '.' ident | func '(' expr (',' expr)* ')' | var
//! ```

use logos::Logos;

use crate::ast::{Expr, Func, Var};
use crate::error::ExprError;
use crate::lex::Token;

pub(crate) fn parse(src: &str) -> Result<Expr, ExprError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(src);
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(ExprError::Lex {
                    template: src.to_string(),
                    offset: lexer.span().start,
                });
            }
        }
    }

    let mut parser = Parser {
        src,
        tokens,
        pos: 0,
    };
    let expr = parser.expr()?;
    parser.end()?;
    Ok(expr)
}

struct Parser<'src> {
    src: &'src str,
    tokens: Vec<Token<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError::Parse {
            template: self.src.to_string(),
            message: message.into(),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some(Token::Str(value)) => Ok(Expr::Str(value)),
            Some(Token::Ident("tag")) => {
                match self.next() {
                    Some(Token::Dot) => {}
                    other => return Err(self.error(unexpected("`.` after `tag`", other))),
                }
                match self.next() {
                    Some(Token::Ident(name)) => Ok(Expr::Tag(name.to_string())),
                    other => Err(self.error(unexpected("tag name", other))),
                }
            }
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.call(name)
                } else if let Some(var) = Var::resolve(name) {
                    Ok(Expr::Var(var))
                } else {
                    Err(ExprError::UnknownIdent {
                        template: self.src.to_string(),
                        name: name.to_string(),
                    })
                }
            }
            other => Err(self.error(unexpected("expression", other))),
        }
    }

    fn call(&mut self, name: &str) -> Result<Expr, ExprError> {
        let func = Func::resolve(name).ok_or_else(|| ExprError::UnknownFunction {
            template: self.src.to_string(),
            name: name.to_string(),
        })?;
        self.next(); // consume `(`

        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RParen)) {
            self.next();
        } else {
            loop {
                args.push(self.expr()?);
                match self.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::RParen) => break,
                    other => return Err(self.error(unexpected("`,` or `)`", other))),
                }
            }
        }

        func.check_arity(args.len())
            .map_err(|expected| ExprError::WrongArity {
                template: self.src.to_string(),
                function: func.name(),
                expected,
                got: args.len(),
            })?;
        Ok(Expr::Call(func, args))
    }

    fn end(&mut self) -> Result<(), ExprError> {
        match self.next() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("unexpected trailing `{token}`"))),
        }
    }
}

fn unexpected(expected: &str, got: Option<Token<'_>>) -> String {
    match got {
        Some(token) => format!("expected {expected}, found `{token}`"),
        None => format!("expected {expected}, found end of template"),
    }
}
