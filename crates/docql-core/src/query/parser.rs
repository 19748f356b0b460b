/// Parser for docql statements
///
/// Converts a stream of tokens into an Abstract Syntax Tree (AST).
use super::ast::*;
use super::lexer::{Lexer, LexerError, Token};
use crate::config::QueryConfig;
use std::fmt;

/// Parser for docql statements
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Create a new parser from query text with default limits
    pub fn new(input: &str) -> Result<Self, ParseError> {
        Self::with_config(input, &QueryConfig::default())
    }

    /// Create a new parser from query text with the given limits
    pub fn with_config(input: &str, config: &QueryConfig) -> Result<Self, ParseError> {
        if input.len() > config.max_query_length {
            return Err(ParseError::QueryTooLong {
                length: input.len(),
                max: config.max_query_length,
            });
        }
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().map_err(ParseError::LexerError)?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: config.max_nesting_depth,
        })
    }

    /// Parse any statement, choosing the kind from its leading keyword
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        match self.current_token() {
            Token::Delete => self.parse_delete().map(Statement::Delete),
            Token::Insert => self.parse_insert().map(Statement::Insert),
            Token::Update => self.parse_update().map(Statement::Update),
            _ => self.parse_select().map(Statement::Select),
        }
    }

    /// `[SELECT [fields]] FROM entity [WHERE ...] [ORDER BY ...] [SKIP n] [LIMIT n]`
    pub fn parse_select(&mut self) -> Result<SelectStatement, ParseError> {
        if self.current_token() == &Token::Select {
            self.advance();
        }
        let fields = self.parse_field_list()?;
        self.expect_token(Token::From)?;
        let entity = self.parse_identifier("entity name")?;
        let where_clause = self.parse_where()?;
        let order_by = self.parse_order_by()?;
        let skip = self.parse_count(Token::Skip)?;
        let limit = self.parse_count(Token::Limit)?;

        self.expect_token(Token::Eof)?;

        Ok(SelectStatement {
            entity,
            fields,
            where_clause,
            order_by,
            skip,
            limit,
        })
    }

    /// `DELETE [fields] FROM entity [WHERE ...]`
    pub fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_token(Token::Delete)?;
        let fields = self.parse_field_list()?;
        self.expect_token(Token::From)?;
        let entity = self.parse_identifier("entity name")?;
        let where_clause = self.parse_where()?;

        self.expect_token(Token::Eof)?;

        Ok(DeleteStatement {
            entity,
            fields,
            where_clause,
        })
    }

    /// `INSERT entity (field = value, ...) [ttl]` or `INSERT entity {json} [ttl]`
    pub fn parse_insert(&mut self) -> Result<InsertStatement, ParseError> {
        self.expect_token(Token::Insert)?;
        let entity = self.parse_identifier("entity name")?;
        let body = self.parse_entity_body()?;
        let ttl = self.parse_ttl()?;

        self.expect_token(Token::Eof)?;

        Ok(InsertStatement { entity, body, ttl })
    }

    /// `UPDATE entity (field = value, ...)` or `UPDATE entity {json}`
    pub fn parse_update(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_token(Token::Update)?;
        let entity = self.parse_identifier("entity name")?;
        let body = self.parse_entity_body()?;

        self.expect_token(Token::Eof)?;

        Ok(UpdateStatement { entity, body })
    }

    fn parse_field_list(&mut self) -> Result<Vec<String>, ParseError> {
        match self.current_token() {
            Token::Asterisk => {
                self.advance();
                return Ok(Vec::new());
            }
            Token::From => return Ok(Vec::new()),
            _ => {}
        }

        let mut fields = Vec::new();
        loop {
            fields.push(self.parse_identifier("field name or *")?);

            if self.current_token() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(fields)
    }

    fn parse_entity_body(&mut self) -> Result<EntityBody, ParseError> {
        match self.current_token().clone() {
            Token::LeftParen => {
                self.advance();
                let mut assignments = Vec::new();
                loop {
                    let field = self.parse_identifier("field name")?;
                    self.expect_token(Token::Eq)?;
                    let value = self.parse_operand()?;
                    assignments.push(Assignment { field, value });

                    if self.current_token() == &Token::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect_token(Token::RightParen)?;
                Ok(EntityBody::Assignments(assignments))
            }
            Token::Json(serde_json::Value::Object(map)) => {
                self.advance();
                Ok(EntityBody::Json(map))
            }
            token => Err(ParseError::UnexpectedToken {
                expected: "field assignments or document".to_string(),
                found: token,
            }),
        }
    }

    fn parse_ttl(&mut self) -> Result<Option<Ttl>, ParseError> {
        let amount = match self.current_token() {
            Token::Integer(n) => *n,
            _ => return Ok(None),
        };
        self.advance();

        match self.current_token().clone() {
            Token::Identifier(name) => {
                let unit =
                    TimeUnit::from_name(&name).ok_or(ParseError::UnknownTimeUnit(name))?;
                self.advance();
                Ok(Some(Ttl { amount, unit }))
            }
            token => Err(ParseError::UnexpectedToken {
                expected: "time unit".to_string(),
                found: token,
            }),
        }
    }

    fn parse_where(&mut self) -> Result<Option<WhereClause>, ParseError> {
        if self.current_token() != &Token::Where {
            return Ok(None);
        }

        self.advance();
        let condition = self.parse_expression()?;

        Ok(Some(WhereClause { condition }))
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_logical_and()?;
        if self.current_token() != &Token::Or {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.current_token() == &Token::Or {
            self.advance();
            operands.push(self.parse_logical_and()?);
        }
        Ok(Expression::Or(operands))
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_not()?;
        if self.current_token() != &Token::And {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.current_token() == &Token::And {
            self.advance();
            operands.push(self.parse_not()?);
        }
        Ok(Expression::And(operands))
    }

    fn parse_not(&mut self) -> Result<Expression, ParseError> {
        if self.current_token() == &Token::Not {
            self.advance();
            self.enter()?;
            let expr = self.parse_not()?;
            self.leave();
            return Ok(Expression::Not(Box::new(expr)));
        }

        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<Expression, ParseError> {
        if self.current_token() == &Token::LeftParen {
            self.advance();
            self.enter()?;
            let expr = self.parse_expression()?;
            self.leave();
            self.expect_token(Token::RightParen)?;
            return Ok(expr);
        }

        let field = self.parse_identifier("field name")?;

        // Handle LIKE
        if self.current_token() == &Token::Like {
            self.advance();
            let pattern = self.parse_operand()?;
            return Ok(Expression::Like { field, pattern });
        }

        // Handle IN
        if self.current_token() == &Token::In {
            self.advance();
            self.expect_token(Token::LeftParen)?;

            let mut values = Vec::new();
            loop {
                values.push(self.parse_operand()?);

                if self.current_token() == &Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }

            self.expect_token(Token::RightParen)?;

            return Ok(Expression::In { field, values });
        }

        // Handle BETWEEN
        if self.current_token() == &Token::Between {
            self.advance();
            let low = self.parse_operand()?;
            self.expect_token(Token::And)?;
            let high = self.parse_operand()?;

            return Ok(Expression::Between { field, low, high });
        }

        // Handle comparison operators
        let op = match self.current_token() {
            Token::Eq => ComparisonOperator::Eq,
            Token::Ne => ComparisonOperator::Ne,
            Token::Lt => ComparisonOperator::Lt,
            Token::Le => ComparisonOperator::Le,
            Token::Gt => ComparisonOperator::Gt,
            Token::Ge => ComparisonOperator::Ge,
            token => {
                return Err(ParseError::UnexpectedToken {
                    expected: "comparison operator".to_string(),
                    found: token.clone(),
                })
            }
        };

        self.advance();
        let value = self.parse_operand()?;

        Ok(Expression::Comparison { field, op, value })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let literal = match self.current_token().clone() {
            Token::Integer(i) => Literal::Integer(i),
            Token::Float(f) => Literal::Float(f),
            Token::String(s) => Literal::String(s),
            Token::Boolean(b) => Literal::Boolean(b),
            Token::Null => Literal::Null,
            Token::Json(json) => Literal::Json(json),
            Token::Parameter(name) => {
                self.advance();
                return Ok(Operand::Parameter(name));
            }
            Token::Convert => {
                self.advance();
                self.expect_token(Token::LeftParen)?;
                self.enter()?;
                let value = self.parse_operand()?;
                self.leave();
                self.expect_token(Token::Comma)?;
                let target = self.parse_identifier("type name")?;
                self.expect_token(Token::RightParen)?;
                return Ok(Operand::Convert {
                    value: Box::new(value),
                    target,
                });
            }
            token => {
                return Err(ParseError::UnexpectedToken {
                    expected: "value".to_string(),
                    found: token,
                })
            }
        };
        self.advance();
        Ok(Operand::Literal(literal))
    }

    fn parse_order_by(&mut self) -> Result<Vec<OrderByColumn>, ParseError> {
        if self.current_token() != &Token::OrderBy {
            return Ok(Vec::new());
        }

        self.advance();

        let mut columns = Vec::new();

        loop {
            let column = self.parse_identifier("field name")?;

            let direction = if self.current_token() == &Token::Desc {
                self.advance();
                OrderDirection::Desc
            } else {
                if self.current_token() == &Token::Asc {
                    self.advance();
                }
                OrderDirection::Asc
            };

            columns.push(OrderByColumn { column, direction });

            if self.current_token() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }

        Ok(columns)
    }

    // SKIP n / LIMIT n; absent means zero. Sign is checked by the caller.
    fn parse_count(&mut self, keyword: Token) -> Result<i64, ParseError> {
        if self.current_token() != &keyword {
            return Ok(0);
        }

        self.advance();

        if let Token::Integer(n) = self.current_token() {
            let count = *n;
            self.advance();
            Ok(count)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "integer".to_string(),
                found: self.current_token().clone(),
            })
        }
    }

    fn parse_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        if let Token::Identifier(name) = self.current_token().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_token().clone(),
            })
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn expect_token(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current_token() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("{}", expected),
                found: self.current_token().clone(),
            })
        }
    }
}

/// Parser errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    LexerError(LexerError),
    UnexpectedToken { expected: String, found: Token },
    UnknownTimeUnit(String),
    QueryTooLong { length: usize, max: usize },
    NestingTooDeep(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::LexerError(e) => write!(f, "Lexer error: {}", e),
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Expected {}, found {}", expected, found)
            }
            ParseError::UnknownTimeUnit(unit) => write!(f, "Unknown time unit: {}", unit),
            ParseError::QueryTooLong { length, max } => {
                write!(f, "Query is {} bytes long, the limit is {}", length, max)
            }
            ParseError::NestingTooDeep(max) => {
                write!(f, "Predicate nesting exceeds the limit of {}", max)
            }
        }
    }
}

impl std::error::Error for ParseError {}
