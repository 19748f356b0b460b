/// Lexer for tokenizing docql statements
///
/// Converts raw query text into a stream of tokens for parsing.
use std::fmt;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Statement keywords
    Select,
    Delete,
    Insert,
    Update,

    // Clause keywords
    From,
    Where,
    OrderBy,
    Asc,
    Desc,
    Skip,
    Limit,

    // Predicate keywords
    And,
    Or,
    Not,
    Like,
    In,
    Between,
    Convert,

    // Operators
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=

    // Literals
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    /// A `{...}` object or `[...]` array literal
    Json(serde_json::Value),

    /// @name, :name, ?N or ?
    Parameter(String),

    // Identifiers
    Identifier(String),

    // Punctuation
    Asterisk,   // *
    Comma,      // ,
    LeftParen,  // (
    RightParen, // )

    // End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::Delete => write!(f, "DELETE"),
            Token::Insert => write!(f, "INSERT"),
            Token::Update => write!(f, "UPDATE"),
            Token::From => write!(f, "FROM"),
            Token::Where => write!(f, "WHERE"),
            Token::OrderBy => write!(f, "ORDER BY"),
            Token::Asc => write!(f, "ASC"),
            Token::Desc => write!(f, "DESC"),
            Token::Skip => write!(f, "SKIP"),
            Token::Limit => write!(f, "LIMIT"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::Like => write!(f, "LIKE"),
            Token::In => write!(f, "IN"),
            Token::Between => write!(f, "BETWEEN"),
            Token::Convert => write!(f, "CONVERT"),
            Token::Eq => write!(f, "="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Integer(i) => write!(f, "{}", i),
            Token::Float(fl) => write!(f, "{}", fl),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Null => write!(f, "NULL"),
            Token::Json(json) => write!(f, "{}", json),
            Token::Parameter(name) => write!(f, "@{}", name),
            Token::Identifier(id) => write!(f, "{}", id),
            Token::Asterisk => write!(f, "*"),
            Token::Comma => write!(f, ","),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer state
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    // Next position handed to a bare `?`
    next_positional: usize,
}

impl Lexer {
    /// Create a new lexer from input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            next_positional: 1,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();

        // Single-character tokens
        match ch {
            '*' => {
                self.advance();
                return Ok(Token::Asterisk);
            }
            ',' => {
                self.advance();
                return Ok(Token::Comma);
            }
            '(' => {
                self.advance();
                return Ok(Token::LeftParen);
            }
            ')' => {
                self.advance();
                return Ok(Token::RightParen);
            }
            '=' => {
                self.advance();
                return Ok(Token::Eq);
            }
            '<' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Ok(Token::Le);
                }
                return Ok(Token::Lt);
            }
            '>' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Ok(Token::Ge);
                }
                return Ok(Token::Gt);
            }
            '!' => {
                self.advance();
                if self.peek_is('=') {
                    self.advance();
                    return Ok(Token::Ne);
                }
                return Err(LexerError::UnexpectedCharacter(ch));
            }
            '\'' | '"' => return self.read_string(ch),
            '{' | '[' => return self.read_json(),
            '@' | ':' => return self.read_named_parameter(ch),
            '?' => return self.read_positional_parameter(),
            _ => {}
        }

        // Numbers, optionally signed
        if ch.is_ascii_digit()
            || (ch == '-' && self.peek_char().is_some_and(|c| c.is_ascii_digit()))
        {
            return self.read_number();
        }

        // Identifiers and keywords
        if ch.is_alphabetic() || ch == '_' {
            return self.read_identifier_or_keyword();
        }

        Err(LexerError::UnexpectedCharacter(ch))
    }

    /// Tokenize entire input into vector of tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    // Whether the character at the current position is `expected`
    fn peek_is(&self, expected: char) -> bool {
        self.input.get(self.position) == Some(&expected)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn read_number(&mut self) -> Result<Token, LexerError> {
        let start = self.position;
        let mut has_dot = false;

        if self.current_char() == '-' {
            self.advance();
        }

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot && self.peek_char().is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let num_str: String = self.input[start..self.position].iter().collect();

        if has_dot {
            num_str
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| LexerError::InvalidNumber(num_str))
        } else {
            num_str
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| LexerError::InvalidNumber(num_str))
        }
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexerError> {
        self.advance(); // skip opening quote
        let mut string = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch == quote {
                self.advance(); // skip closing quote
                return Ok(Token::String(string));
            }
            if ch == '\\' {
                self.advance();
                if self.position >= self.input.len() {
                    break;
                }
                string.push(match self.current_char() {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            } else {
                string.push(ch);
            }
            self.advance();
        }

        Err(LexerError::UnterminatedString)
    }

    /// Scan a balanced `{...}` or `[...]` block and decode it as JSON.
    fn read_json(&mut self) -> Result<Token, LexerError> {
        let start = self.position;
        let mut depth = 0usize;
        let mut in_string = false;

        while self.position < self.input.len() {
            let ch = self.current_char();
            if in_string {
                match ch {
                    '\\' => self.advance(),
                    '"' => in_string = false,
                    _ => {}
                }
            } else {
                match ch {
                    '"' => in_string = true,
                    '{' | '[' => depth += 1,
                    '}' | ']' => {
                        depth -= 1;
                        if depth == 0 {
                            self.advance();
                            let text: String = self.input[start..self.position].iter().collect();
                            return serde_json::from_str(&text)
                                .map(Token::Json)
                                .map_err(|e| LexerError::InvalidJson(e.to_string()));
                        }
                    }
                    _ => {}
                }
            }
            self.advance();
        }

        Err(LexerError::UnterminatedDocument)
    }

    fn read_named_parameter(&mut self, sigil: char) -> Result<Token, LexerError> {
        self.advance(); // skip sigil
        let start = self.position;

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if start == self.position {
            return Err(LexerError::UnexpectedCharacter(sigil));
        }

        let name: String = self.input[start..self.position].iter().collect();
        Ok(Token::Parameter(name))
    }

    fn read_positional_parameter(&mut self) -> Result<Token, LexerError> {
        self.advance(); // skip '?'
        let start = self.position;

        while self.position < self.input.len() && self.current_char().is_ascii_digit() {
            self.advance();
        }

        if start == self.position {
            let name = self.next_positional.to_string();
            self.next_positional += 1;
            return Ok(Token::Parameter(name));
        }

        let digits: String = self.input[start..self.position].iter().collect();
        let position = digits
            .parse::<usize>()
            .map_err(|_| LexerError::InvalidNumber(digits))?;
        Ok(Token::Parameter(position.to_string()))
    }

    fn read_identifier_or_keyword(&mut self) -> Result<Token, LexerError> {
        let start = self.position;

        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        let uppercase = text.to_uppercase();

        // Check for multi-word keywords (ORDER BY)
        if uppercase == "ORDER" {
            let rollback = self.position;
            self.skip_whitespace();
            let next_start = self.position;
            while self.position < self.input.len() && self.current_char().is_alphabetic() {
                self.advance();
            }
            let next_text: String = self.input[next_start..self.position].iter().collect();
            if next_text.eq_ignore_ascii_case("BY") {
                return Ok(Token::OrderBy);
            }
            // Rollback if not followed by BY
            self.position = rollback;
        }

        // Match keywords
        let token = match uppercase.as_str() {
            "SELECT" => Token::Select,
            "DELETE" => Token::Delete,
            "INSERT" => Token::Insert,
            "UPDATE" => Token::Update,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "SKIP" => Token::Skip,
            "LIMIT" => Token::Limit,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "LIKE" => Token::Like,
            "IN" => Token::In,
            "BETWEEN" => Token::Between,
            "CONVERT" => Token::Convert,
            "TRUE" => Token::Boolean(true),
            "FALSE" => Token::Boolean(false),
            "NULL" => Token::Null,
            _ => Token::Identifier(text),
        };

        Ok(token)
    }
}

/// Lexer errors
#[derive(Debug, Clone, PartialEq)]
pub enum LexerError {
    UnexpectedCharacter(char),
    InvalidNumber(String),
    UnterminatedString,
    UnterminatedDocument,
    InvalidJson(String),
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::UnexpectedCharacter(ch) => write!(f, "Unexpected character: '{}'", ch),
            LexerError::InvalidNumber(s) => write!(f, "Invalid number: '{}'", s),
            LexerError::UnterminatedString => write!(f, "Unterminated string literal"),
            LexerError::UnterminatedDocument => write!(f, "Unterminated document literal"),
            LexerError::InvalidJson(e) => write!(f, "Invalid document literal: {}", e),
        }
    }
}

impl std::error::Error for LexerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let mut lexer = Lexer::new("SELECT * FROM God");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Select,
                Token::Asterisk,
                Token::From,
                Token::Identifier("God".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let mut lexer = Lexer::new("select name from God where age > 18 skip 1 limit 2");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::Select);
        assert_eq!(tokens[1], Token::Identifier("name".to_string()));
        assert_eq!(tokens[2], Token::From);
        assert_eq!(tokens[4], Token::Where);
        assert_eq!(tokens[6], Token::Gt);
        assert_eq!(tokens[7], Token::Integer(18));
        assert_eq!(tokens[8], Token::Skip);
        assert_eq!(tokens[10], Token::Limit);
    }

    #[test]
    fn test_string_literals() {
        let mut lexer = Lexer::new(r#"'Ada' "Diana" "say \"hi\"""#);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::String("Ada".to_string()));
        assert_eq!(tokens[1], Token::String("Diana".to_string()));
        assert_eq!(tokens[2], Token::String("say \"hi\"".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("name = 'Ada");
        assert_eq!(lexer.tokenize(), Err(LexerError::UnterminatedString));
    }

    #[test]
    fn test_order_by() {
        let mut lexer = Lexer::new("FROM God order  by name DESC");
        let tokens = lexer.tokenize().unwrap();

        assert!(tokens.contains(&Token::OrderBy));
        assert!(tokens.contains(&Token::Desc));
    }

    #[test]
    fn test_order_without_by_is_identifier() {
        let mut lexer = Lexer::new("order = 1");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::Identifier("order".to_string()));
        assert_eq!(tokens[1], Token::Eq);
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("= != < <= > >=");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Eq,
                Token::Ne,
                Token::Lt,
                Token::Le,
                Token::Gt,
                Token::Ge,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 10.23 -7");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Integer(42),
                Token::Float(10.23),
                Token::Integer(-7),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_parameters() {
        let mut lexer = Lexer::new("@age :name ? ?5 ?");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Parameter("age".to_string()),
                Token::Parameter("name".to_string()),
                Token::Parameter("1".to_string()),
                Token::Parameter("5".to_string()),
                Token::Parameter("2".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_json_literal() {
        let mut lexer = Lexer::new(r#"{"name": "Ada", "tags": ["a}", "b"]} [1, 2]"#);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(
            tokens[0],
            Token::Json(serde_json::json!({"name": "Ada", "tags": ["a}", "b"]}))
        );
        assert_eq!(tokens[1], Token::Json(serde_json::json!([1, 2])));
    }

    #[test]
    fn test_bad_json_literal() {
        let mut lexer = Lexer::new("{name: 1}");
        assert!(matches!(lexer.tokenize(), Err(LexerError::InvalidJson(_))));

        let mut lexer = Lexer::new("{\"name\": 1");
        assert_eq!(lexer.tokenize(), Err(LexerError::UnterminatedDocument));
    }
}
