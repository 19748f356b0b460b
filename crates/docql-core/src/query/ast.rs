/// Abstract Syntax Tree (AST) node types for docql statements
///
/// Defines the structure of parsed SELECT, DELETE, INSERT and UPDATE
/// statements and of their WHERE predicates.
use std::fmt;

/// A complete statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Delete(DeleteStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
}

/// SELECT [fields] FROM entity [WHERE ...] [ORDER BY ...] [SKIP n] [LIMIT n]
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub entity: String,
    /// Empty for `*` or an omitted field list
    pub fields: Vec<String>,
    pub where_clause: Option<WhereClause>,
    pub order_by: Vec<OrderByColumn>,
    pub skip: i64,
    pub limit: i64,
}

/// DELETE [fields] FROM entity [WHERE ...]
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub entity: String,
    pub fields: Vec<String>,
    pub where_clause: Option<WhereClause>,
}

/// INSERT entity body [ttl]
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub entity: String,
    pub body: EntityBody,
    pub ttl: Option<Ttl>,
}

/// UPDATE entity body
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub entity: String,
    pub body: EntityBody,
}

/// The values written by INSERT or UPDATE
#[derive(Debug, Clone, PartialEq)]
pub enum EntityBody {
    /// (field = value, ...)
    Assignments(Vec<Assignment>),
    /// {"field": value, ...}
    Json(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: String,
    pub value: Operand,
}

/// Trailing time-to-live on INSERT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl {
    pub amount: i64,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Nanosecond,
}

impl TimeUnit {
    /// Resolve a unit keyword, singular or plural, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "day" => Some(TimeUnit::Day),
            "hour" => Some(TimeUnit::Hour),
            "minute" => Some(TimeUnit::Minute),
            "second" => Some(TimeUnit::Second),
            "millisecond" => Some(TimeUnit::Millisecond),
            "nanosecond" => Some(TimeUnit::Nanosecond),
            _ => None,
        }
    }
}

/// WHERE clause for filtering
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub condition: Expression,
}

/// Boolean predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// field <op> value
    Comparison {
        field: String,
        op: ComparisonOperator,
        value: Operand,
    },
    /// field LIKE pattern
    Like { field: String, pattern: Operand },
    /// field IN (value, ...)
    In { field: String, values: Vec<Operand> },
    /// field BETWEEN low AND high
    Between {
        field: String,
        low: Operand,
        high: Operand,
    },
    Not(Box<Expression>),
    /// Operands of a chain of ANDs, in source order
    And(Vec<Expression>),
    /// Operands of a chain of ORs, in source order
    Or(Vec<Expression>),
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq, // =
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
}

/// Right-hand side of a predicate or assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    /// @name, :name, ?N
    Parameter(String),
    /// convert(value, type)
    Convert {
        value: Box<Operand>,
        target: String,
    },
}

/// Literal values in statements
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    /// Structured-document literal: a JSON object or array
    Json(serde_json::Value),
}

/// A field in ORDER BY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByColumn {
    pub column: String,
    pub direction: OrderDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

// Display implementations for debugging and error messages

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(s) => write!(f, "{}", s),
            Statement::Delete(s) => write!(f, "{}", s),
            Statement::Insert(s) => write!(f, "{}", s),
            Statement::Update(s) => write!(f, "{}", s),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[String]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", field)?;
    }
    Ok(())
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.fields.is_empty() {
            write!(f, "*")?;
        } else {
            write_fields(f, &self.fields)?;
        }
        write!(f, " FROM {}", self.entity)?;
        if let Some(ref where_clause) = self.where_clause {
            write!(f, " {}", where_clause)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, col) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", col)?;
            }
        }
        if self.skip != 0 {
            write!(f, " SKIP {}", self.skip)?;
        }
        if self.limit != 0 {
            write!(f, " LIMIT {}", self.limit)?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE ")?;
        if !self.fields.is_empty() {
            write_fields(f, &self.fields)?;
            write!(f, " ")?;
        }
        write!(f, "FROM {}", self.entity)?;
        if let Some(ref where_clause) = self.where_clause {
            write!(f, " {}", where_clause)?;
        }
        Ok(())
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT {} {}", self.entity, self.body)?;
        if let Some(ttl) = self.ttl {
            write!(f, " {}", ttl)?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UPDATE {} {}", self.entity, self.body)
    }
}

impl fmt::Display for EntityBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityBody::Assignments(assignments) => {
                write!(f, "(")?;
                for (i, a) in assignments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", a.field, a.value)?;
                }
                write!(f, ")")
            }
            EntityBody::Json(map) => {
                write!(f, "{}", serde_json::Value::Object(map.clone()))
            }
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Day => write!(f, "DAY"),
            TimeUnit::Hour => write!(f, "HOUR"),
            TimeUnit::Minute => write!(f, "MINUTE"),
            TimeUnit::Second => write!(f, "SECOND"),
            TimeUnit::Millisecond => write!(f, "MILLISECOND"),
            TimeUnit::Nanosecond => write!(f, "NANOSECOND"),
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WHERE {}", self.condition)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison { field, op, value } => {
                write!(f, "{} {} {}", field, op, value)
            }
            Expression::Like { field, pattern } => write!(f, "{} LIKE {}", field, pattern),
            Expression::In { field, values } => {
                write!(f, "{} IN (", field)?;
                for (i, val) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, ")")
            }
            Expression::Between { field, low, high } => {
                write!(f, "{} BETWEEN {} AND {}", field, low, high)
            }
            Expression::Not(expr) => write!(f, "NOT ({})", expr),
            Expression::And(operands) | Expression::Or(operands) => {
                let joiner = if matches!(self, Expression::And(_)) {
                    "AND"
                } else {
                    "OR"
                };
                write!(f, "(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", joiner)?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Eq => write!(f, "="),
            ComparisonOperator::Ne => write!(f, "!="),
            ComparisonOperator::Lt => write!(f, "<"),
            ComparisonOperator::Le => write!(f, "<="),
            ComparisonOperator::Gt => write!(f, ">"),
            ComparisonOperator::Ge => write!(f, ">="),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(lit) => write!(f, "{}", lit),
            Operand::Parameter(name) => write!(f, "@{}", name),
            Operand::Convert { value, target } => write!(f, "convert({}, {})", value, target),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(fl) => write!(f, "{}", fl),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "NULL"),
            Literal::Json(json) => write!(f, "{}", json),
        }
    }
}

impl fmt::Display for OrderByColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}
