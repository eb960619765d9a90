//! Syntax tree node definitions.
//!
//! This is the shape the parser hands to the binder. Nodes live in a
//! [`SyntaxArena`](quill_core::SyntaxArena) and reference their children by
//! `&'a` borrows; identifier and string text is arena-allocated as well, so
//! no node owns heap memory.

use crate::syntax_kind::SyntaxKind;
use quill_core::text::TextRange;

/// Node ID for referencing syntax nodes from symbols.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);
}

/// Common data shared by all syntax nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub id: NodeId,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, range: TextRange, id: NodeId) -> Self {
        Self { kind, range, id }
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An operator or keyword token.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub data: NodeData,
}

impl Token {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    pub text: &'a str,
}

// ============================================================================
// Compilation unit and members
// ============================================================================

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub data: NodeData,
    pub members: NodeList<'a, Member<'a>>,
    /// File name reported in diagnostics, if the unit came from a file.
    pub file_name: Option<&'a str>,
}

#[derive(Debug)]
pub enum Member<'a> {
    Function(FunctionDeclaration<'a>),
    GlobalStatement(GlobalStatement<'a>),
}

#[derive(Debug)]
pub struct GlobalStatement<'a> {
    pub data: NodeData,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub parameters: NodeList<'a, Parameter<'a>>,
    /// `None` declares a Void function.
    pub return_type: Option<TypeClause<'a>>,
    pub body: &'a BlockStatement<'a>,
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub type_clause: TypeClause<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeClause<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    Block(BlockStatement<'a>),
    VariableDeclaration(VariableDeclaration<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    DoWhile(DoWhileStatement<'a>),
    For(ForStatement<'a>),
    Break(Token),
    Continue(Token),
    Return(ReturnStatement<'a>),
    Expression(ExpressionStatement<'a>),
}

impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Block(n) => &n.data,
            Statement::VariableDeclaration(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::DoWhile(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::Break(n) | Statement::Continue(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Expression(n) => &n.data,
        }
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data().range
    }
}

#[derive(Debug)]
pub struct BlockStatement<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    /// `let` (read-only) or `var` (mutable).
    pub keyword: Token,
    pub identifier: Identifier<'a>,
    pub type_clause: Option<TypeClause<'a>>,
    pub initializer: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_statement: Option<&'a Statement<'a>>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct DoWhileStatement<'a> {
    pub data: NodeData,
    pub body: &'a Statement<'a>,
    pub condition: &'a Expression<'a>,
}

/// `for identifier in range { body }`
#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub identifier: Identifier<'a>,
    pub range: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub keyword_range: TextRange,
    pub expression: Option<&'a Expression<'a>>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Literal(LiteralExpression<'a>),
    Name(NameExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    Unary(UnaryExpression<'a>),
    Binary(BinaryExpression<'a>),
    Range(RangeExpression<'a>),
    Parenthesized(ParenthesizedExpression<'a>),
    Call(CallExpression<'a>),
}

impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Literal(n) => &n.data,
            Expression::Name(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Range(n) => &n.data,
            Expression::Parenthesized(n) => &n.data,
            Expression::Call(n) => &n.data,
        }
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data().range
    }
}

/// A literal value as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'a str),
}

#[derive(Debug)]
pub struct LiteralExpression<'a> {
    pub data: NodeData,
    pub value: LiteralValue<'a>,
}

#[derive(Debug)]
pub struct NameExpression<'a> {
    pub data: NodeData,
    pub identifier: Identifier<'a>,
}

/// `identifier = expression` or a compound form such as `identifier += expression`.
#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub data: NodeData,
    pub identifier: Identifier<'a>,
    pub operator_token: Token,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator_token: Token,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator_token: Token,
    pub right: &'a Expression<'a>,
}

/// `lower..upper`
#[derive(Debug)]
pub struct RangeExpression<'a> {
    pub data: NodeData,
    pub lower: &'a Expression<'a>,
    pub upper: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ParenthesizedExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub identifier: Identifier<'a>,
    pub arguments: NodeList<'a, &'a Expression<'a>>,
}
