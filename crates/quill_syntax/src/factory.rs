//! Node factory for building syntax trees without a parser.
//!
//! Every leaf receives a fresh, strictly increasing range and every node a
//! fresh [`NodeId`]; composite nodes cover the ranges of their children.
//! Diagnostics reported against factory-built trees therefore sort in the
//! order the tree was written.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use quill_core::arena::SyntaxArena;
use quill_core::text::TextRange;
use std::cell::Cell;

pub struct SyntaxFactory<'a> {
    arena: &'a SyntaxArena,
    next_pos: Cell<u32>,
    next_id: Cell<u32>,
}

impl<'a> SyntaxFactory<'a> {
    pub fn new(arena: &'a SyntaxArena) -> Self {
        Self {
            arena,
            next_pos: Cell::new(0),
            next_id: Cell::new(0),
        }
    }

    pub fn arena(&self) -> &'a SyntaxArena {
        self.arena
    }

    fn leaf_range(&self, width: u32) -> TextRange {
        let pos = self.next_pos.get();
        let width = width.max(1);
        // One column of separation between leaves.
        self.next_pos.set(pos + width + 1);
        TextRange::new(pos, pos + width)
    }

    fn data(&self, kind: SyntaxKind, range: TextRange) -> NodeData {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeData::new(kind, range, NodeId(id))
    }

    fn leaf(&self, kind: SyntaxKind, width: u32) -> NodeData {
        let range = self.leaf_range(width);
        self.data(kind, range)
    }

    fn expr(&self, expression: Expression<'a>) -> &'a Expression<'a> {
        self.arena.alloc(expression)
    }

    fn stmt(&self, statement: Statement<'a>) -> &'a Statement<'a> {
        self.arena.alloc(statement)
    }

    pub fn token(&self, kind: SyntaxKind) -> Token {
        let width = kind.text().map_or(1, |t| t.len() as u32);
        Token { data: self.leaf(kind, width) }
    }

    pub fn identifier(&self, text: &str) -> Identifier<'a> {
        let data = self.leaf(SyntaxKind::IdentifierToken, text.len() as u32);
        Identifier {
            data,
            text: self.arena.alloc_str(text),
        }
    }

    pub fn type_clause(&self, name: &str) -> TypeClause<'a> {
        let name = self.identifier(name);
        TypeClause {
            data: self.data(SyntaxKind::TypeClause, name.data.range),
            name,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn literal(&self, value: LiteralValue<'a>, width: u32) -> &'a Expression<'a> {
        let data = self.leaf(SyntaxKind::LiteralExpression, width);
        self.expr(Expression::Literal(LiteralExpression { data, value }))
    }

    pub fn int(&self, value: i64) -> &'a Expression<'a> {
        self.literal(LiteralValue::Int(value), value.to_string().len() as u32)
    }

    pub fn float(&self, value: f64) -> &'a Expression<'a> {
        self.literal(LiteralValue::Float(value), value.to_string().len() as u32)
    }

    pub fn bool(&self, value: bool) -> &'a Expression<'a> {
        self.literal(LiteralValue::Bool(value), if value { 4 } else { 5 })
    }

    pub fn string(&self, value: &str) -> &'a Expression<'a> {
        let text = self.arena.alloc_str(value);
        self.literal(LiteralValue::String(text), value.len() as u32 + 2)
    }

    pub fn name(&self, name: &str) -> &'a Expression<'a> {
        let identifier = self.identifier(name);
        let data = self.data(SyntaxKind::NameExpression, identifier.data.range);
        self.expr(Expression::Name(NameExpression { data, identifier }))
    }

    pub fn assign(&self, name: &str, expression: &'a Expression<'a>) -> &'a Expression<'a> {
        self.compound_assign(name, SyntaxKind::EqualsToken, expression)
    }

    /// `name op= expression`; `operator` must be an assignment token.
    pub fn compound_assign(
        &self,
        name: &str,
        operator: SyntaxKind,
        expression: &'a Expression<'a>,
    ) -> &'a Expression<'a> {
        debug_assert!(operator.is_assignment_operator());
        let identifier = self.identifier(name);
        let operator_token = self.token(operator);
        let range = identifier.data.range.cover(expression.range());
        let data = self.data(SyntaxKind::AssignmentExpression, range);
        self.expr(Expression::Assignment(AssignmentExpression {
            data,
            identifier,
            operator_token,
            expression,
        }))
    }

    pub fn unary(&self, operator: SyntaxKind, operand: &'a Expression<'a>) -> &'a Expression<'a> {
        let operator_token = self.token(operator);
        let range = operator_token.data.range.cover(operand.range());
        let data = self.data(SyntaxKind::UnaryExpression, range);
        self.expr(Expression::Unary(UnaryExpression {
            data,
            operator_token,
            operand,
        }))
    }

    pub fn binary(
        &self,
        left: &'a Expression<'a>,
        operator: SyntaxKind,
        right: &'a Expression<'a>,
    ) -> &'a Expression<'a> {
        let operator_token = self.token(operator);
        let range = left.range().cover(right.range());
        let data = self.data(SyntaxKind::BinaryExpression, range);
        self.expr(Expression::Binary(BinaryExpression {
            data,
            left,
            operator_token,
            right,
        }))
    }

    pub fn range(&self, lower: &'a Expression<'a>, upper: &'a Expression<'a>) -> &'a Expression<'a> {
        let range = lower.range().cover(upper.range());
        let data = self.data(SyntaxKind::RangeExpression, range);
        self.expr(Expression::Range(RangeExpression { data, lower, upper }))
    }

    pub fn paren(&self, expression: &'a Expression<'a>) -> &'a Expression<'a> {
        let data = self.data(SyntaxKind::ParenthesizedExpression, expression.range());
        self.expr(Expression::Parenthesized(ParenthesizedExpression { data, expression }))
    }

    pub fn call(&self, name: &str, arguments: Vec<&'a Expression<'a>>) -> &'a Expression<'a> {
        let identifier = self.identifier(name);
        let range = arguments
            .iter()
            .fold(identifier.data.range, |acc, arg| acc.cover(arg.range()));
        let data = self.data(SyntaxKind::CallExpression, range);
        let arguments = self.arena.alloc_slice(arguments);
        self.expr(Expression::Call(CallExpression {
            data,
            identifier,
            arguments,
        }))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn block(&self, statements: Vec<Statement<'a>>) -> Statement<'a> {
        Statement::Block(self.block_statement(statements))
    }

    pub fn block_statement(&self, statements: Vec<Statement<'a>>) -> BlockStatement<'a> {
        let range = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.range().cover(last.range()),
            _ => self.leaf_range(2),
        };
        BlockStatement {
            data: self.data(SyntaxKind::BlockStatement, range),
            statements: self.arena.alloc_slice(statements),
        }
    }

    /// `let name = initializer`
    pub fn let_decl(&self, name: &str, initializer: &'a Expression<'a>) -> Statement<'a> {
        self.declaration(SyntaxKind::LetKeyword, name, None, initializer)
    }

    /// `var name = initializer`
    pub fn var_decl(&self, name: &str, initializer: &'a Expression<'a>) -> Statement<'a> {
        self.declaration(SyntaxKind::VarKeyword, name, None, initializer)
    }

    /// `let|var name: type = initializer`
    pub fn declaration(
        &self,
        keyword: SyntaxKind,
        name: &str,
        type_name: Option<&str>,
        initializer: &'a Expression<'a>,
    ) -> Statement<'a> {
        let keyword = self.token(keyword);
        let identifier = self.identifier(name);
        let type_clause = type_name.map(|t| self.type_clause(t));
        let range = keyword.data.range.cover(initializer.range());
        Statement::VariableDeclaration(VariableDeclaration {
            data: self.data(SyntaxKind::VariableDeclaration, range),
            keyword,
            identifier,
            type_clause,
            initializer,
        })
    }

    pub fn if_(
        &self,
        condition: &'a Expression<'a>,
        then_statement: Statement<'a>,
        else_statement: Option<Statement<'a>>,
    ) -> Statement<'a> {
        let then_statement = self.stmt(then_statement);
        let else_statement = else_statement.map(|s| self.stmt(s));
        let last = else_statement.unwrap_or(then_statement).range();
        Statement::If(IfStatement {
            data: self.data(SyntaxKind::IfStatement, condition.range().cover(last)),
            condition,
            then_statement,
            else_statement,
        })
    }

    pub fn while_(&self, condition: &'a Expression<'a>, body: Statement<'a>) -> Statement<'a> {
        let body = self.stmt(body);
        Statement::While(WhileStatement {
            data: self.data(SyntaxKind::WhileStatement, condition.range().cover(body.range())),
            condition,
            body,
        })
    }

    pub fn do_while(&self, body: Statement<'a>, condition: &'a Expression<'a>) -> Statement<'a> {
        let body = self.stmt(body);
        Statement::DoWhile(DoWhileStatement {
            data: self.data(SyntaxKind::DoWhileStatement, body.range().cover(condition.range())),
            body,
            condition,
        })
    }

    /// `for name in range { body }`
    pub fn for_(&self, name: &str, range: &'a Expression<'a>, body: Statement<'a>) -> Statement<'a> {
        let identifier = self.identifier(name);
        let body = self.stmt(body);
        Statement::For(ForStatement {
            data: self.data(SyntaxKind::ForStatement, identifier.data.range.cover(body.range())),
            identifier,
            range,
            body,
        })
    }

    pub fn break_(&self) -> Statement<'a> {
        Statement::Break(self.token(SyntaxKind::BreakKeyword))
    }

    pub fn continue_(&self) -> Statement<'a> {
        Statement::Continue(self.token(SyntaxKind::ContinueKeyword))
    }

    pub fn ret(&self, expression: Option<&'a Expression<'a>>) -> Statement<'a> {
        let keyword_range = self.leaf_range(6);
        let range = expression.map_or(keyword_range, |e| keyword_range.cover(e.range()));
        Statement::Return(ReturnStatement {
            data: self.data(SyntaxKind::ReturnStatement, range),
            keyword_range,
            expression,
        })
    }

    pub fn expr_stmt(&self, expression: &'a Expression<'a>) -> Statement<'a> {
        Statement::Expression(ExpressionStatement {
            data: self.data(SyntaxKind::ExpressionStatement, expression.range()),
            expression,
        })
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn parameter(&self, name: &str, type_name: &str) -> Parameter<'a> {
        let name = self.identifier(name);
        let type_clause = self.type_clause(type_name);
        Parameter {
            data: self.data(SyntaxKind::Parameter, name.data.range.cover(type_clause.data.range)),
            name,
            type_clause,
        }
    }

    /// `function name(parameters): return_type { body }`
    pub fn function(
        &self,
        name: &str,
        parameters: Vec<(&str, &str)>,
        return_type: Option<&str>,
        body: Vec<Statement<'a>>,
    ) -> Member<'a> {
        let name = self.identifier(name);
        let parameters: Vec<_> = parameters
            .into_iter()
            .map(|(param, ty)| self.parameter(param, ty))
            .collect();
        let return_type = return_type.map(|t| self.type_clause(t));
        let body = self.arena.alloc(self.block_statement(body));
        Member::Function(FunctionDeclaration {
            data: self.data(SyntaxKind::FunctionDeclaration, name.data.range.cover(body.data.range)),
            name,
            parameters: self.arena.alloc_slice(parameters),
            return_type,
            body,
        })
    }

    pub fn global(&self, statement: Statement<'a>) -> Member<'a> {
        let statement = self.stmt(statement);
        Member::GlobalStatement(GlobalStatement {
            data: self.data(SyntaxKind::GlobalStatement, statement.range()),
            statement,
        })
    }

    pub fn compilation_unit(&self, members: Vec<Member<'a>>) -> &'a CompilationUnit<'a> {
        self.unit_in_file(None, members)
    }

    pub fn unit_in_file(&self, file_name: Option<&str>, members: Vec<Member<'a>>) -> &'a CompilationUnit<'a> {
        let range = TextRange::new(0, self.next_pos.get());
        let data = self.data(SyntaxKind::CompilationUnit, range);
        let file_name = file_name.map(|f| self.arena.alloc_str(f));
        self.arena.alloc(CompilationUnit {
            data,
            members: self.arena.alloc_slice(members),
            file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_increase() {
        let arena = SyntaxArena::new();
        let f = SyntaxFactory::new(&arena);
        let a = f.int(1);
        let b = f.int(2);
        assert!(a.range().end <= b.range().pos);
        let sum = f.binary(a, SyntaxKind::PlusToken, b);
        assert_eq!(sum.range(), TextRange::new(a.range().pos, b.range().end));
    }

    #[test]
    fn test_node_ids_unique() {
        let arena = SyntaxArena::new();
        let f = SyntaxFactory::new(&arena);
        let call = f.call("print", vec![f.string("hi")]);
        let Expression::Call(call) = call else {
            panic!("expected call");
        };
        assert_ne!(call.data.id, call.arguments[0].data().id);
        assert_eq!(call.identifier.text, "print");
    }

    #[test]
    fn test_function_member() {
        let arena = SyntaxArena::new();
        let f = SyntaxFactory::new(&arena);
        let member = f.function(
            "add",
            vec![("a", "int"), ("b", "int")],
            Some("int"),
            vec![f.ret(Some(f.binary(f.name("a"), SyntaxKind::PlusToken, f.name("b"))))],
        );
        let Member::Function(func) = member else {
            panic!("expected function");
        };
        assert_eq!(func.parameters.len(), 2);
        assert_eq!(func.parameters[1].type_clause.name.text, "int");
        assert_eq!(func.return_type.map(|t| t.name.text), Some("int"));
        assert_eq!(func.body.statements.len(), 1);
    }
}
