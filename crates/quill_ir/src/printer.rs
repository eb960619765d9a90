//! Textual rendering of bound trees.
//!
//! The output reads like source code, with labels and gotos spelled out,
//! and is what `Compilation::emit_tree` produces for each function.

use crate::node::{BoundBlockStatement, BoundExpression, BoundExpressionKind, BoundStatement};
use crate::operators::BoundBinaryOperatorKind;
use crate::value::Value;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

struct Printer<'w, W: Write> {
    out: &'w mut W,
    indent: usize,
}

impl<'w, W: Write> Printer<'w, W> {
    fn line_start(&mut self) -> fmt::Result {
        for _ in 0..self.indent {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    fn nested(&mut self, stmt: &BoundStatement) -> fmt::Result {
        if matches!(stmt, BoundStatement::Block(_)) {
            self.statement(stmt)
        } else {
            self.indent += 1;
            let result = self.statement(stmt);
            self.indent -= 1;
            result
        }
    }

    fn statement(&mut self, stmt: &BoundStatement) -> fmt::Result {
        match stmt {
            BoundStatement::Block(block) => {
                self.line_start()?;
                self.out.write_str("{\n")?;
                self.indent += 1;
                for s in &block.statements {
                    self.statement(s)?;
                }
                self.indent -= 1;
                self.line_start()?;
                self.out.write_str("}\n")
            }
            BoundStatement::VariableDeclaration { variable, initializer } => {
                self.line_start()?;
                let keyword = if variable.is_read_only { "let" } else { "var" };
                write!(self.out, "{} {} = ", keyword, variable.name)?;
                self.expression(initializer, 0)?;
                self.out.write_char('\n')
            }
            BoundStatement::If {
                condition,
                then_statement,
                else_statement,
            } => {
                self.line_start()?;
                self.out.write_str("if ")?;
                self.expression(condition, 0)?;
                self.out.write_char('\n')?;
                self.nested(then_statement)?;
                if let Some(else_statement) = else_statement {
                    self.line_start()?;
                    self.out.write_str("else\n")?;
                    self.nested(else_statement)?;
                }
                Ok(())
            }
            BoundStatement::While { condition, body, .. } => {
                self.line_start()?;
                self.out.write_str("while ")?;
                self.expression(condition, 0)?;
                self.out.write_char('\n')?;
                self.nested(body)
            }
            BoundStatement::DoWhile { body, condition, .. } => {
                self.line_start()?;
                self.out.write_str("do\n")?;
                self.nested(body)?;
                self.line_start()?;
                self.out.write_str("while ")?;
                self.expression(condition, 0)?;
                self.out.write_char('\n')
            }
            BoundStatement::For { variable, range, body, .. } => {
                self.line_start()?;
                write!(self.out, "for {} in ", variable.name)?;
                self.expression(range, 0)?;
                self.out.write_char('\n')?;
                self.nested(body)
            }
            BoundStatement::Label(label) => {
                // Labels hang one level to the left of the code they mark.
                let indent = self.indent;
                self.indent = indent.saturating_sub(1);
                self.line_start()?;
                self.indent = indent;
                writeln!(self.out, "{}:", label)
            }
            BoundStatement::Goto(label) => {
                self.line_start()?;
                writeln!(self.out, "goto {}", label)
            }
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => {
                self.line_start()?;
                let keyword = if *jump_if_true { "if" } else { "unless" };
                write!(self.out, "goto {} {} ", label, keyword)?;
                self.expression(condition, 0)?;
                self.out.write_char('\n')
            }
            BoundStatement::Return(expression) => {
                self.line_start()?;
                self.out.write_str("return")?;
                if let Some(expression) = expression {
                    self.out.write_char(' ')?;
                    self.expression(expression, 0)?;
                }
                self.out.write_char('\n')
            }
            BoundStatement::Expression(expression) => {
                self.line_start()?;
                self.expression(expression, 0)?;
                self.out.write_char('\n')
            }
        }
    }

    /// Writes `expr`, parenthesized when it binds looser than `parent`.
    fn expression(&mut self, expr: &BoundExpression, parent: u8) -> fmt::Result {
        match &expr.kind {
            BoundExpressionKind::Error => self.out.write_char('?'),
            BoundExpressionKind::Literal(value) => literal(&mut *self.out, value),
            BoundExpressionKind::Variable(variable) => self.out.write_str(&variable.name),
            BoundExpressionKind::Assignment { variable, expression } => {
                self.wrapped(parent > 0, |p| {
                    write!(p.out, "{} = ", variable.name)?;
                    p.expression(expression, 0)
                })
            }
            BoundExpressionKind::Unary { op, operand } => {
                self.out.write_str(op.text())?;
                self.expression(operand, UNARY_PRECEDENCE)
            }
            BoundExpressionKind::Binary { left, op, right } => {
                let precedence = binary_precedence(op.kind);
                self.wrapped(precedence < parent, |p| {
                    p.expression(left, precedence)?;
                    write!(p.out, " {} ", op.text())?;
                    // Left associative: an equal-precedence right operand needs parentheses.
                    p.expression(right, precedence + 1)
                })
            }
            BoundExpressionKind::Range { lower, upper } => {
                self.expression(lower, 1)?;
                self.out.write_str("..")?;
                self.expression(upper, 1)
            }
            BoundExpressionKind::Call { function, arguments } => {
                write!(self.out, "{}(", function.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.expression(argument, 0)?;
                }
                self.out.write_char(')')
            }
            BoundExpressionKind::Conversion { expression } => {
                write!(self.out, "{}(", expr.ty)?;
                self.expression(expression, 0)?;
                self.out.write_char(')')
            }
        }
    }

    fn wrapped(&mut self, parens: bool, body: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        if parens {
            self.out.write_char('(')?;
        }
        body(self)?;
        if parens {
            self.out.write_char(')')?;
        }
        Ok(())
    }
}

const UNARY_PRECEDENCE: u8 = 7;

fn binary_precedence(kind: BoundBinaryOperatorKind) -> u8 {
    use BoundBinaryOperatorKind::*;
    match kind {
        Multiplication | Division | Modulo | ShiftLeft | ShiftRight => 6,
        Addition | Subtraction => 5,
        Equals | NotEquals | Less | LessOrEquals | Greater | GreaterOrEquals => 4,
        BitwiseAnd | LogicalAnd => 3,
        BitwiseOr | BitwiseXor | LogicalOr => 2,
    }
}

fn literal<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => {
            out.write_char('"')?;
            for c in s.chars() {
                match c {
                    '"' => out.write_str("\\\"")?,
                    '\\' => out.write_str("\\\\")?,
                    '\n' => out.write_str("\\n")?,
                    c => out.write_char(c)?,
                }
            }
            out.write_char('"')
        }
        other => write!(out, "{}", other),
    }
}

pub fn write_statement<W: Write>(out: &mut W, stmt: &BoundStatement) -> fmt::Result {
    Printer { out, indent: 0 }.statement(stmt)
}

pub fn write_expression<W: Write>(out: &mut W, expr: &BoundExpression) -> fmt::Result {
    Printer { out, indent: 0 }.expression(expr, 0)
}

/// Writes a function body without the surrounding braces.
pub fn write_body<W: Write>(out: &mut W, body: &BoundBlockStatement) -> fmt::Result {
    let mut printer = Printer { out, indent: 1 };
    for stmt in &body.statements {
        printer.statement(stmt)?;
    }
    Ok(())
}

impl fmt::Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statement(f, self)
    }
}

impl fmt::Display for BoundExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self)
    }
}
