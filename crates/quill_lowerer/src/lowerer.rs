//! Structured statements to labels and gotos.

use quill_ir::{
    BoundBinaryOperator, BoundBlockStatement, BoundExpression, BoundExpressionKind, BoundStatement,
    FunctionSymbol, LabelSymbol, TypeSymbol, VariableKind, VariableSymbol,
};
use std::rc::Rc;

/// Name of the hidden variable holding a `for` loop's upper bound.
const UPPER_BOUND_NAME: &str = "upperBound";

/// Lower one function body.
pub fn lower(function: &FunctionSymbol, body: &BoundBlockStatement) -> BoundBlockStatement {
    let mut lowerer = Lowerer::new();
    lowerer.lower_block(body);
    lowerer.finish(function)
}

/// Emits the flattened statement list of one function.
///
/// Every structured statement is expanded straight into `out`, so nested
/// blocks never survive and no second flattening pass is needed.
#[derive(Debug, Default)]
pub struct Lowerer {
    out: Vec<BoundStatement>,
}

impl Lowerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an implicit `return` to Void bodies that can fall off the end.
    pub fn finish(mut self, function: &FunctionSymbol) -> BoundBlockStatement {
        if function.return_type == TypeSymbol::Void
            && self.out.last().map_or(true, |last| !last.is_terminator())
        {
            self.out.push(BoundStatement::Return(None));
        }
        log::debug!(
            "lowered '{}' to {} statements",
            function.name,
            self.out.len()
        );
        BoundBlockStatement::new(self.out)
    }

    pub fn lower_block(&mut self, block: &BoundBlockStatement) {
        for statement in &block.statements {
            self.lower_statement(statement);
        }
    }

    pub fn lower_statement(&mut self, statement: &BoundStatement) {
        match statement {
            BoundStatement::Block(block) => self.lower_block(block),
            BoundStatement::If {
                condition,
                then_statement,
                else_statement,
            } => self.lower_if(condition, then_statement, else_statement.as_deref()),
            BoundStatement::While {
                condition,
                body,
                break_label,
                continue_label,
            } => self.lower_while(condition, body, break_label, continue_label),
            BoundStatement::DoWhile {
                body,
                condition,
                break_label,
                continue_label,
            } => {
                let body_label = LabelSymbol::fresh("body");
                self.label(&body_label);
                self.lower_statement(body);
                self.label(continue_label);
                self.goto_if(&body_label, condition.clone(), true);
                self.label(break_label);
            }
            BoundStatement::For {
                variable,
                range,
                body,
                break_label,
                continue_label,
            } => self.lower_for(variable, range, body, break_label, continue_label),
            BoundStatement::ConditionalGoto {
                label,
                condition,
                jump_if_true,
            } => self.goto_if(label, condition.clone(), *jump_if_true),
            BoundStatement::VariableDeclaration { .. }
            | BoundStatement::Label(_)
            | BoundStatement::Goto(_)
            | BoundStatement::Return(_)
            | BoundStatement::Expression(_) => self.out.push(statement.clone()),
        }
    }

    // ========================================================================
    // Expansions
    // ========================================================================

    fn lower_if(
        &mut self,
        condition: &BoundExpression,
        then_statement: &BoundStatement,
        else_statement: Option<&BoundStatement>,
    ) {
        let end_label = LabelSymbol::fresh("end");
        match else_statement {
            None => {
                self.goto_if(&end_label, condition.clone(), false);
                self.lower_statement(then_statement);
                self.label(&end_label);
            }
            Some(else_statement) => {
                let else_label = LabelSymbol::fresh("else");
                self.goto_if(&else_label, condition.clone(), false);
                self.lower_statement(then_statement);
                self.out.push(BoundStatement::Goto(end_label.clone()));
                self.label(&else_label);
                self.lower_statement(else_statement);
                self.label(&end_label);
            }
        }
    }

    fn lower_while(
        &mut self,
        condition: &BoundExpression,
        body: &BoundStatement,
        break_label: &LabelSymbol,
        continue_label: &LabelSymbol,
    ) {
        let body_label = LabelSymbol::fresh("body");
        self.out.push(BoundStatement::Goto(continue_label.clone()));
        self.label(&body_label);
        self.lower_statement(body);
        self.label(continue_label);
        self.goto_if(&body_label, condition.clone(), true);
        self.label(break_label);
    }

    /// `for v in lo..hi { B }` becomes
    ///
    /// ```text
    /// var v = lo
    /// let upperBound = hi
    /// while v <= upperBound {
    ///     B
    ///     continue:
    ///     if v == upperBound goto break
    ///     v = v + 1
    /// }
    /// break:
    /// ```
    ///
    /// so `continue` inside `B` still runs the increment, and `v` never steps
    /// past `upperBound`, even when the bound is the largest `int`.
    fn lower_for(
        &mut self,
        variable: &Rc<VariableSymbol>,
        range: &BoundExpression,
        body: &BoundStatement,
        break_label: &LabelSymbol,
        continue_label: &LabelSymbol,
    ) {
        let (lower, upper) = match &range.kind {
            BoundExpressionKind::Range { lower, upper } => ((**lower).clone(), (**upper).clone()),
            _ => (BoundExpression::error(), BoundExpression::error()),
        };

        let kind = if variable.is_global() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let upper_bound = VariableSymbol::new(UPPER_BOUND_NAME, true, TypeSymbol::Int, kind, None);

        self.out.push(BoundStatement::VariableDeclaration {
            variable: variable.clone(),
            initializer: lower,
        });
        self.out.push(BoundStatement::VariableDeclaration {
            variable: upper_bound.clone(),
            initializer: upper,
        });

        let condition = BoundExpression::binary(
            BoundExpression::variable(variable.clone()),
            &BoundBinaryOperator::INT_LESS_OR_EQUALS,
            BoundExpression::variable(upper_bound.clone()),
        );
        let at_bound = BoundStatement::ConditionalGoto {
            label: break_label.clone(),
            condition: BoundExpression::binary(
                BoundExpression::variable(variable.clone()),
                &BoundBinaryOperator::INT_EQUALS,
                BoundExpression::variable(upper_bound),
            ),
            jump_if_true: true,
        };
        let increment = BoundStatement::Expression(BoundExpression::assignment(
            variable.clone(),
            BoundExpression::binary(
                BoundExpression::variable(variable.clone()),
                &BoundBinaryOperator::INT_ADDITION,
                BoundExpression::literal(1i64),
            ),
        ));
        let loop_body = BoundStatement::Block(BoundBlockStatement::new(vec![
            body.clone(),
            BoundStatement::Label(continue_label.clone()),
            at_bound,
            increment,
        ]));

        let step_label = LabelSymbol::fresh("continue");
        self.lower_while(&condition, &loop_body, break_label, &step_label);
    }

    // ========================================================================
    // Emission
    // ========================================================================

    fn label(&mut self, label: &LabelSymbol) {
        self.out.push(BoundStatement::Label(label.clone()));
    }

    /// Emit a conditional jump, resolving it when the condition is constant.
    fn goto_if(&mut self, label: &LabelSymbol, condition: BoundExpression, jump_if_true: bool) {
        match condition.constant_bool() {
            Some(value) if value == jump_if_true => {
                self.out.push(BoundStatement::Goto(label.clone()));
            }
            Some(_) => {}
            None => self.out.push(BoundStatement::ConditionalGoto {
                label: label.clone(),
                condition,
                jump_if_true,
            }),
        }
    }
}
