//! The instruction-pointer interpreter over lowered function bodies.

use crate::error::EvalError;
use crate::globals::GlobalValues;
use crate::host::Host;
use quill_core::collections::FxMap;
use quill_ir::{
    Builtin, BoundBinaryOperatorKind, BoundBlockStatement, BoundExpression, BoundExpressionKind,
    BoundProgram, BoundStatement, FunctionSymbol, SymbolId, Value, VariableKind, VariableSymbol,
};

/// Local values of one activation.
type Frame = FxMap<SymbolId, Value>;

/// Runs the entry function of a [`BoundProgram`].
pub struct Evaluator<'e> {
    program: &'e BoundProgram,
    globals: &'e mut GlobalValues,
    host: &'e mut dyn Host,
    frames: Vec<Frame>,
    max_call_depth: Option<usize>,
    /// Value of the last expression statement run by the entry activation.
    last_value: Option<Value>,
}

impl<'e> Evaluator<'e> {
    pub fn new(program: &'e BoundProgram, globals: &'e mut GlobalValues, host: &'e mut dyn Host) -> Self {
        Self {
            program,
            globals,
            host,
            frames: Vec::new(),
            max_call_depth: None,
            last_value: None,
        }
    }

    /// Fail with [`EvalError::MaxCallDepth`] instead of recursing past `depth` frames.
    pub fn with_max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Run the program.
    ///
    /// Returns the entry function's return value if it has one, else the
    /// value of the last expression statement it ran. A program without an
    /// entry does nothing.
    pub fn evaluate(mut self) -> Result<Option<Value>, EvalError> {
        let diagnostics = &self.program.diagnostics;
        if diagnostics.has_errors() {
            return Err(EvalError::HasDiagnostics(diagnostics.error_count()));
        }
        let Some(entry) = self.program.entry.clone() else {
            return Ok(None);
        };
        let body = self.body_of(&entry)?;

        log::trace!("evaluating entry '{}'", entry.name);
        self.frames.push(Frame::default());
        let result = self.run(body);
        self.frames.pop();

        Ok(result?.or(self.last_value.take()))
    }

    fn body_of(&self, function: &FunctionSymbol) -> Result<&'e BoundBlockStatement, EvalError> {
        let program: &'e BoundProgram = self.program;
        program
            .lookup_body(function)
            .ok_or_else(|| EvalError::InvalidNode(format!("function '{}' has no body", function.name)))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Run one activation to its `return`.
    fn run(&mut self, body: &BoundBlockStatement) -> Result<Option<Value>, EvalError> {
        let mut labels: FxMap<SymbolId, usize> = FxMap::default();
        for (index, statement) in body.statements.iter().enumerate() {
            if let BoundStatement::Label(label) = statement {
                labels.insert(label.id, index);
            }
        }
        let target = |label: &quill_ir::LabelSymbol| {
            labels
                .get(&label.id)
                .copied()
                .ok_or_else(|| EvalError::InvalidNode(format!("undefined label '{}'", label)))
        };

        let is_entry = self.frames.len() == 1;
        let mut ip = 0;
        while let Some(statement) = body.statements.get(ip) {
            match statement {
                BoundStatement::VariableDeclaration { variable, initializer } => {
                    let value = self.expression(initializer)?;
                    self.assign(variable, value);
                    ip += 1;
                }
                BoundStatement::Expression(expression) => {
                    let value = self.expression_statement(expression)?;
                    if is_entry {
                        self.last_value = value;
                    }
                    ip += 1;
                }
                BoundStatement::Label(_) => ip += 1,
                BoundStatement::Goto(label) => ip = target(label)?,
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let value = self.expression(condition)?;
                    let Some(value) = value.as_bool() else {
                        return Err(EvalError::InvalidNode(format!("condition evaluated to '{}'", value)));
                    };
                    ip = if value == *jump_if_true { target(label)? } else { ip + 1 };
                }
                BoundStatement::Return(expression) => {
                    return expression.as_ref().map(|e| self.expression(e)).transpose();
                }
                other => {
                    return Err(EvalError::InvalidNode(format!("structured statement '{}' was not lowered", other)));
                }
            }
        }
        Ok(None)
    }

    fn expression_statement(&mut self, expression: &BoundExpression) -> Result<Option<Value>, EvalError> {
        match &expression.kind {
            BoundExpressionKind::Call { function, arguments } if expression.constant.is_none() => {
                self.call(function, arguments)
            }
            _ => self.expression(expression).map(Some),
        }
    }

    fn assign(&mut self, variable: &VariableSymbol, value: Value) {
        match variable.kind {
            VariableKind::Global => self.globals.set(variable, value),
            VariableKind::Local | VariableKind::Parameter { .. } => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.insert(variable.id, value);
                }
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self, expression: &BoundExpression) -> Result<Value, EvalError> {
        if let Some(constant) = &expression.constant {
            return Ok(constant.clone());
        }
        match &expression.kind {
            BoundExpressionKind::Error => Err(EvalError::InvalidNode("error expression".to_string())),
            BoundExpressionKind::Literal(value) => Ok(value.clone()),
            BoundExpressionKind::Variable(variable) => self.variable(variable),
            BoundExpressionKind::Assignment { variable, expression } => {
                let value = self.expression(expression)?;
                self.assign(variable, value.clone());
                Ok(value)
            }
            BoundExpressionKind::Unary { op, operand } => {
                let operand = self.expression(operand)?;
                Ok(op.kind.apply(&operand)?)
            }
            BoundExpressionKind::Binary { left, op, right } => {
                let left = self.expression(left)?;
                // `&&` and `||` skip the right operand once the left decides.
                match (op.kind, left.as_bool()) {
                    (BoundBinaryOperatorKind::LogicalAnd, Some(false)) => return Ok(Value::Bool(false)),
                    (BoundBinaryOperatorKind::LogicalOr, Some(true)) => return Ok(Value::Bool(true)),
                    _ => {}
                }
                let right = self.expression(right)?;
                Ok(op.kind.apply(&left, &right)?)
            }
            BoundExpressionKind::Range { .. } => Err(EvalError::InvalidNode("range outside a for loop".to_string())),
            BoundExpressionKind::Call { function, arguments } => self.call(function, arguments)?.ok_or_else(|| {
                EvalError::InvalidNode(format!("void function '{}' used as a value", function.name))
            }),
            BoundExpressionKind::Conversion { expression: inner } => {
                let value = self.expression(inner)?;
                Ok(value.convert(expression.ty)?)
            }
        }
    }

    fn variable(&self, variable: &VariableSymbol) -> Result<Value, EvalError> {
        let value = match variable.kind {
            VariableKind::Global => self.globals.get(variable),
            VariableKind::Local | VariableKind::Parameter { .. } => {
                self.frames.last().and_then(|frame| frame.get(&variable.id))
            }
        };
        value
            .cloned()
            .ok_or_else(|| EvalError::InvalidNode(format!("variable '{}' read before assignment", variable.name)))
    }

    fn call(&mut self, function: &FunctionSymbol, arguments: &[BoundExpression]) -> Result<Option<Value>, EvalError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.expression(argument)?);
        }

        if let Some(builtin) = function.builtin {
            return self.call_builtin(builtin, &values);
        }

        if let Some(limit) = self.max_call_depth {
            if self.frames.len() >= limit {
                return Err(EvalError::MaxCallDepth(limit));
            }
        }
        let body = self.body_of(function)?;

        let mut frame = Frame::default();
        for (parameter, value) in function.parameters.iter().zip(values) {
            frame.insert(parameter.id, value);
        }

        log::trace!("call '{}' at depth {}", function.name, self.frames.len());
        self.frames.push(frame);
        let result = self.run(body);
        self.frames.pop();
        result
    }

    fn call_builtin(&mut self, builtin: Builtin, arguments: &[Value]) -> Result<Option<Value>, EvalError> {
        match (builtin, arguments) {
            (Builtin::Print, [text]) => {
                self.host.print(&text.to_string())?;
                Ok(None)
            }
            (Builtin::Input, []) => Ok(Some(Value::String(self.host.input()?))),
            (Builtin::Rnd, [Value::Int(max)]) => Ok(Some(Value::Int(self.host.random(*max)))),
            _ => Err(EvalError::InvalidNode(format!(
                "builtin '{}' called with {} argument(s)",
                builtin.name(),
                arguments.len()
            ))),
        }
    }
}
