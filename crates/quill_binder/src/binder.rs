//! The binder implementation.
//!
//! Walks the syntax tree of one compilation unit and produces typed IR.
//! Handles:
//! - Function headers first, so calls may refer to functions declared later
//! - Global statements, gathered into the entry function
//! - Function bodies, each in a scope holding its parameters
//! - Name resolution through the scope chain
//! - Operator resolution and implicit/explicit conversions
//! - break/continue resolution against the enclosing loop's labels
//!
//! Every error is reported once and replaced with an `Error` expression (or
//! an inert statement), so binding always runs to the end of the unit.

use crate::conversion::Conversion;
use crate::global_scope::{BoundGlobalScope, BoundUnit};
use crate::scope::Scope;
use indexmap::IndexMap;
use quill_core::intern::StringInterner;
use quill_core::text::TextRange;
use quill_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use quill_ir::*;
use quill_syntax::node::*;
use quill_syntax::SyntaxKind;
use std::rc::Rc;

/// Name of the implicit entry function in program mode.
pub const MAIN_FUNCTION_NAME: &str = "main";
/// Name of the implicit entry function in script mode.
pub const SCRIPT_FUNCTION_NAME: &str = "$eval";

pub struct Binder {
    interner: StringInterner,
    diagnostics: DiagnosticCollection,
    /// File name attached to every diagnostic.
    file: Option<String>,
    /// Script mode accepts any expression as a global statement and
    /// gathers global statements into `$eval`.
    script_mode: bool,
    /// The function whose body is being bound; `None` for global statements.
    function: Option<Rc<FunctionSymbol>>,
    /// (break, continue) labels of the enclosing loops, innermost last.
    loop_stack: Vec<(LabelSymbol, LabelSymbol)>,
}

impl Binder {
    pub fn new(script_mode: bool, file: Option<String>) -> Self {
        Self {
            interner: StringInterner::new(),
            diagnostics: DiagnosticCollection::new(),
            file,
            script_mode,
            function: None,
            loop_stack: Vec::new(),
        }
    }

    /// Bind a whole compilation unit on top of the previous generation.
    pub fn bind_unit(mut self, unit: &CompilationUnit<'_>, previous: Option<Rc<BoundGlobalScope>>) -> BoundUnit {
        if self.file.is_none() {
            self.file = unit.file_name.map(str::to_string);
        }

        let root = self.root_scope();
        let history = self.history_scope(&root, previous.as_deref());
        let mut scope = Scope::new(Some(&history));

        // Pass 1: function headers.
        let mut declarations = Vec::new();
        for member in unit.members {
            if let Member::Function(declaration) = member {
                let function = self.declare_function(declaration, &mut scope);
                declarations.push((function, declaration));
            }
        }

        // Pass 2: global statements.
        let mut statements = Vec::new();
        for member in unit.members {
            if let Member::GlobalStatement(global) = member {
                statements.push(self.bind_statement(global.statement, &mut scope, true));
            }
        }

        let entry = self.bind_entry_point(&scope, &declarations, !statements.is_empty());

        // Pass 3: function bodies.
        let mut bodies = IndexMap::new();
        for (function, declaration) in &declarations {
            let body = self.bind_function_body(function, declaration, &scope);
            bodies.insert(function.clone(), body);
        }
        self.function = None;

        if let Some(entry) = &entry {
            if !bodies.contains_key(entry) {
                bodies.insert(entry.clone(), BoundBlockStatement::new(statements));
            }
        }

        let functions: Vec<_> = scope.functions().cloned().collect();
        let variables: Vec<_> = scope.variables().cloned().collect();
        log::debug!(
            "bound {} functions, {} globals, {} diagnostics",
            functions.len(),
            variables.len(),
            self.diagnostics.len()
        );

        BoundUnit {
            global_scope: Rc::new(BoundGlobalScope {
                previous,
                diagnostics: self.diagnostics,
                entry,
                functions,
                variables,
            }),
            bodies,
        }
    }

    fn report(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::with_location(self.file.clone(), range.to_span(), message, args));
    }

    // ========================================================================
    // Scopes and declarations
    // ========================================================================

    fn root_scope(&self) -> Scope<'static> {
        let mut root = Scope::new(None);
        for function in builtin_functions() {
            let name = self.interner.intern(&function.name);
            root.declare(name, Symbol::Function(function));
        }
        root
    }

    /// Flatten the previous generations into one scope, oldest first, so
    /// newer declarations replace older ones.
    fn history_scope<'p>(&self, root: &'p Scope<'p>, previous: Option<&BoundGlobalScope>) -> Scope<'p> {
        let mut generations = Vec::new();
        let mut current = previous;
        while let Some(generation) = current {
            generations.push(generation);
            current = generation.previous.as_deref();
        }

        let mut history = Scope::new(Some(root));
        for generation in generations.into_iter().rev() {
            for function in &generation.functions {
                let name = self.interner.intern(&function.name);
                history.declare_or_replace(name, Symbol::Function(function.clone()));
            }
            for variable in &generation.variables {
                let name = self.interner.intern(&variable.name);
                history.declare_or_replace(name, Symbol::Variable(variable.clone()));
            }
        }
        history
    }

    fn declare_function(&mut self, declaration: &FunctionDeclaration<'_>, scope: &mut Scope<'_>) -> Rc<FunctionSymbol> {
        let mut parameters: Vec<Rc<VariableSymbol>> = Vec::new();
        for parameter in declaration.parameters {
            let name = parameter.name.text;
            let ty = self.bind_type_clause(&parameter.type_clause).unwrap_or(TypeSymbol::Error);
            if parameters.iter().any(|p| p.name == name) {
                self.report(parameter.name.data.range, &messages::PARAMETER_ALREADY_DECLARED, &[name]);
                continue;
            }
            parameters.push(VariableSymbol::parameter(name, ty, parameters.len()));
        }

        let return_type = match &declaration.return_type {
            Some(clause) => self.bind_type_clause(clause).unwrap_or(TypeSymbol::Error),
            None => TypeSymbol::Void,
        };

        let function = FunctionSymbol::new(declaration.name.text, parameters, return_type, Some(declaration.data.id));
        let name = self.interner.intern(declaration.name.text);
        if !scope.declare(name, Symbol::Function(function.clone())) {
            self.report(declaration.name.data.range, &messages::SYMBOL_ALREADY_DECLARED, &[declaration.name.text]);
        }
        function
    }

    fn declare_variable(
        &mut self,
        identifier: &Identifier<'_>,
        is_read_only: bool,
        ty: TypeSymbol,
        constant: Option<Value>,
        scope: &mut Scope<'_>,
    ) -> Rc<VariableSymbol> {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let variable = VariableSymbol::new(identifier.text, is_read_only, ty, kind, constant);
        let name = self.interner.intern(identifier.text);
        if !scope.declare(name, Symbol::Variable(variable.clone())) {
            self.report(identifier.data.range, &messages::SYMBOL_ALREADY_DECLARED, &[identifier.text]);
        }
        variable
    }

    fn bind_type_clause(&mut self, clause: &TypeClause<'_>) -> Option<TypeSymbol> {
        let ty = TypeSymbol::lookup(clause.name.text);
        if ty.is_none() {
            self.report(clause.name.data.range, &messages::UNDEFINED_TYPE, &[clause.name.text]);
        }
        ty
    }

    /// Pick the entry function and check the rules around `main`.
    fn bind_entry_point(
        &mut self,
        scope: &Scope<'_>,
        declarations: &[(Rc<FunctionSymbol>, &FunctionDeclaration<'_>)],
        has_global_statements: bool,
    ) -> Option<Rc<FunctionSymbol>> {
        if self.script_mode {
            return Some(FunctionSymbol::new(SCRIPT_FUNCTION_NAME, Vec::new(), TypeSymbol::Void, None));
        }

        let main = scope
            .lookup_local(self.interner.intern(MAIN_FUNCTION_NAME))
            .and_then(Symbol::as_function)
            .cloned();
        let Some(main) = main else {
            return has_global_statements
                .then(|| FunctionSymbol::new(MAIN_FUNCTION_NAME, Vec::new(), TypeSymbol::Void, None));
        };

        let name_range = declarations
            .iter()
            .find(|(function, _)| Rc::ptr_eq(function, &main))
            .map(|(_, declaration)| declaration.name.data.range);
        if let Some(range) = name_range {
            if !main.parameters.is_empty() || main.return_type != TypeSymbol::Void {
                self.report(range, &messages::MAIN_MUST_HAVE_CORRECT_SIGNATURE, &[]);
            }
            if has_global_statements {
                self.report(range, &messages::CANNOT_MIX_MAIN_AND_GLOBAL_STATEMENTS, &[]);
            }
        }
        Some(main)
    }

    fn bind_function_body(
        &mut self,
        function: &Rc<FunctionSymbol>,
        declaration: &FunctionDeclaration<'_>,
        parent: &Scope<'_>,
    ) -> BoundBlockStatement {
        let mut scope = Scope::new(Some(parent));
        for parameter in &function.parameters {
            let name = self.interner.intern(&parameter.name);
            scope.declare(name, Symbol::Variable(parameter.clone()));
        }
        self.function = Some(function.clone());
        self.bind_block(declaration.body, &scope)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn bind_statement(&mut self, stmt: &Statement<'_>, scope: &mut Scope<'_>, is_global: bool) -> BoundStatement {
        let result = self.bind_statement_internal(stmt, scope);

        if !self.script_mode || !is_global {
            if let BoundStatement::Expression(expr) = &result {
                let allowed = matches!(
                    expr.kind,
                    BoundExpressionKind::Error
                        | BoundExpressionKind::Assignment { .. }
                        | BoundExpressionKind::Call { .. }
                );
                if !allowed {
                    self.report(stmt.range(), &messages::INVALID_EXPRESSION_STATEMENT, &[]);
                }
            }
        }
        result
    }

    fn bind_statement_internal(&mut self, stmt: &Statement<'_>, scope: &mut Scope<'_>) -> BoundStatement {
        match stmt {
            Statement::Block(block) => BoundStatement::Block(self.bind_block(block, scope)),
            Statement::VariableDeclaration(decl) => self.bind_variable_declaration(decl, scope),
            Statement::If(n) => {
                let condition = self.bind_condition(n.condition, scope);
                let then_statement = self.bind_statement(n.then_statement, scope, false);
                let else_statement = n
                    .else_statement
                    .map(|s| Box::new(self.bind_statement(s, scope, false)));
                BoundStatement::If {
                    condition,
                    then_statement: Box::new(then_statement),
                    else_statement,
                }
            }
            Statement::While(n) => {
                let condition = self.bind_condition(n.condition, scope);
                let (body, break_label, continue_label) = self.bind_loop_body(n.body, scope);
                BoundStatement::While {
                    condition,
                    body: Box::new(body),
                    break_label,
                    continue_label,
                }
            }
            Statement::DoWhile(n) => {
                let (body, break_label, continue_label) = self.bind_loop_body(n.body, scope);
                let condition = self.bind_condition(n.condition, scope);
                BoundStatement::DoWhile {
                    body: Box::new(body),
                    condition,
                    break_label,
                    continue_label,
                }
            }
            Statement::For(n) => self.bind_for_statement(n, scope),
            Statement::Break(token) | Statement::Continue(token) => self.bind_loop_jump(token),
            Statement::Return(n) => self.bind_return_statement(n, scope),
            Statement::Expression(n) => BoundStatement::Expression(self.bind_expression(n.expression, scope, true)),
        }
    }

    fn bind_block(&mut self, block: &BlockStatement<'_>, parent: &Scope<'_>) -> BoundBlockStatement {
        let mut scope = Scope::new(Some(parent));
        let mut statements = Vec::with_capacity(block.statements.len());
        for stmt in block.statements {
            statements.push(self.bind_statement(stmt, &mut scope, false));
        }
        BoundBlockStatement::new(statements)
    }

    fn bind_variable_declaration(&mut self, decl: &VariableDeclaration<'_>, scope: &mut Scope<'_>) -> BoundStatement {
        let is_read_only = decl.keyword.kind() == SyntaxKind::LetKeyword;
        let declared_type = decl.type_clause.as_ref().and_then(|clause| self.bind_type_clause(clause));
        let initializer = self.bind_expression(decl.initializer, scope, false);
        let ty = declared_type.unwrap_or(initializer.ty);
        let initializer = self.bind_conversion(decl.initializer.range(), initializer, ty, false);
        let variable = self.declare_variable(&decl.identifier, is_read_only, ty, initializer.constant.clone(), scope);
        BoundStatement::VariableDeclaration { variable, initializer }
    }

    fn bind_for_statement(&mut self, n: &ForStatement<'_>, scope: &mut Scope<'_>) -> BoundStatement {
        let range = match n.range {
            Expression::Range(range) => {
                let mut lower = self.bind_expression(range.lower, scope, false);
                if !lower.is_error() && lower.ty != TypeSymbol::Int {
                    self.report(range.lower.range(), &messages::RANGE_BOUND_MUST_BE_INT, &[lower.ty.name()]);
                    lower = BoundExpression::error();
                }
                let upper = self.bind_expression(range.upper, scope, false);
                let upper = self.bind_conversion(range.upper.range(), upper, TypeSymbol::Int, false);
                BoundExpression::range(lower, upper)
            }
            other => {
                self.report(other.range(), &messages::FOR_REQUIRES_RANGE, &[]);
                BoundExpression::error()
            }
        };

        let mut loop_scope = Scope::new(Some(&*scope));
        let variable = self.declare_variable(&n.identifier, true, TypeSymbol::Int, None, &mut loop_scope);
        let (body, break_label, continue_label) = self.bind_loop_body(n.body, &mut loop_scope);
        BoundStatement::For {
            variable,
            range,
            body: Box::new(body),
            break_label,
            continue_label,
        }
    }

    fn bind_loop_body(&mut self, body: &Statement<'_>, scope: &mut Scope<'_>) -> (BoundStatement, LabelSymbol, LabelSymbol) {
        let break_label = LabelSymbol::fresh("break");
        let continue_label = LabelSymbol::fresh("continue");
        self.loop_stack.push((break_label.clone(), continue_label.clone()));
        let body = self.bind_statement(body, scope, false);
        self.loop_stack.pop();
        (body, break_label, continue_label)
    }

    fn bind_loop_jump(&mut self, token: &Token) -> BoundStatement {
        let Some((break_label, continue_label)) = self.loop_stack.last() else {
            let keyword = token.kind().text().unwrap_or_default();
            self.report(token.data.range, &messages::INVALID_BREAK_OR_CONTINUE, &[keyword]);
            return BoundStatement::Expression(BoundExpression::error());
        };
        let label = if token.kind() == SyntaxKind::BreakKeyword {
            break_label
        } else {
            continue_label
        };
        BoundStatement::Goto(label.clone())
    }

    fn bind_return_statement(&mut self, n: &ReturnStatement<'_>, scope: &Scope<'_>) -> BoundStatement {
        let expression = n.expression.map(|e| (e.range(), self.bind_expression(e, scope, false)));

        let Some(function) = self.function.clone() else {
            self.report(n.keyword_range, &messages::INVALID_RETURN, &[]);
            return BoundStatement::Return(expression.map(|(_, e)| e));
        };

        let expression = match expression {
            Some((range, expression)) if function.return_type == TypeSymbol::Void => {
                self.report(range, &messages::INVALID_RETURN_EXPRESSION, &[function.name.as_str()]);
                Some(expression)
            }
            Some((range, expression)) => Some(self.bind_conversion(range, expression, function.return_type, false)),
            None => {
                if function.return_type != TypeSymbol::Void && !function.return_type.is_error() {
                    self.report(n.keyword_range, &messages::MISSING_RETURN_EXPRESSION, &[function.return_type.name()]);
                }
                None
            }
        };
        BoundStatement::Return(expression)
    }

    fn bind_condition(&mut self, condition: &Expression<'_>, scope: &Scope<'_>) -> BoundExpression {
        let bound = self.bind_expression(condition, scope, false);
        self.bind_conversion(condition.range(), bound, TypeSymbol::Bool, false)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn bind_expression(&mut self, expr: &Expression<'_>, scope: &Scope<'_>, can_be_void: bool) -> BoundExpression {
        let result = self.bind_expression_internal(expr, scope);
        if !can_be_void && result.ty == TypeSymbol::Void {
            self.report(expr.range(), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
            return BoundExpression::error();
        }
        result
    }

    fn bind_expression_internal(&mut self, expr: &Expression<'_>, scope: &Scope<'_>) -> BoundExpression {
        match expr {
            Expression::Parenthesized(n) => self.bind_expression_internal(n.expression, scope),
            Expression::Literal(n) => BoundExpression::literal(match n.value {
                LiteralValue::Bool(b) => Value::Bool(b),
                LiteralValue::Int(i) => Value::Int(i),
                LiteralValue::Float(x) => Value::Float(x),
                LiteralValue::String(s) => Value::String(s.to_string()),
            }),
            Expression::Name(n) => match self.bind_variable_reference(&n.identifier, scope) {
                Some(variable) => BoundExpression::variable(variable),
                None => BoundExpression::error(),
            },
            Expression::Assignment(n) => self.bind_assignment(n, scope),
            Expression::Unary(n) => {
                let operand = self.bind_expression(n.operand, scope, false);
                if operand.is_error() {
                    return BoundExpression::error();
                }
                let kind = n.operator_token.kind();
                match BoundUnaryOperator::bind(kind, operand.ty) {
                    Some(op) => BoundExpression::unary(op, operand),
                    None => {
                        let text = kind.text().unwrap_or_default();
                        self.report(n.operator_token.data.range, &messages::UNDEFINED_UNARY_OPERATOR, &[text, operand.ty.name()]);
                        BoundExpression::error()
                    }
                }
            }
            Expression::Binary(n) => {
                let left = self.bind_expression(n.left, scope, false);
                let right = self.bind_expression(n.right, scope, false);
                self.bind_binary(n.operator_token, left, n.operator_token.kind(), right)
            }
            Expression::Range(n) => {
                self.bind_expression(n.lower, scope, false);
                self.bind_expression(n.upper, scope, false);
                self.report(n.data.range, &messages::RANGE_ONLY_IN_FOR, &[]);
                BoundExpression::error()
            }
            Expression::Call(n) => self.bind_call(n, scope),
        }
    }

    fn bind_binary(&mut self, token: Token, left: BoundExpression, kind: SyntaxKind, right: BoundExpression) -> BoundExpression {
        if left.is_error() || right.is_error() {
            return BoundExpression::error();
        }
        match BoundBinaryOperator::bind(kind, left.ty, right.ty) {
            Some(op) => BoundExpression::binary(left, op, right),
            None => {
                let text = kind.text().unwrap_or_default();
                self.report(
                    token.data.range,
                    &messages::UNDEFINED_BINARY_OPERATOR,
                    &[text, left.ty.name(), right.ty.name()],
                );
                BoundExpression::error()
            }
        }
    }

    fn bind_variable_reference(&mut self, identifier: &Identifier<'_>, scope: &Scope<'_>) -> Option<Rc<VariableSymbol>> {
        match scope.lookup(self.interner.intern(identifier.text)) {
            Some(Symbol::Variable(variable)) => Some(variable.clone()),
            Some(Symbol::Function(_)) => {
                self.report(identifier.data.range, &messages::NOT_A_VARIABLE, &[identifier.text]);
                None
            }
            None => {
                self.report(identifier.data.range, &messages::UNDEFINED_VARIABLE, &[identifier.text]);
                None
            }
        }
    }

    fn bind_assignment(&mut self, n: &AssignmentExpression<'_>, scope: &Scope<'_>) -> BoundExpression {
        let expression = self.bind_expression(n.expression, scope, false);
        let Some(variable) = self.bind_variable_reference(&n.identifier, scope) else {
            return BoundExpression::error();
        };

        if variable.is_read_only {
            self.report(n.operator_token.data.range, &messages::CANNOT_ASSIGN, &[variable.name.as_str()]);
        }

        let value = match n.operator_token.kind().compound_operator() {
            // `x op= e` is `x = x op e`.
            Some(op) => {
                let current = BoundExpression::variable(variable.clone());
                let combined = self.bind_binary(n.operator_token, current, op, expression);
                if combined.is_error() {
                    return BoundExpression::error();
                }
                combined
            }
            None => expression,
        };
        let value = self.bind_conversion(n.expression.range(), value, variable.ty, false);
        BoundExpression::assignment(variable, value)
    }

    fn bind_call(&mut self, n: &CallExpression<'_>, scope: &Scope<'_>) -> BoundExpression {
        let name = n.identifier.text;

        // `int(x)` and friends: one argument and a type name is a conversion.
        if n.arguments.len() == 1 {
            if let Some(ty) = TypeSymbol::lookup(name) {
                let argument = n.arguments[0];
                let bound = self.bind_expression(argument, scope, false);
                return self.bind_conversion(argument.range(), bound, ty, true);
            }
        }

        let arguments: Vec<_> = n
            .arguments
            .iter()
            .map(|argument| self.bind_expression(argument, scope, false))
            .collect();

        let function = match scope.lookup(self.interner.intern(name)) {
            Some(Symbol::Function(function)) => function.clone(),
            Some(Symbol::Variable(_)) => {
                self.report(n.identifier.data.range, &messages::NOT_A_FUNCTION, &[name]);
                return BoundExpression::error();
            }
            None => {
                self.report(n.identifier.data.range, &messages::UNDEFINED_FUNCTION, &[name]);
                return BoundExpression::error();
            }
        };

        if arguments.len() != function.parameters.len() {
            let expected = function.parameters.len().to_string();
            let actual = arguments.len().to_string();
            self.report(n.data.range, &messages::WRONG_ARGUMENT_COUNT, &[name, expected.as_str(), actual.as_str()]);
            return BoundExpression::error();
        }

        let arguments = arguments
            .into_iter()
            .zip(n.arguments.iter())
            .zip(function.parameters.iter())
            .map(|((bound, syntax), parameter)| self.bind_conversion(syntax.range(), bound, parameter.ty, false))
            .collect();
        BoundExpression::call(function, arguments)
    }

    /// Convert `expression` to `ty`, reporting when no conversion exists or
    /// when an explicit one is needed but `allow_explicit` is false.
    fn bind_conversion(
        &mut self,
        range: TextRange,
        expression: BoundExpression,
        ty: TypeSymbol,
        allow_explicit: bool,
    ) -> BoundExpression {
        if expression.is_error() || ty.is_error() {
            return expression;
        }
        let conversion = Conversion::classify(expression.ty, ty);
        match conversion {
            Conversion::None => {
                self.report(range, &messages::CANNOT_CONVERT, &[expression.ty.name(), ty.name()]);
                BoundExpression::error()
            }
            Conversion::Identity => expression,
            Conversion::Implicit => BoundExpression::conversion(ty, expression),
            Conversion::Explicit => {
                if !allow_explicit {
                    self.report(range, &messages::CANNOT_CONVERT_IMPLICITLY, &[expression.ty.name(), ty.name()]);
                }
                BoundExpression::conversion(ty, expression)
            }
        }
    }
}
