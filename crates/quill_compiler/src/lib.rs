//! quill_compiler: Compiler orchestration.
//!
//! Runs one compilation unit through binding, lowering and control-flow
//! checks, and chains units into generations so a later unit sees the
//! declarations of the earlier ones.

use indexmap::IndexMap;
use quill_binder::{Binder, BoundGlobalScope};
use quill_cfg::{all_paths_return, remove_unreachable, ControlFlowGraph};
use quill_core::collections::FxMap;
use quill_core::TextRange;
use quill_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use quill_evaluator::{EvalError, Evaluator, GlobalValues, Host};
use quill_ir::{BoundProgram, TypeSymbol, Value};
use quill_options::CompilerOptions;
use quill_syntax::{CompilationUnit, Member, NodeId};
use std::fmt::{self, Write};
use std::rc::Rc;

/// One compiled generation.
#[derive(Debug)]
pub struct Compilation {
    pub options: CompilerOptions,
    previous: Option<Rc<Compilation>>,
    global_scope: Rc<BoundGlobalScope>,
    program: Rc<BoundProgram>,
}

impl Compilation {
    /// Compile a unit as the first generation.
    pub fn compile(unit: &CompilationUnit<'_>, options: CompilerOptions) -> Rc<Compilation> {
        Self::build(unit, options, None)
    }

    /// Compile a unit on top of this generation, with the same options.
    pub fn continue_with(self: &Rc<Self>, unit: &CompilationUnit<'_>) -> Rc<Compilation> {
        Self::build(unit, self.options.clone(), Some(Rc::clone(self)))
    }

    fn build(unit: &CompilationUnit<'_>, options: CompilerOptions, previous: Option<Rc<Compilation>>) -> Rc<Compilation> {
        let binder = Binder::new(options.script_mode, options.file.clone());
        let bound = binder.bind_unit(unit, previous.as_ref().map(|p| p.global_scope.clone()));
        let file = options.file.clone().or_else(|| unit.file_name.map(str::to_string));

        let mut diagnostics = bound.diagnostics().clone();
        let name_ranges = function_name_ranges(unit);
        let mut functions = IndexMap::with_capacity(bound.bodies.len());

        for (function, body) in &bound.bodies {
            let lowered = quill_lowerer::lower(function, body);

            let returns_value = !matches!(function.return_type, TypeSymbol::Void | TypeSymbol::Error);
            if returns_value && !all_paths_return(&lowered) {
                if let Some(range) = function.declaration.and_then(|id| name_ranges.get(&id)) {
                    diagnostics.add(Diagnostic::with_location(
                        file.clone(),
                        range.to_span(),
                        &messages::ALL_PATHS_MUST_RETURN,
                        &[],
                    ));
                } else {
                    diagnostics.add(Diagnostic::new(&messages::ALL_PATHS_MUST_RETURN, &[]));
                }
            }

            let lowered = if options.remove_unreachable_code {
                remove_unreachable(&lowered)
            } else {
                lowered
            };
            functions.insert(function.clone(), lowered);
        }
        diagnostics.sort();

        log::debug!(
            "compiled {} functions with {} diagnostics",
            functions.len(),
            diagnostics.len()
        );

        let program = BoundProgram {
            previous: previous.as_ref().map(|p| p.program.clone()),
            diagnostics,
            entry: bound.global_scope.entry.clone(),
            functions,
        };
        Rc::new(Compilation {
            options,
            previous,
            global_scope: bound.global_scope,
            program: Rc::new(program),
        })
    }

    pub fn previous(&self) -> Option<&Rc<Compilation>> {
        self.previous.as_ref()
    }

    pub fn global_scope(&self) -> &Rc<BoundGlobalScope> {
        &self.global_scope
    }

    pub fn program(&self) -> &Rc<BoundProgram> {
        &self.program
    }

    /// Diagnostics of this generation, sorted by position.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.program.diagnostics
    }

    /// Run the entry function. Refuses to run when there are errors.
    pub fn evaluate(&self, globals: &mut GlobalValues, host: &mut dyn Host) -> Result<Option<Value>, EvalError> {
        Evaluator::new(&self.program, globals, host)
            .with_max_call_depth(self.options.max_call_depth)
            .evaluate()
    }

    /// Write the lowered functions of this generation.
    pub fn emit_tree<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.program.write_tree(out)
    }

    /// Write the control-flow graph of the named function in Graphviz
    /// format. Returns false when this generation has no such function.
    pub fn emit_graph<W: Write>(&self, function_name: &str, out: &mut W) -> Result<bool, fmt::Error> {
        let Some(body) = self
            .program
            .functions
            .iter()
            .find_map(|(function, body)| (function.name == function_name).then_some(body))
        else {
            return Ok(false);
        };
        ControlFlowGraph::build(body).write_dot(out)?;
        Ok(true)
    }
}

fn function_name_ranges(unit: &CompilationUnit<'_>) -> FxMap<NodeId, TextRange> {
    unit.members
        .iter()
        .filter_map(|member| match member {
            Member::Function(declaration) => Some((declaration.data.id, declaration.name.data.range)),
            Member::GlobalStatement(_) => None,
        })
        .collect()
}
