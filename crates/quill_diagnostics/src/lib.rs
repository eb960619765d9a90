//! quill_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every semantic error the binder and the flow checks can raise is listed
//! in [`messages`] with a stable `QLnnnn` code. Diagnostics are collected,
//! never thrown: a single pass reports every error it can discover, and the
//! caller decides what to do with the collection afterwards.

use quill_core::text::{LineMap, TextSpan};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The file this diagnostic belongs to, if the unit was named.
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a diagnostic at a span, optionally inside a named file.
    pub fn with_location(
        file: Option<String>,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file,
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Render as `file(line,col): error QLnnnn: message` using 1-based
    /// line and column numbers.
    pub fn display_with(&self, line_map: &LineMap) -> String {
        let mut out = String::new();
        if let Some(ref file) = self.file {
            out.push_str(file);
        }
        if let Some(span) = self.span {
            let lc = line_map.line_and_column_of(span.start);
            out.push_str(&format!("({},{})", lc.line + 1, lc.character + 1));
        }
        if !out.is_empty() {
            out.push_str(": ");
        }
        out.push_str(&format!("{} QL{}: {}", self.category, self.code, self.message_text));
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
        }
        if let Some(span) = self.span {
            write!(f, "({})", span.start)?;
        }
        if self.file.is_some() || self.span.is_some() {
            write!(f, ": ")?;
        }
        write!(f, "{} QL{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated during one compilation, in report order.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Sort diagnostics by file and position. The sort is stable, so
    /// diagnostics at the same position keep their report order.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Name resolution (1000-1099)
    // ========================================================================
    pub const UNDEFINED_VARIABLE: DiagnosticMessage = diag!(1001, Error, "Variable '{0}' doesn't exist.");
    pub const UNDEFINED_FUNCTION: DiagnosticMessage = diag!(1002, Error, "Function '{0}' doesn't exist.");
    pub const UNDEFINED_TYPE: DiagnosticMessage = diag!(1003, Error, "Type '{0}' doesn't exist.");
    pub const NOT_A_VARIABLE: DiagnosticMessage = diag!(1004, Error, "'{0}' is not a variable.");
    pub const NOT_A_FUNCTION: DiagnosticMessage = diag!(1005, Error, "'{0}' is not a function.");
    pub const SYMBOL_ALREADY_DECLARED: DiagnosticMessage = diag!(1010, Error, "'{0}' is already declared.");
    pub const PARAMETER_ALREADY_DECLARED: DiagnosticMessage = diag!(1011, Error, "A parameter with the name '{0}' already exists.");

    // ========================================================================
    // Types and conversions (2000-2099)
    // ========================================================================
    pub const CANNOT_CONVERT: DiagnosticMessage = diag!(2001, Error, "Cannot convert type '{0}' to '{1}'.");
    pub const CANNOT_CONVERT_IMPLICITLY: DiagnosticMessage = diag!(2002, Error, "Cannot convert type '{0}' to '{1}'. An explicit conversion exists (are you missing a cast?)");
    pub const UNDEFINED_UNARY_OPERATOR: DiagnosticMessage = diag!(2010, Error, "Unary operator '{0}' is not defined for type '{1}'.");
    pub const UNDEFINED_BINARY_OPERATOR: DiagnosticMessage = diag!(2011, Error, "Binary operator '{0}' is not defined for types '{1}' and '{2}'.");
    pub const EXPRESSION_MUST_HAVE_VALUE: DiagnosticMessage = diag!(2020, Error, "Expression must have a value.");
    pub const CANNOT_ASSIGN: DiagnosticMessage = diag!(2030, Error, "Variable '{0}' is read-only and cannot be assigned to.");
    pub const WRONG_ARGUMENT_COUNT: DiagnosticMessage = diag!(2040, Error, "Function '{0}' requires {1} arguments but was given {2}.");
    pub const RANGE_BOUND_MUST_BE_INT: DiagnosticMessage = diag!(2050, Error, "The lower bound of a range must be of type 'int', but found '{0}'.");
    pub const RANGE_ONLY_IN_FOR: DiagnosticMessage = diag!(2051, Error, "Range expressions can only be used as 'for' loop bounds.");
    pub const FOR_REQUIRES_RANGE: DiagnosticMessage = diag!(2052, Error, "A 'for' loop requires a range expression 'lower..upper'.");

    // ========================================================================
    // Statements and declarations (3000-3099)
    // ========================================================================
    pub const INVALID_BREAK_OR_CONTINUE: DiagnosticMessage = diag!(3001, Error, "The keyword '{0}' can only be used inside of loops.");
    pub const INVALID_RETURN: DiagnosticMessage = diag!(3002, Error, "The 'return' keyword can only be used inside of functions.");
    pub const INVALID_RETURN_EXPRESSION: DiagnosticMessage = diag!(3003, Error, "Since the function '{0}' does not return a value the 'return' keyword cannot be followed by an expression.");
    pub const MISSING_RETURN_EXPRESSION: DiagnosticMessage = diag!(3004, Error, "An expression of type '{0}' is expected.");
    pub const INVALID_EXPRESSION_STATEMENT: DiagnosticMessage = diag!(3005, Error, "Only assignment and call expressions can be used as a statement.");
    pub const MAIN_MUST_HAVE_CORRECT_SIGNATURE: DiagnosticMessage = diag!(3010, Error, "main must not take arguments and not return anything.");
    pub const CANNOT_MIX_MAIN_AND_GLOBAL_STATEMENTS: DiagnosticMessage = diag!(3011, Error, "Cannot declare main function when global statements are used.");

    // ========================================================================
    // Control flow (4000-4099)
    // ========================================================================
    pub const ALL_PATHS_MUST_RETURN: DiagnosticMessage = diag!(4001, Error, "Not all code paths return a value.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Cannot convert type '{0}' to '{1}'.", &["string", "int"]);
        assert_eq!(msg, "Cannot convert type 'string' to 'int'.");
    }

    #[test]
    fn test_format_message_three_args() {
        let msg = format_message(messages::UNDEFINED_BINARY_OPERATOR.message, &["+", "int", "bool"]);
        assert_eq!(msg, "Binary operator '+' is not defined for types 'int' and 'bool'.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::with_location(
            Some("main.ql".to_string()),
            TextSpan::new(10, 5),
            &messages::UNDEFINED_VARIABLE,
            &["foo"],
        );
        let display = format!("{}", diag);
        assert_eq!(display, "main.ql(10): error QL1001: Variable 'foo' doesn't exist.");
    }

    #[test]
    fn test_display_with_line_map() {
        let text = "let a = 1\nlet b = c";
        let diag = Diagnostic::with_location(None, TextSpan::new(18, 1), &messages::UNDEFINED_VARIABLE, &["c"]);
        let rendered = diag.display_with(&LineMap::new(text));
        assert_eq!(rendered, "(2,9): error QL1001: Variable 'c' doesn't exist.");
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::ALL_PATHS_MUST_RETURN, &[]);
        assert!(diag.file.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 4001);
        assert!(diag.is_error());
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::with_location(None, TextSpan::new(10, 1), &messages::UNDEFINED_TYPE, &["x"]));
        collection.add(Diagnostic::with_location(None, TextSpan::new(5, 1), &messages::UNDEFINED_VARIABLE, &["y"]));
        assert_eq!(collection.error_count(), 2);
        collection.sort();
        assert_eq!(collection.diagnostics()[0].code, 1001);
        assert_eq!(collection.diagnostics()[1].code, 1003);
    }
}
