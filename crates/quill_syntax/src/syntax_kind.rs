//! SyntaxKind enum - token and node kinds of the Quill syntax tree.

/// The kind of a syntax token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    IdentifierToken = 0,

    // Operators
    PlusToken,
    MinusToken,
    StarToken,
    SlashToken,
    PercentToken,
    BangToken,
    TildeToken,
    AmpersandToken,
    AmpersandAmpersandToken,
    PipeToken,
    PipePipeToken,
    HatToken,
    LessLessToken,
    GreaterGreaterToken,
    EqualsEqualsToken,
    BangEqualsToken,
    LessToken,
    LessEqualsToken,
    GreaterToken,
    GreaterEqualsToken,
    DotDotToken,

    // Assignment
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    StarEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    AmpersandEqualsToken,
    PipeEqualsToken,
    HatEqualsToken,

    // Keywords
    BreakKeyword,
    ContinueKeyword,
    LetKeyword,
    VarKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    CompilationUnit,
    FunctionDeclaration,
    GlobalStatement,
    Parameter,
    TypeClause,

    // Statements
    BlockStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ExpressionStatement,

    // Expressions
    LiteralExpression,
    NameExpression,
    AssignmentExpression,
    UnaryExpression,
    BinaryExpression,
    RangeExpression,
    ParenthesizedExpression,
    CallExpression,
}

impl SyntaxKind {
    /// The fixed source text of a token kind, if it has one.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::StarToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::BangToken => "!",
            SyntaxKind::TildeToken => "~",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::PipeToken => "|",
            SyntaxKind::PipePipeToken => "||",
            SyntaxKind::HatToken => "^",
            SyntaxKind::LessLessToken => "<<",
            SyntaxKind::GreaterGreaterToken => ">>",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::BangEqualsToken => "!=",
            SyntaxKind::LessToken => "<",
            SyntaxKind::LessEqualsToken => "<=",
            SyntaxKind::GreaterToken => ">",
            SyntaxKind::GreaterEqualsToken => ">=",
            SyntaxKind::DotDotToken => "..",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::StarEqualsToken => "*=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::AmpersandEqualsToken => "&=",
            SyntaxKind::PipeEqualsToken => "|=",
            SyntaxKind::HatEqualsToken => "^=",
            SyntaxKind::BreakKeyword => "break",
            SyntaxKind::ContinueKeyword => "continue",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::VarKeyword => "var",
            _ => return None,
        };
        Some(text)
    }

    /// For `op=` tokens, the binary operator applied before assigning.
    pub fn compound_operator(self) -> Option<SyntaxKind> {
        let op = match self {
            SyntaxKind::PlusEqualsToken => SyntaxKind::PlusToken,
            SyntaxKind::MinusEqualsToken => SyntaxKind::MinusToken,
            SyntaxKind::StarEqualsToken => SyntaxKind::StarToken,
            SyntaxKind::SlashEqualsToken => SyntaxKind::SlashToken,
            SyntaxKind::PercentEqualsToken => SyntaxKind::PercentToken,
            SyntaxKind::AmpersandEqualsToken => SyntaxKind::AmpersandToken,
            SyntaxKind::PipeEqualsToken => SyntaxKind::PipeToken,
            SyntaxKind::HatEqualsToken => SyntaxKind::HatToken,
            _ => return None,
        };
        Some(op)
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self == SyntaxKind::EqualsToken || self.compound_operator().is_some()
    }

    #[inline]
    pub fn is_statement(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::BlockStatement as u16 && v <= SyntaxKind::ExpressionStatement as u16
    }

    #[inline]
    pub fn is_expression(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::LiteralExpression as u16 && v <= SyntaxKind::CallExpression as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_operator() {
        assert_eq!(SyntaxKind::PlusEqualsToken.compound_operator(), Some(SyntaxKind::PlusToken));
        assert_eq!(SyntaxKind::EqualsToken.compound_operator(), None);
        assert!(SyntaxKind::HatEqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
    }

    #[test]
    fn test_kind_ranges() {
        assert!(SyntaxKind::ForStatement.is_statement());
        assert!(!SyntaxKind::ForStatement.is_expression());
        assert!(SyntaxKind::RangeExpression.is_expression());
        assert_eq!(SyntaxKind::LessLessToken.text(), Some("<<"));
        assert_eq!(SyntaxKind::CallExpression.text(), None);
    }
}
