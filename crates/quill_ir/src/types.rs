//! The closed set of Quill types.

use std::fmt;

/// A resolved type. Every bound expression carries one.
///
/// `Error` marks an expression whose mistake has already been diagnosed;
/// checks that see it stay silent so one root cause yields one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Error,
    Any,
    Void,
    Bool,
    Int,
    Float,
    String,
}

impl TypeSymbol {
    /// Types that can be named in source, in lookup order.
    pub const NAMED: [TypeSymbol; 6] = [
        TypeSymbol::Any,
        TypeSymbol::Void,
        TypeSymbol::Bool,
        TypeSymbol::Int,
        TypeSymbol::Float,
        TypeSymbol::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeSymbol::Error => "?",
            TypeSymbol::Any => "any",
            TypeSymbol::Void => "void",
            TypeSymbol::Bool => "bool",
            TypeSymbol::Int => "int",
            TypeSymbol::Float => "float",
            TypeSymbol::String => "string",
        }
    }

    /// Resolve a type name as written in a type clause or conversion call.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        Self::NAMED.into_iter().find(|ty| ty.name() == name)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == TypeSymbol::Error
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(TypeSymbol::lookup("int"), Some(TypeSymbol::Int));
        assert_eq!(TypeSymbol::lookup("string"), Some(TypeSymbol::String));
        assert_eq!(TypeSymbol::lookup("?"), None);
        assert_eq!(TypeSymbol::lookup("integer"), None);
    }

    #[test]
    fn test_error_prints_as_question_mark() {
        assert_eq!(TypeSymbol::Error.to_string(), "?");
    }
}
