//! The casting lattice: which conversions exist between two types.

use quill_ir::TypeSymbol;

/// How a value of one type can become a value of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// No conversion exists.
    None,
    /// Same type; nothing to do.
    Identity,
    /// Widening; applied silently wherever a target type is known.
    Implicit,
    /// Narrowing or lossy; requires a conversion call such as `int(x)`.
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        use TypeSymbol::*;

        if from == to {
            return Conversion::Identity;
        }
        match (from, to) {
            (Void, _) | (_, Void) => Conversion::None,
            (_, Any) => Conversion::Implicit,
            (Int, Float) => Conversion::Implicit,
            (Any, _) => Conversion::Explicit,
            (Bool | Int | Float, String) => Conversion::Explicit,
            (String, Bool | Int | Float) => Conversion::Explicit,
            (Bool, Int) | (Float, Int) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    #[inline]
    pub fn exists(self) -> bool {
        self != Conversion::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TypeSymbol::*;

    #[test]
    fn test_identity() {
        for ty in TypeSymbol::NAMED {
            assert_eq!(Conversion::classify(ty, ty), Conversion::Identity);
        }
    }

    #[test]
    fn test_widening() {
        assert_eq!(Conversion::classify(Int, Float), Conversion::Implicit);
        assert_eq!(Conversion::classify(String, Any), Conversion::Implicit);
        assert_eq!(Conversion::classify(Bool, Any), Conversion::Implicit);
        assert_eq!(Conversion::classify(Void, Any), Conversion::None);
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(Conversion::classify(Any, Int), Conversion::Explicit);
        assert_eq!(Conversion::classify(Int, String), Conversion::Explicit);
        assert_eq!(Conversion::classify(String, Float), Conversion::Explicit);
        assert_eq!(Conversion::classify(Bool, Int), Conversion::Explicit);
        assert_eq!(Conversion::classify(Float, Int), Conversion::Explicit);
    }

    #[test]
    fn test_no_conversion() {
        assert_eq!(Conversion::classify(Int, Bool), Conversion::None);
        assert_eq!(Conversion::classify(Float, Bool), Conversion::None);
        assert_eq!(Conversion::classify(Any, Void), Conversion::None);
        assert_eq!(Conversion::classify(Int, Void), Conversion::None);
        assert!(!Conversion::classify(Bool, Float).exists());
    }
}
