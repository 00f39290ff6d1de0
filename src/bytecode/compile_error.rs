use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A macro reference whose name is not in the registry.
    #[error(
        "compile error: unknown macro '{name}' at line {line}\n  hint: define the macro before running the program"
    )]
    UnknownMacro { name: String, line: usize },

    /// A macro that reaches itself through references. `chain` starts and
    /// ends with the repeated name, e.g. `a -> b -> a`.
    #[error(
        "compile error: macro '{}' expands into itself ({})\n  hint: macros cannot call themselves, directly or through other macros",
        chain.first().map(String::as_str).unwrap_or_default(),
        chain.join(" -> ")
    )]
    MacroCycle { chain: Vec<String> },

    /// Unrolling the block at `line` would exceed the instruction limit.
    #[error(
        "compile error: block at line {line} unrolls to more than {limit} instructions\n  hint: lower the repeat counts"
    )]
    TooManyInstructions { line: usize, limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_macro_message() {
        let err = CompileError::UnknownMacro {
            name: "zigzag".to_string(),
            line: 4,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("compile error: unknown macro 'zigzag' at line 4"));
        assert!(msg.contains("hint:"));
    }

    #[test]
    fn test_cycle_message_shows_chain() {
        let err = CompileError::MacroCycle {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("macro 'a' expands into itself (a -> b -> a)"));
    }

    #[test]
    fn test_too_many_instructions_message() {
        let err = CompileError::TooManyInstructions { line: 2, limit: 16 };
        assert!(err.to_string().starts_with("compile error: block at line 2 unrolls to more than 16 instructions"));
    }
}
