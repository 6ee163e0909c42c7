use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    #[error("Unexpected end of data: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEof {
        needed:    usize,
        remaining: usize,
    },

    #[error("Invalid UTF-8 in string payload")]
    InvalidUtf8,

    #[error("String of {0} bytes does not fit a 16-bit length prefix")]
    StringTooLong(usize),

    #[error("Variable-length integer exceeds {bits} bits")]
    VarIntTooLong { bits: u32 },

    #[error("Flag offset {0} is outside of a byte")]
    FlagOffset(u8),

    #[error("Cannot write {found} with {expected}")]
    TypeMismatch {
        expected: &'static str,
        found:    &'static str,
    },
}
