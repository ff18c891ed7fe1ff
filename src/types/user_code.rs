use std::fmt;

use zeroize::Zeroize;

/// An access code or passcode value, wiped from memory on drop.
///
/// The two secrets gate different command classes on the card; this type
/// only carries the value, the distinction is made by the operation it is
/// passed to.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct UserCode(String);

impl UserCode {
    /// Wrap a code value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the code in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the code is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for UserCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserCode(***)")
    }
}

/// Which of the two card secrets an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCodeType {
    /// The access code, gating ordinary commands
    AccessCode,
    /// The passcode, gating protected commands
    Passcode,
}

impl fmt::Display for UserCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessCode => f.write_str("access code"),
            Self::Passcode => f.write_str("passcode"),
        }
    }
}
