//! Definition of errors.

use std::{error, fmt, result};

/// A specialized Result type for Hyphtree.
pub type Result<T, E = HyphError> = result::Result<T, E>;

/// Errors in Hyphtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyphError {
    /// Contains [`InputError`].
    Input(InputError),

    /// Contains [`ReservedCharError`].
    ReservedChar(ReservedCharError),

    /// Contains [`SetupError`].
    Setup(SetupError),

    /// Contains [`ScaleError`].
    Scale(ScaleError),
}

impl fmt::Display for HyphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
            Self::ReservedChar(e) => e.fmt(f),
            Self::Setup(e) => e.fmt(f),
            Self::Scale(e) => e.fmt(f),
        }
    }
}

impl error::Error for HyphError {}

impl HyphError {
    pub(crate) const fn input(msg: &'static str) -> Self {
        Self::Input(InputError { msg })
    }

    pub(crate) const fn reserved_char(c: char) -> Self {
        Self::ReservedChar(ReservedCharError { c })
    }

    pub(crate) const fn setup(msg: &'static str) -> Self {
        Self::Setup(SetupError { msg })
    }

    pub(crate) const fn scale(arg: &'static str, max: u32) -> Self {
        Self::Scale(ScaleError { arg, max })
    }
}

/// Error used when the input argument is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    msg: &'static str,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputError: {}", self.msg)
    }
}

/// Error used when a key or pattern contains [`END_MARKER`](crate::END_MARKER)
/// or [`COMPRESSED_MARKER`](crate::COMPRESSED_MARKER).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedCharError {
    c: char,
}

impl ReservedCharError {
    /// The offending character.
    #[inline(always)]
    pub const fn c(&self) -> char {
        self.c
    }
}

impl fmt::Display for ReservedCharError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ReservedCharError: keys must not contain U+{:04X}",
            u32::from(self.c)
        )
    }
}

/// Error used when the setup is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupError {
    msg: &'static str,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SetupError: {}", self.msg)
    }
}

/// Error used when the scale of a buffer exceeds the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleError {
    arg: &'static str,
    max: u32,
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ScaleError: {} must be no greater than {}",
            self.arg, self.max
        )
    }
}
