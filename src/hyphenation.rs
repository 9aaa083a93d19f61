//! Hyphenation results and exception entries.
use std::fmt;

/// Break points computed for a word.
///
/// The first point is always `0` and the last one is the length of the letter
/// run; the points in between are legal break positions, in characters from
/// the start of the word. Interior points are never `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hyphenation {
    points: Vec<usize>,
}

impl Hyphenation {
    pub(crate) fn new(points: Vec<usize>) -> Self {
        debug_assert!(points.len() >= 2);
        Self { points }
    }

    /// All points including the two bounds.
    #[inline(always)]
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    /// Break positions without the two bounds.
    #[inline(always)]
    pub fn interior(&self) -> &[usize] {
        &self.points[1..self.points.len() - 1]
    }

    /// Number of points including the two bounds.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a [`Hyphenation`] holds at least its two bounds.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Explicit break marker of an exception entry.
///
/// `pre_break` is the text ending the line before the break, `post_break` the
/// text starting the next line, and `no_break` the text used when the word is
/// not broken here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hyphen {
    /// Text before the break.
    pub pre_break: Option<String>,
    /// Text if no break occurs.
    pub no_break: Option<String>,
    /// Text after the break.
    pub post_break: Option<String>,
}

impl Hyphen {
    /// Plain hyphen: `-` before the break and nothing else.
    pub fn simple() -> Self {
        Self {
            pre_break: Some("-".to_string()),
            no_break: None,
            post_break: None,
        }
    }

    /// Creates a marker from its three texts.
    pub fn new<P, N, Q>(pre_break: Option<P>, no_break: Option<N>, post_break: Option<Q>) -> Self
    where
        P: Into<String>,
        N: Into<String>,
        Q: Into<String>,
    {
        Self {
            pre_break: pre_break.map(Into::into),
            no_break: no_break.map(Into::into),
            post_break: post_break.map(Into::into),
        }
    }
}

impl fmt::Display for Hyphen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.no_break.is_none()
            && self.post_break.is_none()
            && self.pre_break.as_deref() == Some("-")
        {
            return f.write_str("-");
        }
        write!(
            f,
            "{{{}}}{{{}}}{{{}}}",
            self.pre_break.as_deref().unwrap_or(""),
            self.no_break.as_deref().unwrap_or(""),
            self.post_break.as_deref().unwrap_or("")
        )
    }
}

/// Element of an exception entry: literal text or a break marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExceptionPart {
    /// Literal text.
    Text(String),
    /// Explicit break.
    Hyphen(Hyphen),
}

impl ExceptionPart {
    /// Creates a literal part.
    pub fn text<S>(s: S) -> Self
    where
        S: Into<String>,
    {
        Self::Text(s.into())
    }

    /// Creates a plain hyphen part.
    pub fn hyphen() -> Self {
        Self::Hyphen(Hyphen::simple())
    }
}

impl fmt::Display for ExceptionPart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Hyphen(h) => h.fmt(f),
        }
    }
}
