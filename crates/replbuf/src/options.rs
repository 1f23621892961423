use alloc::{borrow::Cow, string::String};

/// Configuration options for [`Buffer`](crate::Buffer).
///
/// # Default
///
/// No size limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferOptions {
    /// Upper bound on the bytes held by the buffer (ready plus pending).
    ///
    /// An append that would exceed it fails with
    /// [`BufferError::TooLarge`](crate::BufferError::TooLarge) and leaves
    /// the buffer untouched.
    ///
    /// # Default
    ///
    /// `None`
    pub max_len: Option<usize>,
}

/// Configuration options for the syntax-tree builder and the top-level
/// construct parsers.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// File name reported in syntax error positions.
    ///
    /// # Default
    ///
    /// `"<input>"`
    pub filename: Cow<'static, str>,

    /// Package name written into the scaffold around a ready unit.
    ///
    /// # Default
    ///
    /// `"p"`
    pub package: Cow<'static, str>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: Cow::Borrowed("<input>"),
            package: Cow::Borrowed("p"),
        }
    }
}

impl ParseOptions {
    /// Options reporting errors against `filename`.
    #[must_use]
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Cow::Owned(filename.into()),
            ..Self::default()
        }
    }
}
