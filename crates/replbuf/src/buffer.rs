//! Lexical completeness buffer.
//!
//! A [`Buffer`] accumulates REPL input and decides, after every append,
//! whether the text so far holds one complete top-level unit. The decision
//! is purely lexical: the pending text is re-scanned from its start on every
//! call, nesting of `()`, `[]`, `{}` and raw strings is re-derived from the
//! tokens, and the first semicolon seen at zero nesting ends the unit. An
//! explicit `;` inside a `for`, `if` or `switch` header is not an end.
//!
//! Nothing but text survives between calls, so there is no counter that can
//! drift out of sync with the input.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, mem};

use tracing::{debug, trace};

use crate::{BufferError, BufferOptions, scanner::Scanner, token::TokenKind};

/// Accumulates input until it forms one complete unit.
///
/// ```rust
/// use replbuf::{Buffer, TokenKind};
///
/// let mut buf = Buffer::new();
/// buf.append("func F() {\n").unwrap();
/// assert!(!buf.is_ready());
/// buf.append("}\n").unwrap();
/// assert!(buf.is_ready());
/// assert_eq!(buf.as_str(), "func F() {\n}\n");
/// assert_eq!(buf.first_token(), TokenKind::Func);
///
/// buf.reset().unwrap();
/// assert_eq!(buf.len(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    options: BufferOptions,
    ready: String,
    pending: String,
    tokens: Vec<TokenKind>,
    first: TokenKind,
    poisoned: Option<BufferError>,
}

impl Buffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: BufferOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Appends `text` and re-scans everything pending.
    ///
    /// Returns the number of bytes of `text` accepted. When the text holds
    /// more than one unit, the first becomes ready, the rest stays pending
    /// and [`BufferError::ExtraInput`] reports how much of `text` went into
    /// the ready unit.
    ///
    /// # Errors
    ///
    /// - [`BufferError::IllegalToken`] when an unclassifiable token precedes
    ///   the end of the unit; the buffer then refuses input until reset.
    /// - [`BufferError::ExtraInput`] when text remains after the unit.
    /// - [`BufferError::TooLarge`] when [`BufferOptions::max_len`] would be
    ///   exceeded.
    pub fn append(&mut self, text: &str) -> Result<usize, BufferError> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }
        if let Some(limit) = self.options.max_len {
            let len = self.pending.len() + text.len();
            if len > limit {
                return Err(BufferError::TooLarge { len, limit });
            }
        }

        let base = self.pending.len();
        self.pending.push_str(text);
        self.ready.clear();
        self.tokens.clear();
        self.first = TokenKind::Illegal;

        let scan = scan_pending(&self.pending);
        self.first = scan.first;

        match scan.outcome {
            Outcome::Incomplete => {
                trace!(pending = self.pending.len(), "unit incomplete");
                Ok(text.len())
            }
            Outcome::Illegal { offset, literal } => {
                let err = BufferError::IllegalToken { offset, literal };
                debug!(%err, "buffer poisoned");
                self.poisoned = Some(err.clone());
                Err(err)
            }
            Outcome::Boundary { start, end } => {
                self.ready = self.pending[start..end].to_string();
                self.tokens = scan.tokens;
                self.pending = self.pending.split_off(end);

                #[cfg(any(test, feature = "fuzzing"))]
                assert_eq!(
                    self.tokens.last(),
                    Some(&TokenKind::Semicolon),
                    "Internal error: ready unit must end at its boundary"
                );

                if self.pending.trim().is_empty() {
                    self.pending.clear();
                    debug!(len = self.ready.len(), first = %self.first, "unit ready");
                    return Ok(text.len());
                }

                let consumed = end.saturating_sub(base);
                debug!(
                    len = self.ready.len(),
                    remaining = self.pending.len(),
                    "unit ready with additional input"
                );
                Err(BufferError::ExtraInput {
                    consumed,
                    remaining: self.pending.len(),
                })
            }
        }
    }

    /// Whether a complete unit is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Kind of the first token of the current cycle, or
    /// [`TokenKind::Illegal`] if nothing was classified yet.
    #[must_use]
    pub fn first_token(&self) -> TokenKind {
        self.first
    }

    /// Combined byte length of the ready and pending text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ready.len() + self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The ready unit; empty while input is incomplete.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.ready
    }

    /// Token kinds of the ready unit, boundary included.
    #[must_use]
    pub fn tokens(&self) -> &[TokenKind] {
        &self.tokens
    }

    /// Text appended but not part of the ready unit.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    #[must_use]
    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// Ends the current cycle and re-submits whatever is still pending.
    ///
    /// A leftover that already holds a complete unit is ready again right
    /// after this returns. The text of a cycle that hit an illegal token is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Propagates the error of re-appending the leftover text.
    pub fn reset(&mut self) -> Result<(), BufferError> {
        let leftover = self.consume();
        if leftover.is_empty() {
            return Ok(());
        }
        self.append(&leftover).map(drop)
    }

    /// Clears the cycle and hands back the text owed to the next one.
    fn consume(&mut self) -> String {
        let leftover = mem::take(&mut self.pending);
        self.ready.clear();
        self.tokens.clear();
        self.first = TokenKind::Illegal;
        if self.poisoned.take().is_some() {
            debug!(discarded = leftover.len(), "dropping poisoned input");
            return String::new();
        }
        leftover
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ready)
    }
}

/// Open grouping delimiters and raw-string parity within one scan.
#[derive(Debug, Default, Clone, Copy)]
struct Nesting {
    parens: i32,
    bracks: i32,
    braces: i32,
    raw_string: bool,
}

impl Nesting {
    fn track(&mut self, kind: TokenKind, lit: &str) {
        match kind {
            TokenKind::Lparen => self.parens += 1,
            TokenKind::Rparen => self.parens -= 1,
            TokenKind::Lbrack => self.bracks += 1,
            TokenKind::Rbrack => self.bracks -= 1,
            TokenKind::Lbrace => self.braces += 1,
            TokenKind::Rbrace => self.braces -= 1,
            TokenKind::String => {
                // A literal both opening and closing toggles twice.
                if lit.starts_with('`') {
                    self.raw_string = !self.raw_string;
                }
                if lit.len() > 1 && lit.ends_with('`') {
                    self.raw_string = !self.raw_string;
                }
            }
            _ => {}
        }
    }

    /// No opener is left unclosed. Surplus closers never become balanced
    /// by more input, so they count as balanced and the builder reports them.
    fn is_balanced(self) -> bool {
        self.parens <= 0 && self.bracks <= 0 && self.braces <= 0 && !self.raw_string
    }
}

/// Whether an explicit `;` at the top level still belongs to the header
/// of a `for`, `if` or `switch` clause.
///
/// The header ends at the first top-level `{` that does not open a
/// `struct`, `interface` or function-literal body.
#[derive(Debug, Default, Clone, Copy)]
struct Header {
    open: bool,
    func_lit: bool,
    prev: TokenKind,
}

impl Header {
    fn track(&mut self, kind: TokenKind, top_level: bool) {
        if top_level {
            match kind {
                TokenKind::For | TokenKind::If | TokenKind::Switch => {
                    self.open = true;
                    self.func_lit = false;
                }
                TokenKind::Func if self.open => self.func_lit = true,
                TokenKind::Lbrace if self.open => {
                    if self.func_lit {
                        self.func_lit = false;
                    } else if !matches!(self.prev, TokenKind::Struct | TokenKind::Interface) {
                        self.open = false;
                    }
                }
                _ => {}
            }
        }
        self.prev = kind;
    }
}

#[derive(Debug)]
enum Outcome {
    Incomplete,
    Boundary { start: usize, end: usize },
    Illegal { offset: usize, literal: String },
}

#[derive(Debug)]
struct Scan {
    first: TokenKind,
    tokens: Vec<TokenKind>,
    outcome: Outcome,
}

fn scan_pending(src: &str) -> Scan {
    let mut nesting = Nesting::default();
    let mut header = Header::default();
    let mut start = None;
    let mut scan = Scan {
        first: TokenKind::Illegal,
        tokens: Vec::new(),
        outcome: Outcome::Incomplete,
    };

    for token in Scanner::new(src) {
        if start.is_none() {
            start = Some(token.offset);
            scan.first = token.kind;
        }
        if token.kind == TokenKind::Illegal {
            scan.outcome = Outcome::Illegal {
                offset: token.offset,
                literal: token.lit.to_string(),
            };
            return scan;
        }

        scan.tokens.push(token.kind);
        header.track(token.kind, nesting.is_balanced());
        nesting.track(token.kind, token.lit);

        // Line ends always terminate; `for i := 0; i < n; i++ {` does not.
        let ends_unit = token.is_implicit_semi() || !header.open;
        if token.kind == TokenKind::Semicolon && ends_unit && nesting.is_balanced() {
            scan.outcome = Outcome::Boundary {
                start: start.unwrap_or(token.offset),
                end: token.end(),
            };
            return scan;
        }
    }

    scan
}
