/// The current mode of the interpreter.
///
/// Vim is a modal editor where the same keys perform different
/// actions depending on the current mode. Exactly one mode is active at a
/// time; every transition goes through `Engine::enter_mode`, which resets
/// stale selection and overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal mode - for navigation and operators.
    #[default]
    Normal,
    /// Character-wise selection (v).
    Visual,
    /// Line-wise selection (V).
    VisualLine,
    /// Insert mode - keys go to the document.
    Insert,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "VISUAL LINE",
            Mode::Insert => "INSERT",
        }
    }
}

/// How the endpoints of a motion translate into a range an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wise {
    /// `[min(cur, target), max(cur, target))`.
    CharExclusive,
    /// Like `CharExclusive` with the end extended by one character.
    CharInclusive,
    /// Snapped to whole lines.
    Line,
    /// An explicit range precomputed by the motion (text objects).
    Block,
}

/// The outcome of a motion computation.
///
/// A `None` target means the motion failed (character not found, unset
/// mark, unmatched bracket); any pending operator must abort without
/// touching the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionResult {
    pub target: Option<usize>,
    pub sel_start: Option<usize>,
    pub sel_end: Option<usize>,
    pub wise: Wise,
}

impl MotionResult {
    pub fn exclusive(target: usize) -> Self {
        Self::with_wise(target, Wise::CharExclusive)
    }

    pub fn inclusive(target: usize) -> Self {
        Self::with_wise(target, Wise::CharInclusive)
    }

    pub fn line(target: usize) -> Self {
        Self::with_wise(target, Wise::Line)
    }

    /// An explicit `[start, end)` range. The cursor target is the start.
    pub fn block(start: usize, end: usize) -> Self {
        Self {
            target: Some(start),
            sel_start: Some(start),
            sel_end: Some(end),
            wise: Wise::Block,
        }
    }

    pub fn failed() -> Self {
        Self {
            target: None,
            sel_start: None,
            sel_end: None,
            wise: Wise::CharExclusive,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.target.is_none()
    }

    fn with_wise(target: usize, wise: Wise) -> Self {
        Self {
            target: Some(target),
            sel_start: None,
            sel_end: None,
            wise,
        }
    }
}

/// One line of the document as reported by the host.
///
/// `start` and `end` are character offsets; `end` points at the line
/// terminator (or the end of the document) and is not part of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl LineInfo {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A resolved range an operator acts on.
///
/// Half-open `[start, end)`. For line-wise spans `start` is the first
/// line's start and `end` the last line's end, terminator excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub linewise: bool,
}

impl Span {
    pub fn chars(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            linewise: false,
        }
    }

    pub fn lines(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            linewise: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
