//! Literal search over chunked text (rope chunks or a single slice).
//!
//! Matches never overlap. A tail of `pattern_len - 1` bytes is carried between
//! chunks so matches spanning a chunk boundary are found.

use crate::kernel::services::ports::search::Match;
use memchr::memmem::Finder;

/// Newline bookkeeping: every byte before `counted` has been scanned.
#[derive(Default)]
struct LineTracker {
    counted: usize,
    line: usize,
    line_start: usize,
}

impl LineTracker {
    fn advance(&mut self, upto: usize, window: &[u8], window_offset: usize) {
        if upto <= self.counted {
            return;
        }
        let from = self.counted - window_offset;
        let to = upto - window_offset;
        for nl in memchr::memchr_iter(b'\n', &window[from..to]) {
            self.line += 1;
            self.line_start = window_offset + from + nl + 1;
        }
        self.counted = upto;
    }
}

pub struct LiteralSearcher {
    finder: Finder<'static>,
}

impl LiteralSearcher {
    /// `None` for an empty pattern.
    pub fn new(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }
        Some(Self {
            finder: Finder::new(pattern.as_bytes()).into_owned(),
        })
    }

    pub fn pattern_len(&self) -> usize {
        self.finder.needle().len()
    }

    pub fn find_in_str(&self, text: &str) -> Vec<Match> {
        self.find_in_chunks([text])
    }

    pub fn find_in_chunks<'c, I>(&self, chunks: I) -> Vec<Match>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let pattern_len = self.pattern_len();
        let mut matches = Vec::new();
        let mut window: Vec<u8> = Vec::new();
        let mut window_offset = 0usize;

        let mut lines = LineTracker::default();
        // Start of the earliest match still allowed (no overlaps).
        let mut next_allowed = 0usize;

        for chunk in chunks {
            window.extend_from_slice(chunk.as_bytes());

            let mut from = next_allowed.saturating_sub(window_offset);
            while let Some(pos) = self.finder.find(&window[from..]) {
                let start = window_offset + from + pos;
                lines.advance(start, &window, window_offset);
                let end = start + pattern_len;
                matches.push(Match::new(start, end, lines.line, start - lines.line_start));
                next_allowed = end;
                from = end - window_offset;
            }

            let keep = window.len().min(pattern_len - 1);
            let carry_start = window_offset + window.len() - keep;
            lines.advance(carry_start, &window, window_offset);
            window.drain(..window.len() - keep);
            window_offset = carry_start;
        }

        matches
    }
}
