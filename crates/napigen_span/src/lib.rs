//! Byte spans into normalized declaration text.

/// Half-open byte range `start..end` into a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn converts_to_range() {
        let range: std::ops::Range<usize> = Span::new(3, 4).into();
        assert_eq!(range, 3..4);
        let empty: std::ops::Range<usize> = Span::new(5, 5).into();
        assert!(empty.is_empty());
    }
}
