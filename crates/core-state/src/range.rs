/// How an operator should treat a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Characterwise,
    Linewise,
    Blockwise,
}

/// Half-open character interval `[start, end)`.
///
/// For `Blockwise`, `start` and `end - 1` are opposite corners of the block;
/// the operator derives per-line columns from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
    pub kind: RangeKind,
}

impl TextRange {
    /// Build a range, swapping the ends if given backwards.
    pub fn new(a: usize, b: usize, kind: RangeKind) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
            kind,
        }
    }

    pub fn characterwise(a: usize, b: usize) -> Self {
        Self::new(a, b, RangeKind::Characterwise)
    }

    pub fn linewise(a: usize, b: usize) -> Self {
        Self::new(a, b, RangeKind::Linewise)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_orders_ends() {
        let r = TextRange::characterwise(7, 3);
        assert_eq!((r.start, r.end, r.len()), (3, 7, 4));
        assert!(r.contains(3) && !r.contains(7));
        assert!(TextRange::linewise(2, 2).is_empty());
    }
}
