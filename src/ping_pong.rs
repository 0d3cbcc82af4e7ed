//! Alternation index for the buffer pair.
//!
//! The compute stage and the render stage share this one type. At index `i`
//! the compute pass reads buffer `i` and writes buffer `1 - i`, while the
//! render pass reads buffer `i`. The render therefore always shows the
//! state produced by the previous tick's compute.

/// Which buffer of the pair is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PingPong {
    #[default]
    First,
    Second,
}

impl PingPong {
    pub const ALL: [PingPong; 2] = [PingPong::First, PingPong::Second];

    /// Numeric index, `0` or `1`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PingPong::First => 0,
            PingPong::Second => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            PingPong::First => PingPong::Second,
            PingPong::Second => PingPong::First,
        }
    }

    /// Advance to the other buffer.
    #[inline]
    pub fn flip(&mut self) {
        *self = self.other();
    }

    /// Buffer read by both the compute and the render pass.
    #[inline]
    pub fn current(self) -> usize {
        self.index()
    }

    /// Buffer written by the compute pass.
    #[inline]
    pub fn next(self) -> usize {
        self.other().index()
    }
}

impl From<PingPong> for usize {
    fn from(value: PingPong) -> Self {
        value.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_disjoint() {
        for pp in PingPong::ALL {
            assert_ne!(pp.current(), pp.next());
            assert_eq!(pp.next(), (pp.index() + 1) % 2);
        }
    }

    #[test]
    fn test_flip_alternates() {
        let mut pp = PingPong::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(pp.index());
            pp.flip();
        }
        assert_eq!(seen, vec![0, 1, 0, 1, 0]);
    }
}
