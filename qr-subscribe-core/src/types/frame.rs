//! Camera frame handed to the QR analyzer.

/// 8-bit greyscale frame, row-major, no stride padding.
#[derive(Debug, Clone)]
pub struct LumaFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl LumaFrame {
    /// Returns `None` when `data` does not hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (width.checked_mul(height)? == data.len()).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Luma at (`x`, `y`). Out-of-range coordinates read as white.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return u8::MAX;
        }
        self.data
            .get(y * self.width + x)
            .copied()
            .unwrap_or(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(LumaFrame::new(2, 2, vec![0; 3]).is_none());
        assert!(LumaFrame::new(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn out_of_range_reads_white() {
        let f = LumaFrame::new(1, 1, vec![7]).unwrap();
        assert_eq!(f.luma(0, 0), 7);
        assert_eq!(f.luma(1, 0), 255);
    }
}
