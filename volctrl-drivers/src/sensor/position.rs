//! Wiper position sensor
//!
//! The potentiometer wiper is read on a 12-bit ADC channel. The control
//! logic works on a 10-bit scale (0-1023), so readings are averaged over
//! a short window and scaled down.

/// Highest position on the control scale
pub const POSITION_MAX: u16 = 1023;

/// Highest raw reading of the 12-bit ADC
const ADC_MAX: u16 = 4095;

/// Moving average over the last `N` raw readings
#[derive(Debug, Clone)]
pub struct PositionFilter<const N: usize> {
    window: [u16; N],
    next: usize,
    filled: usize,
}

impl<const N: usize> Default for PositionFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PositionFilter<N> {
    /// Create an empty filter
    pub const fn new() -> Self {
        Self {
            window: [0; N],
            next: 0,
            filled: 0,
        }
    }

    /// Add a raw 12-bit reading and return the filtered position
    pub fn push(&mut self, raw: u16) -> u16 {
        if N == 0 {
            return scale(raw);
        }
        self.window[self.next] = raw.min(ADC_MAX);
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        self.position()
    }

    /// Filtered position of the readings so far
    pub fn position(&self) -> u16 {
        if self.filled == 0 {
            return 0;
        }
        let sum: u32 = self.window[..self.filled].iter().map(|&r| u32::from(r)).sum();
        scale((sum / self.filled as u32) as u16)
    }
}

/// Scale a raw 12-bit reading to the 10-bit control scale
pub fn scale(raw: u16) -> u16 {
    (raw.min(ADC_MAX) >> 2).min(POSITION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(scale(0), 0);
        assert_eq!(scale(4095), 1023);
        assert_eq!(scale(u16::MAX), 1023);
        assert_eq!(scale(2048), 512);
    }

    #[test]
    fn test_filter_averages_window() {
        let mut filter: PositionFilter<4> = PositionFilter::new();
        assert_eq!(filter.position(), 0);
        assert_eq!(filter.push(400), 100);
        assert_eq!(filter.push(800), 150);
        filter.push(800);
        filter.push(800);
        assert_eq!(filter.push(800), 200);
    }

    #[test]
    fn test_full_scale_reaches_upper_limit() {
        let mut filter: PositionFilter<8> = PositionFilter::new();
        for _ in 0..8 {
            filter.push(4095);
        }
        assert_eq!(filter.position(), POSITION_MAX);
    }
}
