/// Last five accepted aim points, for jitter suppression. Single-writer,
/// single-reader (the frame processor only), so a plain array with a
/// head index is enough.
#[derive(Debug, Clone, Copy)]
pub struct History {
    points: [(f64, f64); 5],
    len: usize,
    head: usize,
}

impl Default for History {
    fn default() -> Self {
        History { points: [(0.0, 0.0); 5], len: 0, head: 0 }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: (f64, f64)) {
        self.points[self.head] = point;
        self.head = (self.head + 1) % self.points.len();
        self.len = (self.len + 1).min(self.points.len());
    }

    pub fn is_full(&self) -> bool {
        self.len == self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().take(self.len).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_overwrites_oldest() {
        let mut h = History::new();
        for i in 0..7 {
            h.push((i as f64, 0.0));
        }
        assert!(h.is_full());
        let xs: Vec<f64> = h.iter().map(|(x, _)| x).collect();
        assert_eq!(xs.len(), 5);
        assert!(xs.contains(&6.0));
        assert!(!xs.contains(&0.0));
        assert!(!xs.contains(&1.0));
    }
}
