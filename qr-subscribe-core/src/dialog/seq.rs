//! Generation counter for overlapping validation queries

/// Generation of one validation query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Hands out increasing generations and remembers the latest one.
///
/// A result is applied only when its generation is still the latest, so an
/// older query finishing after a newer one is dropped.
#[derive(Debug, Default)]
pub struct ValidationSeq {
    next: u64,
    latest: Option<Generation>,
}

impl ValidationSeq {
    pub fn next(&mut self) -> Generation {
        let generation = Generation(self.next);
        self.next = self.next.wrapping_add(1);
        self.latest = Some(generation);
        generation
    }

    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest == Some(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_newest_generation_is_latest() {
        let mut seq = ValidationSeq::default();
        let first = seq.next();
        assert!(seq.is_latest(first));

        let second = seq.next();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }
}
