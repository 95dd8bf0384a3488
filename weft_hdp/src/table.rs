use serde::{Deserialize, Serialize};

/// A per-document cluster of tokens sharing one dish.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// The number of customers seated at this table
    pub n: usize,
    /// Per-word customer counts, dense over the vocabulary
    pub n_v: Vec<usize>,
    /// The index of the dish served at this table, into the franchise menu.
    /// [`crate::UNASSIGNED`](crate::UNASSIGNED) while the table is between
    /// dishes mid-step.
    pub topic: usize,
}

impl Table {
    /// A fresh table serving dish `topic`, with zero counts. The caller must
    /// seat a customer before yielding control.
    pub fn new(n_vocab: usize, topic: usize) -> Self {
        Table {
            n: 0,
            n_v: vec![0; n_vocab],
            topic,
        }
    }

    /// Seat one customer with word `v`
    #[inline]
    pub fn seat(&mut self, v: usize) {
        self.n += 1;
        self.n_v[v] += 1;
    }

    /// Remove one customer with word `v`
    #[inline]
    pub fn unseat(&mut self, v: usize) {
        assert!(self.n_v[v] > 0, "table count underflow for word {v}");
        self.n -= 1;
        self.n_v[v] -= 1;
    }

    /// The words present at this table with their counts.
    ///
    /// Recomputed lazily by scanning the dense counts; the dense vector stays
    /// the single source of truth.
    pub fn occupied_words(&self) -> Vec<(usize, usize)> {
        self.n_v
            .iter()
            .enumerate()
            .filter(|(_, &ct)| ct > 0)
            .map(|(v, &ct)| (v, ct))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_words_skips_zero_counts() {
        let mut table = Table::new(5, 0);
        table.seat(1);
        table.seat(1);
        table.seat(4);

        assert_eq!(table.occupied_words(), vec![(1, 2), (4, 1)]);
        assert_eq!(table.n, 3);
    }

    #[test]
    fn seat_then_unseat_restores_counts() {
        let mut table = Table::new(3, 0);
        table.seat(0);
        let before = table.clone();

        table.seat(2);
        table.unseat(2);

        assert_eq!(table, before);
    }
}
