use serde::{Deserialize, Serialize};

use crate::table::Table;

/// One restaurant per document. Customers are the document's tokens; the
/// customer sequence is fixed at construction and only the seating mutates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Restaurant {
    /// The word id of each customer, in document order
    pub words: Vec<usize>,
    /// The table each customer sits at, indexed into `tables`.
    /// [`crate::UNASSIGNED`](crate::UNASSIGNED) while a customer is between
    /// tables mid-step.
    pub seats: Vec<usize>,
    /// The restaurant's tables, in creation order
    pub tables: Vec<Table>,
}

impl Restaurant {
    /// The number of customers (the document length)
    #[inline]
    pub fn n(&self) -> usize {
        self.words.len()
    }

    /// The number of tables currently open
    #[inline]
    pub fn n_tables(&self) -> usize {
        self.tables.len()
    }
}
