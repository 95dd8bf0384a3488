//! Invariant checking over the whole franchise.
//!
//! The checks traverse the restaurants and recompute every aggregate from
//! scratch rather than trusting any cached total. They are wired into the
//! sweeps behind `debug_assert!` and can be disabled wholesale by setting
//! `WEFT_NOCHECK=1` at compile time.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::franchise::Franchise;
use crate::topic::Topic;
use crate::UNASSIGNED;

/// Validates the franchise if `WEFT_NOCHECK` is not set to `"1"`.
#[macro_export]
macro_rules! validate_franchise {
    ($hdp:expr) => {{
        let validate: bool = match option_env!("WEFT_NOCHECK") {
            Some(value) => value != "1",
            None => true,
        };
        if validate {
            $hdp.validate().is_valid()
        } else {
            true
        }
    }};
}

/// The possible ways the count bookkeeping can go wrong across the four
/// entity levels
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Clone)]
pub struct FranchiseDiagnostics {
    /// The franchise table count matches the tables in the restaurants
    m_agrees_with_restaurants: bool,
    /// The franchise table count matches the per-dish table counts
    m_agrees_with_menu: bool,
    /// Every open table seats at least one customer
    no_empty_tables: bool,
    /// Every table's per-word counts sum to its customer count
    table_totals_agree: bool,
    /// Every customer sits at exactly one open table of its restaurant
    customers_seated: bool,
    /// Every table serves a dish that is on the menu
    tables_serve_menu_dishes: bool,
    /// Every dish on the menu is served by at least one table
    no_unserved_dishes: bool,
    /// Every dish's aggregate counts match the sum over its tables
    dish_counts_agree: bool,
    /// Every restaurant seats exactly its document's tokens
    document_lengths_conserved: bool,
    /// The menu is never empty while customers exist
    menu_non_empty: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum FranchiseError {
    #[error("the franchise table count disagrees with the restaurants")]
    TableCountDisagreesWithRestaurants,
    #[error("the franchise table count disagrees with the menu")]
    TableCountDisagreesWithMenu,
    #[error("an open table seats no customers")]
    EmptyTable,
    #[error("a table's per-word counts do not sum to its total")]
    TableTotalMismatch,
    #[error("a customer is unseated or seated at a table that is not open")]
    UnseatedCustomer,
    #[error("a table serves a dish that is not on the menu")]
    DanglingDishReference,
    #[error("a dish on the menu is served by no table")]
    UnservedDish,
    #[error("a dish's aggregate counts disagree with its tables")]
    DishCountMismatch,
    #[error("a restaurant's seated tokens disagree with its document length")]
    DocumentLengthMismatch,
    #[error("the menu is empty")]
    EmptyMenu,
}

impl FranchiseDiagnostics {
    pub fn new(hdp: &Franchise) -> Self {
        let n_topics = hdp.topics.len();

        // per-dish aggregates rebuilt by walking the restaurants
        let mut rebuilt: Vec<Topic> =
            (0..n_topics).map(|_| Topic::new(hdp.n_vocab())).collect();
        let mut dangling = false;
        for restaurant in &hdp.restaurants {
            for table in &restaurant.tables {
                if table.topic >= n_topics {
                    dangling = true;
                    continue;
                }
                let topic = &mut rebuilt[table.topic];
                topic.m += 1;
                topic.n += table.n;
                for (total, &ct) in topic.n_v.iter_mut().zip(&table.n_v) {
                    *total += ct;
                }
            }
        }

        FranchiseDiagnostics {
            m_agrees_with_restaurants: {
                let n_tables: usize = hdp
                    .restaurants
                    .iter()
                    .map(|restaurant| restaurant.tables.len())
                    .sum();
                hdp.m == n_tables
            },
            m_agrees_with_menu: {
                let n_tables: usize =
                    hdp.topics.iter().map(|topic| topic.m).sum();
                hdp.m == n_tables
            },
            no_empty_tables: {
                hdp.restaurants.iter().all(|restaurant| {
                    restaurant.tables.iter().all(|table| table.n > 0)
                })
            },
            table_totals_agree: {
                hdp.restaurants.iter().all(|restaurant| {
                    restaurant.tables.iter().all(|table| {
                        table.n_v.iter().sum::<usize>() == table.n
                    })
                })
            },
            customers_seated: {
                hdp.restaurants.iter().all(|restaurant| {
                    restaurant.seats.iter().all(|&seat| {
                        seat != UNASSIGNED && seat < restaurant.tables.len()
                    })
                })
            },
            tables_serve_menu_dishes: !dangling,
            no_unserved_dishes: {
                hdp.topics.iter().all(|topic| topic.m > 0)
            },
            dish_counts_agree: {
                !dangling
                    && hdp.topics.iter().zip(&rebuilt).all(|(topic, built)| {
                        topic.m == built.m
                            && topic.n == built.n
                            && topic.n_v == built.n_v
                    })
            },
            document_lengths_conserved: {
                hdp.restaurants.iter().all(|restaurant| {
                    let seated: usize = restaurant
                        .tables
                        .iter()
                        .map(|table| table.n)
                        .sum();
                    seated == restaurant.n()
                })
            },
            menu_non_empty: n_topics > 0,
        }
    }

    /// `true` if none of the checks was violated
    pub fn is_valid(&self) -> bool {
        self.m_agrees_with_restaurants
            && self.m_agrees_with_menu
            && self.no_empty_tables
            && self.table_totals_agree
            && self.customers_seated
            && self.tables_serve_menu_dishes
            && self.no_unserved_dishes
            && self.dish_counts_agree
            && self.document_lengths_conserved
            && self.menu_non_empty
    }

    /// Convert the first violated check into its error
    pub fn emit_error(&self) -> Result<(), FranchiseError> {
        macro_rules! check {
            ($field:ident, $err:ident) => {
                if !self.$field {
                    return Err(FranchiseError::$err);
                }
            };
        }
        check!(m_agrees_with_restaurants, TableCountDisagreesWithRestaurants);
        check!(m_agrees_with_menu, TableCountDisagreesWithMenu);
        check!(no_empty_tables, EmptyTable);
        check!(table_totals_agree, TableTotalMismatch);
        check!(customers_seated, UnseatedCustomer);
        check!(tables_serve_menu_dishes, DanglingDishReference);
        check!(no_unserved_dishes, UnservedDish);
        check!(dish_counts_agree, DishCountMismatch);
        check!(document_lengths_conserved, DocumentLengthMismatch);
        check!(menu_non_empty, EmptyMenu);
        Ok(())
    }
}

impl Franchise {
    pub fn validate(&self) -> FranchiseDiagnostics {
        FranchiseDiagnostics::new(self)
    }
}
