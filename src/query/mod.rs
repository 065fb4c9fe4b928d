//! Query engine - filtering and sorting of loaded contents

mod filter;
pub mod property;
mod sort;

pub use filter::{Filter, Predicate};
pub use sort::{try_sort_by, Comparator, Sort};
