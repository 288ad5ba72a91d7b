//! Relational primitives for every entity: insert, conditional insert
//! (`ON CONFLICT DO NOTHING`) and select with an optional equality filter.
//!
//! Each function runs a single statement on a caller-supplied connection, so
//! callers decide whether to wrap several of them in a transaction. Listings
//! are ordered by `id`, which is insertion order.

pub mod account;
pub mod attempt;
pub mod catalog;
pub mod question;
