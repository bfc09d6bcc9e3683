//! Core business logic for Comptoir.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and derivations live
//! here; the persistence layer feeds them ground truth and writes back the
//! results.
//!
//! # Modules
//!
//! - `allocation` - Allocation ledger derivations and capacity checks
//! - `receipt` - Goods-receipt quantity validation
//! - `cash` - Cash register session arithmetic
//! - `policy` - Role/action authorization table

pub mod allocation;
pub mod cash;
pub mod policy;
pub mod receipt;
