//! # caravan-scaffold
//!
//! File templates for new packages. Construct a [`Scaffold`] once and call
//! [`Scaffold::write_into`] with a [`PackageContext`] to lay down the
//! package tree.

pub mod engine;
pub mod error;

pub use engine::{PackageContext, PackageKind, Scaffold};
pub use error::ScaffoldError;
