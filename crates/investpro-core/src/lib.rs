//! Core library for the InvestPro demo platform.
//!
//! Contains the investment plan catalog, the return calculator, the
//! investor code registry (issuance and lookup over one store), the
//! session store, the payment checkout state machine, and the
//! illustrative dashboard data. This crate depends on `investpro-storage`
//! for the storage backend trait and knows nothing about how any of it is
//! rendered.

pub mod code;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod investor;
pub mod payment;
pub mod plan;
pub mod platform;
pub mod registry;
pub mod returns;
pub mod session;
