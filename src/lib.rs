//! Tax regime calculator for small businesses.
//!
//! Projects the tax of a selected regime over four fiscal years and recommends the
//! cheapest regime the business is eligible for.

pub mod core;
