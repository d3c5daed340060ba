//! Strata
//!
//! Strata is a cart tier discount calculator: it maps a cart snapshot onto a
//! percentage discount decision by comparing a qualifying spend amount
//! against an ordered threshold schedule, optionally discounting free-gift
//! lines from the amount first.

pub mod calculator;
pub mod cart;
pub mod config;
pub mod decision;
pub mod money;
pub mod qualifying;
pub mod tiers;
