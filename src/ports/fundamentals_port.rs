//! Best-effort fundamentals side channel.
//!
//! Lookups never fail: a missing ticker or value is simply absent.

use crate::domain::screen::Fundamentals;

pub trait FundamentalsPort {
    fn lookup(&self, ticker: &str) -> Fundamentals;
}

/// Source with no fundamentals at all.
pub struct NoFundamentals;

impl FundamentalsPort for NoFundamentals {
    fn lookup(&self, _ticker: &str) -> Fundamentals {
        Fundamentals::default()
    }
}
