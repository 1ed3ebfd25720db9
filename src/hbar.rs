//! Amounts of the ledger's native currency.

use std::{fmt, ops::Add};

use serde::{Deserialize, Serialize};

/// Tinybars in one hbar.
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// An hbar amount, stored in tinybars.
///
/// # Examples
///
/// ```
/// use ledger_bdd::Hbar;
///
/// assert_eq!(Hbar::new(2).to_tinybars(), 200_000_000);
/// assert_eq!(Hbar::from_tinybars(150_000_000).to_string(), "1.5 ℏ");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Hbar = Hbar(0);

    /// Whole hbars.
    #[must_use]
    pub const fn new(hbars: i64) -> Self { Self(hbars.saturating_mul(TINYBARS_PER_HBAR)) }

    #[must_use]
    pub const fn from_tinybars(tinybars: i64) -> Self { Self(tinybars) }

    #[must_use]
    pub const fn to_tinybars(self) -> i64 { self.0 }

    #[must_use]
    pub const fn is_negative(self) -> bool { self.0 < 0 }

    #[must_use]
    pub const fn checked_sub(self, other: Hbar) -> Option<Hbar> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Hbar(v)),
            None => None,
        }
    }
}

impl Add for Hbar {
    type Output = Hbar;

    fn add(self, rhs: Hbar) -> Hbar { Hbar(self.0.saturating_add(rhs.0)) }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = TINYBARS_PER_HBAR.unsigned_abs();
        let (whole, frac) = (abs / per, abs % per);
        if frac == 0 {
            return write!(f, "{sign}{whole} ℏ");
        }
        let frac = format!("{frac:08}");
        write!(f, "{sign}{whole}.{} ℏ", frac.trim_end_matches('0'))
    }
}
