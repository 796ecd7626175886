//! The two complementary outcome tokens of one binary market.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome token of a binary market. Prices of a token and its complement
/// sum to 1.0 by construction of the price feed (assumed, not enforced).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    A,
    B,
}

impl Token {
    /// The other outcome of the same market.
    pub fn complement(&self) -> Token {
        match self {
            Token::A => Token::B,
            Token::B => Token::A,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::A => write!(f, "A"),
            Token::B => write!(f, "B"),
        }
    }
}
