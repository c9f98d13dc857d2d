//! Hit dice expressions
//!
//! Whitehack hit dice are written as a d6 count with an optional bonus
//! and an optional `*` flag:
//! - `3` rolls 3d6
//! - `2+1` rolls 2d6 and adds 1
//! - `1+1*` is flagged (the Brave comeback die applies)

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Errors for hit dice expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitDiceError {
    /// Expression is empty
    Empty,
    /// Expression doesn't match `N`, `N+M` or a flagged form
    InvalidFormat(String),
}

impl fmt::Display for HitDiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitDiceError::Empty => write!(f, "Hit dice expression cannot be empty"),
            HitDiceError::InvalidFormat(expr) => {
                write!(f, "Invalid hit dice expression '{}'", expr)
            }
        }
    }
}

impl std::error::Error for HitDiceError {}

static HIT_DICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:\+(\d{1,2}))?(\*)?$").unwrap());

/// A parsed hit dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitDice {
    /// Number of d6
    pub dice: u8,
    /// Flat bonus added to the roll
    pub modifier: u8,
    /// Flag suffix present
    pub flagged: bool,
}

impl HitDice {
    /// Lowest possible hit point roll
    pub fn min(&self) -> u32 {
        self.dice as u32 + self.modifier as u32
    }

    /// Highest possible hit point roll
    pub fn max(&self) -> u32 {
        self.dice as u32 * 6 + self.modifier as u32
    }

    /// Dice notation for rolling, e.g. "2d6+1"
    pub fn notation(&self) -> String {
        if self.modifier > 0 {
            format!("{}d6+{}", self.dice, self.modifier)
        } else {
            format!("{}d6", self.dice)
        }
    }
}

impl fmt::Display for HitDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dice)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        }
        if self.flagged {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl FromStr for HitDice {
    type Err = HitDiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hit_dice(s)
    }
}

/// Parse a hit dice expression such as "3", "2+1" or "1+1*"
pub fn parse_hit_dice(expr: &str) -> Result<HitDice, HitDiceError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(HitDiceError::Empty);
    }

    let caps = HIT_DICE_REGEX
        .captures(expr)
        .ok_or_else(|| HitDiceError::InvalidFormat(expr.to_string()))?;

    let dice = caps[1]
        .parse()
        .map_err(|_| HitDiceError::InvalidFormat(expr.to_string()))?;
    let modifier = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| HitDiceError::InvalidFormat(expr.to_string()))?,
        None => 0,
    };

    Ok(HitDice {
        dice,
        modifier,
        flagged: caps.get(3).is_some(),
    })
}
