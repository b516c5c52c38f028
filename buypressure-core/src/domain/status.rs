use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal buy-pressure bucket.
///
/// Variants are declared in rank order so the derived `Ord` matches
/// [`BuyPressureStatus::rank`]. `Unknown` sorts before every ranked bucket
/// and is only produced for NaN input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuyPressureStatus {
    Unknown,
    Weak,
    Caution,
    Neutral,
    Buy,
    Strong,
    Extreme,
}

impl BuyPressureStatus {
    /// All ranked buckets, weakest first.
    pub const RANKED: [BuyPressureStatus; 6] = [
        BuyPressureStatus::Weak,
        BuyPressureStatus::Caution,
        BuyPressureStatus::Neutral,
        BuyPressureStatus::Buy,
        BuyPressureStatus::Strong,
        BuyPressureStatus::Extreme,
    ];

    /// Display rank 0 (weak) through 5 (extreme); `None` for unknown.
    pub fn rank(self) -> Option<u8> {
        match self {
            BuyPressureStatus::Unknown => None,
            BuyPressureStatus::Weak => Some(0),
            BuyPressureStatus::Caution => Some(1),
            BuyPressureStatus::Neutral => Some(2),
            BuyPressureStatus::Buy => Some(3),
            BuyPressureStatus::Strong => Some(4),
            BuyPressureStatus::Extreme => Some(5),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuyPressureStatus::Unknown => "UNKNOWN",
            BuyPressureStatus::Weak => "WEAK",
            BuyPressureStatus::Caution => "CAUTION",
            BuyPressureStatus::Neutral => "NEUTRAL",
            BuyPressureStatus::Buy => "BUY",
            BuyPressureStatus::Strong => "STRONG",
            BuyPressureStatus::Extreme => "EXTREME",
        }
    }
}

impl fmt::Display for BuyPressureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        for (i, status) in BuyPressureStatus::RANKED.iter().enumerate() {
            assert_eq!(status.rank(), Some(i as u8));
        }
        assert!(BuyPressureStatus::Weak < BuyPressureStatus::Extreme);
        assert!(BuyPressureStatus::Unknown < BuyPressureStatus::Weak);
        assert_eq!(BuyPressureStatus::Unknown.rank(), None);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(BuyPressureStatus::Extreme.to_string(), "EXTREME");
        assert_eq!(BuyPressureStatus::Caution.to_string(), "CAUTION");
        assert_eq!(BuyPressureStatus::Unknown.to_string(), "UNKNOWN");
    }
}
