//! Attack-type to color token mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color token handed to the rendering surface for one attack vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackColor {
    Red,
    Orange,
    Cyan,
    Magenta,
}

impl AttackColor {
    /// Hex value used for strokes and fills
    pub fn hex(&self) -> &'static str {
        match self {
            AttackColor::Red => "#ef4444",
            AttackColor::Orange => "#f97316",
            AttackColor::Cyan => "#06b6d4",
            AttackColor::Magenta => "#d946ef",
        }
    }
}

impl fmt::Display for AttackColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Substring rules in priority order. `ddos` precedes `dos` because every
/// `ddos` label also contains `dos`.
const COLOR_RULES: [(&str, AttackColor); 4] = [
    ("ddos", AttackColor::Red),
    ("dos", AttackColor::Orange),
    ("brute", AttackColor::Cyan),
    ("bot", AttackColor::Magenta),
];

/// Color for labels no rule matches. Deliberately the same red as `ddos`;
/// an unmatched label is still a threat to draw.
pub const FALLBACK_COLOR: AttackColor = AttackColor::Red;

/// Resolve the color for an attack label by case-insensitive substring
/// match, first rule wins.
pub fn resolve_color(attack_type: &str) -> AttackColor {
    let label = attack_type.to_lowercase();
    COLOR_RULES
        .iter()
        .find(|(needle, _)| label.contains(needle))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
