//! Per-cell possibility sets and sensor readings.
//!
//! | Bit | Tile | Sensed as |
//! |-----|------|-----------|
//! | `0b001` | pit | breeze |
//! | `0b010` | wumpus | stench |
//! | `0b100` | gold | glitter |
//!
//! A cleared bit means "provably absent". A reading of exactly `0b1000`
//! means the gold is on the robot's own cell and says nothing about the
//! neighbors.

bitflags::bitflags! {
    /// What may still occupy a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Tile: u8 {
        const PIT = 0b001;
        const WUMPUS = 0b010;
        const GOLD = 0b100;
    }
}

impl Tile {
    /// Nothing ruled out yet.
    pub const UNKNOWN: Tile = Tile::all();
    /// Everything ruled out.
    pub const EMPTY: Tile = Tile::empty();
    /// Properties that kill the robot on entry.
    pub const HAZARDS: Tile = Tile::PIT.union(Tile::WUMPUS);
    /// Properties with exactly one instance on the board.
    pub const SINGLETONS: Tile = Tile::WUMPUS.union(Tile::GOLD);
    /// Order in which single properties are examined during elimination.
    pub const KINDS: [Tile; 3] = [Tile::PIT, Tile::GOLD, Tile::WUMPUS];

    /// No hazard can be here.
    pub fn is_safe(self) -> bool {
        !self.intersects(Tile::HAZARDS)
    }

    /// Number of properties still possible.
    pub fn possibilities(self) -> u32 {
        self.bits().count_ones()
    }

    /// Three-letter glyph, `-` for each excluded property.
    pub fn glyph(self) -> String {
        [(Tile::PIT, 'P'), (Tile::WUMPUS, 'W'), (Tile::GOLD, 'G')]
            .iter()
            .map(|&(t, c)| if self.contains(t) { c } else { '-' })
            .collect()
    }
}

/// Raw value meaning "the gold is on this cell".
pub const GOLD_HERE: u8 = 0b1000;

/// A decoded sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Gold is on the current cell.
    Gold,
    /// Properties present on at least one neighbor.
    Nearby(Tile),
}

impl Reading {
    /// Decode a raw reading, rejecting anything outside the protocol.
    pub fn from_raw(raw: u8) -> Option<Reading> {
        if raw == GOLD_HERE {
            Some(Reading::Gold)
        } else {
            Tile::from_bits(raw).map(Reading::Nearby)
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Reading::Gold => GOLD_HERE,
            Reading::Nearby(tile) => tile.bits(),
        }
    }

    /// Whether this reading reports `kind` on some neighbor.
    pub fn senses(self, kind: Tile) -> bool {
        match self {
            Reading::Gold => false,
            Reading::Nearby(tile) => tile.contains(kind),
        }
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reading::Gold => write!(f, "gold"),
            Reading::Nearby(tile) if tile.is_empty() => write!(f, "nothing"),
            Reading::Nearby(tile) => {
                let names: Vec<&str> = [
                    (Tile::PIT, "breeze"),
                    (Tile::WUMPUS, "stench"),
                    (Tile::GOLD, "glitter"),
                ]
                .iter()
                .filter(|(t, _)| tile.contains(*t))
                .map(|&(_, name)| name)
                .collect();
                write!(f, "{}", names.join("+"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_protocol_values() {
        assert_eq!(Reading::from_raw(0), Some(Reading::Nearby(Tile::EMPTY)));
        assert_eq!(
            Reading::from_raw(0b101),
            Some(Reading::Nearby(Tile::PIT | Tile::GOLD))
        );
        assert_eq!(Reading::from_raw(0b1000), Some(Reading::Gold));
        for raw in 0..=GOLD_HERE {
            assert_eq!(Reading::from_raw(raw).map(Reading::raw), Some(raw));
        }
    }

    #[test]
    fn test_reject_out_of_protocol_values() {
        assert_eq!(Reading::from_raw(0b1001), None);
        assert_eq!(Reading::from_raw(0b10000), None);
        assert_eq!(Reading::from_raw(0xFF), None);
    }

    #[test]
    fn test_safety() {
        assert!(Tile::GOLD.is_safe());
        assert!(Tile::EMPTY.is_safe());
        assert!(!Tile::UNKNOWN.is_safe());
        assert!(!(Tile::WUMPUS | Tile::GOLD).is_safe());
    }

    #[test]
    fn test_glyph_and_display() {
        assert_eq!(Tile::UNKNOWN.glyph(), "PWG");
        assert_eq!(Tile::PIT.glyph(), "P--");
        assert_eq!(Tile::UNKNOWN.possibilities(), 3);
        assert_eq!(
            Reading::Nearby(Tile::PIT | Tile::GOLD).to_string(),
            "breeze+glitter"
        );
        assert_eq!(Reading::Nearby(Tile::EMPTY).to_string(), "nothing");
    }
}
