use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Rice growing season in the Bayombong cropping calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// March 16 to September 15
    Wet,
    /// September 16 to March 15
    Dry,
}

impl Season {
    pub fn for_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());
        let wet = (month == 3 && day >= 16) || (4..=8).contains(&month) || (month == 9 && day <= 15);
        if wet {
            Season::Wet
        } else {
            Season::Dry
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Wet => "Wet",
            Season::Dry => "Dry",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wet" => Some(Season::Wet),
            "dry" => Some(Season::Dry),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Season", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CroppingPhase {
    LandPreparation,
    Planting,
    Growth,
    Flowering,
    Harvest,
    PostHarvest,
}

impl CroppingPhase {
    /// Season and phase for a calendar date.
    ///
    /// Each season runs land preparation, planting, growth, flowering and
    /// harvest back to back; post-harvest work overlaps the next season's
    /// land preparation and is never returned here.
    pub fn for_date(date: NaiveDate) -> (Season, Self) {
        let (month, day) = (date.month(), date.day());
        let season = Season::for_date(date);
        // Shift the dry season by six months so both seasons share one table
        let month = match season {
            Season::Wet => month,
            Season::Dry => (month + 5) % 12 + 1,
        };
        let phase = match (month, day) {
            (3, _) | (4, 1..=15) => CroppingPhase::LandPreparation,
            (4, _) => CroppingPhase::Planting,
            (5, _) | (6, _) => CroppingPhase::Growth,
            (7, _) | (8, 1..=15) => CroppingPhase::Flowering,
            _ => CroppingPhase::Harvest,
        };
        (season, phase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CroppingPhase::LandPreparation => "Land Preparation",
            CroppingPhase::Planting => "Seedling Nursery / Planting",
            CroppingPhase::Growth => "Crop Establishment / Vegetative Growth",
            CroppingPhase::Flowering => "Reproductive Stage (Flowering)",
            CroppingPhase::Harvest => "Maturation / Harvesting",
            CroppingPhase::PostHarvest => "Post-Harvest (Drying, Milling, Storage)",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "landpreparation" | "landprep" => Some(CroppingPhase::LandPreparation),
            "planting" => Some(CroppingPhase::Planting),
            "growth" => Some(CroppingPhase::Growth),
            "flowering" => Some(CroppingPhase::Flowering),
            "harvest" | "harvesting" => Some(CroppingPhase::Harvest),
            "postharvest" => Some(CroppingPhase::PostHarvest),
            _ => None,
        }
    }

    pub fn all() -> &'static [CroppingPhase] {
        &[
            CroppingPhase::LandPreparation,
            CroppingPhase::Planting,
            CroppingPhase::Growth,
            CroppingPhase::Flowering,
            CroppingPhase::Harvest,
            CroppingPhase::PostHarvest,
        ]
    }
}

impl std::fmt::Display for CroppingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn season_boundaries() {
        assert_eq!(Season::for_date(ymd(2025, 3, 15)), Season::Dry);
        assert_eq!(Season::for_date(ymd(2025, 3, 16)), Season::Wet);
        assert_eq!(Season::for_date(ymd(2025, 9, 15)), Season::Wet);
        assert_eq!(Season::for_date(ymd(2025, 9, 16)), Season::Dry);
        assert_eq!(Season::for_date(ymd(2025, 12, 25)), Season::Dry);
    }

    #[test]
    fn wet_season_phases() {
        let phase = |m, d| CroppingPhase::for_date(ymd(2025, m, d));
        assert_eq!(phase(3, 16), (Season::Wet, CroppingPhase::LandPreparation));
        assert_eq!(phase(4, 15), (Season::Wet, CroppingPhase::LandPreparation));
        assert_eq!(phase(4, 16), (Season::Wet, CroppingPhase::Planting));
        assert_eq!(phase(5, 1), (Season::Wet, CroppingPhase::Growth));
        assert_eq!(phase(6, 30), (Season::Wet, CroppingPhase::Growth));
        assert_eq!(phase(7, 1), (Season::Wet, CroppingPhase::Flowering));
        assert_eq!(phase(8, 15), (Season::Wet, CroppingPhase::Flowering));
        assert_eq!(phase(8, 16), (Season::Wet, CroppingPhase::Harvest));
        assert_eq!(phase(9, 15), (Season::Wet, CroppingPhase::Harvest));
    }

    #[test]
    fn dry_season_phases() {
        let phase = |y, m, d| CroppingPhase::for_date(ymd(y, m, d));
        assert_eq!(phase(2025, 9, 16), (Season::Dry, CroppingPhase::LandPreparation));
        assert_eq!(phase(2025, 10, 15), (Season::Dry, CroppingPhase::LandPreparation));
        assert_eq!(phase(2025, 10, 16), (Season::Dry, CroppingPhase::Planting));
        assert_eq!(phase(2025, 10, 31), (Season::Dry, CroppingPhase::Planting));
        assert_eq!(phase(2025, 11, 1), (Season::Dry, CroppingPhase::Growth));
        assert_eq!(phase(2025, 12, 31), (Season::Dry, CroppingPhase::Growth));
        assert_eq!(phase(2026, 1, 1), (Season::Dry, CroppingPhase::Flowering));
        assert_eq!(phase(2026, 2, 15), (Season::Dry, CroppingPhase::Flowering));
        assert_eq!(phase(2026, 2, 16), (Season::Dry, CroppingPhase::Harvest));
        assert_eq!(phase(2026, 3, 15), (Season::Dry, CroppingPhase::Harvest));
    }

    #[test]
    fn phase_from_str() {
        assert_eq!(
            CroppingPhase::from_str("land-prep"),
            Some(CroppingPhase::LandPreparation)
        );
        assert_eq!(
            CroppingPhase::from_str("Post Harvest"),
            Some(CroppingPhase::PostHarvest)
        );
        assert_eq!(CroppingPhase::from_str("milling"), None);
    }
}
