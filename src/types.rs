use serde::{Deserialize, Serialize};

/// The nine prize tiers of the XSHCM draw, lowest (G8) to highest (ĐB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    G8,
    G7,
    G6,
    G5,
    G4,
    G3,
    G2,
    G1,
    Db,
}

impl Tier {
    pub const ALL: [Tier; 9] = [
        Tier::G8,
        Tier::G7,
        Tier::G6,
        Tier::G5,
        Tier::G4,
        Tier::G3,
        Tier::G2,
        Tier::G1,
        Tier::Db,
    ];
}

/// Winning numbers per tier. Every key is always serialized, empty or not,
/// so clients can render a full board from any accepted result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prizes {
    pub g8: Vec<String>,
    pub g7: Vec<String>,
    pub g6: Vec<String>,
    pub g5: Vec<String>,
    pub g4: Vec<String>,
    pub g3: Vec<String>,
    pub g2: Vec<String>,
    pub g1: Vec<String>,
    pub db: Vec<String>,
}

impl Prizes {
    pub fn tier(&self, tier: Tier) -> &Vec<String> {
        match tier {
            Tier::G8 => &self.g8,
            Tier::G7 => &self.g7,
            Tier::G6 => &self.g6,
            Tier::G5 => &self.g5,
            Tier::G4 => &self.g4,
            Tier::G3 => &self.g3,
            Tier::G2 => &self.g2,
            Tier::G1 => &self.g1,
            Tier::Db => &self.db,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut Vec<String> {
        match tier {
            Tier::G8 => &mut self.g8,
            Tier::G7 => &mut self.g7,
            Tier::G6 => &mut self.g6,
            Tier::G5 => &mut self.g5,
            Tier::G4 => &mut self.g4,
            Tier::G3 => &mut self.g3,
            Tier::G2 => &mut self.g2,
            Tier::G1 => &mut self.g1,
            Tier::Db => &mut self.db,
        }
    }

    pub fn non_empty_tiers(&self) -> usize {
        Tier::ALL
            .iter()
            .filter(|t| !self.tier(**t).is_empty())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DauDuoiEntry {
    pub num: String,
    pub values: String,
}

/// Đầu–đuôi breakdown as published by xskt.com.vn. Only the primary
/// parser fills this in; the backups leave it out entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DauDuoi {
    pub dau: Vec<DauDuoiEntry>,
    pub duoi: Vec<DauDuoiEntry>,
}

/// One normalized draw result, regardless of which page it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryData {
    pub date: String,
    pub prizes: Prizes,
    #[serde(rename = "dauDuoi", skip_serializing_if = "Option::is_none")]
    pub dau_duoi: Option<DauDuoi>,
    pub source: String,
    #[serde(rename = "isDemo", skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,
}

impl LotteryData {
    pub fn empty(source: &str) -> Self {
        Self {
            date: String::new(),
            prizes: Prizes::default(),
            dau_duoi: None,
            source: source.to_string(),
            is_demo: None,
        }
    }
}

/// Wire envelope for `/api/lottery/hcm`. The endpoint never returns a hard
/// failure; degraded results are flagged through `data.isDemo` and `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LotteryApiResponse {
    pub success: bool,
    pub data: LotteryData,
    pub cached: bool,
    #[serde(rename = "lastUpdate")]
    pub last_update: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
