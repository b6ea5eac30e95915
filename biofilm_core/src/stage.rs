//! Biofilm growth stage bands.
//!
//! Stages are a total, non-overlapping function of the resolved score. The
//! table is data so an alternate banding can be swapped in from config
//! without touching the classifier.

use biofilm_config::StageScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BiofilmStage {
    InitialAttachment,
    IrreversibleAttachment,
    MaturationI,
    MaturationII,
}

impl BiofilmStage {
    pub fn name(&self) -> &'static str {
        match self {
            BiofilmStage::InitialAttachment => "Early Growth / Initial Attachment",
            BiofilmStage::IrreversibleAttachment => "Developing Biofilm / Irreversible Attachment",
            BiofilmStage::MaturationI => "Maturation I",
            BiofilmStage::MaturationII => "Critical Biofilm / Maturation II",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BiofilmStage::InitialAttachment => "planktonic cells attaching",
            BiofilmStage::IrreversibleAttachment => "EPS production starting",
            BiofilmStage::MaturationI => "microcolonies forming",
            BiofilmStage::MaturationII => "critical mass reached",
        }
    }
}

/// Lower bound (inclusive) of each band, ascending.
#[derive(Debug, Clone)]
pub struct StageTable {
    bands: Vec<(f64, BiofilmStage)>,
}

/// [0,30) [30,60) [60,85) [85,100]
const FOUR_BAND: [(f64, BiofilmStage); 4] = [
    (0.0, BiofilmStage::InitialAttachment),
    (30.0, BiofilmStage::IrreversibleAttachment),
    (60.0, BiofilmStage::MaturationI),
    (85.0, BiofilmStage::MaturationII),
];

/// Older dashboard banding: [0,30) [30,70) [70,100], no Maturation I split.
const THREE_BAND: [(f64, BiofilmStage); 3] = [
    (0.0, BiofilmStage::InitialAttachment),
    (30.0, BiofilmStage::IrreversibleAttachment),
    (70.0, BiofilmStage::MaturationII),
];

impl Default for StageTable {
    fn default() -> Self {
        Self::four_band()
    }
}

impl StageTable {
    pub fn four_band() -> Self {
        Self {
            bands: FOUR_BAND.to_vec(),
        }
    }

    pub fn three_band() -> Self {
        Self {
            bands: THREE_BAND.to_vec(),
        }
    }

    pub fn from_scheme(scheme: StageScheme) -> Self {
        match scheme {
            StageScheme::FourBand => Self::four_band(),
            StageScheme::ThreeBand => Self::three_band(),
        }
    }

    /// Highest band whose lower bound is <= score. Scores below the first bound
    /// (or NaN) fall into the first band.
    pub fn classify(&self, score: f64) -> BiofilmStage {
        self.bands
            .iter()
            .take_while(|(lower, _)| score >= *lower)
            .last()
            .or(self.bands.first())
            .map_or(BiofilmStage::InitialAttachment, |&(_, s)| s)
    }
}
