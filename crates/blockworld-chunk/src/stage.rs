use std::time::Duration;

/// Generation progress of a chunk. Stages only ever advance, in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GenStage {
    #[default]
    Ungenerated,
    TerrainInitialized,
    ResourcesPlaced,
    SurfaceShaped,
    DecorationsPlaced,
    PlayerEditsApplied,
    Meshed,
}

impl GenStage {
    /// Stages that do work, in pipeline order.
    pub const PIPELINE: [GenStage; 6] = [
        GenStage::TerrainInitialized,
        GenStage::ResourcesPlaced,
        GenStage::SurfaceShaped,
        GenStage::DecorationsPlaced,
        GenStage::PlayerEditsApplied,
        GenStage::Meshed,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GenStage::Ungenerated => "ungenerated",
            GenStage::TerrainInitialized => "initialize",
            GenStage::ResourcesPlaced => "resources",
            GenStage::SurfaceShaped => "surface",
            GenStage::DecorationsPlaced => "decorations",
            GenStage::PlayerEditsApplied => "edits",
            GenStage::Meshed => "instances",
        }
    }

    fn slot(self) -> Option<usize> {
        GenStage::PIPELINE.iter().position(|s| *s == self)
    }
}

/// Wall time spent reaching each stage of one chunk's pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageTimings {
    durations: [Duration; 6],
}

impl StageTimings {
    pub fn record_stage_duration(&mut self, stage: GenStage, elapsed: Duration) {
        if let Some(i) = stage.slot() {
            self.durations[i] += elapsed;
        }
    }

    pub fn get(&self, stage: GenStage) -> Duration {
        stage.slot().map(|i| self.durations[i]).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenStage, Duration)> + '_ {
        GenStage::PIPELINE.iter().copied().zip(self.durations.iter().copied())
    }
}

impl std::fmt::Display for StageTimings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (stage, d)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}us", stage.name(), d.as_micros())?;
        }
        Ok(())
    }
}
