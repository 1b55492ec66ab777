//! Pipeline stages and the run state machine.

use serde::Serialize;
use std::fmt;

/// A step of the pipeline that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Receive,
    Decode,
    Resize,
    Colormap,
    Record,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Receive => "receive",
            Stage::Decode => "decode",
            Stage::Resize => "resize",
            Stage::Colormap => "colormap",
            Stage::Record => "record",
        };
        f.write_str(name)
    }
}

/// `Received → Resized → Colormapped → Recorded`, or `Failed` at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Resized,
    Colormapped,
    Recorded,
    Failed(Stage),
}

impl PipelineState {
    /// The stage that moves this state forward, if any.
    pub fn next_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Received => Some(Stage::Resize),
            PipelineState::Resized => Some(Stage::Colormap),
            PipelineState::Colormapped => Some(Stage::Record),
            PipelineState::Recorded | PipelineState::Failed(_) => None,
        }
    }

    /// State reached once `stage` succeeds. Receive and decode both leave
    /// the run in `Received`.
    pub fn after(stage: Stage) -> PipelineState {
        match stage {
            Stage::Receive | Stage::Decode => PipelineState::Received,
            Stage::Resize => PipelineState::Resized,
            Stage::Colormap => PipelineState::Colormapped,
            Stage::Record => PipelineState::Recorded,
        }
    }
}
