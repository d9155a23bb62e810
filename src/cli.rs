// Command-line argument parsing.
// Every flag is an optional override on top of the parameter defaults.

use clap::Parser;

use crate::engine::params::{HighlightParams, SurfaceParams, WaveParams};

#[derive(Parser, Debug)]
#[command(name = "wave_paint")]
#[command(about = "Undulating surface mesh painted by the pointer", long_about = None)]
pub struct Args {
    /// Surface width in scene units (1-240)
    #[arg(long)]
    pub width: Option<f32>,

    /// Surface height in scene units (1-80)
    #[arg(long)]
    pub height: Option<f32>,

    /// Grid cells along the width (1-200)
    #[arg(long)]
    pub width_segments: Option<u32>,

    /// Grid cells along the height (1-100)
    #[arg(long)]
    pub height_segments: Option<u32>,

    /// Seed for jitter, phases and initial colors (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ripple amplitude in scene units
    #[arg(long, value_name = "UNITS")]
    pub amplitude: Option<f32>,

    /// Seconds for a painted face to fade back to the base color
    #[arg(long, value_name = "SECONDS")]
    pub highlight_duration: Option<f32>,
}

impl Args {
    pub fn surface_params(&self) -> SurfaceParams {
        let defaults = SurfaceParams::default();
        SurfaceParams {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            width_segments: self.width_segments.unwrap_or(defaults.width_segments),
            height_segments: self.height_segments.unwrap_or(defaults.height_segments),
            seed: self.seed,
            ..defaults
        }
        .clamped()
    }

    pub fn wave_params(&self) -> WaveParams {
        let defaults = WaveParams::default();
        WaveParams {
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            ..defaults
        }
    }

    pub fn highlight_params(&self) -> HighlightParams {
        let defaults = HighlightParams::default();
        HighlightParams {
            duration: self.highlight_duration.unwrap_or(defaults.duration).max(0.0),
            ..defaults
        }
    }
}
