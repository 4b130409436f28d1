use clap::builder::PossibleValue;
use clap::ValueEnum;

use crate::raster::{ChannelGrid, RgbGrids, Sample};

/// Number of sources combined into one blended strip.
pub const BLEND_WINDOW_SIZE: usize = 5;

/// How the five samples at a position are combined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlendMethod {
    /// `a/5 + b/5 + c/5 + d/5 + e/5` with integer division per term.
    /// Truncates each term, so the result can fall up to four below the
    /// truncated mean.
    FloorThenSum,
    /// `(a + b + c + d + e) / 5`, the truncated mean.
    SumThenFloor,
}

impl ValueEnum for BlendMethod {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::FloorThenSum, Self::SumThenFloor]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::FloorThenSum => Some(PossibleValue::new("FloorThenSum")),
            Self::SumThenFloor => Some(PossibleValue::new("SumThenFloor")),
        }
    }
}

impl BlendMethod {
    fn combine(&self, samples: [Sample; BLEND_WINDOW_SIZE]) -> Sample {
        let divisor = BLEND_WINDOW_SIZE as u16;
        match self {
            Self::FloorThenSum => samples
                .iter()
                .map(|&sample| u16::from(sample) / divisor)
                .sum::<u16>() as Sample,
            Self::SumThenFloor => {
                (samples.iter().map(|&sample| u16::from(sample)).sum::<u16>() / divisor) as Sample
            }
        }
    }
}

/// Source indices `[i-2, i-1, i, i+1, i+2]` blended into strip `index`.
///
/// Only indices with `1 < index < count - 2` are blended, which are exactly
/// the ones with two neighbours on either side. The first two and the last
/// two strips are always copied from their own source.
pub fn blend_window(index: usize, count: usize) -> Option<[usize; BLEND_WINDOW_SIZE]> {
    if 1 < index && index + 2 < count {
        Some([index - 2, index - 1, index, index + 1, index + 2])
    } else {
        None
    }
}

fn blend_channel(
    method: BlendMethod,
    channels: [&ChannelGrid<Sample>; BLEND_WINDOW_SIZE],
) -> ChannelGrid<Sample> {
    let [left2, left, center, right, right2] = channels;
    let samples = left2
        .samples()
        .iter()
        .zip(left.samples())
        .zip(center.samples())
        .zip(right.samples())
        .zip(right2.samples())
        .map(|((((&left2, &left), &center), &right), &right2)| {
            method.combine([left2, left, center, right, right2])
        })
        .collect();
    ChannelGrid::from_samples(center.width(), center.height(), samples)
}

/// Combines five equally shaped strips channel by channel.
pub fn blend(
    method: BlendMethod,
    strips: [&RgbGrids<Sample>; BLEND_WINDOW_SIZE],
) -> RgbGrids<Sample> {
    let channel = |select: fn(&RgbGrids<Sample>) -> &ChannelGrid<Sample>| {
        blend_channel(method, strips.map(select))
    };
    RgbGrids::new(
        channel(RgbGrids::red_channel),
        channel(RgbGrids::green_channel),
        channel(RgbGrids::blue_channel),
    )
}
