//! Fixed-latency pixel pipeline.
//!
//! A ring of `DEPTH` slots stands in for the register stages between the SDF
//! datapath and the display. Each tick pushes the fresh result in and pops the
//! oldest one out, so the output at tick T belongs to the input admitted at
//! tick T - DEPTH. The depth is a const generic and the storage never grows.

use serde::{Deserialize, Serialize};

use super::sdf::SdfResult;

/// Register stages between the SDF datapath and the display, in ticks.
pub const PIPELINE_DEPTH: usize = 3;

/// Largest 6-bit intensity.
pub const LUMA_MAX: u8 = 63;

/// One emitted sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelOut {
    pub hit: bool,
    /// 6-bit intensity, zero on a miss.
    pub luma: u8,
}

impl PixelOut {
    pub const MISS: Self = Self { hit: false, luma: 0 };

    /// Quantise an SDF result: `light >> 2` saturated at [`LUMA_MAX`].
    pub fn from_sdf(result: &SdfResult) -> Self {
        if !result.hit {
            return Self::MISS;
        }
        let luma = (result.light.to_bits() >> 2).clamp(0, LUMA_MAX as i16) as u8;
        Self { hit: true, luma }
    }
}

#[derive(Clone, Debug)]
pub struct PixelPipeline<const DEPTH: usize> {
    slots: [PixelOut; DEPTH],
    /// Index of the oldest slot, which is also where the next sample lands.
    head: usize,
    output: PixelOut,
}

impl<const DEPTH: usize> Default for PixelPipeline<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> PixelPipeline<DEPTH> {
    pub fn new() -> Self {
        assert!(DEPTH > 0, "pipeline needs at least one stage");
        Self {
            slots: [PixelOut::MISS; DEPTH],
            head: 0,
            output: PixelOut::MISS,
        }
    }

    /// Admit `fresh` and emit the sample admitted `DEPTH` ticks ago.
    pub fn tick(&mut self, fresh: PixelOut) -> PixelOut {
        self.output = std::mem::replace(&mut self.slots[self.head], fresh);
        self.head = (self.head + 1) % DEPTH;
        self.output
    }

    /// Force every slot and the output to a miss.
    pub fn reset(&mut self) {
        self.slots = [PixelOut::MISS; DEPTH];
        self.head = 0;
        self.output = PixelOut::MISS;
    }

    /// Last emitted sample.
    pub fn output(&self) -> PixelOut {
        self.output
    }

    /// In-flight samples, oldest first.
    pub fn slots(&self) -> impl Iterator<Item = PixelOut> + '_ {
        (0..DEPTH).map(move |i| self.slots[(self.head + i) % DEPTH])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::march::fixed_math::{q, FixedNum};

    fn sample(n: u8) -> PixelOut {
        PixelOut { hit: n % 2 == 0, luma: n % 64 }
    }

    #[test]
    fn test_output_is_input_delayed_by_depth() {
        let mut pipe = PixelPipeline::<PIPELINE_DEPTH>::new();
        let inputs: Vec<PixelOut> = (0..40).map(sample).collect();
        let outputs: Vec<PixelOut> = inputs.iter().map(|&s| pipe.tick(s)).collect();

        assert!(outputs[..PIPELINE_DEPTH].iter().all(|&o| o == PixelOut::MISS));
        assert_eq!(&outputs[PIPELINE_DEPTH..], &inputs[..inputs.len() - PIPELINE_DEPTH]);
    }

    #[test]
    fn test_other_depths() {
        let mut one = PixelPipeline::<1>::new();
        assert_eq!(one.tick(sample(5)), PixelOut::MISS);
        assert_eq!(one.tick(sample(6)), sample(5));

        let mut five = PixelPipeline::<5>::new();
        let outs: Vec<_> = (1..=10).map(|n| five.tick(sample(n))).collect();
        assert_eq!(outs[5], sample(1));
        assert_eq!(outs[9], sample(5));
    }

    #[test]
    fn test_slots_hold_in_flight_samples_oldest_first() {
        let mut pipe = PixelPipeline::<3>::new();
        for n in 1..=4 {
            pipe.tick(sample(n));
        }
        let in_flight: Vec<_> = pipe.slots().collect();
        assert_eq!(in_flight, vec![sample(2), sample(3), sample(4)]);
        assert_eq!(pipe.output(), sample(1));
    }

    #[test]
    fn test_reset_clears_slots_and_output() {
        let mut pipe = PixelPipeline::<PIPELINE_DEPTH>::new();
        for n in 0..7 {
            pipe.tick(PixelOut { hit: true, luma: 40 + n });
        }
        pipe.reset();
        assert_eq!(pipe.output(), PixelOut::MISS);
        assert!(pipe.slots().all(|s| s == PixelOut::MISS));

        // Nothing from before the reset is replayed.
        for _ in 0..PIPELINE_DEPTH {
            assert_eq!(pipe.tick(sample(1)), PixelOut::MISS);
        }
        assert_eq!(pipe.tick(sample(2)), sample(1));
    }

    #[test]
    fn test_luma_quantisation() {
        let lit = SdfResult::classify(q(-10), q(235));
        assert_eq!(PixelOut::from_sdf(&lit), PixelOut { hit: true, luma: 58 });

        let saturated = SdfResult::classify(q(-10), q(0x0110));
        assert_eq!(PixelOut::from_sdf(&saturated).luma, LUMA_MAX);

        let dark = SdfResult::classify(q(-10), FixedNum::ZERO);
        assert_eq!(PixelOut::from_sdf(&dark), PixelOut { hit: true, luma: 0 });

        let miss = SdfResult::classify(q(300), q(200));
        assert_eq!(PixelOut::from_sdf(&miss), PixelOut::MISS);
    }
}
