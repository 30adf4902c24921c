use std::time::{Duration, Instant};

use image::RgbImage;
use log::{debug, info};

use crate::scheduler::TileScheduler;
use crate::threads::PoolError;

/// Grain sizes swept by default: unit steps below 20, then steps of 20.
#[derive(Clone, Debug)]
pub struct GrainSizes {
    next: Option<u32>,
    max: u32,
}

impl GrainSizes {
    pub fn up_to(max: u32) -> Self {
        Self { next: Some(1), max }
    }
}

impl Iterator for GrainSizes {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let current = self.next.filter(|&g| g <= self.max)?;
        let step = if current < 20 { 1 } else { 20 };
        self.next = current.checked_add(step);
        Some(current)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingSample {
    pub grain_size: u32,
    pub elapsed: Duration,
}

impl TimingSample {
    /// Elapsed time is kept at microsecond resolution.
    pub fn new(grain_size: u32, elapsed: Duration) -> Self {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        Self {
            grain_size,
            elapsed: Duration::from_micros(micros),
        }
    }

    pub fn from_millis(grain_size: u32, ms: f64) -> Self {
        Self::new(grain_size, Duration::from_micros((ms * 1000.0).round() as u64))
    }

    pub fn micros(&self) -> u128 {
        self.elapsed.as_micros()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.micros() as f64 / 1000.0
    }
}

/// First sample with the smallest elapsed time.
pub fn fastest(samples: &[TimingSample]) -> Option<&TimingSample> {
    samples.iter().min_by_key(|s| s.elapsed)
}

pub struct SweepResult {
    pub samples: Vec<TimingSample>,
    /// Canvas left by the last grain size.
    pub canvas: RgbImage,
}

impl SweepResult {
    pub fn fastest(&self) -> Option<&TimingSample> {
        fastest(&self.samples)
    }
}

/// Times one full render per grain size, strictly one after another.
pub struct GrainSweep<'a> {
    scheduler: &'a TileScheduler,
}

impl<'a> GrainSweep<'a> {
    pub fn new(scheduler: &'a TileScheduler) -> Self {
        Self { scheduler }
    }

    /// Sweep the default grain sequence, up to the canvas height.
    pub fn run_default<F>(&self, on_sample: F) -> Result<SweepResult, PoolError>
    where
        F: FnMut(&TimingSample),
    {
        self.run(GrainSizes::up_to(self.scheduler.config().height), on_sample)
    }

    pub fn run<G, F>(&self, grains: G, mut on_sample: F) -> Result<SweepResult, PoolError>
    where
        G: IntoIterator<Item = u32>,
        F: FnMut(&TimingSample),
    {
        info!(
            "sweeping grain sizes on {} threads",
            self.scheduler.threads()
        );
        // every run overwrites all pixels, so one buffer serves the whole sweep
        let mut canvas = self.scheduler.new_canvas();
        let mut samples = vec![];
        for grain_size in grains {
            let start = Instant::now();
            self.scheduler.render(&mut canvas, grain_size)?;
            let sample = TimingSample::new(grain_size, start.elapsed());
            debug!("grain {} took {}us", grain_size, sample.micros());
            on_sample(&sample);
            samples.push(sample);
        }
        info!("sweep finished after {} runs", samples.len());
        Ok(SweepResult { samples, canvas })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::RenderConfig;
    use crate::scheduler::render_sequential;
    use crate::threads::Distribution;

    #[test]
    fn test_grain_sizes_800() {
        let grains: Vec<u32> = GrainSizes::up_to(800).collect();
        let mut expected: Vec<u32> = (1..20).collect();
        expected.extend((20..=800).step_by(20));
        assert_eq!(grains, expected);
        assert_eq!(grains.len(), 59);
        assert_eq!(grains.last(), Some(&800));
    }

    #[test]
    fn test_grain_sizes_not_multiple_of_step() {
        let grains: Vec<u32> = GrainSizes::up_to(50).collect();
        assert_eq!(&grains[17..], &[18, 19, 20, 40]);
        let grains: Vec<u32> = GrainSizes::up_to(5).collect();
        assert_eq!(grains, vec![1, 2, 3, 4, 5]);
        assert_eq!(GrainSizes::up_to(0).count(), 0);
    }

    #[test]
    fn test_grain_sizes_stop_at_overflow() {
        let grains = GrainSizes {
            next: Some(u32::MAX - 5),
            max: u32::MAX,
        };
        assert_eq!(grains.collect::<Vec<_>>(), vec![u32::MAX - 5]);
    }

    #[test]
    fn test_fastest_takes_first_minimum() {
        let samples = vec![
            TimingSample::from_millis(1, 5.0),
            TimingSample::from_millis(2, 3.0),
            TimingSample::from_millis(3, 3.0),
            TimingSample::from_millis(4, 9.0),
        ];
        let min = fastest(&samples).unwrap();
        assert_eq!(min.grain_size, 2);
        assert_eq!(min.elapsed_ms(), 3.0);
        assert!(fastest(&[]).is_none());
    }

    #[test]
    fn test_sample_truncates_to_micros() {
        let sample = TimingSample::new(7, Duration::from_nanos(1_234_999));
        assert_eq!(sample.micros(), 1234);
        assert_eq!(sample.elapsed_ms(), 1.234);
    }

    #[test]
    fn test_sweep_records_every_grain_in_order() {
        let config = RenderConfig::with_size(40, 30);
        let scheduler = TileScheduler::new(config, 3, Distribution::RoundRobin).unwrap();
        let mut seen = vec![];
        let result = GrainSweep::new(&scheduler)
            .run_default(|s| seen.push(s.grain_size))
            .unwrap();

        let grains: Vec<u32> = result.samples.iter().map(|s| s.grain_size).collect();
        assert_eq!(grains, GrainSizes::up_to(30).collect::<Vec<_>>());
        assert_eq!(seen, grains);
        assert_eq!(result.canvas.as_raw(), render_sequential(&config).as_raw());
        assert!(result.fastest().is_some());
    }

    #[test]
    fn test_sweep_is_reproducible() {
        let config = RenderConfig::with_size(64, 64);
        let scheduler = TileScheduler::new(config, 2, Distribution::Contiguous).unwrap();
        let sweep = GrainSweep::new(&scheduler);
        let a = sweep.run(vec![3, 64], |_| ()).unwrap();
        let b = sweep.run(vec![17], |_| ()).unwrap();
        assert_eq!(a.canvas.as_raw(), b.canvas.as_raw());
    }
}
