use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use log::info;

use crate::sweep::{fastest, TimingSample};

pub const IMAGE_FILE: &str = "Mandelbrot.png";
pub const REPORT_FILE: &str = "Time_vs_grain_size.txt";

const SIGNIFICANT_DIGITS: i32 = 6;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format a millisecond value with six significant digits and no trailing
/// zeros, switching to exponent notation for very large or small values
/// (`12.345`, `1234.57`, `1e+06`).
pub fn format_ms(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    // exponent after rounding to the target precision
    let sci = format!("{:.*e}", precision, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

pub fn progress_line(sample: &TimingSample) -> String {
    format!(
        "Grain size: {}, elapsed time: {} microseconds",
        sample.grain_size,
        sample.micros()
    )
}

pub fn summary_line(sample: &TimingSample) -> String {
    format!(
        "The minimum execution time is {} ms and corresponds to a grain size of {}.",
        format_ms(sample.elapsed_ms()),
        sample.grain_size
    )
}

/// Text report of a sweep: one line per grain size, then the fastest run.
pub struct SweepReport<'a> {
    samples: &'a [TimingSample],
}

impl<'a> SweepReport<'a> {
    pub fn new(samples: &'a [TimingSample]) -> Self {
        Self { samples }
    }

    pub fn summary(&self) -> Option<String> {
        fastest(self.samples).map(summary_line)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("wrote timing report to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for SweepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grain sizes and corresponding execution times\n\n")?;
        write!(f, "Grain size\tExecution time [ms]\n\n")?;
        for sample in self.samples {
            writeln!(
                f,
                "{}\t\t{}",
                sample.grain_size,
                format_ms(sample.elapsed_ms())
            )?;
        }
        if let Some(summary) = self.summary() {
            write!(f, "\n{}\n", summary)?;
        }
        Ok(())
    }
}

pub fn save_image<P: AsRef<Path>>(canvas: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();
    canvas
        .save(path)
        .with_context(|| format!("failed to save image to {}", path.display()))?;
    info!("wrote image to {}", path.display());
    Ok(())
}
