use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;

use grainsweep::config::RenderConfig;
use grainsweep::report::{self, progress_line, SweepReport};
use grainsweep::scheduler::TileScheduler;
use grainsweep::sweep::GrainSweep;
use grainsweep::threads::Distribution;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "grainsweep",
    about = "Time a tiled Mandelbrot render across tile grain sizes"
)]
struct Opt {
    /// Worker threads (defaults to the number of logical CPUs)
    #[structopt(short, long)]
    threads: Option<usize>,

    /// How tiles are assigned to workers: round-robin or contiguous
    #[structopt(long, default_value = "round-robin")]
    distribution: Distribution,

    /// Where to save the image of the last run
    #[structopt(long, parse(from_os_str), default_value = "Mandelbrot.png")]
    image: PathBuf,

    /// Where to save the timing report
    #[structopt(long, parse(from_os_str), default_value = "Time_vs_grain_size.txt")]
    report: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let threads = opt.threads.unwrap_or_else(num_cpus::get);
    let scheduler = TileScheduler::new(RenderConfig::default(), threads, opt.distribution)
        .context("failed to start worker pool")?;

    let result = GrainSweep::new(&scheduler)
        .run_default(|sample| println!("{}", progress_line(sample)))
        .context("render failed")?;

    report::save_image(&result.canvas, &opt.image)?;
    let sweep_report = SweepReport::new(&result.samples);
    sweep_report.save(&opt.report)?;

    if let Some(summary) = sweep_report.summary() {
        println!("\n{}\n", summary);
    }
    Ok(())
}
