use anyhow::Context;
use log::info;
use ordered_float::OrderedFloat;
use percolation::report::{self, ChartLabels};
use percolation::sweep::{self, SweepPoint};
use percolation::{Ensemble, Experiment, FixedProbabilityRun, GrowthEngine, LatticeConfig, Summary};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use structopt::StructOpt;
use tap::Tap;

#[derive(Debug, StructOpt)]
#[structopt(name = "percolation", about = "Site percolation on a square lattice")]
struct Args {
    /// largest lattice side accepted
    #[structopt(long, default_value = "100")]
    max_size: usize,
    /// random seed, drawn from the OS when omitted
    #[structopt(long)]
    seed: Option<u64>,
    /// worker threads for ensembles, 0 lets rayon decide
    #[structopt(long, default_value = "0")]
    threads: usize,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Grow one lattice until a cluster spans it
    Grow {
        size: usize,
        /// render the lattice to a png file
        #[structopt(long, parse(from_os_str))]
        image: Option<PathBuf>,
    },
    /// Occupy one lattice with probability p
    Fixed {
        size: usize,
        p: f64,
        /// render the lattice to a png file
        #[structopt(long, parse(from_os_str))]
        image: Option<PathBuf>,
    },
    /// Independent trials of one experiment, one sample per line
    Ensemble {
        size: usize,
        /// occupation probability, growth to spanning when omitted
        #[structopt(long)]
        p: Option<f64>,
        #[structopt(long, default_value = "100")]
        trials: usize,
        /// give up on a sample after this many lattices without a spanning cluster
        #[structopt(long)]
        max_attempts: Option<usize>,
        /// csv file with one sample per line
        #[structopt(long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Mean occupied fraction at spanning over a range of lattice sizes
    SweepSize {
        #[structopt(long, default_value = "5")]
        from: usize,
        #[structopt(long, default_value = "100")]
        to: usize,
        #[structopt(long, default_value = "5")]
        step: usize,
        #[structopt(long, default_value = "100")]
        trials: usize,
        /// csv file with size,pc rows
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
        /// png chart of the sweep
        #[structopt(long, parse(from_os_str))]
        chart: Option<PathBuf>,
    },
    /// Mean spanning-cluster fraction over a range of probabilities
    SweepP {
        size: usize,
        #[structopt(long, default_value = "0.6")]
        from: f64,
        #[structopt(long, default_value = "1.0")]
        to: f64,
        #[structopt(long, default_value = "0.01")]
        step: f64,
        /// end of a finer grid starting at --from
        #[structopt(long)]
        fine_until: Option<f64>,
        #[structopt(long, default_value = "0.001")]
        fine_step: f64,
        #[structopt(long, default_value = "20")]
        trials: usize,
        /// give up on a sample after this many lattices without a spanning cluster
        #[structopt(long)]
        max_attempts: Option<usize>,
        /// csv file with p,F rows
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
        /// png chart of the sweep
        #[structopt(long, parse(from_os_str))]
        chart: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::from_args();
    let config = LatticeConfig::new(args.max_size);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("seed {}", seed);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    match args.command {
        Command::Grow { size, image } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut engine = GrowthEngine::new(&config, size)?;
            let spanning = engine.run(&mut rng);
            let snapshot = engine.snapshot();

            print!("{}", report::format_lattice(&snapshot));
            println!(
                "spanning cluster {} ({} sites), occupied fraction {}",
                spanning,
                snapshot.cluster_size(spanning),
                engine.occupied_fraction()
            );

            if let Some(path) = image {
                report::draw_lattice(&path, &snapshot, Some(spanning), cell_size(size))?;
            }
        }
        Command::Fixed { size, p, image } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut run = FixedProbabilityRun::generate(&config, size, p, &mut rng)?;
            let snapshot = run.snapshot();

            print!("{}", report::format_lattice(&snapshot));
            match run.spanning_fraction() {
                Some(fraction) => println!(
                    "occupied fraction {}, spanning cluster fraction {}",
                    run.occupied_fraction(),
                    fraction
                ),
                None => println!(
                    "occupied fraction {}, no spanning cluster",
                    run.occupied_fraction()
                ),
            }

            if let Some(path) = image {
                report::draw_lattice(&path, &snapshot, run.spanning_cluster(), cell_size(size))?;
            }
        }
        Command::Ensemble {
            size,
            p,
            trials,
            max_attempts,
            output,
        } => {
            let experiment = match p {
                Some(p) => Experiment::FixedProbability { size, p },
                None => Experiment::Growth { size },
            };
            let mut ensemble = Ensemble::new(experiment, trials);
            ensemble.max_attempts = max_attempts;

            let samples = ensemble.run_parallel(&config, seed)?;
            let summary = Summary::from_samples(&samples)?;
            println!(
                "mean {} ± {} (std dev {}, min {}, max {}) over {} trials",
                summary.mean,
                summary.std_error(),
                summary.std_dev,
                summary.min,
                summary.max,
                summary.count
            );

            if let Some(path) = output {
                report::write_column_csv(&path, &samples)?;
                info!("wrote {} samples to {}", samples.len(), path.display());
            }
        }
        Command::SweepSize {
            from,
            to,
            step,
            trials,
            output,
            chart,
        } => {
            let sizes: Vec<_> = (from..=to).step_by(step.max(1)).collect();
            let points = sweep::sweep_sizes(&config, &sizes, trials, seed)?;
            save_sweep(
                &points,
                ("size", "pc"),
                &output,
                chart.as_deref(),
                &ChartLabels {
                    caption: "Occupied fraction at spanning",
                    x_desc: "Lattice size",
                    y_desc: "pc",
                },
            )?;
        }
        Command::SweepP {
            size,
            from,
            to,
            step,
            fine_until,
            fine_step,
            trials,
            max_attempts,
            output,
            chart,
        } => {
            let grid = sweep::probability_grid(from, to, step, fine_until.map(|until| (until, fine_step)));
            let points = sweep::sweep_probabilities(&config, size, &grid, trials, max_attempts, seed)?;
            save_sweep(
                &points,
                ("p", "F"),
                &output,
                chart.as_deref(),
                &ChartLabels {
                    caption: "Spanning cluster fraction",
                    x_desc: "Occupation probability",
                    y_desc: "F",
                },
            )?;
        }
    }

    Ok(())
}

fn save_sweep(
    points: &[SweepPoint],
    header: (&str, &str),
    output: &Path,
    chart: Option<&Path>,
    labels: &ChartLabels<'_>,
) -> anyhow::Result<()> {
    let series: Vec<_> = points.iter().map(|p| (p.x, p.summary.mean)).collect();

    report::write_series_csv(output, header, &series)?;
    info!("wrote {} points to {}", series.len(), output.display());

    let noisiest = points
        .to_vec()
        .tap_mut(|v| v.sort_by_key(|p| Reverse(OrderedFloat(p.summary.std_error()))));
    if let Some(point) = noisiest.first() {
        info!(
            "largest standard error {} at {}",
            point.summary.std_error(),
            point.x
        );
    }

    if let Some(path) = chart {
        report::draw_series_chart(path, labels, &series)?;
    }
    Ok(())
}

fn cell_size(size: usize) -> u32 {
    (800 / size as u32).clamp(2, 40)
}
