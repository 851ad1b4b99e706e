use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use lattice_cascade::{
	check_difference,
	percolation_probability,
	png,
	Lattice,
	PercolationLattice,
	SandpileAutomaton,
};

#[derive(Parser)]
#[command(
	name = "lattice-cascade",
	version,
	about = "Directed percolation and Abelian sandpile simulations on square lattices"
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Flood a random lattice from the top row
	Percolate {
		/// Lattice side length
		#[arg(short, long, default_value = "100")]
		n: usize,

		/// Probability that a site is blocked
		#[arg(short, long, default_value = "0.4")]
		p: f64,

		/// Random seed
		#[arg(short, long)]
		seed: Option<u64>,

		/// Print the filled lattice
		#[arg(long)]
		ascii: bool,

		/// Write the filled lattice as a PNG
		#[arg(long)]
		png: Option<PathBuf>,
	},

	/// Estimate the percolation probability over a range of blocking probabilities
	Sweep {
		/// Lattice side length
		#[arg(short, long, default_value = "50")]
		n: usize,

		/// Random lattices per point
		#[arg(short, long, default_value = "100")]
		trials: usize,

		/// Random seed
		#[arg(short, long)]
		seed: Option<u64>,

		/// Lowest blocking probability
		#[arg(long, default_value = "0.0")]
		from: f64,

		/// Highest blocking probability
		#[arg(long, default_value = "1.0")]
		to: f64,

		/// Number of evenly spaced points
		#[arg(long, default_value = "11")]
		points: usize,
	},

	/// Drop grains on a random sandpile
	Sandpile {
		/// Lattice side length
		#[arg(short, long, default_value = "100")]
		n: usize,

		/// Number of grains to drop
		#[arg(long, default_value = "10000")]
		steps: usize,

		/// Random seed
		#[arg(short, long)]
		seed: Option<u64>,

		/// Print the final pile
		#[arg(long)]
		ascii: bool,

		/// Write the final pile as a PNG
		#[arg(long)]
		png: Option<PathBuf>,

		/// Print how many avalanches lasted each number of topples
		#[arg(long)]
		durations: bool,
	},
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
		)
		.init();

	let cli = Cli::parse();
	match cli.command {
		Commands::Percolate { n, p, seed, ascii, png } => cmd_percolate(n, p, seed, ascii, png.as_deref()),
		Commands::Sweep { n, trials, seed, from, to, points } => cmd_sweep(n, trials, seed, from, to, points),
		Commands::Sandpile { n, steps, seed, ascii, png, durations } => {
			cmd_sandpile(n, steps, seed, ascii, png.as_deref(), durations)
		}
	}
}

fn cmd_percolate(n: usize, p: f64, seed: Option<u64>, ascii: bool, out_png: Option<&Path>) -> Result<()> {
	let mut lattice = PercolationLattice::new(n, p, seed).context("failed to sample lattice")?;
	let percolates = lattice.percolate();
	if ascii {
		print!("{}", lattice);
	}
	println!("Percolates: {}", percolates);
	println!("Filled sites: {} of {}", lattice.filled_count(), lattice.side() * lattice.side());
	if let Some(path) = out_png {
		write_png(&lattice, path)?;
	}
	Ok(())
}

fn cmd_sweep(n: usize, trials: usize, seed: Option<u64>, from: f64, to: f64, points: usize) -> Result<()> {
	if points == 0 {
		bail!("number of points must be positive");
	}
	for k in 0..points {
		let p = if points == 1 {
			from
		} else {
			from + (to - from) * k as f64 / (points - 1) as f64
		};
		let fraction = percolation_probability(n, p, trials, seed)
			.with_context(|| format!("failed to estimate percolation probability at p = {}", p))?;
		println!("{:.4}\t{:.4}", p, fraction);
	}
	Ok(())
}

fn cmd_sandpile(
	n: usize,
	steps: usize,
	seed: Option<u64>,
	ascii: bool,
	out_png: Option<&Path>,
	durations: bool,
) -> Result<()> {
	let mut pile = SandpileAutomaton::new(n, seed).context("failed to sample sandpile")?;
	pile.simulate(steps);
	if ascii {
		print!("{}", pile);
	}
	let changed = check_difference(&pile.history()[0], pile.grid())?;
	let avalanches = pile.avalanche_durations();
	println!("Snapshots: {}", pile.history().len());
	println!("Sites changed since start: {}", changed);
	println!("Grains on lattice: {}", pile.mass());
	println!("Avalanches: {}", avalanches.len());
	if !avalanches.is_empty() {
		let mean = avalanches.iter().sum::<usize>() as f64 / avalanches.len() as f64;
		println!("Mean duration: {:.3}", mean);
	}
	if durations {
		for (duration, count) in pile.duration_histogram() {
			println!("{}\t{}", duration, count);
		}
	}
	if let Some(path) = out_png {
		write_png(&pile, path)?;
	}
	Ok(())
}

fn write_png<L: Lattice>(lattice: &L, path: &Path) -> Result<()> {
	png(&lattice.to_graph(), path).with_context(|| format!("can't write to file {}", path.display()))
}
