//! Abelian sandpile with an absorbing boundary.
//!
//! Grains are dropped one at a time on random sites; a site holding four or
//! more grains topples, sending one grain to each orthogonal neighbour.
//! Grains toppled over the edge are lost.

use std::{
	collections::BTreeMap,
	fmt,
};

use rand::{rngs::StdRng, Rng};
use tracing::{debug, trace};

use crate::{
	error::{LatticeError, LatticeResult},
	grid::{fmt_graph, validate_square, von_neumann},
	rng_from_seed,
	Lattice,
};

pub type Height = u32;

/// Height at which a site topples.
pub const THRESHOLD: Height = 4;

#[derive(Debug, Clone)]
pub struct SandpileAutomaton {
	n: usize,
	grid: Vec<Vec<Height>>,
	history: Vec<Vec<Vec<Height>>>,
	avalanche_durations: Vec<usize>,
	rng: StdRng,
}

impl SandpileAutomaton {
	/// Random `n × n` sandpile with heights uniform over `0..4`.
	pub fn new(n: usize, seed: Option<u64>) -> LatticeResult<SandpileAutomaton> {
		if n == 0 {
			return Err(LatticeError::InvalidDimension("lattice size must be positive".to_owned()));
		}
		let mut rng = rng_from_seed(seed);
		let grid = (0..n)
			.map(|_| (0..n).map(|_| rng.gen_range(0..THRESHOLD)).collect())
			.collect();
		Ok(SandpileAutomaton::with_rng(n, grid, rng))
	}

	/// Sandpile starting from explicit heights, which must all be stable.
	pub fn from_grid(grid: Vec<Vec<Height>>, seed: Option<u64>) -> LatticeResult<SandpileAutomaton> {
		let n = validate_square(&grid)?;
		for (i, row) in grid.iter().enumerate() {
			for (j, h) in row.iter().enumerate() {
				if *h >= THRESHOLD {
					return Err(LatticeError::InvalidGrid(format!(
						"site ({}, {}) has height {}, expected at most {}", i, j, h, THRESHOLD - 1
					)));
				}
			}
		}
		Ok(SandpileAutomaton::with_rng(n, grid, rng_from_seed(seed)))
	}

	fn with_rng(n: usize, grid: Vec<Vec<Height>>, rng: StdRng) -> SandpileAutomaton {
		SandpileAutomaton {
			n,
			history: vec![grid.clone()],
			grid,
			avalanche_durations: Vec::new(),
			rng,
		}
	}

	pub fn n(&self) -> usize {
		self.n
	}

	pub fn grid(&self) -> &[Vec<Height>] {
		&self.grid
	}

	/// Distinct successive grids, starting with the initial one.
	pub fn history(&self) -> &[Vec<Vec<Height>>] {
		&self.history
	}

	/// Topple count of every step that toppled at least once.
	pub fn avalanche_durations(&self) -> &[usize] {
		&self.avalanche_durations
	}

	/// Total number of grains on the lattice.
	pub fn mass(&self) -> u64 {
		self.grid.iter().flatten().map(|h| *h as u64).sum()
	}

	/// How many avalanches lasted each observed number of topples.
	pub fn duration_histogram(&self) -> BTreeMap<usize, usize> {
		let mut histogram = BTreeMap::new();
		for d in &self.avalanche_durations {
			*histogram.entry(*d).or_insert(0) += 1;
		}
		histogram
	}

	/// Drops a grain on a uniformly random site and relaxes the pile.
	///
	/// Returns the number of topples.
	pub fn step(&mut self) -> usize {
		let i = self.rng.gen_range(0..self.n);
		let j = self.rng.gen_range(0..self.n);
		self.add_and_relax(i, j)
	}

	/// Drops a grain on site `(i, j)` and relaxes the pile.
	pub fn drop_grain(&mut self, i: usize, j: usize) -> LatticeResult<usize> {
		if i >= self.n || j >= self.n {
			return Err(LatticeError::InvalidDimension(format!(
				"site ({}, {}) is outside a {}x{} lattice", i, j, self.n, self.n
			)));
		}
		Ok(self.add_and_relax(i, j))
	}

	/// Runs `n_steps` steps and returns the final grid.
	pub fn simulate(&mut self, n_steps: usize) -> &[Vec<Height>] {
		for _ in 0..n_steps {
			self.step();
		}
		debug!(
			n = self.n,
			n_steps,
			snapshots = self.history.len(),
			avalanches = self.avalanche_durations.len(),
			"sandpile simulated"
		);
		&self.grid
	}

	fn add_and_relax(&mut self, i: usize, j: usize) -> usize {
		self.grid[i][j] += 1;
		let count = topple(&mut self.grid, (i, j));
		if count > 0 {
			trace!(i, j, count, "avalanche");
			self.avalanche_durations.push(count);
		}
		self.record_snapshot();
		count
	}

	/// Appends the current grid to the history unless it equals the last entry.
	fn record_snapshot(&mut self) -> bool {
		if self.history.last() == Some(&self.grid) {
			return false;
		}
		self.history.push(self.grid.clone());
		true
	}
}

/// Relaxes a pile whose only possibly unstable site is `start`.
///
/// A site holding `h` grains topples `h / 4` times at once; each counts as
/// one topple. Returns the total number of topples.
fn topple(grid: &mut [Vec<Height>], start: (usize, usize)) -> usize {
	let n = grid.len();
	let mut excessive = vec![start];
	let mut count = 0;
	while let Some((i, j)) = excessive.pop() {
		let d = grid[i][j] / THRESHOLD;
		if d == 0 {
			continue;
		}
		grid[i][j] %= THRESHOLD;
		count += d as usize;
		for (ni, nj) in von_neumann(i, j, n) {
			grid[ni][nj] += d;
			if grid[ni][nj] >= THRESHOLD {
				excessive.push((ni, nj));
			}
		}
	}
	count
}

impl Lattice for SandpileAutomaton {
	fn side(&self) -> usize {
		self.n
	}

	fn to_graph(&self) -> Vec<Vec<u8>> {
		self.grid
			.iter()
			.map(|row| row.iter().map(|h| (*h).min(u8::MAX as Height) as u8).collect())
			.collect()
	}
}

impl fmt::Display for SandpileAutomaton {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", fmt_graph(&self.to_graph()))
	}
}
