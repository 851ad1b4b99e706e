//! Directed percolation: fluid poured into row 0 of a random porous lattice
//! invades every open site it can reach through orthogonal steps.

use std::{
	collections::VecDeque,
	fmt,
};

use rand::Rng;
use tracing::debug;

use crate::{
	error::{LatticeError, LatticeResult},
	grid::{fmt_graph, validate_square, von_neumann},
	rng_from_seed,
	Lattice,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
	Blocked,
	Open,
	Filled,
}

impl Site {
	/// Numeric code: 0 blocked, 1 open, 2 filled.
	pub fn code(self) -> u8 {
		match self {
			Site::Blocked => 0,
			Site::Open => 1,
			Site::Filled => 2,
		}
	}
}

/// Order in which pending sites are taken off the worklist.
///
/// The filled set does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
	#[default]
	DepthFirst,
	BreadthFirst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercolationLattice {
	n: usize,
	p: f64,
	grid: Vec<Vec<Site>>,
	grid_filled: Vec<Vec<Site>>,
}

impl PercolationLattice {
	/// Samples an `n × n` lattice where each site is blocked with probability `p`.
	///
	/// `p` is not validated: anything at or below 0 gives an all-open lattice,
	/// anything at or above 1 an all-blocked one.
	pub fn new(n: usize, p: f64, seed: Option<u64>) -> LatticeResult<PercolationLattice> {
		if n == 0 {
			return Err(LatticeError::InvalidDimension("lattice size must be positive".to_owned()));
		}
		let p_blocked = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
		let mut rng = rng_from_seed(seed);
		let grid: Vec<Vec<Site>> = (0..n)
			.map(|_| {
				(0..n)
					.map(|_| if rng.gen_bool(p_blocked) { Site::Blocked } else { Site::Open })
					.collect()
			})
			.collect();
		Ok(PercolationLattice {
			n,
			p,
			grid_filled: grid.clone(),
			grid,
		})
	}

	/// Uses a supplied lattice of 0 (blocked) and 1 (open) sites.
	///
	/// Size and blocking probability are derived from the grid.
	pub fn from_grid(graph: Vec<Vec<u8>>) -> LatticeResult<PercolationLattice> {
		let n = validate_square(&graph)?;
		let mut blocked = 0usize;
		let mut grid = Vec::with_capacity(n);
		for (i, row) in graph.into_iter().enumerate() {
			let mut sites = Vec::with_capacity(n);
			for (j, el) in row.into_iter().enumerate() {
				sites.push(match el {
					0 => {
						blocked += 1;
						Site::Blocked
					},
					1 => Site::Open,
					v => return Err(LatticeError::InvalidGrid(format!(
						"site ({}, {}) is {}, expected 0 or 1", i, j, v
					))),
				});
			}
			grid.push(sites);
		}
		Ok(PercolationLattice {
			n,
			p: blocked as f64 / (n * n) as f64,
			grid_filled: grid.clone(),
			grid,
		})
	}

	pub fn n(&self) -> usize {
		self.n
	}

	/// Blocking probability, either as requested or as measured on a supplied grid.
	pub fn p(&self) -> f64 {
		self.p
	}

	/// The original blocked/open pattern.
	pub fn grid(&self) -> &[Vec<Site>] {
		&self.grid
	}

	/// The lattice after the fluid has been poured in.
	pub fn grid_filled(&self) -> &[Vec<Site>] {
		&self.grid_filled
	}

	pub fn filled_count(&self) -> usize {
		self.grid_filled
			.iter()
			.map(|row| row.iter().filter(|s| **s == Site::Filled).count())
			.sum()
	}

	/// Whether any site of the last row is currently filled.
	pub fn percolates(&self) -> bool {
		self.grid_filled[self.n - 1].contains(&Site::Filled)
	}

	/// Floods the lattice from row 0 and reports whether the fluid reached the last row.
	pub fn percolate(&mut self) -> bool {
		self.percolate_with(Traversal::default())
	}

	/// Same as [`percolate`](Self::percolate) with an explicit worklist order.
	///
	/// On return `grid_filled` holds every site reachable from an open site of
	/// row 0. Calling it again changes nothing.
	pub fn percolate_with(&mut self, traversal: Traversal) -> bool {
		let n = self.n;
		let mut pending = VecDeque::new();
		for j in 0..n {
			if self.grid_filled[0][j] == Site::Open {
				self.grid_filled[0][j] = Site::Filled;
				pending.push_back((0, j));
			}
		}
		while let Some((i, j)) = match traversal {
			Traversal::DepthFirst => pending.pop_back(),
			Traversal::BreadthFirst => pending.pop_front(),
		} {
			for (ni, nj) in von_neumann(i, j, n) {
				if self.grid_filled[ni][nj] == Site::Open {
					self.grid_filled[ni][nj] = Site::Filled;
					pending.push_back((ni, nj));
				}
			}
		}
		let percolates = self.percolates();
		debug!(n, filled = self.filled_count(), percolates, "flood fill finished");
		percolates
	}
}

impl Lattice for PercolationLattice {
	fn side(&self) -> usize {
		self.n
	}

	fn to_graph(&self) -> Vec<Vec<u8>> {
		self.grid_filled
			.iter()
			.map(|row| row.iter().map(|s| s.code()).collect())
			.collect()
	}
}

impl fmt::Display for PercolationLattice {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", fmt_graph(&self.to_graph()))
	}
}

/// Fraction of `trials` random `n × n` lattices with blocking probability `p`
/// that percolate.
///
/// With a seed, trial `k` is sampled from `seed + k`, so the estimate is reproducible.
pub fn percolation_probability(n: usize, p: f64, trials: usize, seed: Option<u64>) -> LatticeResult<f64> {
	if trials == 0 {
		return Err(LatticeError::InvalidDimension("number of trials must be positive".to_owned()));
	}
	let mut hits = 0;
	for k in 0..trials {
		let trial_seed = seed.map(|s| s.wrapping_add(k as u64));
		if PercolationLattice::new(n, p, trial_seed)?.percolate() {
			hits += 1;
		}
	}
	let fraction = hits as f64 / trials as f64;
	debug!(n, p, trials, fraction, "percolation probability estimated");
	Ok(fraction)
}
