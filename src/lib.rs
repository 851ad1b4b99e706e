//! Cascades on square lattices.
//!
//! Two cellular automata whose updates spread from site to orthogonal
//! neighbour until a fixed point is reached:
//!
//! * [`PercolationLattice`] floods a random porous lattice from its first row
//!   and tells whether the fluid reaches the last one.
//! * [`SandpileAutomaton`] drops grains on an Abelian sandpile with an
//!   absorbing boundary, keeping the history of distinct grids and the
//!   duration of every avalanche.
//!
//! ```
//! use lattice_cascade::{PercolationLattice, SandpileAutomaton};
//!
//! let mut lattice = PercolationLattice::new(50, 0.4, Some(1)).unwrap();
//! let _reaches_bottom = lattice.percolate();
//!
//! let mut pile = SandpileAutomaton::new(50, Some(1)).unwrap();
//! pile.simulate(1000);
//! assert!(pile.grid().iter().flatten().all(|h| *h < 4));
//! ```

use rand::{rngs::StdRng, SeedableRng};

pub mod error;
pub mod grid;
pub mod percolation;
pub mod sandpile;

pub use error::{LatticeError, LatticeResult};
pub use grid::{check_difference, fmt_graph, png};
pub use percolation::{percolation_probability, PercolationLattice, Site, Traversal};
pub use sandpile::{Height, SandpileAutomaton, THRESHOLD};

/// A square lattice that can be exported cell by cell.
pub trait Lattice {
	fn side(&self) -> usize;
	/// Cell values as small integers, row by row.
	fn to_graph(&self) -> Vec<Vec<u8>>;
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
	match seed {
		Some(s) => StdRng::seed_from_u64(s),
		None => StdRng::from_entropy(),
	}
}
