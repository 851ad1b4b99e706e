//! Shared square-lattice utilities: shape checks, von Neumann adjacency,
//! cell-wise comparison and export to text or PNG.

use std::{
	fs::File,
	path::Path,
};

use crate::error::{LatticeError, LatticeResult};

/// Checks that `graph` is a non-empty square and returns its side length.
pub fn validate_square<T>(graph: &[Vec<T>]) -> LatticeResult<usize> {
	if graph.is_empty() {
		return Err(LatticeError::InvalidDimension("empty grid".to_owned()));
	}
	let n = graph.len();
	for (i, row) in graph.iter().enumerate() {
		if row.len() != n {
			return Err(LatticeError::InvalidDimension(format!(
				"row {} has length {}, expected {} for a square grid",
				i,
				row.len(),
				n
			)));
		}
	}
	Ok(n)
}

/// In-bounds orthogonal neighbours of `(i, j)` on an `n × n` lattice.
///
/// Neighbours that would fall off the lattice are not yielded.
pub fn von_neumann(i: usize, j: usize, n: usize) -> impl Iterator<Item = (usize, usize)> {
	let up = if i > 0 { Some((i - 1, j)) } else { None };
	let down = if i + 1 < n { Some((i + 1, j)) } else { None };
	let left = if j > 0 { Some((i, j - 1)) } else { None };
	let right = if j + 1 < n { Some((i, j + 1)) } else { None };
	[up, down, left, right].into_iter().flatten()
}

/// Number of cells at which two same-shaped grids differ.
pub fn check_difference<T: PartialEq>(a: &[Vec<T>], b: &[Vec<T>]) -> LatticeResult<usize> {
	if a.len() != b.len() || a.iter().zip(b).any(|(ra, rb)| ra.len() != rb.len()) {
		return Err(LatticeError::InvalidDimension(
			"attempt to compare grids of different shapes".to_owned(),
		));
	}
	Ok(a.iter()
		.zip(b)
		.map(|(ra, rb)| ra.iter().zip(rb).filter(|(x, y)| x != y).count())
		.sum())
}

pub fn png<P: AsRef<Path>>(graph: &[Vec<u8>], fname: P) -> LatticeResult<()> {
	let colors = [
		[0, 0, 0, 255],
		[64, 128, 0, 255],
		[118, 8, 170, 255],
		[255, 214, 0, 255],
		[255, 255, 255, 255],
	];
	let n = validate_square(graph)?;
	let mut pixels = vec![0; n * n * 4];
	let mut p = 0;
	for row in graph {
		for el in row {
			let c = (*el as usize).min(colors.len() - 1);
			pixels[p..p+4].copy_from_slice(&colors[c]);
			p += 4;
		}
	}
	repng::encode(File::create(fname)?, n as u32, n as u32, &pixels)?;
	Ok(())
}

pub fn fmt_graph(graph: &[Vec<u8>]) -> String {
	let vis = [" ", ".", ":", "&"];
	let mut s = String::new();
	for row in graph {
		for el in row {
			s += vis.get(*el as usize).copied().unwrap_or("#");
		}
		s += "\n";
	}
	s
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_square() {
		assert_eq!(validate_square(&[vec![0u8; 3], vec![0; 3], vec![0; 3]]).unwrap(), 3);
		assert!(matches!(
			validate_square::<u8>(&[]),
			Err(LatticeError::InvalidDimension(_))
		));
		assert!(matches!(
			validate_square(&[vec![0u8; 3], vec![0; 3]]),
			Err(LatticeError::InvalidDimension(_))
		));
		assert!(matches!(
			validate_square(&[vec![0u8; 2], vec![0; 1]]),
			Err(LatticeError::InvalidDimension(_))
		));
	}

	#[test]
	fn test_von_neumann_corners_and_interior() {
		let corner: Vec<_> = von_neumann(0, 0, 3).collect();
		assert_eq!(corner, vec![(1, 0), (0, 1)]);
		let interior: Vec<_> = von_neumann(1, 1, 3).collect();
		assert_eq!(interior, vec![(0, 1), (2, 1), (1, 0), (1, 2)]);
		assert_eq!(von_neumann(0, 0, 1).count(), 0);
	}

	#[test]
	fn test_check_difference() {
		let a = vec![vec![0u32, 1], vec![2, 3]];
		let b = vec![vec![0u32, 0], vec![2, 0]];
		assert_eq!(check_difference(&a, &a).unwrap(), 0);
		assert_eq!(check_difference(&a, &b).unwrap(), 2);
		assert!(check_difference(&a, &[vec![0u32, 1]]).is_err());
	}

	#[test]
	fn test_fmt_graph() {
		assert_eq!(fmt_graph(&[vec![0, 1], vec![3, 7]]), " .\n&#\n");
	}
}
