use lattice_cascade::{
	check_difference,
	Lattice,
	LatticeError,
	PercolationLattice,
	SandpileAutomaton,
	Site,
	Traversal,
};

#[test]
fn open_lattice_fills_completely() {
	let mut lattice = PercolationLattice::new(4, 0.0, Some(0)).unwrap();
	assert!(lattice.percolate());
	assert!(lattice.grid_filled().iter().flatten().all(|s| *s == Site::Filled));
	assert!(lattice.grid().iter().flatten().all(|s| *s == Site::Open));
}

#[test]
fn blocked_lattice_stays_dry() {
	let mut lattice = PercolationLattice::new(3, 1.0, Some(0)).unwrap();
	assert!(!lattice.percolate());
	assert_eq!(lattice.grid_filled(), lattice.grid());
	assert!(lattice.grid().iter().flatten().all(|s| *s == Site::Blocked));
}

#[test]
fn open_top_row_over_blocked_row() {
	for n in 2..6 {
		let mut graph = vec![vec![1u8; n]; n];
		graph[1] = vec![0; n];
		let mut lattice = PercolationLattice::from_grid(graph).unwrap();
		assert!(!lattice.percolate());
		assert!(lattice.grid_filled()[0].iter().all(|s| *s == Site::Filled));
	}
}

#[test]
fn open_column_percolates() {
	for n in 1..8 {
		let mut graph = vec![vec![0u8; n]; n];
		for row in graph.iter_mut() {
			row[n / 2] = 1;
		}
		let mut lattice = PercolationLattice::from_grid(graph).unwrap();
		assert!(lattice.percolate_with(Traversal::BreadthFirst));
		assert_eq!(lattice.filled_count(), n);
	}
}

#[test]
fn non_binary_grid_is_rejected() {
	let err = PercolationLattice::from_grid(vec![vec![1, 1], vec![3, 0]]).unwrap_err();
	assert!(matches!(err, LatticeError::InvalidGrid(_)));
}

#[test]
fn large_lattice_does_not_overflow_the_stack() {
	let n = 1500;
	let mut graph = vec![vec![1u8; n]; n];
	// serpentine corridor: every other row is blocked except at alternating ends
	for i in (1..n).step_by(2) {
		graph[i] = vec![0; n];
		let gap = if (i / 2) % 2 == 0 { n - 1 } else { 0 };
		graph[i][gap] = 1;
	}
	let mut lattice = PercolationLattice::from_grid(graph).unwrap();
	assert!(lattice.percolate());
	assert_eq!(lattice.side(), n);
	assert_eq!(lattice.filled_count(), n * (n / 2) + n / 2);
}

#[test]
fn single_topple_at_centre() {
	let mut pile = SandpileAutomaton::from_grid(
		vec![
			vec![0, 0, 0],
			vec![0, 3, 0],
			vec![0, 0, 0],
		],
		Some(0),
	).unwrap();
	assert_eq!(pile.drop_grain(1, 1).unwrap(), 1);
	assert_eq!(pile.grid(), &[
		vec![0u32, 1, 0],
		vec![1, 0, 1],
		vec![0, 1, 0],
	][..]);
	assert_eq!(pile.avalanche_durations(), &[1]);
	assert_eq!(pile.history().len(), 2);
}

#[test]
fn quiet_drop_records_snapshot_without_avalanche() {
	let mut pile = SandpileAutomaton::from_grid(vec![vec![0; 3]; 3], None).unwrap();
	assert_eq!(pile.drop_grain(2, 0).unwrap(), 0);
	assert_eq!(pile.history().len(), 2);
	assert!(pile.avalanche_durations().is_empty());
	assert_eq!(check_difference(&pile.history()[0], &pile.history()[1]).unwrap(), 1);
}

#[test]
fn simulation_keeps_pile_stable() {
	let mut pile = SandpileAutomaton::new(30, Some(8)).unwrap();
	let grid = pile.simulate(5000).to_vec();
	assert!(grid.iter().flatten().all(|h| *h <= 3));
	assert!(pile.history().len() <= 5001);
	assert_eq!(pile.history().last().unwrap(), &grid);
}
