use thiserror::Error;

#[derive(Debug, Error)]
pub enum LatticeError {
	#[error("invalid grid: {0}")]
	InvalidGrid(String),

	#[error("invalid dimension: {0}")]
	InvalidDimension(String),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
