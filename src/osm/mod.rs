pub mod normalizer;

pub use normalizer::{Normalized, Normalizer};
