//! brisca-bench: micro-benchmarks for the ISMCTS search loop.
//!
//! The benchmarks live under `benches/`; this crate only exists to anchor
//! them in the workspace.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
