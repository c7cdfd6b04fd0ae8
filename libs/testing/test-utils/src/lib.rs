//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic measurements derived from the test name
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let (height, weight) = builder.measurement(0);
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_store_record");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// The `index`-th `(height, weight)` pair for this seed.
    ///
    /// Heights fall in `[1.50, 2.00)` m and weights in `[45.0, 125.0)` kg,
    /// both with two decimals.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let (height, weight) = TestDataBuilder::new(42).measurement(0);
    /// assert!((1.5..2.0).contains(&height));
    /// assert!((45.0..125.0).contains(&weight));
    /// ```
    pub fn measurement(&self, index: u64) -> (f64, f64) {
        let mixed = self
            .seed
            .wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .rotate_left(17);
        let height = 150 + mixed % 50;
        let weight = 4500 + (mixed >> 16) % 8000;
        (height as f64 / 100.0, weight as f64 / 100.0)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that two floats are within `tolerance` of each other
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64, context: &str) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {} ± {}, got {}",
            context,
            expected,
            tolerance,
            actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
