//! Chaotic store wrapper for fault injection testing
//!
//! Store wrapper that randomly fails operations to test error handling.
//! Used for chaos testing to ensure the key manager surfaces store failures
//! instead of mistaking them for a first run.

use std::sync::{Arc, Mutex};

use super::{AccessPolicy, SecretStore, StoreError};

/// Chaotic store wrapper that randomly injects failures
///
/// Delegates to an underlying store implementation but randomly fails
/// operations based on a configured failure rate. Uses Arc<Mutex<>> for the
/// RNG state, making it Clone and thread-safe.
#[derive(Clone)]
pub struct ChaoticStore<S: SecretStore> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<ChaoticRng>>,
}

/// Simple deterministic RNG for chaos injection
///
/// Uses a linear congruential generator (LCG) for fast, deterministic
/// randomness, so chaos tests are reproducible with the same seed.
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random value [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }

    fn should_fail(&mut self, failure_rate: f64) -> bool {
        self.next() < failure_rate
    }
}

impl<S: SecretStore> ChaoticStore<S> {
    /// Create a new chaotic store wrapper
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Create with explicit seed for reproducible chaos
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self { inner, failure_rate, rng: Arc::new(Mutex::new(ChaoticRng::new(seed))) }
    }

    /// Underlying store (for checking invariants after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// # Panics
    ///
    /// Panics if the RNG mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn maybe_fail(&self, operation: &str) -> Result<(), StoreError> {
        let mut rng = self.rng.lock().expect("Mutex poisoned");
        if rng.should_fail(self.failure_rate) {
            return Err(StoreError::Io(format!("injected {operation} failure")));
        }
        Ok(())
    }
}

impl<S: SecretStore> SecretStore for ChaoticStore<S> {
    fn put(&self, tag: &str, bytes: &[u8], policy: AccessPolicy) -> Result<(), StoreError> {
        self.maybe_fail("put")?;
        self.inner.put(tag, bytes, policy)
    }

    fn get(&self, tag: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.maybe_fail("get")?;
        self.inner.get(tag)
    }

    fn delete(&self, tag: &str) -> Result<(), StoreError> {
        self.maybe_fail("delete")?;
        self.inner.delete(tag)
    }
}
