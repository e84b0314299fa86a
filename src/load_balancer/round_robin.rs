//! Round-robin load balancing strategy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::load_balancer::{LoadBalancer, backend::Backend};

/// Round-robin selector.
/// Stores a monotonically increasing cursor, reduced modulo the backend count on every access.
/// Near `usize::MAX` it restarts at a value that keeps the rotation in order.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start rotation from an arbitrary cursor value.
    pub fn with_cursor(cursor: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(cursor),
        }
    }

    /// Current raw cursor value.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, backends: &[Arc<dyn Backend>]) -> Option<Arc<dyn Backend>> {
        if backends.is_empty() {
            return None;
        }

        let len = backends.len();
        let mut current = self.cursor.load(Ordering::Acquire);

        loop {
            // Skip dead backends, at most one full lap.
            let start = current % len;
            let offset = (0..len).find(|i| backends[(start + i) % len].is_alive())?;
            let index = (start + offset) % len;

            // Consume the skipped turns plus this one in a single step. On
            // overflow the cursor restarts in phase with `index`.
            let next = current.checked_add(offset + 1).unwrap_or(index + 1);

            match self.cursor.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return Some(backends[index].clone()),
                Err(actual) => current = actual,
            }
        }
    }

    fn strategy_name(&self) -> &'static str {
        "round_robin"
    }
}
