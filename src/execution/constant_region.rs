//! Process-wide constant-memory region for kernel weights.
//!
//! The constant and shared-tiled strategies read their weights from a
//! small, fixed-capacity, read-only region that is bound once before the
//! parallel phase begins and broadcast to every worker. The region is
//! process-wide and single-slot: binding a new kernel replaces the previous
//! binding. Workers never touch the slot directly; they read through a
//! [`ConstantBinding`] handle taken before any worker starts, so a rebind
//! from a later apply call cannot invalidate weights mid-computation.
//!
//! The explicit bind/release lifecycle keeps [`reset`] and error paths
//! sound: release drops the slot, and a subsequent apply with a different
//! kernel starts clean.
//!
//! [`reset`]: crate::execution::engine::ConvolutionEngine::reset

use crate::core::error::ConfigError;
use crate::core::kernel::KernelMatrix;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

/// Maximum number of weights the region can hold.
///
/// Sized for small bounded windows (a 5x5 kernel fits; a 7x7 does not).
pub const CONSTANT_REGION_CAPACITY: usize = 32;

/// The process-wide weight slot.
pub struct ConstantRegion {
    slot: Mutex<Option<Arc<[f32]>>>,
}

impl ConstantRegion {
    /// Get the global region, initializing it on first use.
    pub fn global() -> &'static Self {
        static REGION: OnceLock<ConstantRegion> = OnceLock::new();
        REGION.get_or_init(|| ConstantRegion {
            slot: Mutex::new(None),
        })
    }

    /// Bind a kernel's weights into the region, returning a read handle.
    ///
    /// Fails eagerly with a configuration error when the kernel does not
    /// fit the fixed capacity. Binding the same weights again reuses the
    /// existing allocation; binding different weights replaces the slot.
    pub fn bind(&self, kernel: &KernelMatrix) -> Result<ConstantBinding, ConfigError> {
        let weights = kernel.weights();
        if weights.len() > CONSTANT_REGION_CAPACITY {
            return Err(ConfigError::KernelTooLarge {
                weights: weights.len(),
                capacity: CONSTANT_REGION_CAPACITY,
            });
        }

        let mut slot = self.slot.lock();
        let arc = match slot.as_ref() {
            Some(bound) if bound.as_ref() == weights => Arc::clone(bound),
            _ => {
                let fresh: Arc<[f32]> = Arc::from(weights);
                *slot = Some(Arc::clone(&fresh));
                fresh
            }
        };
        Ok(ConstantBinding { weights: arc })
    }

    /// Release the current binding, if any. Idempotent.
    ///
    /// Outstanding [`ConstantBinding`] handles keep their own snapshot
    /// alive; release only empties the slot for the next bind.
    pub fn release(&self) {
        *self.slot.lock() = None;
    }

    /// Whether a kernel is currently bound.
    pub fn is_bound(&self) -> bool {
        self.slot.lock().is_some()
    }
}

/// Read handle onto the bound weights.
///
/// Cheap to clone into worker closures; the underlying weights are
/// immutable for the lifetime of the handle.
#[derive(Clone)]
pub struct ConstantBinding {
    weights: Arc<[f32]>,
}

impl ConstantBinding {
    /// The bound weight slice.
    #[inline(always)]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}
