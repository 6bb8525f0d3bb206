// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount tracking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the chart that started a load is still mounted.
///
/// Clones share the flag: the view keeps one and hands another to the pipeline. Once
/// [`unmount`](Self::unmount) runs, every clone reports unmounted and results are discarded.
#[derive(Clone, Debug)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    /// A mounted guard.
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the owner is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Marks the owner as torn down. Idempotent.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let guard = MountGuard::new();
        let pipeline_side = guard.clone();
        assert!(pipeline_side.is_mounted());
        guard.unmount();
        guard.unmount();
        assert!(!pipeline_side.is_mounted());
    }
}
