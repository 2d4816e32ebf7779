// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    analyses: AtomicU64,
    degraded: AtomicU64,
    unmapped_labels: AtomicU64,
    overrides_fired: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub analyses: u64,
    pub degraded: u64,
    pub unmapped_labels: u64,
    pub overrides_fired: u64,
}

impl PipelineMetrics {
    pub fn record_analysis(&self) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_degraded(&self) {
        self.degraded.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_unmapped_label(&self) {
        self.unmapped_labels.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_override(&self) {
        self.overrides_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses: self.analyses.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
            unmapped_labels: self.unmapped_labels.load(Ordering::Relaxed),
            overrides_fired: self.overrides_fired.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = PipelineMetrics::default();
        metrics.record_analysis();
        metrics.record_analysis();
        metrics.record_degraded();
        metrics.record_override();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                analyses: 2,
                degraded: 1,
                unmapped_labels: 0,
                overrides_fired: 1,
            }
        );
    }
}
