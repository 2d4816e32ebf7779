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

use crate::types::{ClassifierResult, RawClassification};

/// A loaded text-classification model.
///
/// Implementations hold no per-call mutable state and are shared across
/// request threads once constructed.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> ClassifierResult<RawClassification>;

    fn name(&self) -> &str;
}
