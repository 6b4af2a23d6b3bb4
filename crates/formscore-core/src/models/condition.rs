// ABOUTME: Condition groups that keep baselines comparable across running surfaces
// ABOUTME: Closed enumeration with strict parsing; unknown groups are configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Bucket of similar running conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGroup {
    /// Flat road running
    FlatRoad,
    /// Sustained uphill
    Uphill,
    /// Sustained downhill
    Downhill,
    /// Athletics track
    Track,
    /// Off-road trail
    Trail,
    /// Indoor treadmill
    Treadmill,
}

impl ConditionGroup {
    /// Every known condition group
    pub const ALL: [Self; 6] = [
        Self::FlatRoad,
        Self::Uphill,
        Self::Downhill,
        Self::Track,
        Self::Trail,
        Self::Treadmill,
    ];

    /// Canonical snake_case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlatRoad => "flat_road",
            Self::Uphill => "uphill",
            Self::Downhill => "downhill",
            Self::Track => "track",
            Self::Trail => "trail",
            Self::Treadmill => "treadmill",
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AppError::missing_field("condition_group"));
        }
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| AppError::config(format!("Unknown condition group: '{s}'")))
    }
}
