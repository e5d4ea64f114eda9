// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Experiment selection
//!
//! Each experiment kind names a train/test pairing of odor recordings with or
//! without background odor, optionally using the pre-rescaled ("rs")
//! activation files. A kind resolves once, at startup, to four CSV paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentKind {
    #[default]
    NoBgTrainNoBgTest,
    BgTrainBgTest,
    NoBgTrainBgTest,
    RsNoBgTrainNoBgTest,
    RsBgTrainBgTest,
    RsNoBgTrainBgTest,
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 6] = [
        ExperimentKind::NoBgTrainNoBgTest,
        ExperimentKind::BgTrainBgTest,
        ExperimentKind::NoBgTrainBgTest,
        ExperimentKind::RsNoBgTrainNoBgTest,
        ExperimentKind::RsBgTrainBgTest,
        ExperimentKind::RsNoBgTrainBgTest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentKind::NoBgTrainNoBgTest => "no_bg_train_no_bg_test",
            ExperimentKind::BgTrainBgTest => "bg_train_bg_test",
            ExperimentKind::NoBgTrainBgTest => "no_bg_train_bg_test",
            ExperimentKind::RsNoBgTrainNoBgTest => "rs_no_bg_train_no_bg_test",
            ExperimentKind::RsBgTrainBgTest => "rs_bg_train_bg_test",
            ExperimentKind::RsNoBgTrainBgTest => "rs_no_bg_train_bg_test",
        }
    }

    /// Folder under the data directory holding this pairing
    pub fn folder(&self) -> &'static str {
        match self {
            ExperimentKind::NoBgTrainNoBgTest | ExperimentKind::RsNoBgTrainNoBgTest => {
                "Otrain_4Otest"
            }
            ExperimentKind::BgTrainBgTest | ExperimentKind::RsBgTrainBgTest => {
                "OBGtrain_4OBGtest"
            }
            ExperimentKind::NoBgTrainBgTest | ExperimentKind::RsNoBgTrainBgTest => {
                "Otrain_4OBGtest"
            }
        }
    }

    /// Whether the pre-rescaled activation files are used
    pub fn is_rescaled(&self) -> bool {
        matches!(
            self,
            ExperimentKind::RsNoBgTrainNoBgTest
                | ExperimentKind::RsBgTrainBgTest
                | ExperimentKind::RsNoBgTrainBgTest
        )
    }

    pub fn dataset_paths(&self, data_dir: &Path) -> DatasetPaths {
        let folder = data_dir.join(self.folder());
        let suffix = if self.is_rescaled() { "_rs" } else { "" };
        DatasetPaths {
            train_concentration: folder.join("train_c.csv"),
            train_activation: folder.join(format!("train_a{}.csv", suffix)),
            test_concentration: folder.join("test_c.csv"),
            test_activation: folder.join(format!("test_a{}.csv", suffix)),
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperimentKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        ExperimentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "unknown experiment '{}', expected one of: {}",
                    value,
                    ExperimentKind::ALL
                        .iter()
                        .map(|kind| kind.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Concentration (label) and activation files of a train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub train_concentration: PathBuf,
    pub train_activation: PathBuf,
    pub test_concentration: PathBuf,
    pub test_activation: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths() {
        let paths = ExperimentKind::NoBgTrainBgTest.dataset_paths(Path::new("data"));
        assert_eq!(
            paths.train_concentration,
            PathBuf::from("data/Otrain_4OBGtest/train_c.csv")
        );
        assert_eq!(
            paths.train_activation,
            PathBuf::from("data/Otrain_4OBGtest/train_a.csv")
        );
        assert_eq!(
            paths.test_activation,
            PathBuf::from("data/Otrain_4OBGtest/test_a.csv")
        );
    }

    #[test]
    fn test_rescaled_paths_keep_concentration_files() {
        let paths = ExperimentKind::RsBgTrainBgTest.dataset_paths(Path::new("/srv/odor"));
        assert_eq!(
            paths.train_concentration,
            PathBuf::from("/srv/odor/OBGtrain_4OBGtest/train_c.csv")
        );
        assert_eq!(
            paths.train_activation,
            PathBuf::from("/srv/odor/OBGtrain_4OBGtest/train_a_rs.csv")
        );
        assert_eq!(
            paths.test_concentration,
            PathBuf::from("/srv/odor/OBGtrain_4OBGtest/test_c.csv")
        );
        assert_eq!(
            paths.test_activation,
            PathBuf::from("/srv/odor/OBGtrain_4OBGtest/test_a_rs.csv")
        );
    }

    #[test]
    fn test_parse_round_trips_every_kind() {
        for kind in ExperimentKind::ALL {
            assert_eq!(kind.as_str().parse::<ExperimentKind>().unwrap(), kind);
        }
        assert_eq!(
            "RS-No-Bg-Train-Bg-Test".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::RsNoBgTrainBgTest
        );
        assert!("bg_only".parse::<ExperimentKind>().is_err());
    }
}
