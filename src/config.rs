//! Engine configuration and data file sources
//!
//! All data and tunables ship embedded in the binary (`config/*.yaml`). At
//! startup an override directory may be supplied through
//! `ARCHETYPE_CONFIG_DIR`. Any file present there
//! replaces its embedded copy; missing files fall back to the embedded one.
//!
//! Loading happens once. Nothing in this module is consulted per request.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use archetype_types::{ArchetypeClass, QuizVariant};
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierPolicy, ConfidenceThresholds};
use crate::error::ConfigError;
use crate::questions::QuestionBank;
use crate::scoring::KeywordPolicy;

/// Environment variable naming the override directory
pub const CONFIG_DIR_ENV: &str = "ARCHETYPE_CONFIG_DIR";

/// Largest share of the lightest quick answer that free text may add
pub const MAX_TEXT_SHARE: f64 = 0.5;

// ============================================================================
// DATA FILES
// ============================================================================

/// One of the YAML files the engine is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Archetypes,
    FullQuestions,
    QuickQuestions,
    Keywords,
    Engine,
}

impl DataFile {
    pub const ALL: [DataFile; 5] = [
        DataFile::Archetypes,
        DataFile::FullQuestions,
        DataFile::QuickQuestions,
        DataFile::Keywords,
        DataFile::Engine,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            DataFile::Archetypes => "archetypes.yaml",
            DataFile::FullQuestions => "questions_full.yaml",
            DataFile::QuickQuestions => "questions_quick.yaml",
            DataFile::Keywords => "keywords.yaml",
            DataFile::Engine => "engine.yaml",
        }
    }

    /// Copy compiled into the binary
    pub fn embedded(&self) -> &'static str {
        match self {
            DataFile::Archetypes => include_str!("../config/archetypes.yaml"),
            DataFile::FullQuestions => include_str!("../config/questions_full.yaml"),
            DataFile::QuickQuestions => include_str!("../config/questions_quick.yaml"),
            DataFile::Keywords => include_str!("../config/keywords.yaml"),
            DataFile::Engine => include_str!("../config/engine.yaml"),
        }
    }

    /// Question bank file for a quiz variant
    pub fn for_variant(variant: QuizVariant) -> Self {
        match variant {
            QuizVariant::Full => DataFile::FullQuestions,
            QuizVariant::Quick => DataFile::QuickQuestions,
        }
    }
}

/// Text of a data file plus where it came from (for error messages)
#[derive(Debug, Clone)]
pub struct DataText {
    pub origin: String,
    pub text: Cow<'static, str>,
}

/// Where data files are read from
#[derive(Debug, Clone, Default)]
pub struct DataSource {
    override_dir: Option<PathBuf>,
}

impl DataSource {
    /// Embedded files only
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Prefer files found in `dir`, fall back to embedded copies
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// Resolve the override directory from `ARCHETYPE_CONFIG_DIR`
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => {
                tracing::info!(dir = %dir, "Using archetype config override directory");
                Self::with_override_dir(dir)
            }
            _ => Self::embedded(),
        }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Read a data file, preferring the override directory
    pub fn read(&self, file: DataFile) -> Result<DataText, (String, std::io::Error)> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(file.file_name());
            if path.is_file() {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| (path.display().to_string(), e))?;
                tracing::debug!(path = %path.display(), "Loaded data file override");
                return Ok(DataText {
                    origin: path.display().to_string(),
                    text: Cow::Owned(text),
                });
            }
        }
        Ok(DataText {
            origin: format!("embedded {}", file.file_name()),
            text: Cow::Borrowed(file.embedded()),
        })
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Which result shape the JSON boundary emits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputContract {
    /// `confidence` is emitted for quick results only
    #[default]
    Legacy,
    /// `confidence` is emitted for every variant
    Unified,
}

impl OutputContract {
    pub fn includes_confidence(&self, variant: QuizVariant) -> bool {
        match self {
            OutputContract::Legacy => variant == QuizVariant::Quick,
            OutputContract::Unified => true,
        }
    }
}

/// Engine tunables (`engine.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Gap thresholds for the confidence band
    pub confidence: ConfidenceThresholds,
    /// Bonus added per keyword-matched class
    pub keyword_bonus: f64,
    /// At most this many classes receive a keyword bonus
    pub max_keyword_classes: usize,
    /// Primary class reported for an all-zero score vector
    pub default_primary: ArchetypeClass,
    /// Result JSON shape
    pub output_contract: OutputContract,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let keywords = KeywordPolicy::default();
        let classifier = ClassifierPolicy::default();
        Self {
            confidence: classifier.thresholds,
            keyword_bonus: keywords.bonus,
            max_keyword_classes: keywords.max_classes,
            default_primary: classifier.default_primary,
            output_contract: OutputContract::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `engine.yaml` from a data source
    pub fn load(source: &DataSource) -> Result<Self, ConfigError> {
        let data = source
            .read(DataFile::Engine)
            .map_err(|(path, source)| ConfigError::Io { path, source })?;
        Self::from_yaml_str(&data.text, &data.origin)
    }

    /// Standalone consistency checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ConfidenceThresholds {
            high_gap,
            medium_gap,
        } = self.confidence;
        let ordered = medium_gap >= 0.0 && medium_gap < high_gap && high_gap <= 1.0;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                medium: medium_gap,
                high: high_gap,
            });
        }
        if !self.keyword_bonus.is_finite() || self.keyword_bonus <= 0.0 {
            return Err(ConfigError::InvalidKeywordBonus(self.keyword_bonus));
        }
        if self.max_keyword_classes == 0 {
            return Err(ConfigError::InvalidKeywordCap);
        }
        Ok(())
    }

    /// Most weight free text can add: every credited class gets the bonus
    pub fn max_text_mass(&self) -> f64 {
        self.keyword_bonus * self.max_keyword_classes as f64
    }

    /// Keep free text a minor signal relative to the quick bank.
    ///
    /// The most text can add must not exceed `MAX_TEXT_SHARE` of the weight
    /// added by the lightest option of any quick question.
    pub fn validate_against(&self, quick: &QuestionBank) -> Result<(), ConfigError> {
        let Some((question, index, answer_mass)) = quick.lightest_option() else {
            return Ok(());
        };
        let text_mass = self.max_text_mass();
        if text_mass > answer_mass * MAX_TEXT_SHARE {
            return Err(ConfigError::BonusDominates {
                bonus: self.keyword_bonus,
                max_classes: self.max_keyword_classes,
                text_mass,
                max_share: MAX_TEXT_SHARE,
                question: question.to_string(),
                index,
                answer_mass,
            });
        }
        Ok(())
    }

    pub fn keyword_policy(&self) -> KeywordPolicy {
        KeywordPolicy {
            bonus: self.keyword_bonus,
            max_classes: self.max_keyword_classes,
        }
    }

    pub fn classifier_policy(&self) -> ClassifierPolicy {
        ClassifierPolicy {
            thresholds: self.confidence,
            default_primary: self.default_primary,
        }
    }
}
