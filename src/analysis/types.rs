//! Types for the perspective analysis and weighted synthesis stages

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ValidationError;

/// One of the five fixed evaluation angles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Security,
    Performance,
    Cost,
    Developer,
    Business,
}

impl Dimension {
    /// Canonical order, used for prompts, tie-breaking and rendering
    pub const ALL: [Dimension; 5] = [
        Dimension::Security,
        Dimension::Performance,
        Dimension::Cost,
        Dimension::Developer,
        Dimension::Business,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Security => "security",
            Dimension::Performance => "performance",
            Dimension::Cost => "cost",
            Dimension::Developer => "developer",
            Dimension::Business => "business",
        }
    }

    /// Persona name of the expert speaking for this dimension
    pub fn persona(&self) -> &'static str {
        match self {
            Dimension::Security => "Security Guardian",
            Dimension::Performance => "Speed Demon",
            Dimension::Cost => "Budget Hawk",
            Dimension::Developer => "Dev Advocate",
            Dimension::Business => "Strategy Chief",
        }
    }

    /// Role and focus line used in the analysis prompt
    pub fn focus(&self) -> &'static str {
        match self {
            Dimension::Security => {
                "SECURITY EXPERT: Focus on vulnerabilities, compliance (PCI, GDPR), data protection."
            }
            Dimension::Performance => {
                "PERFORMANCE ENGINEER: Focus on latency, throughput, scalability, bottlenecks."
            }
            Dimension::Cost => {
                "COST OPTIMIZER: Focus on infrastructure costs, ROI, TCO, dev time."
            }
            Dimension::Developer => {
                "DEVELOPER ADVOCATE: Focus on maintainability, velocity, DX, learning curve."
            }
            Dimension::Business => {
                "BUSINESS STRATEGIST: Focus on market fit, competitive advantage, strategic value."
            }
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "security" => Ok(Dimension::Security),
            "performance" => Ok(Dimension::Performance),
            "cost" => Ok(Dimension::Cost),
            "developer" => Ok(Dimension::Developer),
            "business" => Ok(Dimension::Business),
            _ => Err(format!("Unknown dimension: {}", s)),
        }
    }
}

/// User-set importance of each dimension, 0-100 each. No sum constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct PriorityWeights {
    pub security: u8,
    pub performance: u8,
    pub cost: u8,
    pub developer: u8,
    pub business: u8,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            security: 80,
            performance: 60,
            cost: 100,
            developer: 40,
            business: 70,
        }
    }
}

impl PriorityWeights {
    pub const MAX: u8 = 100;

    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Security => self.security,
            Dimension::Performance => self.performance,
            Dimension::Cost => self.cost,
            Dimension::Developer => self.developer,
            Dimension::Business => self.business,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: u8) {
        match dimension {
            Dimension::Security => self.security = value,
            Dimension::Performance => self.performance = value,
            Dimension::Cost => self.cost = value,
            Dimension::Developer => self.developer = value,
            Dimension::Business => self.business = value,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for dimension in Dimension::ALL {
            let value = self.get(dimension);
            if value > Self::MAX {
                return Err(ValidationError::WeightOutOfRange {
                    dimension: dimension.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Dimensions by descending weight; ties keep canonical order
    pub fn ranked(&self) -> Vec<(Dimension, u8)> {
        let mut ranked: Vec<_> = Dimension::ALL.iter().map(|d| (*d, self.get(*d))).collect();
        // sort_by is stable, so equal weights stay in canonical order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Apply `security=80,cost=100` style overrides on top of `self`
    pub fn with_overrides(&self, overrides: &str) -> Result<Self, String> {
        let mut weights = *self;
        for part in overrides.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| format!("Expected dimension=value, got '{}'", part))?;
            let dimension: Dimension = key.parse()?;
            let value: u8 = value
                .trim()
                .parse()
                .map_err(|_| format!("Invalid weight '{}' for {}", value.trim(), dimension))?;
            if value > Self::MAX {
                return Err(format!(
                    "Weight for {} must be between 0 and {}",
                    dimension,
                    Self::MAX
                ));
            }
            weights.set(dimension, value);
        }
        Ok(weights)
    }
}

/// A single `{label, value}` metric reported by a perspective
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

/// One expert's assessment of the problem
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PerspectiveAssessment {
    /// Concise choice (e.g. "Microservices")
    pub recommendation: String,

    /// Intended range 1-10
    pub confidence: i64,

    pub reasoning: String,

    /// Exactly 3 expected
    pub key_points: Vec<String>,

    /// 2-3 expected
    pub metrics: Vec<Metric>,
}

/// All five assessments. Exactly these keys; extras are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PerspectiveSet {
    pub security: PerspectiveAssessment,
    pub performance: PerspectiveAssessment,
    pub cost: PerspectiveAssessment,
    pub developer: PerspectiveAssessment,
    pub business: PerspectiveAssessment,
}

impl PerspectiveSet {
    pub fn get(&self, dimension: Dimension) -> &PerspectiveAssessment {
        match dimension {
            Dimension::Security => &self.security,
            Dimension::Performance => &self.performance,
            Dimension::Cost => &self.cost,
            Dimension::Developer => &self.developer,
            Dimension::Business => &self.business,
        }
    }

    /// Assessments in canonical dimension order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &PerspectiveAssessment)> {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// How the synthesis settled one disagreement between perspectives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConflictResolution {
    pub conflict: String,
    pub resolution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradeoff: Option<String>,
}

/// The weighted consolidation of all five perspectives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Synthesis {
    pub final_recommendation: String,

    /// Consensus strength, 1-10
    pub confidence: i64,

    pub reasoning_chain: Vec<String>,

    #[serde(default)]
    pub consensus_points: Vec<String>,

    pub conflicts_resolved: Vec<ConflictResolution>,

    pub action_plan: Vec<String>,

    /// Predicted outcome per dimension
    pub outcomes: BTreeMap<Dimension, String>,
}

/// Everything one successful pipeline run produced
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisResult {
    pub problem: String,
    pub context: String,
    pub perspectives: PerspectiveSet,
    pub synthesis: Synthesis,
    pub weights: PriorityWeights,
}

/// A history entry: a snapshot of one completed run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScenarioRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub problem: String,
    pub context: String,
    pub weights: PriorityWeights,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
}

impl ScenarioRecord {
    /// Fresh record with a new id and the current time
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            problem: result.problem.clone(),
            context: result.context.clone(),
            weights: result.weights,
            result: Some(result.clone()),
        }
    }
}
