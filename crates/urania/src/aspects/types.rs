use crate::reference::{KeywordTable, ReferenceDataError};
use crate::zodiac::CelestialBody;
use serde::{Deserialize, Serialize};

/// A named angular relationship and how far from exact it may be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRule {
    /// Aspect type: "CONJUNCTION", "TRINE", etc.
    pub aspect_type: String,
    pub exact_angle: f64,
    pub tolerance: f64,
    pub keywords: Vec<String>,
}

impl AspectRule {
    pub fn new(aspect_type: &str, exact_angle: f64, tolerance: f64, keywords: &[&str]) -> Self {
        Self {
            aspect_type: aspect_type.to_string(),
            exact_angle,
            tolerance,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Parse `angle;tolerance;keyword;...` values of an `aspects.txt` entry.
    pub fn from_values(name: &str, values: &[String]) -> Result<Self, ReferenceDataError> {
        let malformed = |message: String| ReferenceDataError::MalformedAspect {
            name: name.to_string(),
            message,
        };
        let angle = values
            .first()
            .ok_or_else(|| malformed("missing exact angle".to_string()))?;
        let tolerance = values
            .get(1)
            .ok_or_else(|| malformed("missing tolerance".to_string()))?;
        let exact_angle: f64 = angle
            .parse()
            .map_err(|_| malformed(format!("exact angle '{}' is not a number", angle)))?;
        let tolerance: f64 = tolerance
            .parse()
            .map_err(|_| malformed(format!("tolerance '{}' is not a number", tolerance)))?;
        if !(0.0..=180.0).contains(&exact_angle) {
            return Err(malformed(format!("exact angle {} outside 0-180", exact_angle)));
        }
        if !(tolerance >= 0.0) {
            return Err(malformed(format!("tolerance {} is negative", tolerance)));
        }

        Ok(Self {
            aspect_type: name.to_string(),
            exact_angle,
            tolerance,
            keywords: values[2..].to_vec(),
        })
    }

    /// Orb of `separation` against this rule if it is within tolerance.
    pub fn orb_for(&self, separation: f64) -> Option<f64> {
        let orb = (separation - self.exact_angle).abs();
        (orb <= self.tolerance).then_some(orb)
    }
}

lazy_static::lazy_static! {
    static ref STANDARD_RULES: Vec<AspectRule> = vec![
        AspectRule::new("CONJUNCTION", 0.0, 8.0, &["unity", "blending", "intensification"]),
        AspectRule::new("SEXTILE", 60.0, 4.0, &["opportunity", "cooperation", "ease"]),
        AspectRule::new("SQUARE", 90.0, 6.0, &["tension", "challenge", "action"]),
        AspectRule::new("TRINE", 120.0, 7.0, &["harmony", "flow", "talent"]),
        AspectRule::new("OPPOSITION", 180.0, 8.0, &["polarity", "awareness", "balance"]),
    ];
}

/// The aspect-angle/tolerance table. Read-only once built; rules loaded from data are
/// ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AspectTable {
    rules: Vec<AspectRule>,
}

impl AspectTable {
    pub fn new(rules: Vec<AspectRule>) -> Self {
        Self { rules }
    }

    /// The five major aspects with conventional orbs.
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.clone())
    }

    /// Build from `aspects.txt` data, skipping malformed entries with a warning.
    pub fn from_keywords(table: &KeywordTable) -> Self {
        let mut rules = Vec::new();
        for (name, values) in table.sorted_entries() {
            match AspectRule::from_values(name, values) {
                Ok(rule) => rules.push(rule),
                Err(e) => log::warn!("Skipping aspect entry: {e}"),
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[AspectRule] {
        &self.rules
    }

    pub fn lookup(&self, aspect_type: &str) -> Option<&AspectRule> {
        self.rules
            .iter()
            .find(|r| r.aspect_type.eq_ignore_ascii_case(aspect_type))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pairs of rules whose tolerance windows overlap, i.e. a separation that could match both.
    pub fn overlapping_rules(&self) -> Vec<(&AspectRule, &AspectRule)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                let gap = (a.exact_angle - b.exact_angle).abs();
                if gap <= a.tolerance + b.tolerance {
                    overlaps.push((a, b));
                }
            }
        }
        overlaps
    }
}

/// Which chart a body reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartLayer {
    Natal,
    Transit,
}

/// Reference to a body in an aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyRef {
    pub layer: ChartLayer,
    pub body: CelestialBody,
}

impl BodyRef {
    pub fn natal(body: CelestialBody) -> Self {
        Self {
            layer: ChartLayer::Natal,
            body,
        }
    }

    pub fn transit(body: CelestialBody) -> Self {
        Self {
            layer: ChartLayer::Transit,
            body,
        }
    }
}

/// One pair of bodies matched against one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub from: BodyRef,
    pub to: BodyRef,
    /// Minor-arc separation in `[0, 180]`.
    pub separation: f64,
    pub aspect_type: String,
    pub exact_angle: f64,
    /// `|separation - exact_angle|`
    pub orb: f64,
    pub keywords: Vec<String>,
}

impl AspectMatch {
    /// Both ends come from the same chart.
    pub fn is_intra_chart(&self) -> bool {
        self.from.layer == self.to.layer
    }
}
