//! # Claim Data Model
//!
//! [`ClaimInput`] is the raw record as a caller or data source supplies it,
//! with categorical fields as free text. [`Claim`] is the validated,
//! immutable form; the only way to get one is through
//! [`ClaimInput::validate`] or [`Claim::new`].
//!
//! Validation is strict: labels are matched exactly (`"Auto"`, not `"auto"`;
//! `"low"`, not `"Low"`), and a negative or non-finite damage amount is an
//! error rather than being clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// ClaimType
// ---------------------------------------------------------------------------

/// The line of business a claim belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaimType {
    /// Motor vehicle claim.
    Auto,
    /// Property damage claim.
    Property,
    /// Health claim.
    Health,
    /// Third-party liability claim.
    Liability,
}

impl ClaimType {
    /// All claim types in declaration order.
    pub fn all() -> &'static [ClaimType] {
        &[Self::Auto, Self::Property, Self::Health, Self::Liability]
    }

    /// Accepted labels, in declaration order.
    pub fn labels() -> &'static [&'static str] {
        &["Auto", "Property", "Health", "Liability"]
    }

    /// The exact label used in records and codecs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Property => "Property",
            Self::Health => "Health",
            Self::Liability => "Liability",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::not_one_of("claim_type", s, Self::labels()))
    }
}

// ---------------------------------------------------------------------------
// RiskFactor
// ---------------------------------------------------------------------------

/// Underwriting risk factor attached to the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFactor {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl RiskFactor {
    /// All risk factors in declaration order.
    pub fn all() -> &'static [RiskFactor] {
        &[Self::Low, Self::Medium, Self::High]
    }

    /// Accepted labels, in declaration order.
    pub fn labels() -> &'static [&'static str] {
        &["low", "medium", "high"]
    }

    /// The exact label used in records and codecs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskFactor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ValidationError::not_one_of("risk_factor", s, Self::labels()))
    }
}

// ---------------------------------------------------------------------------
// ClaimInput
// ---------------------------------------------------------------------------

/// A claim exactly as received from a caller or a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    /// One of `Auto`, `Property`, `Health`, `Liability`.
    pub claim_type: String,
    /// Damage amount in currency units.
    pub damage_amount: f64,
    /// Whether an injury was involved.
    pub injury_involved: bool,
    /// One of `low`, `medium`, `high`.
    pub risk_factor: String,
}

impl ClaimInput {
    /// Convenience constructor.
    pub fn new(
        claim_type: impl Into<String>,
        damage_amount: f64,
        injury_involved: bool,
        risk_factor: impl Into<String>,
    ) -> Self {
        Self {
            claim_type: claim_type.into(),
            damage_amount,
            injury_involved,
            risk_factor: risk_factor.into(),
        }
    }

    /// Validate every field and produce an immutable [`Claim`].
    ///
    /// Fields are checked in record order (`claim_type`, `damage_amount`,
    /// `risk_factor`); the first failure is returned.
    pub fn validate(&self) -> Result<Claim, ValidationError> {
        let claim_type = ClaimType::from_str(&self.claim_type)?;
        let damage_amount = check_damage_amount(self.damage_amount)?;
        let risk_factor = RiskFactor::from_str(&self.risk_factor)?;
        Ok(Claim {
            claim_type,
            damage_amount,
            injury_involved: self.injury_involved,
            risk_factor,
        })
    }
}

fn check_damage_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::new(
            "damage_amount",
            amount.to_string(),
            "must be a finite number",
        ));
    }
    if amount < 0.0 {
        return Err(ValidationError::new(
            "damage_amount",
            amount.to_string(),
            "must be non-negative",
        ));
    }
    Ok(amount)
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// A validated claim. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Claim {
    claim_type: ClaimType,
    damage_amount: f64,
    injury_involved: bool,
    risk_factor: RiskFactor,
}

impl Claim {
    /// Build a claim from already-typed fields, checking the damage amount.
    pub fn new(
        claim_type: ClaimType,
        damage_amount: f64,
        injury_involved: bool,
        risk_factor: RiskFactor,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            claim_type,
            damage_amount: check_damage_amount(damage_amount)?,
            injury_involved,
            risk_factor,
        })
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    pub fn damage_amount(&self) -> f64 {
        self.damage_amount
    }

    pub fn injury_involved(&self) -> bool {
        self.injury_involved
    }

    pub fn risk_factor(&self) -> RiskFactor {
        self.risk_factor
    }

    /// Back to the raw record form, e.g. for echoing input.
    pub fn to_input(&self) -> ClaimInput {
        ClaimInput::new(
            self.claim_type.as_str(),
            self.damage_amount,
            self.injury_involved,
            self.risk_factor.as_str(),
        )
    }
}

/// A training row: a validated claim with its severity label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledClaim {
    pub claim: Claim,
    pub severity: String,
}
