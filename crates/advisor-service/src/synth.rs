//! # Synthetic Claims
//!
//! Seeded generator for demonstration datasets. Labels come from a fixed
//! composite-score rule with a small amount of label noise, so the trained
//! model has something learnable but is not trivially perfect.
//!
//! The generator is a data source only. Its rule constants live here and are
//! independent of the Policy Boundary Table; the classifier never sees them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use advisor_core::{Claim, ClaimType, LabeledClaim, RiskFactor, ValidationError};

/// Default number of generated rows.
pub const DEFAULT_ROWS: usize = 1_000;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 7;

const MIN_DAMAGE: f64 = 500.0;
const MAX_DAMAGE: f64 = 100_000.0;
const INJURY_RATE: f64 = 0.3;
const LABEL_NOISE: f64 = 0.05;
const SEVERITY_LABELS: [&str; 3] = ["Low", "Medium", "High"];

/// Generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticClaims {
    pub rows: usize,
    pub seed: u64,
}

impl Default for SyntheticClaims {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SyntheticClaims {
    pub fn new(rows: usize, seed: u64) -> Self {
        Self { rows, seed }
    }

    /// Generate the dataset. Same settings, same rows.
    ///
    /// Every row is validated like caller input; a row that fails is an
    /// error, never a shorter dataset.
    pub fn generate(&self) -> Result<Vec<LabeledClaim>, ValidationError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.rows).map(|_| sample(&mut rng)).collect()
    }
}

fn sample(rng: &mut StdRng) -> Result<LabeledClaim, ValidationError> {
    let claim_type = ClaimType::all()[rng.gen_range(0..ClaimType::all().len())];
    let risk_factor = match rng.gen_range(0..10) {
        0..=4 => RiskFactor::Low,
        5..=7 => RiskFactor::Medium,
        _ => RiskFactor::High,
    };
    let injury_involved = rng.gen_bool(INJURY_RATE);
    let log_damage = rng.gen_range(MIN_DAMAGE.ln()..MAX_DAMAGE.ln());
    let damage_amount = (log_damage.exp() * 100.0).round() / 100.0;

    let mut level = severity_level(claim_type, damage_amount, injury_involved, risk_factor);
    if rng.gen_bool(LABEL_NOISE) {
        level = rng.gen_range(0..SEVERITY_LABELS.len());
    }

    let claim = Claim::new(claim_type, damage_amount, injury_involved, risk_factor)?;
    Ok(LabeledClaim {
        claim,
        severity: SEVERITY_LABELS[level].to_string(),
    })
}

/// 0 = Low, 1 = Medium, 2 = High.
fn severity_level(
    claim_type: ClaimType,
    damage_amount: f64,
    injury_involved: bool,
    risk_factor: RiskFactor,
) -> usize {
    let risk = match risk_factor {
        RiskFactor::Low => 1.0,
        RiskFactor::Medium => 1.4,
        RiskFactor::High => 2.0,
    };
    let injury = if injury_involved { 1.7 } else { 1.0 };
    let line = if claim_type == ClaimType::Liability { 1.25 } else { 1.0 };
    let score = damage_amount / 1_000.0 * risk * injury * line;
    if score < 6.0 {
        0
    } else if score < 18.0 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = SyntheticClaims::new(200, 11).generate().unwrap();
        let b = SyntheticClaims::new(200, 11).generate().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, SyntheticClaims::new(200, 12).generate().unwrap());
    }

    #[test]
    fn every_severity_appears() {
        let rows = SyntheticClaims::default().generate().unwrap();
        assert_eq!(rows.len(), DEFAULT_ROWS);
        for label in SEVERITY_LABELS {
            assert!(rows.iter().any(|r| r.severity == label), "{label} missing");
        }
    }

    #[test]
    fn amounts_stay_in_range() {
        for row in SyntheticClaims::new(500, 3).generate().unwrap() {
            let d = row.claim.damage_amount();
            assert!((MIN_DAMAGE..=MAX_DAMAGE).contains(&d), "{d}");
        }
    }

    #[test]
    fn scoring_rule_orders_claims() {
        assert_eq!(severity_level(ClaimType::Auto, 2_500.0, false, RiskFactor::Low), 0);
        assert_eq!(severity_level(ClaimType::Property, 12_000.0, false, RiskFactor::Medium), 1);
        assert_eq!(severity_level(ClaimType::Liability, 75_000.0, true, RiskFactor::High), 2);
    }
}
