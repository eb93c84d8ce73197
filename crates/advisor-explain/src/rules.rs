//! # Rule Signals
//!
//! Human-readable annotations derived only from the raw claim fields and the
//! Policy Boundary Table. They describe which frozen boundaries a claim
//! falls under; they never feed back into the classifier's numbers.
//!
//! Signals come in a fixed order: damage tier, injury, risk factor, claim
//! type. `✓` marks a benign signal, `⚠` (repeated by severity) a concern.

use advisor_core::{Claim, ClaimType, DamageTier, PolicyBoundaryTable, RiskFactor};

use crate::format::{format_currency, format_multiplier, format_whole_currency};

/// Rule signals for `claim` under `table`.
pub fn rule_signals(claim: &Claim, table: &PolicyBoundaryTable) -> Vec<String> {
    vec![
        damage_signal(claim.damage_amount(), table),
        injury_signal(claim.injury_involved(), table),
        risk_signal(claim.risk_factor(), table),
        claim_type_signal(claim.claim_type()),
    ]
}

fn damage_signal(amount: f64, table: &PolicyBoundaryTable) -> String {
    let t = &table.damage_thresholds;
    let shown = format_currency(amount);
    match table.damage_tier(amount) {
        DamageTier::Low => format!("✓ Low damage (<{}): {shown}", format_whole_currency(t.low)),
        DamageTier::Medium => format!(
            "⚠ Medium damage ({}-{}): {shown}",
            format_whole_currency(t.low),
            format_whole_currency(t.medium)
        ),
        DamageTier::High => format!(
            "⚠⚠ High damage ({}-{}): {shown}",
            format_whole_currency(t.medium),
            format_whole_currency(t.high)
        ),
        DamageTier::VeryHigh => format!(
            "⚠⚠⚠ Very high damage (≥{}): {shown}",
            format_whole_currency(t.high)
        ),
    }
}

fn injury_signal(injury_involved: bool, table: &PolicyBoundaryTable) -> String {
    if injury_involved {
        format!(
            "⚠ Injury involved (multiplier: {}x)",
            format_multiplier(table.injury_multiplier)
        )
    } else {
        "✓ No injury involved".to_string()
    }
}

fn risk_signal(risk: RiskFactor, table: &PolicyBoundaryTable) -> String {
    let weight = format_multiplier(table.risk_weight(risk));
    match risk {
        RiskFactor::High => format!("⚠⚠ High risk factor (weight: {weight}x)"),
        RiskFactor::Medium => format!("⚠ Medium risk factor (weight: {weight}x)"),
        RiskFactor::Low => format!("✓ Low risk factor (weight: {weight}x)"),
    }
}

fn claim_type_signal(claim_type: ClaimType) -> String {
    match claim_type {
        ClaimType::Liability => "⚠ Liability claim (additional multiplier applied)".to_string(),
        other => format!("Claim type: {other}"),
    }
}
