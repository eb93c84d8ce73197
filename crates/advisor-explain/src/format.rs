//! Text formatting for rule signals and input echoes.

/// `$1,234.50` style currency with two decimals and thousands separators.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `$5,000` style whole-currency amount.
pub fn format_whole_currency(amount: u64) -> String {
    format!("${}", group_thousands(&amount.to_string()))
}

/// Multiplier with at least one decimal: `1.0`, `1.5`, `1.8`.
pub fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Stripping the symbol and separators gives back the plain amount.
        #[test]
        fn currency_grouping_is_lossless(amount in 0.0f64..1e12) {
            let shown = format_currency(amount);
            let plain: String = shown.chars().filter(|c| *c != ',' && *c != '$').collect();
            prop_assert_eq!(plain, format!("{amount:.2}"));
        }
    }
}
