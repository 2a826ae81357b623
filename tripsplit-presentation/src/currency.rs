use rust_decimal::RoundingStrategy;
use tripsplit_domain::Money;

/// How amounts are written: a prefix symbol and a fixed number of decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub scale: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            scale: 2,
        }
    }
}

impl CurrencyFormat {
    pub fn with_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Uses `symbol` when given, else the group's currency code followed by a space.
    pub fn resolve(symbol: Option<&str>, currency_code: Option<&str>) -> Self {
        match (symbol, currency_code) {
            (Some(symbol), _) => Self::with_symbol(symbol),
            (None, Some(code)) if !code.trim().is_empty() => {
                Self::with_symbol(format!("{} ", code.trim()))
            }
            _ => Self::default(),
        }
    }

    /// Unsigned-positive amount, e.g. `€12.50` or `-€3.00`.
    pub fn amount(&self, money: Money) -> String {
        self.write(money, "")
    }

    /// Balance with an explicit `+` on positive values; zero stays unsigned.
    pub fn balance(&self, money: Money) -> String {
        self.write(money, "+")
    }

    fn write(&self, money: Money, positive_sign: &str) -> String {
        let rounded = money
            .as_decimal()
            .round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else if rounded.is_zero() {
            ""
        } else {
            positive_sign
        };
        let digits = format!("{:.*}", self.scale as usize, rounded.abs());
        format!("{sign}{}{digits}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn money(value: &str) -> Money {
        value.parse().expect("valid decimal")
    }

    #[rstest]
    #[case::positive("60", "+€60.00")]
    #[case::negative("-12.5", "-€12.50")]
    #[case::zero("0", "€0.00")]
    #[case::rounds_half_away("0.005", "+€0.01")]
    #[case::negative_rounding_to_zero("-0.004", "€0.00")]
    fn balance_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(CurrencyFormat::with_symbol("€").balance(money(input)), expected);
    }

    #[test]
    fn amount_has_no_plus_sign() {
        assert_eq!(CurrencyFormat::default().amount(money("7.1")), "7.10");
    }

    #[rstest]
    #[case::explicit_symbol(Some("$"), Some("USD"), "$")]
    #[case::currency_code(None, Some("EUR"), "EUR ")]
    #[case::blank_code(None, Some("  "), "")]
    #[case::nothing(None, None, "")]
    fn resolve_cases(
        #[case] symbol: Option<&str>,
        #[case] code: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(CurrencyFormat::resolve(symbol, code).symbol, expected);
    }

    #[test]
    fn scale_controls_decimals() {
        let format = CurrencyFormat {
            symbol: "¥".to_owned(),
            scale: 0,
        };
        assert_eq!(format.amount(money("1234.5")), "¥1235");
    }
}
