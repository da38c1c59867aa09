//! Common helpers shared by the calculations and the form session.
//!
//! Raw user text is coerced here rather than rejected: blank or malformed
//! numbers become zero so the derived values can always be shown.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Rewrites es-CO text into the plain form `Decimal` parses.
///
/// `,` is the decimal separator and `.` groups thousands, matching the
/// display format. A single `.` that does not group thousands is read as a
/// decimal point, so machine output like `7.5` still parses. Returns `None`
/// when the separators are malformed.
fn normalize_decimal_input(s: &str) -> Option<String> {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();
    let (sign, unsigned) = match compact.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", compact.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once(',') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    if frac_part.is_some_and(|frac| frac.contains([',', '.'])) {
        return None;
    }

    let int_digits = if !int_part.contains('.') {
        int_part.to_string()
    } else if is_grouped(int_part) {
        int_part.replace('.', "")
    } else if frac_part.is_none() && int_part.matches('.').count() == 1 {
        return Some(format!("{sign}{int_part}"));
    } else {
        return None;
    };

    Some(match frac_part {
        Some(frac) => format!("{sign}{int_digits}.{frac}"),
        None => format!("{sign}{int_digits}"),
    })
}

/// `1.234.567`: a lead group of one to three characters, then groups of three.
fn is_grouped(int_part: &str) -> bool {
    let mut groups = int_part.split('.');
    let lead_ok = groups
        .next()
        .is_some_and(|lead| (1..=3).contains(&lead.len()));
    lead_ok && groups.all(|group| group.len() == 3)
}

/// Coerces user text into a [`Decimal`].
///
/// Blank input is zero. Input that does not parse under the es-CO
/// convention (see [`parse_optional_decimal`]) is also zero and is logged at
/// `warn`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use smmlv_core::calculations::common::coerce_decimal;
///
/// assert_eq!(coerce_decimal("$ 2.500.000"), dec!(2500000));
/// assert_eq!(coerce_decimal("33,33"), dec!(33.33));
/// assert_eq!(coerce_decimal(""), dec!(0));
/// assert_eq!(coerce_decimal("abc"), dec!(0));
/// ```
pub fn coerce_decimal(s: &str) -> Decimal {
    parse_optional_decimal(s).unwrap_or(Decimal::ZERO)
}

/// Like [`coerce_decimal`] but keeps blank and malformed input as `None`.
///
/// Whitespace and `$` are ignored, `.` groups thousands and `,` separates
/// decimals (`4.875.000,00`). A lone non-grouping `.` is a decimal point.
pub fn parse_optional_decimal(s: &str) -> Option<Decimal> {
    if s.chars().all(|c| c.is_whitespace() || c == '$') {
        return None;
    }
    let parsed = normalize_decimal_input(s).and_then(|plain| plain.parse::<Decimal>().ok());
    if parsed.is_none() {
        warn!(input = %s, "unparseable number coerced to zero");
    }
    parsed
}

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`. Blank or invalid input is `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok());
    if parsed.is_none() {
        warn!(input = %s, "unparseable date ignored");
    }
    parsed
}

/// Unwraps the result of a checked `Decimal` operation, falling back to zero
/// on overflow or division by zero.
pub fn or_zero(
    value: Option<Decimal>,
    step: &'static str,
) -> Decimal {
    value.unwrap_or_else(|| {
        warn!(step, "decimal overflow, value coerced to zero");
        Decimal::ZERO
    })
}

/// Rounds to `dp` decimal places, half away from zero. Display only.
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn coerce_decimal_parses_plain_numbers() {
        assert_eq!(coerce_decimal("5000000"), dec!(5000000));
        assert_eq!(coerce_decimal("-12.5"), dec!(-12.5));
    }

    #[test]
    fn coerce_decimal_reads_dot_grouping_and_comma_decimals() {
        assert_eq!(coerce_decimal(" $1.234.567,89 "), dec!(1234567.89));
        assert_eq!(coerce_decimal("7.500.000"), dec!(7500000));
        assert_eq!(coerce_decimal("4.875.000,00"), dec!(4875000));
    }

    #[test]
    fn coerce_decimal_comma_is_decimal_separator() {
        assert_eq!(coerce_decimal("1,5"), dec!(1.5));
        assert_eq!(coerce_decimal("33,33"), dec!(33.33));
        assert_eq!(coerce_decimal("-0,25"), dec!(-0.25));
    }

    #[test]
    fn coerce_decimal_lone_dot_is_decimal_point() {
        assert_eq!(coerce_decimal("7.5"), dec!(7.5));
        assert_eq!(coerce_decimal("4875000.0000"), dec!(4875000));
    }

    #[test]
    fn coerce_decimal_blank_is_zero() {
        assert_eq!(coerce_decimal(""), Decimal::ZERO);
        assert_eq!(coerce_decimal("   "), Decimal::ZERO);
        assert_eq!(coerce_decimal("$"), Decimal::ZERO);
    }

    #[test]
    fn coerce_decimal_garbage_is_zero() {
        assert_eq!(coerce_decimal("12abc"), Decimal::ZERO);
        // Comma grouping is not the local convention and must not rescale.
        assert_eq!(coerce_decimal("7,500,000"), Decimal::ZERO);
        assert_eq!(coerce_decimal("1.23.456"), Decimal::ZERO);
        assert_eq!(coerce_decimal("1.5,25"), Decimal::ZERO);
    }

    #[test]
    fn parse_optional_decimal_keeps_blank_as_none() {
        assert_eq!(parse_optional_decimal(""), None);
        assert_eq!(parse_optional_decimal("x"), None);
        assert_eq!(parse_optional_decimal("50"), Some(dec!(50)));
    }

    #[test]
    fn parse_date_accepts_iso_and_day_first() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 31);

        assert_eq!(parse_date("2023-12-31"), expected);
        assert_eq!(parse_date("31/12/2023"), expected);
    }

    #[test]
    fn parse_date_rejects_invalid_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn or_zero_falls_back_on_none() {
        assert_eq!(or_zero(None, "test"), Decimal::ZERO);
        assert_eq!(or_zero(Some(dec!(3)), "test"), dec!(3));
    }

    #[test]
    fn round_half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(3.745), 2), dec!(3.75));
        assert_eq!(round_half_up(dec!(-3.745), 2), dec!(-3.75));
        assert_eq!(round_half_up(dec!(4875000.004), 2), dec!(4875000.00));
    }
}
