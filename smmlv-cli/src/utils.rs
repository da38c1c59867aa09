//! Display helpers. Values are formatted the Colombian way: `.` groups
//! thousands and `,` separates decimals.

use rust_decimal::Decimal;
use smmlv_core::calculations::common::round_half_up;

/// Decimal places shown for wage-unit (SMMLV) quantities.
pub const WAGE_UNIT_DP: u32 = 4;

/// Groups the integer part in threes with `.` and uses `,` for decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use smmlv_cli::utils::format_grouped;
///
/// assert_eq!(format_grouped(dec!(4875000), 2), "4.875.000,00");
/// assert_eq!(format_grouped(dec!(-1234.5), 0), "-1.235");
/// ```
pub fn format_grouped(
    value: Decimal,
    dp: u32,
) -> String {
    let rounded = round_half_up(value, dp);
    let plain = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push(',');
        grouped.push_str(frac);
    }
    grouped
}

/// Money in pesos with two decimals, e.g. `$ 4.875.000,00`.
pub fn format_currency(value: Decimal) -> String {
    format!("$ {}", format_grouped(value, 2))
}

/// Wage units with four decimals, e.g. `7,5000`.
pub fn format_wage_units(value: Decimal) -> String {
    format_grouped(value, WAGE_UNIT_DP)
}

/// Latest-wage display: zero means the table had no data.
pub fn format_optional_wage(value: Option<Decimal>) -> String {
    value
        .filter(|v| !v.is_zero())
        .map(format_currency)
        .unwrap_or_else(|| "—".to_string())
}
