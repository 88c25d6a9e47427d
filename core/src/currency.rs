//! Brazilian real formatting: `R$ 1.234,56`.

pub fn format_brl(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_brl(1_500_000.0), "R$ 1.500.000,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn small_and_negative_amounts() {
        assert_eq!(format_brl(0.25), "R$ 0,25");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
    }
}
