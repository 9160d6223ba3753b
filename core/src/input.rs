use anyhow::{anyhow, Result};

/// Parses a unit price typed by the user. Both `18.50` and `18,50` work.
pub fn parse_price(input: &str) -> Result<f64> {
    let normalized = input.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| anyhow!("Please enter a valid value greater than zero."))?;
    validate_price(value)?;
    Ok(value)
}

pub fn validate_price(value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(anyhow!("Please enter a valid value greater than zero."))
    }
}

/// e.g. `format_money(1234.5, "R$")` -> `R$ 1234,50`
pub fn format_money(value: f64, symbol: &str) -> String {
    format!("{} {}", symbol, format!("{:.2}", value).replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("18.50").unwrap(), 18.5);
        assert_eq!(parse_price(" 18,50 ").unwrap(), 18.5);
        assert_eq!(parse_price("20").unwrap(), 20.0);

        assert!(parse_price("0").is_err());
        assert!(parse_price("-3").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(15.0, "R$"), "R$ 15,00");
        assert_eq!(format_money(0.0, "R$"), "R$ 0,00");
        assert_eq!(format_money(38.456, "$"), "$ 38,46");
    }
}
