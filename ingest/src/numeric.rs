use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]").expect("valid regex");
}

/// Parse a number out of a messy catalog value such as `"2,309"`, `"30%"`,
/// `"1 299,99"` or `"€19.90"`.
///
/// A single comma followed by at most two digits is a decimal separator;
/// any other comma is a thousands separator. Returns `None` when nothing
/// numeric is left.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let compact: String = raw.trim().chars().filter(|c| !c.is_whitespace() && *c != '%').collect();
    if compact.is_empty() {
        return None;
    }

    let separated = if compact.contains(',') && !compact.contains('.') {
        let mut parts = compact.split(',');
        let decimal_comma = compact.matches(',').count() == 1
            && parts.nth(1).is_some_and(|decimals| decimals.len() <= 2);
        if decimal_comma {
            compact.replace(',', ".")
        } else {
            compact.replace(',', "")
        }
    } else {
        compact
    };

    let cleaned = NON_NUMERIC.replace_all(&separated, "");
    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
