/*!
Numbers in uploaded data frequently arrive as decorated text such as `"1,234원"` or `"$50"`. This module parses them the way the dashboard always has: every character except ASCII digits, `.` and `-` is removed and the longest numeric prefix of what remains is read.
*/

/// Parse a number out of decorated text. Returns `None` if nothing numeric remains or the result is not finite.
pub fn parse_loose_number(text: &str) -> Option<f64> {
	let stripped: String = text
		.chars()
		.filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
		.collect();
	if stripped.is_empty() {
		return None;
	}
	match lexical::parse_partial::<f64, _>(stripped.as_bytes()) {
		Ok((value, n_bytes)) if n_bytes > 0 && value.is_finite() => Some(value),
		_ => None,
	}
}

/// Round half up, so `-2.5` rounds to `-2` and `2.5` rounds to `3`.
pub fn round_half_up(value: f64) -> f64 {
	(value + 0.5).floor()
}

/// Format a number the way it is shown as a label or group key. Integral values have no fractional part.
pub fn format_number(value: f64) -> String {
	if value == 0.0 {
		// Avoid printing "-0".
		return "0".to_owned();
	}
	value.to_string()
}

#[test]
fn test_parse_loose_number() {
	assert_eq!(parse_loose_number("1,234원"), Some(1234.0));
	assert_eq!(parse_loose_number("$50"), Some(50.0));
	assert_eq!(parse_loose_number("-12.5%"), Some(-12.5));
	assert_eq!(parse_loose_number("30대"), Some(30.0));
	assert_eq!(parse_loose_number("1-2"), Some(1.0));
	assert_eq!(parse_loose_number("Seoul"), None);
	assert_eq!(parse_loose_number("-"), None);
	assert_eq!(parse_loose_number(""), None);
}

#[test]
fn test_round_half_up() {
	assert_eq!(round_half_up(20.0), 20.0);
	assert_eq!(round_half_up(66.666), 67.0);
	assert_eq!(round_half_up(33.333), 33.0);
	assert_eq!(round_half_up(2.5), 3.0);
	assert_eq!(round_half_up(-2.5), -2.0);
}

#[test]
fn test_format_number() {
	assert_eq!(format_number(30.0), "30");
	assert_eq!(format_number(1.5), "1.5");
	assert_eq!(format_number(-0.0), "0");
}
