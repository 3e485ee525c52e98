/*!
This module provides text helpers used when turning data into labels.
*/

use std::borrow::Cow;

/// The suffix appended to a label that was cut short.
pub const ELLIPSIS: &str = "...";

/**
Truncate `label` to at most `width` characters, appending [`ELLIPSIS`](constant.ELLIPSIS.html) when anything was removed. Widths count characters, so Hangul labels are cut at the same visual position as latin ones.

| label                       | width | result                  |
|-----------------------------|-------|-------------------------|
| Seoul                       | 15    | Seoul                   |
| Gyeonggi-do Seongnam-si     | 15    | Gyeonggi-do Seo...      |
*/
pub fn truncate_label(label: &str, width: usize) -> Cow<'_, str> {
	match label.char_indices().nth(width) {
		None => Cow::Borrowed(label),
		Some((byte_index, _)) => {
			let mut truncated = String::with_capacity(byte_index + ELLIPSIS.len());
			truncated.push_str(&label[..byte_index]);
			truncated.push_str(ELLIPSIS);
			Cow::Owned(truncated)
		}
	}
}

#[test]
fn test_truncate_label() {
	assert_eq!(truncate_label("Seoul", 15), "Seoul");
	assert_eq!(truncate_label("exactly fifteen", 15), "exactly fifteen");
	assert_eq!(
		truncate_label("Gyeonggi-do Seongnam-si", 15),
		"Gyeonggi-do Seo..."
	);
	assert_eq!(truncate_label("서울특별시 동대문구 청량리동", 5), "서울특별시...");
	assert_eq!(truncate_label("", 3), "");
}
