/// The visual encoding of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
	Bar,
	Line,
	Pie,
}

const LINE_KEYWORDS: &[&str] = &[
	"trend", "change", "time", "daily", "weekly", "monthly", "yearly", "growth", "추이", "추세",
	"변화", "시간", "기간", "월별", "연도별", "일별",
];

const PIE_KEYWORDS: &[&str] = &[
	"ratio",
	"share",
	"distribution",
	"proportion",
	"percent",
	"breakdown",
	"비율",
	"비중",
	"분포",
	"구성",
	"점유",
];

const BAR_KEYWORDS: &[&str] = &[
	"compar", "rank", "top", "versus", "vs", "비교", "순위", "랭킹", "상위",
];

impl ChartKind {
	/**
	Choose a chart kind from the words in a query. Time related words select a line chart, share and distribution words select a pie chart, and everything else, including comparison and ranking words, selects a bar chart. Keywords are matched as lowercase substrings.

	| query                           | kind |
	|---------------------------------|------|
	| monthly sales trend             | Line |
	| 지역별 비율                       | Pie  |
	| top regions by amount           | Bar  |
	| amount                          | Bar  |
	*/
	pub fn infer(query: &str) -> Self {
		Self::from_keywords(query).unwrap_or(ChartKind::Bar)
	}

	/// Like [`infer`](#method.infer), but returns `None` when no keyword matched.
	pub fn from_keywords(query: &str) -> Option<Self> {
		let query = query.to_lowercase();
		let contains_any = |keywords: &[&str]| keywords.iter().any(|keyword| query.contains(keyword));
		if contains_any(LINE_KEYWORDS) {
			Some(ChartKind::Line)
		} else if contains_any(PIE_KEYWORDS) {
			Some(ChartKind::Pie)
		} else if contains_any(BAR_KEYWORDS) {
			Some(ChartKind::Bar)
		} else {
			None
		}
	}
}

impl std::str::FromStr for ChartKind {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"bar" => Ok(ChartKind::Bar),
			"line" => Ok(ChartKind::Line),
			"pie" => Ok(ChartKind::Pie),
			_ => Err(format!("unknown chart kind {:?}, expected bar, line or pie", s)),
		}
	}
}

impl std::fmt::Display for ChartKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ChartKind::Bar => "bar",
			ChartKind::Line => "line",
			ChartKind::Pie => "pie",
		};
		write!(f, "{}", s)
	}
}

#[test]
fn test_infer() {
	assert_eq!(ChartKind::infer("Monthly sales trend"), ChartKind::Line);
	assert_eq!(ChartKind::infer("연도별 매출 변화"), ChartKind::Line);
	assert_eq!(ChartKind::infer("share of spending by region"), ChartKind::Pie);
	assert_eq!(ChartKind::infer("지역별 비율"), ChartKind::Pie);
	assert_eq!(ChartKind::infer("compare regions"), ChartKind::Bar);
	assert_eq!(ChartKind::infer("amount"), ChartKind::Bar);
	assert_eq!(ChartKind::infer(""), ChartKind::Bar);
	// Time words win over share words.
	assert_eq!(ChartKind::infer("distribution over time"), ChartKind::Line);
}

#[test]
fn test_from_keywords() {
	assert_eq!(ChartKind::from_keywords("compare regions"), Some(ChartKind::Bar));
	assert_eq!(ChartKind::from_keywords("amount"), None);
}

#[test]
fn test_from_str() {
	assert_eq!("Pie".parse::<ChartKind>(), Ok(ChartKind::Pie));
	assert!("donut".parse::<ChartKind>().is_err());
}
