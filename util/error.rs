pub use anyhow::{Error, Result};

/// Create an [`Error`](type.Error.html) from a format string, like `format!`.
#[macro_export]
macro_rules! err {
	($($t:tt)*) => {
		$crate::error::Error::msg(format!($($t)*))
	};
}

#[test]
fn test_err() {
	let error = err!("unknown field {:?}", "amount");
	assert_eq!(error.to_string(), "unknown field \"amount\"");
}
