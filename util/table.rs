/*!
A plain text table used by the cli to print pages of records.
*/

pub struct Table<'a> {
	pub padding: usize,
	pub header: &'a [String],
	pub rows: &'a [Vec<String>],
}

impl<'a> std::fmt::Display for Table<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let n_columns = self.header.len();
		let mut column_widths: Vec<_> = vec![0; n_columns];
		// update column widths with header
		column_widths
			.iter_mut()
			.zip(self.header)
			.for_each(|(column_width, header)| *column_width = width(header));
		// update column widths with values
		for row in self.rows {
			for (column_width, value) in column_widths.iter_mut().zip(row) {
				*column_width = usize::max(*column_width, width(value));
			}
		}
		let line = Line {
			column_widths: &column_widths,
			padding: self.padding,
		};
		let row = Row {
			column_widths: &column_widths,
			padding: self.padding,
			values: self.header,
		};
		writeln!(f, "{}", row)?;
		writeln!(f, "{}", line)?;
		for values in self.rows {
			let row = Row {
				column_widths: &column_widths,
				padding: self.padding,
				values,
			};
			writeln!(f, "{}", row)?;
		}
		Ok(())
	}
}

fn width(value: &str) -> usize {
	value.chars().count()
}

struct Line<'a> {
	column_widths: &'a [usize],
	padding: usize,
}

impl<'a> std::fmt::Display for Line<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for column_width in self.column_widths.iter() {
			for _ in 0..column_width + 2 * self.padding {
				write!(f, "-")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

struct Row<'a> {
	column_widths: &'a [usize],
	padding: usize,
	values: &'a [String],
}

impl<'a> std::fmt::Display for Row<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for (index, column_width) in self.column_widths.iter().enumerate() {
			// Rows with fewer values than the header get blank cells.
			let value = self.values.get(index).map(|v| v.as_str()).unwrap_or("");
			for _ in 0..self.padding {
				write!(f, " ")?;
			}
			write!(f, "{}", value)?;
			for _ in 0..column_width + self.padding - width(value) {
				write!(f, " ")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

#[test]
fn test_table() {
	let header = vec!["region".to_owned(), "amount".to_owned()];
	let rows = vec![
		vec!["Seoul".to_owned(), "10".to_owned()],
		vec!["Busan".to_owned()],
	];
	let table = Table {
		padding: 1,
		header: &header,
		rows: &rows,
	};
	let expected = "| region | amount |\n|--------|--------|\n| Seoul  | 10     |\n| Busan  |        |\n";
	assert_eq!(table.to_string(), expected);
}
