use super::Metric;

/// `Extent` computes the total, min and max of a slice of values, along with the position of the first maximum.
pub struct Extent;

#[derive(Clone, Debug, PartialEq)]
pub struct ExtentOutput {
	pub total: f64,
	pub min: f64,
	pub max: f64,
	/// The index of the first value equal to `max`.
	pub argmax: usize,
}

impl<'a> Metric<'a> for Extent {
	type Input = &'a [f64];
	type Output = Option<ExtentOutput>;

	fn compute(input: Self::Input) -> Self::Output {
		let (first, rest) = input.split_first()?;
		let mut output = ExtentOutput {
			total: *first,
			min: *first,
			max: *first,
			argmax: 0,
		};
		for (index, value) in rest.iter().enumerate() {
			output.total += value;
			if *value < output.min {
				output.min = *value;
			}
			if *value > output.max {
				output.max = *value;
				output.argmax = index + 1;
			}
		}
		Some(output)
	}
}

#[test]
fn test_extent() {
	assert_eq!(Extent::compute(&[]), None);
	let output = Extent::compute(&[20.0, 35.0, 10.0, 35.0]).unwrap();
	insta::assert_debug_snapshot!(output, @r###"
 ExtentOutput {
     total: 100.0,
     min: 10.0,
     max: 35.0,
     argmax: 1,
 }
 "###);
}
