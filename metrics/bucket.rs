use super::StreamingMetric;
use fnv::FnvHashMap;
use num_traits::ToPrimitive;

/// A `Bucket` accumulates the values of one aggregation group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bucket {
	pub sum: f64,
	pub count: u64,
	/// The values in the order they were added.
	pub values: Vec<f64>,
}

impl Bucket {
	/// The mean of the values, or `None` if the bucket is empty.
	pub fn mean(&self) -> Option<f64> {
		if self.count == 0 {
			None
		} else {
			Some(self.sum / self.count.to_f64()?)
		}
	}
}

impl StreamingMetric<'_> for Bucket {
	type Input = f64;
	type Output = Option<f64>;

	fn update(&mut self, input: f64) {
		self.sum += input;
		self.count += 1;
		self.values.push(input);
	}

	fn merge(&mut self, other: Self) {
		self.sum += other.sum;
		self.count += other.count;
		self.values.extend(other.values);
	}

	fn finalize(self) -> Option<f64> {
		self.mean()
	}
}

/// `Buckets` maps group keys to [`Bucket`](struct.Bucket.html)s and iterates in the order keys were first seen.
#[derive(Clone, Debug, Default)]
pub struct Buckets {
	entries: Vec<(String, Bucket)>,
	positions: FnvHashMap<String, usize>,
}

impl Buckets {
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the bucket for `key`, creating an empty one at the end if it does not exist.
	pub fn entry(&mut self, key: &str) -> &mut Bucket {
		let position = match self.positions.get(key).copied() {
			Some(position) => position,
			None => {
				self.entries.push((key.to_owned(), Bucket::default()));
				self.positions.insert(key.to_owned(), self.entries.len() - 1);
				self.entries.len() - 1
			}
		};
		&mut self.entries[position].1
	}

	pub fn get(&self, key: &str) -> Option<&Bucket> {
		self.positions
			.get(key)
			.map(|position| &self.entries[*position].1)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Bucket)> {
		self.entries
			.iter()
			.map(|(key, bucket)| (key.as_str(), bucket))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The number of values across all buckets.
	pub fn total_count(&self) -> u64 {
		self.entries.iter().map(|(_, bucket)| bucket.count).sum()
	}
}

#[test]
fn test_bucket() {
	let mut bucket = Bucket::default();
	assert_eq!(bucket.mean(), None);
	bucket.update(10.0);
	bucket.update(30.0);
	assert_eq!(bucket.sum, 40.0);
	assert_eq!(bucket.count, 2);
	assert_eq!(bucket.values, vec![10.0, 30.0]);
	assert_eq!(bucket.finalize(), Some(20.0));
}

#[test]
fn test_buckets_insertion_order() {
	let mut buckets = Buckets::new();
	buckets.entry("Seoul").update(10.0);
	buckets.entry("Busan").update(20.0);
	buckets.entry("Seoul").update(30.0);
	let keys: Vec<&str> = buckets.keys().collect();
	assert_eq!(keys, vec!["Seoul", "Busan"]);
	assert_eq!(buckets.total_count(), 3);
	assert_eq!(buckets.get("Seoul").map(|bucket| bucket.count), Some(2));
}

#[test]
fn test_bucket_merge() {
	let mut buckets = Buckets::new();
	buckets.entry("Seoul").update(10.0);
	let mut other = Bucket::default();
	other.update(2.0);
	other.update(6.0);
	buckets.entry("Seoul").merge(other);
	let seoul = buckets.get("Seoul").unwrap();
	assert_eq!(seoul.sum, 18.0);
	assert_eq!(seoul.count, 3);
	assert_eq!(seoul.values, vec![10.0, 2.0, 6.0]);
	assert_eq!(seoul.mean(), Some(6.0));
}
