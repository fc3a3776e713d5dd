use serde::*;
use super::version::Version;

/// A range of versions with independently inclusive or exclusive bounds.
///
/// An absent bound leaves that side unbounded. Construction does not check
/// `minimum <= maximum`, an inverted interval simply contains nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInterval {
	minimum: Option<Version>,
	maximum: Option<Version>,
	include_min: bool,
	include_max: bool,
}

impl Default for VersionInterval {
	fn default() -> Self { Self::any() }
}

impl VersionInterval {
	/// The interval containing every version.
	pub fn any() -> Self {
		Self { minimum: None, maximum: None, include_min: true, include_max: false }
	}

	pub fn new(minimum: Option<Version>, maximum: Option<Version>, include_min: bool, include_max: bool) -> Self {
		Self { minimum, maximum, include_min, include_max }
	}

	/// The tightest interval matching a bare version request.
	///
	/// A request is only as precise as its last non zero component, so `1.0`
	/// admits any `1.0.x` and `1.2.3` admits any `1.2.3.x`. A request that only
	/// sets the major, like `1.0`, still scopes to the medium level rather than
	/// admitting every `1.x`.
	pub fn from_version(version: &Version) -> Self {
		let components = version.as_components();
		let mut upper = components;
		match components.iter().rposition(|c| *c != 0) {
			None => upper[0] = 1,
			Some(0) => upper[1] += 1,
			Some(3) => upper[3] += 1,
			Some(i) => upper[i] += 1,
		}
		Self {
			minimum: Some(*version),
			maximum: Some(Version::from_components(upper)),
			include_min: true,
			include_max: false,
		}
	}

	/// Reads an interval from text.
	///
	/// A string starting with a number is an exact request, see
	/// [`Self::from_version`]. Anything else must be a range: `[` or `(` for an
	/// inclusive or exclusive lower bound, an optional version, a comma, an
	/// optional version and `]` or `)` for the upper bound. An omitted version
	/// leaves that side unbounded.
	pub fn parse(text: &str) -> crate::Result<Self> {
		use crate::Error::Parse;

		if text.starts_with(|c: char| c.is_ascii_digit()) {
			return Ok(Self::from_version(&Version::parse(text)?));
		}

		let include_min = match text.chars().next() {
			Some('[') => true,
			Some('(') => false,
			_ => return Err(Parse(format!("interval must start with a version, '[' or '(': {}", text))),
		};
		let include_max = match text.chars().last() {
			Some(']') => true,
			Some(')') => false,
			_ => return Err(Parse(format!("interval must end with ']' or ')': {}", text))),
		};

		/* Both brackets are a single byte so the slice bounds are safe. */
		let inner = &text[1..text.len() - 1];
		let (low, high) = inner.split_once(',')
			.ok_or_else(|| Parse(format!("interval bounds must be separated by a comma: {}", text)))?;

		Ok(Self {
			minimum: if low.is_empty() { None } else { Some(Version::parse(low)?) },
			maximum: if high.is_empty() { None } else { Some(Version::parse(high)?) },
			include_min,
			include_max,
		})
	}

	pub fn contains(&self, version: &Version) -> bool {
		if let Some(minimum) = &self.minimum {
			match version.cmp(minimum) {
				std::cmp::Ordering::Less => return false,
				std::cmp::Ordering::Equal if !self.include_min => return false,
				_ => {},
			}
		}
		if let Some(maximum) = &self.maximum {
			match version.cmp(maximum) {
				std::cmp::Ordering::Greater => return false,
				std::cmp::Ordering::Equal if !self.include_max => return false,
				_ => {},
			}
		}
		true
	}

	/// Tightens this interval in place to its intersection with `other`.
	///
	/// The minimum becomes the larger of the two minimums and the maximum the
	/// smaller of the two maximums, on a tie the bound is only inclusive when
	/// both sides were. An absent bound loses to a present one.
	pub fn intersect(&mut self, other: &Self) {
		match (self.minimum, other.minimum) {
			(Some(ours), Some(theirs)) => match ours.cmp(&theirs) {
				std::cmp::Ordering::Less => {
					self.minimum = other.minimum;
					self.include_min = other.include_min;
				},
				std::cmp::Ordering::Equal => self.include_min &= other.include_min,
				std::cmp::Ordering::Greater => {},
			},
			(None, Some(_)) => {
				self.minimum = other.minimum;
				self.include_min = other.include_min;
			},
			_ => {},
		}

		match (self.maximum, other.maximum) {
			(Some(ours), Some(theirs)) => match ours.cmp(&theirs) {
				std::cmp::Ordering::Greater => {
					self.maximum = other.maximum;
					self.include_max = other.include_max;
				},
				std::cmp::Ordering::Equal => self.include_max &= other.include_max,
				std::cmp::Ordering::Less => {},
			},
			(None, Some(_)) => {
				self.maximum = other.maximum;
				self.include_max = other.include_max;
			},
			_ => {},
		}
	}
}

impl std::fmt::Display for VersionInterval {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", if self.include_min { '[' } else { '(' })?;
		if let Some(minimum) = &self.minimum {
			write!(f, "{}", minimum)?;
		}
		write!(f, ",")?;
		if let Some(maximum) = &self.maximum {
			write!(f, "{}", maximum)?;
		}
		write!(f, "{}", if self.include_max { ']' } else { ')' })
	}
}
