use serde::*;

/// A mod or game version of up to four dot separated numeric components.
///
/// Missing trailing components default to zero so `1.2` and `1.2.0` compare equal.
/// Ordering is lexicographic over the components.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
	major: u32,
	medium: u32,
	minor: u32,
	patch: u32,
}

impl Version {
	pub fn new(major: u32, medium: u32, minor: u32, patch: u32) -> Self {
		Self { major, medium, minor, patch }
	}

	/// Reads a version from the leading components of `text`.
	///
	/// Takes up to four dot separated numbers and ignores whatever follows them,
	/// so a build qualifier like `"1.2-release"` parses as `1.2`. Fails only when
	/// `text` does not start with a number.
	pub fn parse(text: &str) -> crate::Result<Self> {
		let mut components = [0u32; 4];
		let mut rest = text;

		for (i, component) in components.iter_mut().enumerate() {
			if i > 0 {
				/* A dot only continues the version when digits follow it. */
				match rest.strip_prefix('.') {
					Some(r) if r.starts_with(|c: char| c.is_ascii_digit()) => rest = r,
					_ => break,
				}
			}

			let digits = {
				let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
				&rest[..end]
			};
			if digits.is_empty() {
				return Err(crate::Error::Parse(format!("version must start with a number: {}", text)));
			}
			*component = digits.parse::<u32>()
				.map_err(|_| crate::Error::Parse(format!("version component too large: {}", digits)))?;
			rest = &rest[digits.len()..];
		}

		let [major, medium, minor, patch] = components;
		Ok(Self { major, medium, minor, patch })
	}

	pub(in crate::moddb) fn as_components(&self) -> [u32; 4] {
		[self.major, self.medium, self.minor, self.patch]
	}

	pub(in crate::moddb) fn from_components(components: [u32; 4]) -> Self {
		let [major, medium, minor, patch] = components;
		Self { major, medium, minor, patch }
	}
}

impl std::str::FromStr for Version {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.medium, self.minor)?;
		if self.patch != 0 {
			write!(f, ".{}", self.patch)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn version_compares_numerically_not_lexically() { assert!(Version::parse("1.2.4").unwrap() < Version::parse("1.2.10").unwrap()) }
	#[test] fn version_short_form_defaults_to_zero() { assert!(Version::parse("1.2").unwrap() == Version::parse("1.2.0.0").unwrap()) }
	#[test] fn version_higher_is_gt() { assert!(Version::parse("1.2.3").unwrap() < Version::parse("1.2.4").unwrap()) }
	#[test] fn version_patch_affects_order() { assert!(Version::parse("1.2.3").unwrap() < Version::parse("1.2.3.1").unwrap()) }
	#[test] fn version_trailing_text_is_ignored() { assert!(Version::parse("1.2.3-release2").unwrap() == Version::parse("1.2.3").unwrap()) }
	#[test] fn version_bare_dot_ends_the_version() { assert!(Version::parse("1.2.").unwrap() == Version::parse("1.2").unwrap()) }
	#[test] fn version_without_leading_number_is_rejected() { assert!(Version::parse("latest").is_err()) }
	#[test] fn version_empty_is_rejected() { assert!(Version::parse("").is_err()) }

	#[test]
	fn version_renders_patch_only_when_set() {
		assert_eq!(Version::parse("1.2").unwrap().to_string(), "1.2.0");
		assert_eq!(Version::parse("1.2.3.4").unwrap().to_string(), "1.2.3.4");
	}
}
