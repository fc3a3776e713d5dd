//! Various types associated with packages.

use std::collections::HashMap;
use serde::*;

mod version;
pub use version::Version;

mod version_interval;
pub use version_interval::VersionInterval;

/// A unique identifier for a single release of a package.
///
/// Mainly used as an index into [`crate::ModDb`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
	/// Lowercase name unique within a repository.
	pub identifier: String,
	pub version: Version,
}

impl std::cmp::Ord for PackageIdentifier {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.identifier.cmp(&other.identifier) {
			core::cmp::Ordering::Equal => {},
			ord => return ord,
		}
		self.version.cmp(&other.version)
	}
}

impl std::cmp::PartialOrd for PackageIdentifier {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for PackageIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}", self.identifier, self.version)
	}
}

impl AsRef<PackageIdentifier> for PackageIdentifier {
	fn as_ref(&self) -> &PackageIdentifier {
		self
	}
}

/// A single release of a package known to the repository.
///
/// Only the fields the resolver reasons about live here. Presentation
/// metadata such as display names or download locations belongs to the
/// layers around the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
	pub identifier: PackageIdentifier,
	/// Game versions this release runs on.
	pub game_version: VersionInterval,
	/// Identifier to interval, every entry must hold for this release to work.
	pub depends: HashMap<String, VersionInterval>,
	/// Identifier to interval, matching releases can not be installed alongside this one.
	pub conflicts: HashMap<String, VersionInterval>,
}

impl std::hash::Hash for Package {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.identifier.hash(state);
	}
}

impl std::cmp::Ord for Package {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.identifier.cmp(&other.identifier)
	}
}

impl std::cmp::PartialOrd for Package {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::cmp::PartialEq for Package {
	fn eq(&self, other: &Self) -> bool {
		self.identifier == other.identifier
	}
}

impl std::cmp::Eq for Package {}

impl AsRef<PackageIdentifier> for Package {
	fn as_ref(&self) -> &PackageIdentifier {
		&self.identifier
	}
}

impl Package {
	/// Checks if the given releases conflict with each other.
	pub fn do_packages_conflict(lhs: &Self, rhs: &Self) -> bool {
		fn declares_conflict(package: &Package, other: &Package) -> bool {
			package.conflicts.get(&other.identifier.identifier)
				.map(|interval| interval.contains(&other.identifier.version))
				.unwrap_or(false)
		}
		declares_conflict(lhs, rhs) || declares_conflict(rhs, lhs)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn release(identifier: &str, version: &str) -> Package {
		Package {
			identifier: PackageIdentifier {
				identifier: identifier.to_string(),
				version: Version::parse(version).unwrap(),
			},
			game_version: VersionInterval::any(),
			depends: HashMap::new(),
			conflicts: HashMap::new(),
		}
	}

	#[test]
	fn packages_conflict_in_either_direction() {
		let mut aggressor = release("aggressor", "1.0");
		aggressor.conflicts.insert("victim".to_string(), VersionInterval::parse("[1.0,2.0)").unwrap());
		let victim = release("victim", "1.5");
		let bystander = release("victim", "2.0");

		assert!(Package::do_packages_conflict(&aggressor, &victim));
		assert!(Package::do_packages_conflict(&victim, &aggressor));
		assert!(!Package::do_packages_conflict(&aggressor, &bystander));
	}

	#[test]
	fn package_identity_ignores_relationships() {
		let mut a = release("same", "1.0");
		a.depends.insert("other".to_string(), VersionInterval::any());
		let b = release("same", "1.0");
		assert!(a == b);
		assert!(release("same", "1.0") < release("same", "1.1"));
	}
}
