//! Functions and methods for reading package metadata from JSON

use std::collections::HashMap;

use super::package::*;

impl Package {
	pub fn read_from_json(v: &serde_json::Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let obj = v.as_object().ok_or_else(|| Parse("package entry must be an object".to_string()))?;

		let identifier = obj.get("identifier")
			.ok_or_else(|| Parse("package entry has no identifier field".to_string()))?
			.as_str().ok_or_else(|| Parse("identifier must be a string".to_string()))?
			.to_lowercase();
		if identifier.is_empty() {
			return Err(Parse("identifier must not be empty".to_string()));
		}

		let version = Version::parse(
			obj.get("version")
				.ok_or_else(|| Parse(format!("package {} has no version field", identifier)))?
				.as_str().ok_or_else(|| Parse(format!("version of {} must be a string", identifier)))?
		)?;

		let game_version = match obj.get("game_version") {
			Some(f) => VersionInterval::parse(
				f.as_str().ok_or_else(|| Parse(format!("game_version of {} must be a string", identifier)))?
			)?,
			None => VersionInterval::any(),
		};

		Ok(Package {
			depends: read_interval_map(obj, "depends", &identifier)?,
			conflicts: read_interval_map(obj, "conflicts", &identifier)?,
			identifier: PackageIdentifier { identifier, version },
			game_version,
		})
	}
}

/// Reads an optional `{ "name": "interval" }` object, names are lowercased.
fn read_interval_map(
	obj: &serde_json::Map<String, serde_json::Value>,
	key: &str,
	owner: &str,
) -> crate::Result<HashMap<String, VersionInterval>> {
	use crate::Error::Parse;

	let mut map = HashMap::new();
	if let Some(f) = obj.get(key) {
		let entries = f.as_object().ok_or_else(|| Parse(format!("{} of {} must be an object", key, owner)))?;
		for (name, interval) in entries {
			let text = interval.as_str()
				.ok_or_else(|| Parse(format!("{} entry {} of {} must be an interval string", key, name, owner)))?;
			map.insert(name.to_lowercase(), VersionInterval::parse(text)?);
		}
	}
	Ok(map)
}
