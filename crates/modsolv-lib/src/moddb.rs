//! # The mod database
//!
//! An in memory view of every package release a repository knows about,
//! indexed by identifier. Built from a JSON index and cached to disk as
//! bincode so later runs skip the import.

use std::collections::{HashMap, HashSet};

use serde::{Serialize, Deserialize};

pub mod package;
mod import;
pub mod iterator;

use package::Package;
use package::Version;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModDb {
	packages: HashMap<String, HashSet<Package>>,
}

impl ModDb {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn has(&self, identifier: &str) -> bool {
		self.packages.contains_key(identifier)
	}

	/// Every known release of `identifier`.
	pub fn versions(&self, identifier: &str) -> Option<&HashSet<Package>> {
		self.packages.get(identifier)
	}

	pub fn get(&self, identifier: &str, version: &Version) -> Option<&Package> {
		self.versions(identifier)?.iter().find(|p| p.identifier.version == *version)
	}

	pub fn add_package(&mut self, package: Package) {
		self.packages.entry(package.identifier.identifier.clone()).or_default().insert(package);
	}

	pub fn package_count(&self) -> usize {
		self.packages.values().map(|releases| releases.len()).sum()
	}

	pub fn packages(&self) -> impl Iterator<Item = &Package> {
		self.packages.values().flatten()
	}

	/// Creates a new ModDb from a JSON index, an array of package objects.
	///
	/// Entries that fail to parse are skipped rather than failing the whole
	/// import, a repository with one broken entry is still usable.
	pub fn generate_from_index(index: &serde_json::Value) -> crate::Result<Self> {
		let entries = index.as_array()
			.ok_or_else(|| crate::Error::Parse("package index must be an array".to_string()))?;

		let mut db = Self::new();
		for (i, entry) in entries.iter().enumerate() {
			match Package::read_from_json(entry) {
				Ok(package) => db.add_package(package),
				Err(e) => log::warn!("Couldn't process entry {} in package index: {}", i, e),
			}
		}
		log::debug!("imported {} releases from index", db.package_count());
		Ok(db)
	}

	/// Reads a JSON index from disk, see [`Self::generate_from_index`].
	pub fn generate_from_index_file(path: &std::path::Path) -> crate::Result<Self> {
		let data = std::fs::read(path)?;
		Self::generate_from_index(&serde_json::from_slice(&data)?)
	}

	pub fn load_from_cache(path: &std::path::Path) -> crate::Result<Self> {
		let data = std::fs::read(path)?;
		Ok(bincode::deserialize(&data)?)
	}

	pub fn save_to_cache(&self, path: &std::path::Path) -> crate::Result<()> {
		std::fs::write(path, bincode::serialize(self)?)?;
		Ok(())
	}
}
