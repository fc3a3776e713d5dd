//! Expands the solver's variable and constraint graph from a [`ModDb`].

use std::collections::VecDeque;

use crate::moddb::ModDb;
use crate::moddb::package::Package;
use crate::moddb::package::Version;
use crate::moddb::package::VersionInterval;

use super::constraint::Constraint;
use super::domain::Domain;
use super::solver::Solver;
use super::solver::VersionDomain;
use super::InstallRequirement;

/// Variable id reserved for the version of the game itself.
///
/// Package identifiers are lowercase alphanumerics so the leading `@` can not
/// collide with one.
pub const GAME_VERSION_VARIABLE: &str = "@game";

/// A lazily grown constraint graph over a mod database.
///
/// Only identifiers reachable from a requested package ever get a variable.
/// The game version is a variable like any other, pinned at construction,
/// and every release constrains it through its `game_version` interval.
///
/// Expansion mutates shared graph state and goes through `&mut self`, one
/// graph serves one resolution attempt at a time.
#[derive(Debug)]
pub struct ResolutionGraph<'db> {
	db: &'db ModDb,
	solver: Solver,
}

impl<'db> ResolutionGraph<'db> {
	pub fn new(db: &'db ModDb, game_version: Version) -> Self {
		let mut solver = Solver::new();
		/* No sentinel here, the game is always "installed". */
		solver.add_variable(GAME_VERSION_VARIABLE, Domain::new(vec![Some(game_version)]));
		Self { db, solver }
	}

	/// Gives `identifier` a variable, expanding through its dependency closure.
	///
	/// Idempotent. Identifiers the database has never heard of still get a
	/// variable holding only the unselected sentinel, anything depending on
	/// them then loses those releases during propagation.
	pub fn ensure_variable(&mut self, identifier: &str) {
		let mut pending = Vec::<Constraint>::new();
		let mut queue = VecDeque::<String>::new();
		queue.push_back(identifier.to_string());

		while let Some(id) = queue.pop_front() {
			if self.solver.has_variable(&id) {
				continue;
			}

			let mut releases: Vec<&Package> = self.db.versions(&id)
				.map(|set| set.iter().collect())
				.unwrap_or_default();
			/* Newest first, the search tries the latest release before older ones. */
			releases.sort_by(|a, b| b.identifier.version.cmp(&a.identifier.version));

			let mut candidates: Vec<Option<Version>> = releases.iter()
				.map(|package| Some(package.identifier.version))
				.collect();
			candidates.push(None);
			self.solver.add_variable(&id, Domain::new(candidates));
			log::trace!("added variable {} with {} releases", id, releases.len());

			for package in releases {
				let version = package.identifier.version;
				for (dependency, required) in &package.depends {
					queue.push_back(dependency.clone());
					pending.push(Constraint::Dependency {
						owner: id.clone(),
						owner_version: version,
						dependency: dependency.clone(),
						required: required.clone(),
					});
				}
				for (target, conflicting) in &package.conflicts {
					queue.push_back(target.clone());
					pending.push(Constraint::Conflict {
						instigator: id.clone(),
						instigator_version: version,
						target: target.clone(),
						conflicting: conflicting.clone(),
					});
				}
				pending.push(Constraint::Dependency {
					owner: id.clone(),
					owner_version: version,
					dependency: GAME_VERSION_VARIABLE.to_string(),
					required: package.game_version.clone(),
				});
			}
		}

		/* Only once the whole closure has variables, a constraint needs both of
		 * its ends registered. */
		for constraint in pending {
			self.solver.add_constraint(constraint);
		}
	}

	/// Deactivates every candidate of `identifier` outside `interval`.
	///
	/// The unselected sentinel never matches an interval, so an explicit
	/// request also removes the option of not installing the package.
	pub fn restrict(&mut self, identifier: &str, interval: &VersionInterval) {
		self.ensure_variable(identifier);
		let domain = self.solver.domain_mut(identifier);
		let doomed: Vec<_> = domain.active()
			.filter(|candidate| !matches!(candidate, Some(v) if interval.contains(v)))
			.cloned()
			.collect();
		let mut changed = false;
		for candidate in doomed {
			changed |= domain.deactivate(&candidate);
		}
		if changed {
			self.solver.mark_dirty(identifier);
		}
	}

	pub fn add_requirement(&mut self, requirement: &InstallRequirement) {
		self.restrict(&requirement.identifier, &requirement.required_version);
	}

	pub fn has_variable(&self, identifier: &str) -> bool {
		self.solver.has_variable(identifier)
	}

	/// Runs constraints to a fixpoint, see [`Solver::propagate`].
	pub fn propagate(&mut self) -> bool {
		self.solver.propagate()
	}

	/// Picks one release (or the sentinel) for everything, see [`Solver::resolve`].
	pub fn resolve(&mut self) -> bool {
		self.solver.resolve()
	}

	/// Read only view of the remaining candidates for `identifier`.
	pub fn domain_of(&self, identifier: &str) -> &VersionDomain {
		self.solver.domain(identifier)
	}

	/// The chosen release of every package variable pinned to a version.
	///
	/// `Err` when some variable still has more than one candidate, run
	/// [`Self::resolve`] first.
	pub fn selection(&self) -> crate::Result<Vec<&'db Package>> {
		let mut chosen = Vec::new();
		for (identifier, domain) in self.solver.variables() {
			if identifier == GAME_VERSION_VARIABLE {
				continue;
			}
			if domain.size() != 1 {
				return Err(crate::Error::Validation(
					format!("resolution is not complete, {} still has {} candidates", identifier, domain.size())
				));
			}
			if let Some(Some(version)) = domain.get(0) {
				let package = self.db.get(identifier, version)
					.expect("pinned versions always come from the database");
				chosen.push(package);
			}
		}
		Ok(chosen)
	}
}
