//! Rules that shrink variable domains during propagation.

use crate::moddb::package::Version;
use crate::moddb::package::VersionInterval;

use super::solver::Solver;

/// A propagation rule watching one or two variables.
///
/// [`Self::revise`] runs whenever a watched variable's domain shrank. A rule
/// must only mutate domains it reasons about and must mark every variable it
/// mutates dirty, the fixpoint in [`Solver::propagate`] is unsound otherwise.
#[derive(Debug, Clone)]
pub enum Constraint {
	/// `owner` at `owner_version` needs `dependency` to land inside `required`.
	///
	/// The unselected sentinel never satisfies a dependency, a mod that needs
	/// another mod needs it actually installed.
	Dependency {
		owner: String,
		owner_version: Version,
		dependency: String,
		required: VersionInterval,
	},
	/// `instigator` at `instigator_version` can not coexist with `target`
	/// inside `conflicting`.
	Conflict {
		instigator: String,
		instigator_version: Version,
		target: String,
		conflicting: VersionInterval,
	},
}

impl Constraint {
	pub fn watched_variables(&self) -> Vec<&str> {
		match self {
			Constraint::Dependency { dependency, .. } => vec![dependency.as_str()],
			Constraint::Conflict { instigator, target, .. } => vec![instigator.as_str(), target.as_str()],
		}
	}

	pub fn revise(&self, solver: &mut Solver) {
		match self {
			Constraint::Dependency { owner, owner_version, dependency, required } => {
				revise_dependency(solver, owner, owner_version, dependency, required)
			},
			Constraint::Conflict { instigator, instigator_version, target, conflicting } => {
				revise_conflict(solver, instigator, instigator_version, target, conflicting)
			},
		}
	}
}

fn revise_dependency(solver: &mut Solver, owner: &str, owner_version: &Version, dependency: &str, required: &VersionInterval) {
	/* The rule is conditional, once the owner version is off the table there is nothing to enforce. */
	if !solver.domain(owner).contains(&Some(*owner_version)) {
		return;
	}

	let satisfiable = solver.domain(dependency).active()
		.any(|candidate| matches!(candidate, Some(v) if required.contains(v)));

	if !satisfiable {
		log::trace!("{} {} has no usable {} candidate left", owner, owner_version, dependency);
		if solver.domain_mut(owner).deactivate(&Some(*owner_version)) {
			solver.mark_dirty(owner);
		}
	}
}

fn revise_conflict(solver: &mut Solver, instigator: &str, instigator_version: &Version, target: &str, conflicting: &VersionInterval) {
	/* An empty domain means the propagation already failed, nothing left to reason about. */
	if solver.domain(instigator).is_empty() || solver.domain(target).is_empty() {
		return;
	}

	/* Once the instigator is pinned to the conflicting release the matching target releases are off limits. */
	let pinned = {
		let domain = solver.domain(instigator);
		domain.size() == 1 && domain.get(0) == Some(&Some(*instigator_version))
	};
	if pinned {
		let doomed: Vec<_> = solver.domain(target).active()
			.filter(|candidate| matches!(candidate, Some(v) if conflicting.contains(v)))
			.cloned()
			.collect();
		let mut changed = false;
		for candidate in doomed {
			changed |= solver.domain_mut(target).deactivate(&candidate);
		}
		if changed {
			log::trace!("{} {} forced conflicting {} releases out", instigator, instigator_version, target);
			solver.mark_dirty(target);
		}
	}

	/* When the target can not avoid the conflict the instigator release is infeasible instead. */
	let target_domain = solver.domain(target);
	if !target_domain.is_empty() {
		let unavoidable = target_domain.active()
			.all(|candidate| matches!(candidate, Some(v) if conflicting.contains(v)));
		if unavoidable && solver.domain_mut(instigator).deactivate(&Some(*instigator_version)) {
			solver.mark_dirty(instigator);
		}
	}
}
