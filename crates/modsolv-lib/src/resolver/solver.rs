//! Generic propagation and search over reversible domains.

use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::moddb::package::Version;

use super::constraint::Constraint;
use super::domain::Domain;

/// Domain of a package variable.
///
/// `None` is the unselected sentinel, the variable resolving to "not installed".
pub type VersionDomain = Domain<Option<Version>>;

/// Constraint propagation engine with chronological backtracking search.
///
/// Holds one reversible domain per variable plus the constraints watching
/// them. Variables and constraints can keep being added between solving
/// calls. A solver belongs to a single resolution attempt and is never shared
/// or reused across independent ones.
#[derive(Debug, Default)]
pub struct Solver {
	variables: IndexMap<String, VersionDomain>,
	constraints: Vec<Constraint>,
	/// Which constraints to re-evaluate when a given variable's domain shrinks.
	watchers: HashMap<String, Vec<usize>>,
	/// FIFO of variables awaiting propagation, `queued` keeps it deduplicated.
	dirty: VecDeque<String>,
	queued: HashSet<String>,
}

impl Solver {
	pub fn new() -> Self {
		Default::default()
	}

	/// # Panics
	/// - If `identifier` already has a variable.
	pub fn add_variable(&mut self, identifier: &str, domain: VersionDomain) {
		let previous = self.variables.insert(identifier.to_string(), domain);
		assert!(previous.is_none(), "variable {} registered twice", identifier);
	}

	pub fn has_variable(&self, identifier: &str) -> bool {
		self.variables.contains_key(identifier)
	}

	/// Registers a constraint and queues everything it watches so it gets
	/// revised at least once before the next fixpoint claim.
	///
	/// # Panics
	/// - If the constraint watches an unregistered variable.
	pub fn add_constraint(&mut self, constraint: Constraint) {
		let watched: Vec<String> = constraint.watched_variables().into_iter().map(str::to_string).collect();
		let index = self.constraints.len();
		self.constraints.push(constraint);
		for identifier in watched {
			assert!(self.variables.contains_key(&identifier), "constraint watches unregistered variable {}", identifier);
			self.watchers.entry(identifier.clone()).or_default().push(index);
			self.mark_dirty(&identifier);
		}
	}

	/// Read only view of a variable's domain.
	///
	/// # Panics
	/// - If `identifier` has no variable.
	pub fn domain(&self, identifier: &str) -> &VersionDomain {
		self.variables.get(identifier).expect("domain queried for an unregistered variable")
	}

	pub(super) fn domain_mut(&mut self, identifier: &str) -> &mut VersionDomain {
		self.variables.get_mut(identifier).expect("domain queried for an unregistered variable")
	}

	/// Every variable with its domain, in the order they were added.
	pub fn variables(&self) -> impl Iterator<Item = (&String, &VersionDomain)> {
		self.variables.iter()
	}

	pub fn mark_dirty(&mut self, identifier: &str) {
		if self.queued.insert(identifier.to_string()) {
			self.dirty.push_back(identifier.to_string());
		}
	}

	/// Runs constraints until no domain shrinks any further.
	///
	/// Returns false when some variable's domain was found empty. The queue is
	/// drained fully either way so every reachable contradiction surfaces in
	/// the log rather than just the first one.
	pub fn propagate(&mut self) -> bool {
		let mut coherent = true;
		while let Some(identifier) = self.dirty.pop_front() {
			self.queued.remove(&identifier);
			if self.domain(&identifier).is_empty() {
				log::debug!("no candidates left for {}", identifier);
				coherent = false;
				continue;
			}
			let watching = match self.watchers.get(&identifier) {
				Some(indices) => indices.clone(),
				None => continue,
			};
			for index in watching {
				let constraint = self.constraints[index].clone();
				constraint.revise(self);
			}
		}
		coherent
	}

	/// The next variable with more than one active value, in insertion order.
	fn free_variable(&self) -> Option<String> {
		self.variables.iter()
			.find(|(_, domain)| domain.size() > 1)
			.map(|(identifier, _)| identifier.clone())
	}

	fn checkpoint_all(&mut self) {
		for domain in self.variables.values_mut() {
			domain.checkpoint();
		}
	}

	fn restore_all(&mut self) {
		for domain in self.variables.values_mut() {
			domain.restore();
		}
	}

	/// Searches for a full assignment, exactly one active value per variable.
	///
	/// Depth first chronological backtracking with propagation at every node.
	/// Returns false when no consistent assignment exists, which is an
	/// expected outcome rather than an error. The loop is explicit because the
	/// search depth can reach the variable count and must not grow the call
	/// stack with it.
	pub fn resolve(&mut self) -> bool {
		if !self.propagate() {
			return false;
		}

		let mut history: Vec<(String, Option<Version>)> = Vec::new();

		loop {
			let Some(mut variable) = self.free_variable() else {
				log::debug!("all {} variables pinned after {} decisions", self.variables.len(), history.len());
				return true;
			};

			loop {
				if self.domain(&variable).is_empty() {
					/* Every value of this variable failed. Undo the most recent
					 * decision and fail the value it had tried, then re-decide it. */
					let Some((previous, attempted)) = history.pop() else {
						return false;
					};
					self.restore_all();
					self.domain_mut(&previous).deactivate(&attempted);
					self.mark_dirty(&previous);
					log::trace!("backtracking over {}", previous);
					variable = previous;
					continue;
				}

				self.checkpoint_all();
				let choice = self.domain(&variable).get(0).cloned().expect("non empty domain has a first value");
				self.domain_mut(&variable).pin(&choice);
				self.mark_dirty(&variable);
				log::trace!("trying {} = {}", variable, describe(&choice));

				if self.propagate() {
					history.push((variable.clone(), choice));
					break;
				}

				/* The choice is proven infeasible against the current domains,
				 * roll back and take it out before trying the next value. */
				self.restore_all();
				self.domain_mut(&variable).deactivate(&choice);
				self.mark_dirty(&variable);
			}
		}
	}
}

fn describe(candidate: &Option<Version>) -> String {
	match candidate {
		Some(version) => version.to_string(),
		None => "unselected".to_string(),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::moddb::package::VersionInterval;

	fn v(text: &str) -> Version {
		Version::parse(text).unwrap()
	}

	fn candidates(texts: &[&str]) -> VersionDomain {
		let mut values: Vec<Option<Version>> = texts.iter().map(|t| Some(v(t))).collect();
		values.push(None);
		Domain::new(values)
	}

	#[test]
	fn propagate_on_a_clean_solver_is_coherent() {
		let mut solver = Solver::new();
		solver.add_variable("anything", candidates(&["1.0"]));
		assert!(solver.propagate());
	}

	#[test]
	fn dependency_prunes_owner_when_nothing_matches() {
		let mut solver = Solver::new();
		solver.add_variable("engine", candidates(&["2.0", "1.0"]));
		solver.add_variable("fuel", candidates(&["1.0"]));
		solver.add_constraint(Constraint::Dependency {
			owner: "engine".to_string(),
			owner_version: v("2.0"),
			dependency: "fuel".to_string(),
			required: VersionInterval::parse("[2.0,3.0)").unwrap(),
		});

		assert!(solver.propagate());
		assert!(!solver.domain("engine").contains(&Some(v("2.0"))));
		assert!(solver.domain("engine").contains(&Some(v("1.0"))));
	}

	#[test]
	fn dependency_leaves_owner_alone_when_satisfiable() {
		let mut solver = Solver::new();
		solver.add_variable("engine", candidates(&["2.0", "1.0"]));
		solver.add_variable("fuel", candidates(&["2.5"]));
		solver.add_constraint(Constraint::Dependency {
			owner: "engine".to_string(),
			owner_version: v("2.0"),
			dependency: "fuel".to_string(),
			required: VersionInterval::parse("[2.0,3.0)").unwrap(),
		});

		assert!(solver.propagate());
		assert_eq!(solver.domain("engine").size(), 3);
	}

	#[test]
	fn unselected_sentinel_never_satisfies_a_dependency() {
		let mut solver = Solver::new();
		solver.add_variable("engine", candidates(&["1.0"]));
		/* Only the sentinel, as for an identifier the repository has never heard of. */
		solver.add_variable("ghost", Domain::new(vec![None]));
		solver.add_constraint(Constraint::Dependency {
			owner: "engine".to_string(),
			owner_version: v("1.0"),
			dependency: "ghost".to_string(),
			required: VersionInterval::any(),
		});

		assert!(solver.propagate());
		assert!(!solver.domain("engine").contains(&Some(v("1.0"))));
	}

	#[test]
	fn propagation_cascades_through_chains() {
		/* c is empty of matches, so b 1.0 falls, so a 1.0 falls. */
		let mut solver = Solver::new();
		solver.add_variable("a", candidates(&["1.0"]));
		solver.add_variable("b", candidates(&["1.0"]));
		solver.add_variable("c", candidates(&["1.0"]));
		solver.add_constraint(Constraint::Dependency {
			owner: "b".to_string(),
			owner_version: v("1.0"),
			dependency: "c".to_string(),
			required: VersionInterval::parse("[2.0,)").unwrap(),
		});
		solver.add_constraint(Constraint::Dependency {
			owner: "a".to_string(),
			owner_version: v("1.0"),
			dependency: "b".to_string(),
			required: VersionInterval::parse("[1.0,2.0)").unwrap(),
		});

		assert!(solver.propagate());
		assert_eq!(solver.domain("a").size(), 1);
		assert_eq!(solver.domain("a").get(0), Some(&None));
	}

	#[test]
	fn resolve_backtracks_out_of_a_bad_first_choice() {
		let mut solver = Solver::new();
		/* Newest first, so the search wants launcher 2.0 which the constraints refuse. */
		solver.add_variable("launcher", Domain::new(vec![Some(v("2.0")), Some(v("1.0"))]));
		solver.add_variable("payload", Domain::new(vec![Some(v("2.0")), Some(v("1.0"))]));
		solver.add_constraint(Constraint::Conflict {
			instigator: "launcher".to_string(),
			instigator_version: v("2.0"),
			target: "payload".to_string(),
			conflicting: VersionInterval::parse("[2.0,3.0)").unwrap(),
		});
		solver.add_constraint(Constraint::Dependency {
			owner: "launcher".to_string(),
			owner_version: v("2.0"),
			dependency: "payload".to_string(),
			required: VersionInterval::parse("[2.0,3.0)").unwrap(),
		});

		assert!(solver.resolve());
		assert_eq!(solver.domain("launcher").get(0), Some(&Some(v("1.0"))));
		assert_eq!(solver.domain("payload").get(0), Some(&Some(v("2.0"))));
	}

	#[test]
	fn resolve_fails_in_finite_steps_when_unsolvable() {
		let mut solver = Solver::new();
		/* No sentinels, the two variables are forced into the conflict. */
		solver.add_variable("first", Domain::new(vec![Some(v("1.0"))]));
		solver.add_variable("second", Domain::new(vec![Some(v("1.0")), Some(v("1.1"))]));
		solver.add_constraint(Constraint::Conflict {
			instigator: "first".to_string(),
			instigator_version: v("1.0"),
			target: "second".to_string(),
			conflicting: VersionInterval::parse("[1.0,2.0)").unwrap(),
		});

		assert!(!solver.resolve());
	}

	#[test]
	fn conflict_prunes_target_when_instigator_is_pinned() {
		let mut solver = Solver::new();
		solver.add_variable("radar", Domain::new(vec![Some(v("1.0"))]));
		solver.add_variable("jammer", candidates(&["1.5", "1.0"]));
		solver.add_constraint(Constraint::Conflict {
			instigator: "radar".to_string(),
			instigator_version: v("1.0"),
			target: "jammer".to_string(),
			conflicting: VersionInterval::parse("[1.0,1.2)").unwrap(),
		});

		assert!(solver.propagate());
		assert!(!solver.domain("jammer").contains(&Some(v("1.0"))));
		assert!(solver.domain("jammer").contains(&Some(v("1.5"))));
	}

	#[test]
	fn conflict_prunes_instigator_when_target_cannot_avoid_it() {
		let mut solver = Solver::new();
		solver.add_variable("radar", candidates(&["1.0"]));
		/* No sentinel and every release conflicting. */
		solver.add_variable("jammer", Domain::new(vec![Some(v("1.1")), Some(v("1.0"))]));
		solver.add_constraint(Constraint::Conflict {
			instigator: "radar".to_string(),
			instigator_version: v("1.0"),
			target: "jammer".to_string(),
			conflicting: VersionInterval::parse("[1.0,2.0)").unwrap(),
		});

		assert!(solver.propagate());
		assert!(!solver.domain("radar").contains(&Some(v("1.0"))));
		assert_eq!(solver.domain("jammer").size(), 2);
	}
}
