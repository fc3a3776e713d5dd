//! Utilities for getting a valid set of compatible packages to be installed from a list of desired packages.
//!
//! # Usage
//! 1. Create a [`ResolutionGraph`] over a [`crate::ModDb`] and the target game version.
//! 1. [`ResolutionGraph::add_requirement`] for every package the user asked for.
//! 1. [`ResolutionGraph::propagate`] to check the requests are coherent, or
//!    [`ResolutionGraph::resolve`] to pick a single release for everything.
//! 1. [`ResolutionGraph::selection`] to list the releases to install.
//!
//! Infeasibility is a `false` return from the solving calls, not an error.
//! [`ResolutionGraph::domain_of`] shows what remained possible per package,
//! which is usually the most useful thing to present to a user afterwards.

use crate::moddb::package::VersionInterval;

pub mod domain;
pub mod constraint;
pub mod solver;

mod graph_builder;

pub use domain::Domain;
pub use constraint::Constraint;
pub use solver::Solver;
pub use solver::VersionDomain;
pub use graph_builder::ResolutionGraph;
pub use graph_builder::GAME_VERSION_VARIABLE;

/// A requirement that can be given to the resolver to fulfill.
#[derive(Debug, Default, Clone)]
pub struct InstallRequirement {
	pub identifier: String,
	pub required_version: VersionInterval,
}
