//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

/// Gets a ModDb for use in testing, built from a small in memory index.
///
/// The fixture covers the shapes resolution has to deal with: a plain library
/// (`core`), a dependent with per release requirements (`modcore`), a second
/// level dependent (`sensor-suite`), a conflicting pair (`apex`/`flux`),
/// game version gated releases (`retro`) and a dependency on an identifier
/// the repository has never heard of (`phantom`).
pub fn get_moddb() -> modsolv::ModDb {
	modsolv::ModDb::generate_from_index(&test_index()).expect("failed to generate db")
}

/// The raw JSON index behind [`get_moddb`].
pub fn test_index() -> serde_json::Value {
	serde_json::json!([
		{ "identifier": "core", "version": "1.0" },
		{ "identifier": "core", "version": "1.1" },
		{ "identifier": "core", "version": "2.0" },

		{ "identifier": "modcore", "version": "1.0", "depends": { "core": "[1.0,2.0)" } },
		{ "identifier": "modcore", "version": "1.1", "depends": { "core": "[1.1,2.0)" } },
		{ "identifier": "modcore", "version": "2.0", "depends": { "core": "[2.0,3.0)" } },

		{ "identifier": "sensor-suite", "version": "0.5", "depends": { "modcore": "[1.0,2.0)" } },

		{ "identifier": "apex", "version": "1.0", "conflicts": { "flux": "[1.0,2.0)" } },
		{ "identifier": "flux", "version": "1.0" },
		{ "identifier": "flux", "version": "1.5" },

		{ "identifier": "retro", "version": "1.0", "game_version": "[1.0,1.8]" },
		{ "identifier": "retro", "version": "2.0", "game_version": "[1.8,2.0)" },

		{ "identifier": "phantom", "version": "1.0", "depends": { "specter": "[1.0,2.0)" } },
	])
}
