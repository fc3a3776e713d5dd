pub struct ModsolvOptions {
	data_dir: std::path::PathBuf,
}

impl Default for ModsolvOptions {
	fn default() -> Self {
		Self {
			data_dir: {
				#[cfg(target_os = "windows")]
				let path = std::path::PathBuf::from(std::env::var("APPDATA").expect("APPDATA missing."));

				#[cfg(not(target_os = "windows"))]
				let path = if let Ok(e) = std::env::var("XDG_DATA_HOME") {
					std::path::PathBuf::from(e)
				} else {
					std::path::PathBuf::from(std::env::var("HOME").expect("HOME environment variable not set.")).join(".local/share")
				};

				let path = path.join("modsolv").join("data");
				std::fs::create_dir_all(&path).expect("failed to create data directory.");
				path
			},
		}
	}
}

impl ModsolvOptions {
	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	/// Where the serialized [`crate::ModDb`] lives.
	pub fn moddb_cache_file(&self) -> std::path::PathBuf {
		self.data_dir.join("moddb.bin")
	}
}
