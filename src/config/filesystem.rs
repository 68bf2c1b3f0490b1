/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use anyhow::{anyhow, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = ".config/kurs/config.toml";

/// Fetches the config from the given path, or the default path if none.
/// The default file is created empty on first use; a custom path must
/// already exist.
pub fn get_config(custom_config_path: Option<&String>) -> Result<Config, Error> {
	let config_path = match &custom_config_path {
		None => home_dir()
			.ok_or_else(|| anyhow!("unable to determine home directory"))?
			.join(DEFAULT_CONFIG_PATH),
		Some(p) => PathBuf::from(p),
	};

	// create empty config file if it doesn't exist
	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(&config_path)?;
	}

	debug!(path = %config_path.display(), "reading config");
	let content = fs::read_to_string(&config_path).map_err(|e| {
		anyhow!("failed to read config {}: {}", config_path.display(), e)
	})?;
	Config::parse(&content)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn test_custom_path() {
		let path = env::temp_dir()
			.join(format!("kurs-config-{}.toml", std::process::id()));
		fs::write(&path, "[source]\ntimeout_secs = 1\n").unwrap();

		let config =
			get_config(Some(&path.display().to_string())).unwrap();
		fs::remove_file(&path).unwrap();

		assert_eq!(config.source.unwrap().timeout_secs, Some(1));
	}

	#[test]
	fn test_missing_custom_path() {
		let path = "/nonexistent/kurs/config.toml".to_string();
		assert!(get_config(Some(&path)).is_err());
	}
}
