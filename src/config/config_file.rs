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
use crate::rates::currency::Currency;
use anyhow::{anyhow, Error};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub source: Option<Source>,
	pub form: Option<Form>,
}

/// Where quotes come from.
#[derive(Debug, Default, Deserialize)]
pub struct Source {
	pub url: Option<String>,
	pub timeout_secs: Option<u64>,
}

/// Initial state of the converter form.
#[derive(Debug, Default, Deserialize)]
pub struct Form {
	pub currency_from: Option<Currency>,
	pub currency_to: Option<Currency>,

	/// Decimal places kept for converted amounts
	pub precision: Option<u32>,
}

impl Config {
	pub fn parse(content: &str) -> Result<Self, Error> {
		toml::from_str(content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_full() {
		let config = Config::parse(
			r#"
			[source]
			url = "http://localhost:8080/rates"
			timeout_secs = 3

			[form]
			currency_from = "EUR"
			currency_to = "UAH"
			precision = 4
			"#,
		)
		.unwrap();

		let source = config.source.unwrap();
		assert_eq!(source.url.as_deref(), Some("http://localhost:8080/rates"));
		assert_eq!(source.timeout_secs, Some(3));

		let form = config.form.unwrap();
		assert_eq!(form.currency_from, Some(Currency::Eur));
		assert_eq!(form.currency_to, Some(Currency::Uah));
		assert_eq!(form.precision, Some(4));
	}

	#[test]
	fn test_parse_empty() {
		let config = Config::parse("").unwrap();
		assert!(config.source.is_none());
		assert!(config.form.is_none());
	}

	#[test]
	fn test_parse_bad_currency() {
		assert!(Config::parse("[form]\ncurrency_to = \"GBP\"\n").is_err());
	}
}
