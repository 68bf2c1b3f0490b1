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
use crate::rates::error::FetchError;
use crate::rates::http::Client;
use crate::rates::quote::{parse_payload, Quote};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const PRIVATBANK_URL: &str =
	"https://api.privatbank.ua/p24api/pubinfo?json&exchange&coursid=5";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce the current published quotes. One call is one
/// fetch; implementations neither retry nor cache.
pub trait RateProvider: Send {
	fn name(&self) -> &str;

	fn fetch_quotes(&self) -> Result<Vec<Quote>, FetchError>;
}

/// The bank's public cash-rate endpoint.
pub struct PrivatBankProvider {
	http: Client,
}

impl PrivatBankProvider {
	pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
		Ok(Self {
			http: Client::new(url, timeout)?,
		})
	}
}

impl RateProvider for PrivatBankProvider {
	fn name(&self) -> &str {
		"privatbank"
	}

	fn fetch_quotes(&self) -> Result<Vec<Quote>, FetchError> {
		let body = self.http.get_text()?;
		let quotes = parse_payload(&body)?;
		info!(url = self.http.url(), count = quotes.len(), "fetched quotes");
		Ok(quotes)
	}
}

/// Reads a payload in the endpoint's format from disk, for offline use.
pub struct FileProvider {
	path: PathBuf,
}

impl FileProvider {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl RateProvider for FileProvider {
	fn name(&self) -> &str {
		"file"
	}

	fn fetch_quotes(&self) -> Result<Vec<Quote>, FetchError> {
		let body =
			fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
				path: self.path.display().to_string(),
				source,
			})?;
		parse_payload(&body)
	}
}

/// Hands out a fixed quote list, or a fixed failure.
#[cfg(test)]
pub struct StaticProvider {
	quotes: Option<Vec<Quote>>,
}

#[cfg(test)]
impl StaticProvider {
	pub fn new(quotes: Vec<Quote>) -> Self {
		Self {
			quotes: Some(quotes),
		}
	}

	pub fn failing() -> Self {
		Self { quotes: None }
	}
}

#[cfg(test)]
impl RateProvider for StaticProvider {
	fn name(&self) -> &str {
		"static"
	}

	fn fetch_quotes(&self) -> Result<Vec<Quote>, FetchError> {
		self.quotes
			.clone()
			.ok_or_else(|| FetchError::Malformed("no quotes configured".into()))
	}
}
