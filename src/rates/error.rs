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
use thiserror::Error;

/// Failure to obtain a usable quote list from a provider.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("request to {url} failed: {source}")]
	Http {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	/// The endpoint answered with a non-2xx status.
	#[error("request to {url} failed with status {status}")]
	Status {
		url: String,
		status: reqwest::StatusCode,
	},

	/// The payload was not the expected quote array.
	#[error("malformed quote payload: {0}")]
	Malformed(String),

	/// A local quotes file could not be read.
	#[error("failed to read quotes from {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
}

/// A tracked currency had no quote in the fetched list. Logged, not raised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no quote for {0} in the published rates")]
pub struct MissingCurrencyError(pub Currency);

/// A currency code outside the tracked set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown currency: {0} (expected USD, EUR or UAH)")]
pub struct UnknownCurrencyError(pub String);
