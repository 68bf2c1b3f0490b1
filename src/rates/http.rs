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
use reqwest::Method;
use std::time::Duration;
use tracing::debug;

pub struct Client {
	client: reqwest::blocking::Client,
	url: String,
}

impl Client {
	pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
		let client = reqwest::blocking::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|source| FetchError::Http {
				url: url.to_string(),
				source,
			})?;

		Ok(Client {
			client,
			url: url.to_string(),
		})
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Sends a GET and returns the response body. Errors on non-2xx
	/// response codes.
	pub fn get_text(&self) -> Result<String, FetchError> {
		let http_err = |source| FetchError::Http {
			url: self.url.clone(),
			source,
		};

		debug!(url = %self.url, "sending GET");
		let response = self
			.client
			.request(Method::GET, &self.url)
			.header("Accept", "application/json")
			.send()
			.map_err(http_err)?;

		if !response.status().is_success() {
			return Err(FetchError::Status {
				url: self.url.clone(),
				status: response.status(),
			});
		}

		response.text().map_err(http_err)
	}
}
