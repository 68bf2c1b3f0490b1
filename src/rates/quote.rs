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
use crate::rates::error::FetchError;
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

/// One row of the bank's public exchange payload. Every numeric field is
/// published as a decimal string.
#[derive(Debug, Deserialize)]
pub struct PublishedQuote {
	pub ccy: String,
	pub base_ccy: String,
	pub buy: String,
	pub sale: String,
}

/// A tracked currency's published price in the base currency.
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
	pub currency_code: Currency,
	pub base_currency: Currency,
	/// Informational only; an unparseable buy price is dropped.
	pub buy_rate: Option<f64>,
	pub sale_rate: f64,
}

impl Quote {
	#[cfg(test)]
	pub fn new(currency_code: Currency, buy_rate: f64, sale_rate: f64) -> Self {
		Self {
			currency_code,
			base_currency: Currency::BASE,
			buy_rate: Some(buy_rate),
			sale_rate,
		}
	}
}

/// Decodes a raw payload into quotes for the tracked currencies. Rows for
/// other codes are skipped; a tracked row with an unparseable rate makes the
/// whole payload malformed.
pub fn parse_payload(body: &str) -> Result<Vec<Quote>, FetchError> {
	let rows: Vec<PublishedQuote> = serde_json::from_str(body)
		.map_err(|e| FetchError::Malformed(e.to_string()))?;

	from_published(rows)
}

pub fn from_published(
	rows: Vec<PublishedQuote>,
) -> Result<Vec<Quote>, FetchError> {
	let mut quotes = Vec::with_capacity(rows.len());

	for row in rows {
		let Ok(currency_code) = Currency::from_str(&row.ccy) else {
			debug!(ccy = %row.ccy, "skipping quote for untracked currency");
			continue;
		};
		let base_currency = match Currency::from_str(&row.base_ccy) {
			Ok(c) if c == Currency::BASE => c,
			_ => {
				debug!(
					ccy = %row.ccy,
					base_ccy = %row.base_ccy,
					"skipping quote not priced in the base currency"
				);
				continue;
			},
		};

		quotes.push(Quote {
			currency_code,
			base_currency,
			buy_rate: parse_rate(&row.ccy, "buy", &row.buy).ok(),
			sale_rate: parse_rate(&row.ccy, "sale", &row.sale)?,
		});
	}

	Ok(quotes)
}

fn parse_rate(ccy: &str, field: &str, raw: &str) -> Result<f64, FetchError> {
	match raw.trim().parse::<f64>() {
		Ok(v) if v.is_finite() => Ok(v),
		_ => Err(FetchError::Malformed(format!(
			"{} rate for {} is not a number: {:?}",
			field, ccy, raw
		))),
	}
}
