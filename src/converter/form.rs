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
use std::fmt;

/// The four linked input fields of the converter.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionForm {
	pub amount_from: f64,
	pub currency_from: Currency,
	pub amount_to: f64,
	pub currency_to: Currency,
}

impl Default for ConversionForm {
	fn default() -> Self {
		Self::new(Currency::Uah, Currency::Usd)
	}
}

impl ConversionForm {
	pub fn new(currency_from: Currency, currency_to: Currency) -> Self {
		Self {
			amount_from: 0.0,
			currency_from,
			amount_to: 0.0,
			currency_to,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	AmountFrom,
	CurrencyFrom,
	AmountTo,
	CurrencyTo,
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Field::AmountFrom => "amount_from",
			Field::CurrencyFrom => "currency_from",
			Field::AmountTo => "amount_to",
			Field::CurrencyTo => "currency_to",
		};
		write!(f, "{}", name)
	}
}

/// A user edit of one field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldChange {
	AmountFrom(f64),
	CurrencyFrom(Currency),
	AmountTo(f64),
	CurrencyTo(Currency),
}

impl FieldChange {
	pub fn field(&self) -> Field {
		match self {
			FieldChange::AmountFrom(_) => Field::AmountFrom,
			FieldChange::CurrencyFrom(_) => Field::CurrencyFrom,
			FieldChange::AmountTo(_) => Field::AmountTo,
			FieldChange::CurrencyTo(_) => Field::CurrencyTo,
		}
	}
}

/// A value the synchronization logic wrote into a dependent amount field
/// without notifying that field's listener.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Write {
	pub field: Field,
	pub value: f64,
}

/// Reads a user-typed amount. A decimal comma is accepted; infinities and
/// NaN are not amounts.
pub fn parse_amount(raw: &str) -> Option<f64> {
	raw.trim()
		.replace(',', ".")
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
}

/// Rounds half away from zero to the given number of decimal places. Values
/// too large to scale are already integral and come back unchanged; negative
/// zero comes back as zero.
pub fn round_to(value: f64, places: u32) -> f64 {
	let factor = 10f64.powi(places as i32);
	let scaled = value * factor;
	if !scaled.is_finite() {
		return value;
	}
	scaled.round() / factor + 0.0
}
