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
use crate::rates::error::UnknownCurrencyError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The closed set of currencies the converter tracks. Every published quote
/// is denominated in UAH, so UAH never appears as a quote of its own.
#[derive(
	Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
	Usd,
	Eur,
	Uah,
}

impl Currency {
	pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Uah];

	/// The currency all published quotes are priced in.
	pub const BASE: Currency = Currency::Uah;

	pub fn code(&self) -> &'static str {
		match self {
			Currency::Usd => "USD",
			Currency::Eur => "EUR",
			Currency::Uah => "UAH",
		}
	}
}

impl FromStr for Currency {
	type Err = UnknownCurrencyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"USD" => Ok(Currency::Usd),
			"EUR" => Ok(Currency::Eur),
			"UAH" => Ok(Currency::Uah),
			_ => Err(UnknownCurrencyError(s.trim().to_string())),
		}
	}
}

impl fmt::Display for Currency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// An ordered currency pair, rendered as "FROM-TO". Converting an amount
/// of `from` through the pair's rate yields an amount of `to`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pair {
	pub from: Currency,
	pub to: Currency,
}

impl Pair {
	pub fn new(from: Currency, to: Currency) -> Self {
		Self { from, to }
	}

	pub fn reverse(&self) -> Self {
		Self {
			from: self.to,
			to: self.from,
		}
	}

	pub fn is_identity(&self) -> bool {
		self.from == self.to
	}

	/// Every ordered pair over the tracked set, identity pairs included.
	pub fn all() -> impl Iterator<Item = Pair> {
		Currency::ALL.into_iter().flat_map(|from| {
			Currency::ALL.into_iter().map(move |to| Pair::new(from, to))
		})
	}
}

impl fmt::Display for Pair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.from, self.to)
	}
}
