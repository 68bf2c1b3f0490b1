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

use crate::rates::currency::{Currency, Pair};
use crate::rates::error::MissingCurrencyError;
use crate::rates::quote::Quote;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Complete directed conversion table over the tracked currencies, such that
/// `amount(to) = amount(from) * rate(from-to)`.
///
/// Built once from a quote list and never mutated afterwards. Pairs that
/// could not be derived (a quote was missing) are simply absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateTable {
	rates: BTreeMap<Pair, f64>,
}

impl RateTable {
	/// Derives all nine ordered-pair rates from the base-currency sale
	/// prices. Cross rates between two quoted currencies go through UAH.
	pub fn build(quotes: &[Quote]) -> Self {
		let mut table = Self::default();

		for pair in Pair::all().filter(Pair::is_identity) {
			table.insert(pair, 1.0);
		}

		let usd = sale_rate(quotes, Currency::Usd);
		let eur = sale_rate(quotes, Currency::Eur);

		if let Some(usd) = usd {
			table.insert(Pair::new(Currency::Usd, Currency::Uah), usd);
			table.insert(Pair::new(Currency::Uah, Currency::Usd), 1.0 / usd);
		}

		if let Some(eur) = eur {
			table.insert(Pair::new(Currency::Eur, Currency::Uah), eur);
			table.insert(Pair::new(Currency::Uah, Currency::Eur), 1.0 / eur);
		}

		if let (Some(usd), Some(eur)) = (usd, eur) {
			table.insert(Pair::new(Currency::Usd, Currency::Eur), usd / eur);
			table.insert(Pair::new(Currency::Eur, Currency::Usd), eur / usd);
		}

		debug!(pairs = table.len(), "built rate table");
		table
	}

	/// Rates that are zero, negative or non-finite are dropped; a
	/// conversion through them would only produce garbage.
	fn insert(&mut self, pair: Pair, rate: f64) {
		if !rate.is_finite() || rate <= 0.0 {
			warn!(pair = %pair, rate, "discarding unusable derived rate");
			return;
		}
		self.rates.insert(pair, rate);
	}

	pub fn get(&self, pair: &Pair) -> Option<f64> {
		self.rates.get(pair).copied()
	}

	pub fn len(&self) -> usize {
		self.rates.len()
	}
}

/// First matching quote wins. A missing quote is reported and leaves the
/// dependent pairs undefined.
fn sale_rate(quotes: &[Quote], currency: Currency) -> Option<f64> {
	let found = quotes
		.iter()
		.find(|q| q.currency_code == currency)
		.map(|q| q.sale_rate);

	if found.is_none() {
		let err = MissingCurrencyError(currency);
		warn!(error = %err, "rate table will be incomplete");
	}

	found
}

#[cfg(test)]
mod tests {
	use super::*;

	const TOLERANCE: f64 = 1e-9;

	fn quotes(usd: f64, eur: f64) -> Vec<Quote> {
		vec![
			Quote::new(Currency::Usd, usd - 0.4, usd),
			Quote::new(Currency::Eur, eur - 0.5, eur),
		]
	}

	fn rate(table: &RateTable, from: Currency, to: Currency) -> f64 {
		table.get(&Pair::new(from, to)).unwrap()
	}

	#[test]
	fn test_full_table() {
		let table = RateTable::build(&quotes(40.0, 43.0));
		assert_eq!(table.len(), 9);
	}

	#[test]
	fn test_identity_pairs() {
		let table = RateTable::build(&quotes(40.0, 43.0));
		for currency in Currency::ALL {
			assert_eq!(rate(&table, currency, currency), 1.0);
		}
	}

	#[test]
	fn test_reciprocal_pairs() {
		for (usd, eur) in [(40.0, 43.0), (41.25, 44.9), (0.5, 1234.5678)] {
			let table = RateTable::build(&quotes(usd, eur));
			for pair in Pair::all() {
				let there = table.get(&pair).unwrap();
				let back = table.get(&pair.reverse()).unwrap();
				assert!(
					(there * back - 1.0).abs() < TOLERANCE,
					"{} and back: {}",
					pair,
					there * back
				);
			}
		}
	}

	#[test]
	fn test_known_rates() {
		let table = RateTable::build(&quotes(40.0, 43.0));
		assert_eq!(rate(&table, Currency::Uah, Currency::Usd), 0.025);
		assert_eq!(rate(&table, Currency::Usd, Currency::Uah), 40.0);
		assert_eq!(rate(&table, Currency::Eur, Currency::Uah), 43.0);
		assert!(
			(rate(&table, Currency::Uah, Currency::Eur) - 0.023256).abs()
				< 1e-6
		);
		assert!(
			(rate(&table, Currency::Usd, Currency::Eur) - 0.930233).abs()
				< 1e-6
		);
	}

	#[test]
	fn test_first_quote_wins() {
		let mut list = quotes(40.0, 43.0);
		list.push(Quote::new(Currency::Usd, 1.0, 2.0));
		let table = RateTable::build(&list);
		assert_eq!(rate(&table, Currency::Usd, Currency::Uah), 40.0);
	}

	#[test]
	fn test_missing_currency() {
		let table =
			RateTable::build(&[Quote::new(Currency::Usd, 39.6, 40.0)]);

		assert_eq!(table.len(), 5);
		assert_eq!(rate(&table, Currency::Uah, Currency::Usd), 0.025);
		assert!(table.get(&Pair::new(Currency::Usd, Currency::Eur)).is_none());
		assert!(table.get(&Pair::new(Currency::Uah, Currency::Eur)).is_none());
		assert_eq!(rate(&table, Currency::Eur, Currency::Eur), 1.0);
	}

	#[test]
	fn test_zero_sale_rate_is_dropped() {
		let table = RateTable::build(&quotes(0.0, 43.0));
		assert!(table.get(&Pair::new(Currency::Usd, Currency::Uah)).is_none());
		assert!(table.get(&Pair::new(Currency::Uah, Currency::Usd)).is_none());
		assert!(table.get(&Pair::new(Currency::Eur, Currency::Usd)).is_none());
		assert_eq!(rate(&table, Currency::Eur, Currency::Uah), 43.0);
	}

	#[test]
	fn test_empty_quotes() {
		let table = RateTable::build(&[]);
		assert_eq!(table.len(), 3);
	}
}
