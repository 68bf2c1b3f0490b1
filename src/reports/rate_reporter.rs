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
use crate::rates::quote::Quote;
use crate::rates::rate_table::RateTable;
use crate::reports::table::Table;
use chrono::{DateTime, Local};

/// Prints the headline published prices followed by every derived pair.
pub struct RateReporter<'a> {
	quotes: &'a [Quote],
	table: &'a RateTable,
	as_of: Option<DateTime<Local>>,
}

impl<'a> RateReporter<'a> {
	pub fn new(quotes: &'a [Quote], table: &'a RateTable) -> Self {
		Self {
			quotes,
			table,
			as_of: None,
		}
	}

	pub fn as_of(mut self, when: Option<DateTime<Local>>) -> Self {
		self.as_of = when;
		self
	}

	pub fn print_all(&self) {
		println!();
		print!("{}", self.render_published());
		println!();
		print!("{}", self.render_table());
	}

	/// Buy and sale prices as published, one row per quoted currency.
	pub fn render_published(&self) -> String {
		let mut table = Table::new(4);
		table.right_align(vec![2, 3]);

		let title = match self.as_of {
			Some(t) => format!("{}", t.format("%Y-%m-%d %H:%M")),
			None => String::new(),
		};
		table.add_header(vec!["Currency", "Base", "Buy", "Sale"]);
		table.add_separator();

		for quote in self.quotes {
			table.add_row(vec![
				quote.currency_code.to_string(),
				quote.base_currency.to_string(),
				quote
					.buy_rate
					.map(|r| format!("{:.2}", r))
					.unwrap_or_else(|| "-".to_string()),
				format!("{:.2}", quote.sale_rate),
			]);
		}

		let mut out = table.render();
		if !title.is_empty() {
			out = format!("Published rates as of {}\n{}", title, out);
		}
		out
	}

	/// The full pairwise table; pairs that could not be derived show "n/a".
	pub fn render_table(&self) -> String {
		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["Pair", "Rate"]);
		table.add_separator();

		for from in Currency::ALL {
			for to in Currency::ALL {
				let pair = Pair::new(from, to);
				let rate = match self.table.get(&pair) {
					Some(r) => format!("{:.6}", r),
					None => "n/a".to_string(),
				};
				table.add_row(vec![pair.to_string(), rate]);
			}
		}

		table.render()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_published() {
		let quotes = vec![Quote::new(Currency::Usd, 39.6, 40.0)];
		let table = RateTable::build(&quotes);
		let out = RateReporter::new(&quotes, &table).render_published();

		assert!(out.contains("USD        UAH    39.60   40.00"));
		assert!(!out.contains("as of"));
	}

	#[test]
	fn test_render_table() {
		let quotes = vec![
			Quote::new(Currency::Usd, 39.6, 40.0),
			Quote::new(Currency::Eur, 42.5, 43.0),
		];
		let table = RateTable::build(&quotes);
		let out = RateReporter::new(&quotes, &table).render_table();

		assert!(out.contains("UAH-USD    0.025000"));
		assert!(out.contains("USD-EUR    0.930233"));
		assert!(out.contains("EUR-UAH   43.000000"));
		assert_eq!(out.lines().count(), 11);
	}

	#[test]
	fn test_render_table_with_gaps() {
		let quotes = vec![Quote::new(Currency::Usd, 39.6, 40.0)];
		let table = RateTable::build(&quotes);
		let out = RateReporter::new(&quotes, &table).render_table();

		assert!(out.contains("USD-EUR         n/a"));
	}
}
