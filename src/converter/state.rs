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

use crate::converter::form::{
	round_to, ConversionForm, Field, FieldChange, Write,
};
use crate::rates::currency::Pair;
use crate::rates::quote::Quote;
use crate::rates::rate_table::RateTable;
use chrono::{DateTime, Local};
use tracing::{debug, info, trace, warn};

pub const DEFAULT_PRECISION: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// No rate table yet; the held rate is 0 and no conversion is applied.
	Unloaded,
	/// A rate table was built from a successful fetch. Terminal.
	Loaded,
}

/// Owns the rate table and the four form fields of one converter view, and
/// keeps the two amounts in sync.
///
/// Every edit goes through [`ConverterState::apply`], which runs exactly one
/// listener. Within a listener the pair is recomputed first, then the rate is
/// looked up, then the dependent amount is written. Dependent writes bypass
/// the listeners entirely, so an update can never feed back into itself.
#[derive(Debug)]
pub struct ConverterState {
	form: ConversionForm,
	quotes: Vec<Quote>,
	table: Option<RateTable>,
	loaded_at: Option<DateTime<Local>>,

	pair: Pair,
	reverse_pair: Pair,

	/// Last successfully looked-up rate. Survives lookups that find nothing.
	rate: f64,

	/// Decimal places kept for displayed amounts
	precision: u32,

	write_count: usize,
}

impl ConverterState {
	pub fn new(form: ConversionForm, precision: u32) -> Self {
		let pair = Pair::new(form.currency_from, form.currency_to);
		Self {
			form,
			quotes: Vec::new(),
			table: None,
			loaded_at: None,
			pair,
			reverse_pair: pair.reverse(),
			rate: 0.0,
			precision,
			write_count: 0,
		}
	}

	/// Builds the rate table from a completed fetch. Only the first load
	/// counts; there is no refresh.
	pub fn load(&mut self, quotes: Vec<Quote>) -> bool {
		if self.table.is_some() {
			warn!("rate table already loaded, ignoring new quotes");
			return false;
		}

		let table = RateTable::build(&quotes);
		info!(pairs = table.len(), "converter loaded");
		self.table = Some(table);
		self.quotes = quotes;
		self.loaded_at = Some(Local::now());
		true
	}

	/// Dispatches one user edit to its listener. Returns the dependent write,
	/// if the listener made one.
	///
	/// Setting a field to the value it already holds is not a change and
	/// triggers nothing.
	pub fn apply(&mut self, change: FieldChange) -> Option<Write> {
		let changed = match change {
			FieldChange::AmountFrom(v) => {
				replace(&mut self.form.amount_from, v)
			},
			FieldChange::CurrencyFrom(c) => {
				replace(&mut self.form.currency_from, c)
			},
			FieldChange::AmountTo(v) => replace(&mut self.form.amount_to, v),
			FieldChange::CurrencyTo(c) => {
				replace(&mut self.form.currency_to, c)
			},
		};

		if !changed {
			trace!(field = %change.field(), "value unchanged, no event");
			return None;
		}

		match change {
			FieldChange::AmountFrom(_) => self.on_amount_from(),
			FieldChange::AmountTo(_) => self.on_amount_to(),
			FieldChange::CurrencyFrom(_) => self.on_currency_from(),
			FieldChange::CurrencyTo(_) => self.on_currency_to(),
		}
	}

	fn on_amount_from(&mut self) -> Option<Write> {
		self.refresh_pair();
		self.select_rate(self.pair);
		self.write_silently(Field::AmountTo, self.form.amount_from)
	}

	fn on_amount_to(&mut self) -> Option<Write> {
		self.refresh_pair();
		self.select_rate(self.reverse_pair);
		self.write_silently(Field::AmountFrom, self.form.amount_to)
	}

	fn on_currency_from(&mut self) -> Option<Write> {
		self.refresh_pair();
		self.select_rate(self.pair);
		self.write_silently(Field::AmountTo, self.form.amount_from)
	}

	fn on_currency_to(&mut self) -> Option<Write> {
		self.refresh_pair();
		self.select_rate(self.reverse_pair);
		self.write_silently(Field::AmountFrom, self.form.amount_to)
	}

	fn refresh_pair(&mut self) {
		self.pair = Pair::new(self.form.currency_from, self.form.currency_to);
		self.reverse_pair = self.pair.reverse();
	}

	/// Adopts the table's rate for `pair` when there is a usable one;
	/// otherwise the held rate stays as it was.
	fn select_rate(&mut self, pair: Pair) {
		let found = self.table.as_ref().and_then(|t| t.get(&pair));
		match found {
			Some(rate) if rate.is_finite() && rate != 0.0 => self.rate = rate,
			_ => debug!(
				pair = %pair,
				rate = self.rate,
				"no rate, keeping held rate"
			),
		}
	}

	/// Converts `source` at the held rate into `field` without notifying
	/// that field's listener. With no rate ever held, nothing is written.
	fn write_silently(&mut self, field: Field, source: f64) -> Option<Write> {
		if self.rate == 0.0 {
			return None;
		}

		let value = round_to(source * self.rate, self.precision);
		if !value.is_finite() {
			warn!(field = %field, source, rate = self.rate, "amount out of range");
			return None;
		}
		match field {
			Field::AmountFrom => self.form.amount_from = value,
			Field::AmountTo => self.form.amount_to = value,
			Field::CurrencyFrom | Field::CurrencyTo => unreachable!(),
		}
		self.write_count += 1;

		debug!(field = %field, value, rate = self.rate, "synced amount");
		Some(Write { field, value })
	}

	pub fn form(&self) -> &ConversionForm {
		&self.form
	}

	pub fn phase(&self) -> Phase {
		match self.table {
			Some(_) => Phase::Loaded,
			None => Phase::Unloaded,
		}
	}

	pub fn is_loaded(&self) -> bool {
		self.phase() == Phase::Loaded
	}

	pub fn table(&self) -> Option<&RateTable> {
		self.table.as_ref()
	}

	pub fn loaded_at(&self) -> Option<DateTime<Local>> {
		self.loaded_at
	}

	pub fn quotes(&self) -> &[Quote] {
		&self.quotes
	}

	pub fn pair(&self) -> Pair {
		self.pair
	}

	pub fn reverse_pair(&self) -> Pair {
		self.reverse_pair
	}

	pub fn rate(&self) -> f64 {
		self.rate
	}

	pub fn precision(&self) -> u32 {
		self.precision
	}

	/// Number of dependent writes made since construction.
	pub fn write_count(&self) -> usize {
		self.write_count
	}
}

impl Default for ConverterState {
	fn default() -> Self {
		Self::new(ConversionForm::default(), DEFAULT_PRECISION)
	}
}

/// Stores `new` into `slot`, reporting whether the value actually changed.
fn replace<T: PartialEq>(slot: &mut T, new: T) -> bool {
	if *slot == new {
		return false;
	}
	*slot = new;
	true
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rates::currency::Currency;

	fn quotes() -> Vec<Quote> {
		vec![
			Quote::new(Currency::Usd, 39.6, 40.0),
			Quote::new(Currency::Eur, 42.5, 43.0),
		]
	}

	fn loaded() -> ConverterState {
		let mut state = ConverterState::default();
		assert!(state.load(quotes()));
		state
	}

	#[test]
	fn test_initial_state() {
		let state = ConverterState::default();
		assert_eq!(state.phase(), Phase::Unloaded);
		assert_eq!(state.pair().to_string(), "UAH-USD");
		assert_eq!(state.reverse_pair().to_string(), "USD-UAH");
		assert_eq!(state.rate(), 0.0);
		assert!(state.loaded_at().is_none());
		assert_eq!(state.form(), &ConversionForm::default());
	}

	#[test]
	fn test_amount_from_converts_forward() {
		let mut state = loaded();
		let write = state.apply(FieldChange::AmountFrom(100.0));

		assert_eq!(
			write,
			Some(Write {
				field: Field::AmountTo,
				value: 2.5
			})
		);
		assert_eq!(state.form().amount_to, 2.5);
		assert_eq!(state.rate(), 0.025);
	}

	#[test]
	fn test_amount_to_converts_backward() {
		let mut state = loaded();
		state.apply(FieldChange::AmountTo(10.0));

		assert_eq!(state.rate(), 40.0);
		assert_eq!(state.form().amount_from, 400.0);
		assert_eq!(state.form().amount_to, 10.0);
	}

	#[test]
	fn test_currency_from_recomputes_amount_to() {
		let mut state = loaded();
		state.apply(FieldChange::AmountFrom(100.0));
		state.apply(FieldChange::CurrencyFrom(Currency::Eur));

		assert_eq!(state.pair().to_string(), "EUR-USD");
		assert_eq!(state.form().amount_from, 100.0);
		assert_eq!(state.form().amount_to, 107.5);
	}

	#[test]
	fn test_currency_to_recomputes_amount_from() {
		let mut state = loaded();
		state.apply(FieldChange::AmountFrom(100.0));
		let write = state.apply(FieldChange::CurrencyTo(Currency::Eur));

		assert_eq!(state.pair().to_string(), "UAH-EUR");
		assert_eq!(state.reverse_pair().to_string(), "EUR-UAH");
		// the target amount stays put and the source is priced through the
		// new pair
		assert_eq!(state.form().amount_to, 2.5);
		assert_eq!(state.form().amount_from, 107.5);
		assert_eq!(write.map(|w| w.field), Some(Field::AmountFrom));

		// a fresh source edit converts through UAH-EUR
		state.apply(FieldChange::AmountFrom(100.0));
		let expected = round_to(100.0 / 43.0, 2);
		assert_eq!(state.form().amount_to, expected);
		assert_eq!(expected, 2.33);
	}

	#[test]
	fn test_same_value_writes_once() {
		let mut state = loaded();
		assert!(state.apply(FieldChange::AmountFrom(100.0)).is_some());
		assert!(state.apply(FieldChange::AmountFrom(100.0)).is_none());
		assert!(state.apply(FieldChange::AmountFrom(100.0)).is_none());
		assert_eq!(state.write_count(), 1);
		assert_eq!(state.form().amount_to, 2.5);
	}

	#[test]
	fn test_dependent_write_does_not_cascade() {
		let mut state = loaded();
		state.apply(FieldChange::AmountFrom(100.0));
		// the synced value left amount_from alone
		assert_eq!(state.form().amount_from, 100.0);
		assert_eq!(state.write_count(), 1);

		// editing amount_to to the synced value is not a change
		assert!(state.apply(FieldChange::AmountTo(2.5)).is_none());
		assert_eq!(state.write_count(), 1);
	}

	#[test]
	fn test_unloaded_leaves_amounts_alone() {
		let mut state = ConverterState::default();

		assert!(state.apply(FieldChange::AmountFrom(100.0)).is_none());
		assert_eq!(state.form().amount_to, 0.0);

		assert!(state.apply(FieldChange::CurrencyTo(Currency::Eur)).is_none());
		assert!(state.apply(FieldChange::CurrencyFrom(Currency::Usd)).is_none());
		assert!(state.apply(FieldChange::AmountTo(5.0)).is_none());

		assert_eq!(state.form().amount_from, 100.0);
		assert_eq!(state.form().amount_to, 5.0);
		assert_eq!(state.write_count(), 0);
		assert_eq!(state.rate(), 0.0);
		// pairs still track the selectors
		assert_eq!(state.pair().to_string(), "USD-EUR");
	}

	#[test]
	fn test_missing_rate_keeps_held_rate() {
		let mut state = ConverterState::default();
		state.load(vec![Quote::new(Currency::Usd, 39.6, 40.0)]);

		state.apply(FieldChange::AmountFrom(100.0));
		assert_eq!(state.rate(), 0.025);

		// UAH-EUR was never derived, so the UAH-USD rate is reused
		state.apply(FieldChange::CurrencyFrom(Currency::Eur));
		state.apply(FieldChange::CurrencyFrom(Currency::Uah));
		state.apply(FieldChange::CurrencyTo(Currency::Eur));
		assert_eq!(state.rate(), 0.025);
		assert!(state.form().amount_from.is_finite());
		assert!(state.form().amount_to.is_finite());
	}

	#[test]
	fn test_identity_pair() {
		let mut state = loaded();
		state.apply(FieldChange::CurrencyTo(Currency::Uah));
		state.apply(FieldChange::AmountFrom(12.34));
		assert_eq!(state.rate(), 1.0);
		assert_eq!(state.form().amount_to, 12.34);
	}

	#[test]
	fn test_load_only_once() {
		let mut state = loaded();
		assert!(!state.load(vec![Quote::new(Currency::Usd, 1.0, 2.0)]));
		state.apply(FieldChange::AmountFrom(100.0));
		assert_eq!(state.form().amount_to, 2.5);
		assert_eq!(state.quotes().len(), 2);
	}

	#[test]
	fn test_large_amounts_stay_finite() {
		let mut state = loaded();
		state.apply(FieldChange::AmountTo(1e306));
		assert!(state.form().amount_from.is_finite());
		assert!((state.form().amount_from / 4e307 - 1.0).abs() < 1e-12);

		let mut state = ConverterState::new(ConversionForm::default(), 10);
		state.load(quotes());
		state.apply(FieldChange::AmountTo(1e300));
		assert!(state.form().amount_from.is_finite());
		assert!((state.form().amount_from / 4e301 - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_overflowing_write_is_skipped() {
		let mut state = loaded();
		state.apply(FieldChange::AmountFrom(400.0));
		assert_eq!(state.form().amount_to, 10.0);

		assert_eq!(state.apply(FieldChange::AmountTo(1e308)), None);
		assert_eq!(state.form().amount_from, 400.0);
		assert_eq!(state.form().amount_to, 1e308);
		assert_eq!(state.write_count(), 1);
	}

	#[test]
	fn test_custom_precision() {
		let mut state = ConverterState::new(ConversionForm::default(), 4);
		state.load(quotes());
		state.apply(FieldChange::CurrencyTo(Currency::Eur));
		state.apply(FieldChange::AmountFrom(100.0));
		assert_eq!(state.form().amount_to, 2.3256);
	}
}
