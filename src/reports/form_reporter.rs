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
use crate::converter::form::{Field, Write};
use crate::converter::state::{ConverterState, Phase};
use crate::rates::currency::Pair;

pub struct FormReporter<'a> {
	state: &'a ConverterState,
}

impl<'a> FormReporter<'a> {
	pub fn new(state: &'a ConverterState) -> Self {
		Self { state }
	}

	pub fn print_form(&self) {
		println!("{}", self.render_form());
	}

	pub fn print_write(&self, write: &Write) {
		println!("{}", self.render_write(write));
	}

	/// One line: "100.00 UAH = 2.50 USD", plus the selected pair's rate
	/// once rates are loaded.
	pub fn render_form(&self) -> String {
		let form = self.state.form();
		let prec = self.state.precision() as usize;
		let mut line = format!(
			"{:.prec$} {} = {:.prec$} {}",
			form.amount_from, form.currency_from, form.amount_to, form.currency_to,
		);

		let pair = Pair::new(form.currency_from, form.currency_to);
		match self.state.phase() {
			Phase::Unloaded => line.push_str("  (rates not loaded)"),
			Phase::Loaded => {
				if let Some(rate) = self.state.table().and_then(|t| t.get(&pair))
				{
					line.push_str(&format!(
						"  [1 {} = {:.6} {}]",
						pair.from, rate, pair.to
					));
				}
			},
		}

		line
	}

	pub fn render_write(&self, write: &Write) -> String {
		let form = self.state.form();
		let (currency, via) = match write.field {
			Field::AmountFrom => (form.currency_from, self.state.reverse_pair()),
			_ => (form.currency_to, self.state.pair()),
		};
		let prec = self.state.precision() as usize;
		format!(
			"{} = {:.prec$} {} ({} @ {:.6})",
			write.field,
			write.value,
			currency,
			via,
			self.state.rate()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::converter::form::FieldChange;
	use crate::rates::currency::Currency;
	use crate::rates::quote::Quote;

	#[test]
	fn test_render_unloaded() {
		let state = ConverterState::default();
		assert_eq!(
			FormReporter::new(&state).render_form(),
			"0.00 UAH = 0.00 USD  (rates not loaded)"
		);
	}

	#[test]
	fn test_render_loaded() {
		let mut state = ConverterState::default();
		state.load(vec![Quote::new(Currency::Usd, 39.6, 40.0)]);
		let write = state.apply(FieldChange::AmountFrom(100.0)).unwrap();

		let reporter = FormReporter::new(&state);
		assert_eq!(
			reporter.render_form(),
			"100.00 UAH = 2.50 USD  [1 UAH = 0.025000 USD]"
		);
		assert_eq!(
			reporter.render_write(&write),
			"amount_to = 2.50 USD (UAH-USD @ 0.025000)"
		);
	}

	#[test]
	fn test_render_backward_write() {
		let mut state = ConverterState::default();
		state.load(vec![Quote::new(Currency::Usd, 39.6, 40.0)]);
		let write = state.apply(FieldChange::AmountTo(10.0)).unwrap();

		let reporter = FormReporter::new(&state);
		assert_eq!(
			reporter.render_write(&write),
			"amount_from = 400.00 UAH (USD-UAH @ 40.000000)"
		);
		assert_eq!(
			reporter.render_form(),
			"400.00 UAH = 10.00 USD  [1 UAH = 0.025000 USD]"
		);
	}

	#[test]
	fn test_render_underivable_pair() {
		let mut state = ConverterState::default();
		state.load(vec![Quote::new(Currency::Usd, 39.6, 40.0)]);
		state.apply(FieldChange::CurrencyTo(Currency::Eur));
		assert_eq!(
			FormReporter::new(&state).render_form(),
			"0.00 UAH = 0.00 EUR"
		);
	}
}
