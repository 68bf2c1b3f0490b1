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
use crate::converter::form::{parse_amount, FieldChange};
use crate::converter::state::{ConverterState, Phase};
use crate::converter::subscription::{FetchResult, FetchSubscription};
use crate::rates::currency::Currency;
use crate::rates::error::UnknownCurrencyError;
use crate::reports::form_reporter::FormReporter;
use crate::reports::rate_reporter::RateReporter;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
	#[error("unknown command: {0} (try 'help')")]
	UnknownCommand(String),

	#[error("'{0}' needs a value")]
	MissingArgument(&'static str),

	#[error("not a valid amount: {0}")]
	InvalidAmount(String),

	#[error(transparent)]
	UnknownCurrency(#[from] UnknownCurrencyError),
}

#[derive(Debug, PartialEq)]
pub enum Command {
	Edit(FieldChange),
	Show,
	Rates,
	Help,
	Quit,
}

impl FromStr for Command {
	type Err = SessionError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let mut words = line.split_whitespace();
		let verb = words.next().unwrap_or_default();
		let arg = words.next();

		let command = match verb {
			"from" => {
				Command::Edit(FieldChange::AmountFrom(amount(arg, "from")?))
			},
			"to" => Command::Edit(FieldChange::AmountTo(amount(arg, "to")?)),
			"cfrom" => {
				let currency = currency(arg, "cfrom")?;
				Command::Edit(FieldChange::CurrencyFrom(currency))
			},
			"cto" => {
				Command::Edit(FieldChange::CurrencyTo(currency(arg, "cto")?))
			},
			"show" => Command::Show,
			"rates" => Command::Rates,
			"help" | "?" => Command::Help,
			"quit" | "exit" | "q" => Command::Quit,
			_ => return Err(SessionError::UnknownCommand(verb.to_string())),
		};

		Ok(command)
	}
}

fn amount(arg: Option<&str>, verb: &'static str) -> Result<f64, SessionError> {
	let raw = arg.ok_or(SessionError::MissingArgument(verb))?;
	parse_amount(raw).ok_or_else(|| SessionError::InvalidAmount(raw.to_string()))
}

fn currency(
	arg: Option<&str>,
	verb: &'static str,
) -> Result<Currency, SessionError> {
	let raw = arg.ok_or(SessionError::MissingArgument(verb))?;
	Ok(Currency::from_str(raw)?)
}

const HELP: &str = "\
from <amount>   set the amount to convert
to <amount>     set the converted amount and price it backwards
cfrom <CCY>     select the source currency (USD, EUR, UAH)
cto <CCY>       select the target currency
show            print the form
rates           print the published and derived rates
quit            leave";

/// One interactive converter view: a state plus the fetch feeding it. Input
/// lines are field edits; the fetch result is picked up between them.
pub struct Session {
	state: ConverterState,
	subscription: FetchSubscription,
}

impl Session {
	pub fn new(state: ConverterState, subscription: FetchSubscription) -> Self {
		Self {
			state,
			subscription,
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> &ConverterState {
		&self.state
	}

	/// Applies the fetch result if it has arrived.
	pub fn poll_fetch(&mut self) {
		if let Some(result) = self.subscription.poll() {
			deliver(&mut self.state, result);
		}
	}

	/// Handles one input line. Returns false once the session should end.
	pub fn handle_line(&mut self, line: &str) -> Result<bool, SessionError> {
		self.poll_fetch();

		if line.trim().is_empty() {
			return Ok(true);
		}

		match Command::from_str(line)? {
			Command::Edit(change) => {
				if let Some(write) = self.state.apply(change) {
					FormReporter::new(&self.state).print_write(&write);
				}
			},
			Command::Show => FormReporter::new(&self.state).print_form(),
			Command::Rates => match (self.state.phase(), self.state.table()) {
				(Phase::Loaded, Some(table)) => {
					RateReporter::new(self.state.quotes(), table)
						.as_of(self.state.loaded_at())
						.print_all()
				},
				_ => println!("Rates not loaded yet"),
			},
			Command::Help => println!("{}", HELP),
			Command::Quit => return Ok(false),
		}

		Ok(true)
	}

	/// Runs until `quit` or end of input, then tears the view down. Input is
	/// held back until the fetch settles, the way the form sits behind a
	/// loading indicator.
	pub fn run<R: BufRead>(mut self, input: R) -> Result<(), std::io::Error> {
		if self.subscription.is_pending() {
			info!("loading exchange rates");
			if let Some(result) = self.subscription.wait() {
				deliver(&mut self.state, result);
			}
		}

		for line in input.lines() {
			match self.handle_line(&line?) {
				Ok(true) => {},
				Ok(false) => break,
				Err(e) => println!("{}", e),
			}
		}

		self.subscription.unsubscribe();
		info!(
			loaded = self.state.is_loaded(),
			writes = self.state.write_count(),
			"session closed"
		);
		Ok(())
	}
}

/// Feeds a completed fetch into the state. A failed fetch leaves the state
/// Unloaded, which means amounts simply stop being converted.
pub fn deliver(state: &mut ConverterState, result: FetchResult) {
	match result {
		Ok(quotes) => {
			state.load(quotes);
		},
		Err(e) => warn!(error = %e, "exchange rates unavailable"),
	}
}
