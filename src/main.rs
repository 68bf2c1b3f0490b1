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
use crate::config::config_file::Config;
use crate::config::filesystem::get_config;
use crate::converter::form::{parse_amount, ConversionForm, FieldChange};
use crate::converter::session::{deliver, Session};
use crate::converter::state::{ConverterState, DEFAULT_PRECISION};
use crate::converter::subscription::FetchSubscription;
use crate::rates::currency::Currency;
use crate::rates::provider::{
	FileProvider, PrivatBankProvider, RateProvider, DEFAULT_TIMEOUT,
	PRIVATBANK_URL,
};
use crate::reports::form_reporter::FormReporter;
use crate::reports::rate_reporter::RateReporter;
use anyhow::{anyhow, bail, Error};
use clap::{ArgAction, Parser, ValueEnum};
use std::io;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod config;
mod converter;
mod rates;
mod reports;

#[derive(Parser)]
#[command(
	name = "kurs",
	version,
	about = "Converts between UAH, USD and EUR at published bank rates",
	allow_negative_numbers = true
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The amount for the Convert command
	#[arg(required = false)]
	amount: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Currency to convert from (default: UAH, or the config file's)
	#[arg(long)]
	from: Option<Currency>,

	/// Currency to convert to (default: USD, or the config file's)
	#[arg(long)]
	to: Option<Currency>,

	/// Treat the amount as the converted amount and price it backwards
	#[arg(short, long)]
	reverse: bool,

	/// Custom config file location (default: ~/.config/kurs/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Read quotes from a local file in the endpoint's JSON format
	#[arg(long)]
	quotes_file: Option<String>,

	/// Decimal places to keep for converted amounts
	#[arg(short, long)]
	precision: Option<u32>,

	/// More log output on stderr; repeat for more
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Beyond this f64 stops carrying meaningful digits for currency
	/// amounts anyway
	const MAX_PRECISION: u32 = 10;

	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision {
			if prec > Cli::MAX_PRECISION {
				bail!("Maximum precision is {}", Cli::MAX_PRECISION);
			}
		}

		if self.command == Directive::Convert && self.amount.is_none() {
			bail!("No amount specified");
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
enum Directive {
	Rates,   // published and derived rates
	Convert, // one conversion
	Session, // interactive converter on stdin
}

/// Config file values with command line overrides applied.
#[derive(Debug)]
struct Settings {
	url: String,
	timeout: Duration,
	currency_from: Currency,
	currency_to: Currency,
	precision: u32,
}

impl Settings {
	fn resolve(args: &Cli, config: Config) -> Result<Self, Error> {
		let source = config.source.unwrap_or_default();
		let form = config.form.unwrap_or_default();

		let precision =
			args.precision.or(form.precision).unwrap_or(DEFAULT_PRECISION);
		if precision > Cli::MAX_PRECISION {
			bail!("Maximum precision is {}", Cli::MAX_PRECISION);
		}

		let timeout = match source.timeout_secs {
			Some(0) => bail!("timeout_secs must be greater than zero"),
			Some(secs) => Duration::from_secs(secs),
			None => DEFAULT_TIMEOUT,
		};

		Ok(Self {
			url: source.url.unwrap_or_else(|| PRIVATBANK_URL.to_string()),
			timeout,
			currency_from: args
				.from
				.or(form.currency_from)
				.unwrap_or(Currency::Uah),
			currency_to: args.to.or(form.currency_to).unwrap_or(Currency::Usd),
			precision,
		})
	}
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_logging(args.verbose);

	let config = get_config(args.config.as_ref())?;
	let settings = Settings::resolve(&args, config)?;

	let provider: Box<dyn RateProvider> = match &args.quotes_file {
		Some(path) => Box::new(FileProvider::new(path)),
		None => {
			Box::new(PrivatBankProvider::new(&settings.url, settings.timeout)?)
		},
	};

	let mut subscription = FetchSubscription::spawn(provider);
	let mut state = ConverterState::new(
		ConversionForm::new(settings.currency_from, settings.currency_to),
		settings.precision,
	);

	match args.command {
		Directive::Rates => {
			let quotes = subscription
				.wait()
				.ok_or_else(|| anyhow!("rate fetch ended without a result"))?
				.map_err(|e| anyhow!("exchange rates unavailable: {}", e))?;
			state.load(quotes);

			if let Some(table) = state.table() {
				RateReporter::new(state.quotes(), table)
					.as_of(state.loaded_at())
					.print_all();
			}
		},
		Directive::Convert => {
			let raw = args.amount.as_deref().unwrap_or_default();
			let amount = parse_amount(raw)
				.ok_or_else(|| anyhow!("Not a valid amount: {}", raw))?;
			if let Some(result) = subscription.wait() {
				deliver(&mut state, result);
			}

			let change = if args.reverse {
				FieldChange::AmountTo(amount)
			} else {
				FieldChange::AmountFrom(amount)
			};
			state.apply(change);
			FormReporter::new(&state).print_form();
		},
		Directive::Session => {
			println!("Type 'help' for commands");
			Session::new(state, subscription).run(io::stdin().lock())?;
		},
	}

	Ok(())
}

/// Logs go to stderr so they never mix with report output. RUST_LOG, when
/// set, wins over the verbosity flag.
fn init_logging(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(match verbosity {
			0 => "warn",
			1 => "info",
			2 => "debug",
			_ => "trace",
		})
	});

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
		.init();
}
