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
use crate::rates::provider::RateProvider;
use crate::rates::quote::Quote;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvError, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

pub type FetchResult = Result<Vec<Quote>, FetchError>;

/// The single in-flight fetch of a converter view.
///
/// The request runs on its own thread and its result is handed back over a
/// channel, at most once. Unsubscribing only suppresses delivery: a request
/// already on the wire is left to finish and its result is thrown away.
pub struct FetchSubscription {
	receiver: Option<Receiver<FetchResult>>,
	cancelled: Arc<AtomicBool>,
}

impl FetchSubscription {
	pub fn spawn(provider: Box<dyn RateProvider>) -> Self {
		let (sender, receiver) = mpsc::channel();
		let cancelled = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&cancelled);

		thread::spawn(move || {
			debug!(provider = provider.name(), "fetch started");
			let result = provider.fetch_quotes();

			if flag.load(Ordering::SeqCst) {
				debug!("subscriber gone, dropping fetch result");
				return;
			}
			// the receiver can still vanish between the check and the send
			let _ = sender.send(result);
		});

		Self {
			receiver: Some(receiver),
			cancelled,
		}
	}

	/// Returns the fetch result if it has arrived, without blocking.
	pub fn poll(&mut self) -> Option<FetchResult> {
		let receiver = self.receiver.as_ref()?;
		match receiver.try_recv() {
			Ok(result) => {
				self.receiver = None;
				Some(result)
			},
			Err(TryRecvError::Empty) => None,
			Err(TryRecvError::Disconnected) => {
				warn!("fetch thread exited without a result");
				self.receiver = None;
				None
			},
		}
	}

	/// Blocks until the fetch completes. None if it was already delivered
	/// or the subscription was torn down.
	pub fn wait(&mut self) -> Option<FetchResult> {
		let receiver = self.receiver.take()?;
		match receiver.recv() {
			Ok(result) => Some(result),
			Err(RecvError) => {
				warn!("fetch thread exited without a result");
				None
			},
		}
	}

	/// True until the result has been delivered or the view was torn down.
	pub fn is_pending(&self) -> bool {
		self.receiver.is_some()
	}

	pub fn unsubscribe(&mut self) {
		if self.receiver.take().is_some() {
			debug!("fetch subscription torn down");
		}
		self.cancelled.store(true, Ordering::SeqCst);
	}
}

impl Drop for FetchSubscription {
	fn drop(&mut self) {
		self.unsubscribe();
	}
}
