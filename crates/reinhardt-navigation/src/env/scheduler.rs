//! Timer-backed futures.
//!
//! Everything time-related in the engine goes through
//! [`BrowserEnvironment::set_timeout`], so a virtual clock drives transitions
//! deterministically.

use super::BrowserEnvironment;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

/// Delay used as one animation frame.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
struct SleepState {
	done: bool,
	waker: Option<Waker>,
}

/// Future completing once its timer fires.
#[must_use = "futures do nothing unless awaited"]
pub struct Sleep {
	state: Rc<RefCell<SleepState>>,
}

impl Future for Sleep {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		let mut state = self.state.borrow_mut();
		if state.done {
			Poll::Ready(())
		} else {
			state.waker = Some(cx.waker().clone());
			Poll::Pending
		}
	}
}

/// Sleeps for `delay` on the environment's scheduler.
pub fn sleep<E: BrowserEnvironment + ?Sized>(env: &E, delay: Duration) -> Sleep {
	let state = Rc::new(RefCell::new(SleepState::default()));
	let timer_state = Rc::clone(&state);
	env.set_timeout(
		delay,
		Box::new(move || {
			let waker = {
				let mut state = timer_state.borrow_mut();
				state.done = true;
				state.waker.take()
			};
			if let Some(waker) = waker {
				waker.wake();
			}
		}),
	);
	Sleep { state }
}

/// Yields until the next animation frame.
pub fn next_frame<E: BrowserEnvironment + ?Sized>(env: &E) -> Sleep {
	sleep(env, FRAME)
}
