use alloc::format;
use alloc::vec::Vec;
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use crate::*;

pub(crate) fn images(count: usize) -> Vec<ImageId> {
    (0..count).map(|i| ImageId::new(format!("img-{i}"))).collect()
}

/// Polls a future that is expected to complete without suspending.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future was not ready"),
    }
}
