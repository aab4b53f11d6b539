// sprig-core/src/schedule.rs
use std::cell::RefCell;

thread_local! {
    static DEFERRED: RefCell<Vec<Box<dyn FnOnce()>>> = RefCell::new(Vec::new());
}

/// Queue a task to run on the next `flush_deferred` call.
pub fn defer(f: impl FnOnce() + 'static) {
    DEFERRED.with(|q| q.borrow_mut().push(Box::new(f)));
}

/// Drain the deferred queue in FIFO order.
///
/// Tasks queued by a running task are drained in the same call, after
/// everything queued before them.
pub fn flush_deferred() {
    loop {
        let next = DEFERRED.with(|q| {
            let mut queue = q.borrow_mut();
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        });
        match next {
            Some(task) => task(),
            None => break,
        }
    }
}
