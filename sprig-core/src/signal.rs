// sprig-core/src/signal.rs

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

// Holds the currently running/collecting effect during dependency tracking.
thread_local! {
    static CURRENT_EFFECT: RefCell<Option<Rc<RefCell<Box<dyn FnMut()>>>>> =
        RefCell::new(None);

    // Simple microtask-style scheduler queue and guards.
    static EFFECT_QUEUE: RefCell<Vec<Rc<RefCell<Box<dyn FnMut()>>>>> =
        RefCell::new(Vec::new());
    static QUEUED: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
    static IS_FLUSHING: Cell<bool> = Cell::new(false);
}

fn ptr_id(rc: &Rc<RefCell<Box<dyn FnMut()>>>) -> usize {
    rc.as_ptr() as usize
}

fn enqueue_effect(eff: Rc<RefCell<Box<dyn FnMut()>>>) {
    EFFECT_QUEUE.with(|q| {
        QUEUED.with(|set| {
            let id = ptr_id(&eff);
            let mut set_b = set.borrow_mut();
            if set_b.insert(id) {
                q.borrow_mut().push(eff);
            }
        });
    });
}

fn flush_queue() {
    // Prevent re-entrant flush; effects scheduled during a flush will be queued
    // and processed by this outer flush.
    if IS_FLUSHING.with(|f| f.replace(true)) {
        return;
    }

    loop {
        let next = EFFECT_QUEUE.with(|q| q.borrow_mut().pop());
        let Some(eff) = next else { break };

        // Mark as not queued before running, so re-enqueues are allowed.
        QUEUED.with(|set| {
            set.borrow_mut().remove(&ptr_id(&eff));
        });

        // Extract the closure out of the RefCell so we don't hold a mutable borrow
        // while executing it (the body may call set() and re-enqueue itself).
        let mut func: Box<dyn FnMut()> = {
            let mut b = eff.borrow_mut();
            std::mem::replace(&mut *b, Box::new(|| {}))
        };

        // Set current effect for dependency collection.
        CURRENT_EFFECT.with(|cur| *cur.borrow_mut() = Some(eff.clone()));
        // Run without holding any RefCell borrows to `eff`.
        func();
        // Clear current effect.
        CURRENT_EFFECT.with(|cur| *cur.borrow_mut() = None);

        // Put the function back into the effect cell.
        {
            let mut b = eff.borrow_mut();
            *b = func;
        }
    }

    IS_FLUSHING.with(|f| f.set(false));
}

struct Subscriber<T> {
    id: u64,
    callback: Rc<RefCell<dyn FnMut(&T)>>,
}

struct SourceInner<T> {
    value: RefCell<T>,
    // Explicit subscribers, notified synchronously in subscription order.
    subscribers: RefCell<Vec<Subscriber<T>>>,
    // Effects registered through get() during dependency tracking.
    effects: RefCell<Vec<Rc<RefCell<Box<dyn FnMut()>>>>>,
    next_sub_id: Cell<u64>,
}

/// A reactive source: a value plus a subscribe-and-notify contract.
///
/// The handle is cheap to clone; clones share the same underlying value and
/// subscriber list.
pub struct Source<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Source {
            inner: self.inner.clone(),
        }
    }
}

/// Disposer for one `Source::subscribe` registration.
///
/// Dropping the handle does NOT cancel the subscription; call
/// [`Subscription::unsubscribe`] for that. A subscription that is never
/// disposed stays registered for the life of its source.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the callback from its source's subscriber list.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl<T> Source<T>
where
    T: Clone + 'static,
{
    /// Create a new source.
    pub fn new(initial: T) -> Self {
        Source {
            inner: Rc::new(SourceInner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                effects: RefCell::new(Vec::new()),
                next_sub_id: Cell::new(0),
            }),
        }
    }

    /// Read the value, and if inside an `effect`, register that effect as a dependent.
    pub fn get(&self) -> T {
        CURRENT_EFFECT.with(|current| {
            if let Some(effect_rc) = current.borrow().as_ref() {
                let mut effects = self.inner.effects.borrow_mut();
                if !effects.iter().any(|e| Rc::ptr_eq(e, effect_rc)) {
                    effects.push(effect_rc.clone());
                }
            }
        });
        self.inner.value.borrow().clone()
    }

    /// Update the value, notify explicit subscribers synchronously in
    /// subscription order, then schedule dependent effects.
    pub fn set(&self, new: T) {
        *self.inner.value.borrow_mut() = new;

        // Snapshot both lists before invoking anything, so callbacks may
        // subscribe/unsubscribe or set() without hitting a live borrow.
        let callbacks: Vec<Rc<RefCell<dyn FnMut(&T)>>> = {
            let subs = self.inner.subscribers.borrow();
            subs.iter().map(|s| s.callback.clone()).collect()
        };
        let value = self.inner.value.borrow().clone();

        // Subscriber callbacks are not dependency-tracked: suspend the current
        // effect while they run so a get() inside one does not register it.
        let prev = CURRENT_EFFECT.with(|cur| cur.borrow_mut().take());
        for callback in callbacks {
            (&mut *callback.borrow_mut())(&value);
        }
        CURRENT_EFFECT.with(|cur| *cur.borrow_mut() = prev);

        let effects = {
            let effects = self.inner.effects.borrow();
            effects.clone()
        };
        for eff in effects {
            enqueue_effect(eff);
        }
        flush_queue();
    }

    /// Register a callback invoked with each value set after this call.
    ///
    /// The callback is NOT invoked with the current value; callers wanting the
    /// initial state read `get()` first.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.inner.next_sub_id.get();
        self.inner.next_sub_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });

        let weak: Weak<SourceInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|s| s.id != id);
                }
            })),
        }
    }

    /// Derive a new source whose value is `f` applied to this source's value,
    /// re-applied on every change.
    pub fn map<U, F>(&self, f: F) -> Source<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let initial = {
            let value = self.inner.value.borrow();
            f(&value)
        };
        let out = Source::new(initial);
        let out_handle = out.clone();
        // The subscription is intentionally left registered for the life of
        // the upstream source; the derived handle owns nothing to cancel.
        let _ = self.subscribe(move |value| out_handle.set(f(value)));
        out
    }

    /// Build a derived source from a closure: the closure runs once to collect
    /// the reactive sources it reads, and re-runs (updating the returned
    /// source) whenever any of them changes.
    pub fn computed<F>(f: F) -> Source<T>
    where
        F: Fn() -> T + 'static,
    {
        let slot: Rc<RefCell<Option<Source<T>>>> = Rc::new(RefCell::new(None));
        {
            let slot = slot.clone();
            effect(move || {
                let next = f();
                let existing = slot.borrow().clone();
                match existing {
                    Some(out) => out.set(next),
                    None => *slot.borrow_mut() = Some(Source::new(next)),
                }
            });
        }
        // effect() runs its closure synchronously on registration.
        let out = slot.borrow().clone();
        out.expect("computed source initialized by first effect run")
    }
}

/// Register a closure as a reactive effect:
/// - runs immediately to collect dependencies,
/// - then re-runs whenever any `Source` it `get()`s is `set()`.
pub fn effect<F>(f: F)
where
    F: FnMut() + 'static,
{
    let eff = Rc::new(RefCell::new(Box::new(f) as Box<dyn FnMut()>));

    // Initial run with dependency collection.
    CURRENT_EFFECT.with(|current| *current.borrow_mut() = Some(eff.clone()));

    // Extract, run, and restore (same pattern as in flush)
    let mut func: Box<dyn FnMut()> = {
        let mut b = eff.borrow_mut();
        std::mem::replace(&mut *b, Box::new(|| {}))
    };
    func();
    {
        let mut b = eff.borrow_mut();
        *b = func;
    }

    CURRENT_EFFECT.with(|current| *current.borrow_mut() = None);
}
