use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{DefaultKey, SlotMap};

pub type SubId = DefaultKey;

/// Shared observable cell. Subscribers run synchronously on every write and
/// must not write back into the same signal.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

struct Inner<T> {
    value: T,
    subs: SlotMap<DefaultKey, Box<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::new(),
        })))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }
    pub fn set(&self, v: T) {
        let mut inner = self.0.borrow_mut();
        inner.value = v;
        let inner = &*inner;
        for s in inner.subs.values() {
            s(&inner.value);
        }
    }
    /// Writes only when the value actually changes.
    pub fn set_if_changed(&self, v: T)
    where
        T: PartialEq,
    {
        if self.0.borrow().value != v {
            self.set(v);
        }
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut inner = self.0.borrow_mut();
        f(&mut inner.value);
        let inner = &*inner;
        for s in inner.subs.values() {
            s(&inner.value);
        }
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.borrow_mut().subs.insert(Box::new(f))
    }
    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.borrow_mut().subs.remove(id).is_some()
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
