//! Single-threaded task queue for continuations and deferred notifications

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// FIFO handle; clones share the same queue
pub struct TaskQueue<T> {
    inner: Rc<RefCell<VecDeque<T>>>,
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, task: T) {
        self.inner.borrow_mut().push_back(task);
    }

    /// Takes everything queued so far; tasks posted afterwards wait for the next call
    pub fn take_all(&self) -> Vec<T> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
