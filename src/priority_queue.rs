use crate::entry::{Comparator, Entry, Order};
use crate::error::EmptyQueue;
use std::fmt::{self, Debug};

/// Binary heap ordered by a comparator chosen at construction time.
///
/// `less(a, b)` must return true when `a` has strictly lower priority than
/// `b`, and must describe a strict weak order. The top of the queue is the
/// entry no other entry outranks.
pub struct PriorityQueue<T, F> {
    data: Vec<T>,
    less: F,
}

/// The queue of `(score, id_a, id_b)` entries with a runtime comparator.
pub type ScoredPairQueue = PriorityQueue<Entry, Comparator>;

impl<T, F: Fn(&T, &T) -> bool> PriorityQueue<T, F> {
    pub fn new(less: F) -> Self {
        PriorityQueue {
            data: Vec::new(),
            less,
        }
    }

    pub fn with_capacity(capacity: usize, less: F) -> Self {
        PriorityQueue {
            data: Vec::with_capacity(capacity),
            less,
        }
    }

    pub fn from_iter_with<I: IntoIterator<Item = T>>(iter: I, less: F) -> Self {
        let mut c = PriorityQueue::new(less);
        c.extend(iter);
        c
    }

    pub fn push(&mut self, v: T) {
        self.data.push(v);
        self.sift_up(self.data.len() - 1);
    }

    pub fn pop(&mut self) -> Result<T, EmptyQueue> {
        let last = self.data.len().checked_sub(1).ok_or(EmptyQueue)?;
        self.data.swap(0, last);
        let top = self.data.pop().ok_or(EmptyQueue)?;
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(top)
    }

    pub fn peek(&self) -> Result<&T, EmptyQueue> {
        self.data.first().ok_or(EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Iterates in heap order, not priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Drains the queue, highest priority first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut v = Vec::with_capacity(self.data.len());
        while let Ok(a) = self.pop() {
            v.push(a);
        }
        v
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !(self.less)(&self.data[parent], &self.data[i]) {
                break;
            }
            self.data.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && (self.less)(&self.data[left], &self.data[right]) {
                right
            } else {
                left
            };
            if !(self.less)(&self.data[i], &self.data[child]) {
                break;
            }
            self.data.swap(i, child);
            i = child;
        }
    }
}

impl ScoredPairQueue {
    pub fn with_order(order: Order) -> Self {
        PriorityQueue::new(order.comparator())
    }
}

impl<T, F: Fn(&T, &T) -> bool> Extend<T> for PriorityQueue<T, F> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.data.reserve(iter.size_hint().0);
        for v in iter {
            self.push(v);
        }
    }
}

impl<T: Debug, F> Debug for PriorityQueue<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
