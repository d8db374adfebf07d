use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A score together with an opaque pair of ids. The queue only ever looks
/// at the pair through the comparator it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub score: f64,
    pub id_a: i32,
    pub id_b: i32,
}

impl Entry {
    pub fn new(score: f64, id_a: i32, id_b: i32) -> Self {
        Entry { score, id_a, id_b }
    }

    pub fn ids(&self) -> (i32, i32) {
        (self.id_a, self.id_b)
    }

    fn key(&self) -> (OrderedFloat<f64>, i32, i32) {
        (OrderedFloat(self.score), self.id_a, self.id_b)
    }

    fn key_rev_ids(&self) -> (OrderedFloat<f64>, Reverse<i32>, Reverse<i32>) {
        (OrderedFloat(self.score), Reverse(self.id_a), Reverse(self.id_b))
    }
}

impl From<(f64, (i32, i32))> for Entry {
    fn from((score, (id_a, id_b)): (f64, (i32, i32))) -> Self {
        Entry { score, id_a, id_b }
    }
}

impl From<Entry> for (f64, (i32, i32)) {
    fn from(e: Entry) -> Self {
        (e.score, (e.id_a, e.id_b))
    }
}

/// Returns true when `a` has strictly lower priority than `b`.
pub type Comparator = Box<dyn Fn(&Entry, &Entry) -> bool>;

pub fn max_score(a: &Entry, b: &Entry) -> bool {
    OrderedFloat(a.score) < OrderedFloat(b.score)
}

pub fn min_score(a: &Entry, b: &Entry) -> bool {
    OrderedFloat(a.score) > OrderedFloat(b.score)
}

/// Highest score first; on equal scores the smaller `(id_a, id_b)` wins.
pub fn max_score_then_ids(a: &Entry, b: &Entry) -> bool {
    a.key_rev_ids() < b.key_rev_ids()
}

/// Lowest score first; on equal scores the smaller `(id_a, id_b)` wins.
pub fn min_score_then_ids(a: &Entry, b: &Entry) -> bool {
    a.key() > b.key()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    MaxScore,
    #[default]
    MinScore,
    MaxScoreThenIds,
    MinScoreThenIds,
}

impl Order {
    pub fn comparator(self) -> Comparator {
        match self {
            Order::MaxScore => Box::new(max_score),
            Order::MinScore => Box::new(min_score),
            Order::MaxScoreThenIds => Box::new(max_score_then_ids),
            Order::MinScoreThenIds => Box::new(min_score_then_ids),
        }
    }
}
