pub mod ordered;

pub use ordered::{Iter, Layout, OrderedStore, StoredEntry};
