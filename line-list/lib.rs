//! An in-memory ordered collection of text lines.
//!
//! [`LineList`] is a doubly linked list of owned strings built over a
//! generational arena: nodes address their neighbors through stable
//! [`NodeId`] handles instead of raw pointers, and the head and tail
//! handles are cached so end access stays O(1).
//!
//! Out-of-range indices and missing values are silent no-ops by
//! default, preserving the permissive contract of the original list.
//! The `try_*` variants report the same conditions as [`ListError`]s
//! for callers that need to tell "did nothing" apart from "index was
//! invalid".

mod list;

pub use crate::list::{
  Iter,
  LineList,
  ListError,
  NodeId,
  Result,
};
