use std::fmt;

use slotmap::SlotMap;
use thiserror::Error;

/// Result type for the strict list operations.
pub type Result<T> = std::result::Result<T, ListError>;

/// Errors reported by the strict (`try_*`) list operations.
///
/// The default operations treat the same conditions as silent no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
  #[error("index {index} is out of bounds (len: {len})")]
  IndexOutOfBounds { index: usize, len: usize },
}

slotmap::new_key_type! {
  /// Generational handle to a node in the list arena.
  pub struct NodeId;
}

#[derive(Debug, Clone)]
struct Node {
  line: String,
  prev: Option<NodeId>,
  next: Option<NodeId>,
}

/// An ordered sequence of owned text lines, linked in both directions.
///
/// The nodes live in a generational arena and refer to each other by
/// [`NodeId`], so no node is ever reachable from two lists and cloning
/// always produces independently owned text. Head and tail are cached;
/// appending is O(1), positional operations walk the links from the
/// head.
#[derive(Debug, Clone, Default)]
pub struct LineList {
  nodes: SlotMap<NodeId, Node>,
  head:  Option<NodeId>,
  tail:  Option<NodeId>,
  len:   usize,
}

impl LineList {
  /// Creates a new empty list.
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of lines in the list.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Removes every line, leaving the list empty.
  pub fn clear(&mut self) {
    self.nodes.clear();
    self.head = None;
    self.tail = None;
    self.len = 0;
  }

  /// The first line, if any.
  pub fn front(&self) -> Option<&str> {
    self.head.map(|id| self.nodes[id].line.as_str())
  }

  /// The last line, if any.
  pub fn back(&self) -> Option<&str> {
    self.tail.map(|id| self.nodes[id].line.as_str())
  }

  /// The line at `index`, or `None` when `index` is out of range.
  pub fn get(&self, index: usize) -> Option<&str> {
    self.node_at(index).map(|id| self.nodes[id].line.as_str())
  }

  /// Appends `line` as the new tail. O(1) via the cached tail handle.
  pub fn push_back(&mut self, line: impl Into<String>) {
    let id = self.nodes.insert(Node {
      line: line.into(),
      prev: self.tail,
      next: None,
    });
    match self.tail {
      Some(tail) => self.nodes[tail].next = Some(id),
      None => self.head = Some(id),
    }
    self.tail = Some(id);
    self.len += 1;
  }

  /// Prepends `line` as the new head. O(1).
  pub fn push_front(&mut self, line: impl Into<String>) {
    let id = self.nodes.insert(Node {
      line: line.into(),
      prev: None,
      next: self.head,
    });
    match self.head {
      Some(head) => self.nodes[head].prev = Some(id),
      None => self.tail = Some(id),
    }
    self.head = Some(id);
    self.len += 1;
  }

  /// Inserts `line` so that it becomes the element at `index`.
  ///
  /// Valid positions are `0..=len`, inclusive of the append position.
  /// An out-of-range index leaves the list unchanged; use
  /// [`try_insert_at`](Self::try_insert_at) to observe that case.
  pub fn insert_at(&mut self, line: impl Into<String>, index: usize) {
    let _ = self.try_insert_at(line, index);
  }

  /// Strict variant of [`insert_at`](Self::insert_at).
  pub fn try_insert_at(&mut self, line: impl Into<String>, index: usize) -> Result<()> {
    if index > self.len {
      return Err(ListError::IndexOutOfBounds {
        index,
        len: self.len,
      });
    }
    if index == 0 {
      self.push_front(line);
    } else if index == self.len {
      self.push_back(line);
    } else if let Some(succ) = self.node_at(index) {
      // Interior position: the new node goes between the current
      // occupant and its predecessor, so head and tail never move.
      let pred = self.nodes[succ].prev;
      let id = self.nodes.insert(Node {
        line: line.into(),
        prev: pred,
        next: Some(succ),
      });
      self.nodes[succ].prev = Some(id);
      if let Some(pred) = pred {
        self.nodes[pred].next = Some(id);
      }
      self.len += 1;
    }
    Ok(())
  }

  /// Removes and returns the line at `index`, or `None` when `index`
  /// is out of range.
  pub fn remove_at(&mut self, index: usize) -> Option<String> {
    let id = self.node_at(index)?;
    Some(self.unlink(id))
  }

  /// Strict variant of [`remove_at`](Self::remove_at).
  pub fn try_remove_at(&mut self, index: usize) -> Result<String> {
    self.remove_at(index).ok_or(ListError::IndexOutOfBounds {
      index,
      len: self.len,
    })
  }

  /// Removes every node whose line equals `line` byte-wise, returning
  /// how many were removed.
  pub fn remove_all(&mut self, line: &str) -> usize {
    let mut removed = 0;
    let mut cursor = self.head;
    while let Some(id) = cursor {
      cursor = self.nodes[id].next;
      if self.nodes[id].line == line {
        self.unlink(id);
        removed += 1;
      }
    }
    removed
  }

  /// Number of nodes whose line equals `line` byte-wise.
  pub fn count(&self, line: &str) -> usize {
    self.iter().filter(|&l| l == line).count()
  }

  /// Sum of the byte lengths of every line, saturating instead of
  /// overflowing.
  pub fn total_len(&self) -> usize {
    self
      .iter()
      .fold(0usize, |acc, line| acc.saturating_add(line.len()))
  }

  /// Reverses the list in place by swapping every node's link pair.
  /// No-op for empty and single-element lists.
  pub fn reverse(&mut self) {
    if self.len < 2 {
      return;
    }
    let mut cursor = self.head;
    while let Some(id) = cursor {
      let node = &mut self.nodes[id];
      std::mem::swap(&mut node.prev, &mut node.next);
      // prev now holds the old next link.
      cursor = node.prev;
    }
    std::mem::swap(&mut self.head, &mut self.tail);
  }

  /// Sorts the lines ascending by byte-wise comparison.
  ///
  /// Bubble sort over the node values: adjacent out-of-order pairs
  /// swap their lines, the confirmed-sorted suffix grows by one node
  /// per pass, and a swap-free pass terminates early. Stable, so equal
  /// lines keep their relative order.
  pub fn sort(&mut self) {
    if self.len < 2 {
      return;
    }
    // First node of the already-sorted suffix.
    let mut boundary: Option<NodeId> = None;
    loop {
      let mut swapped = false;
      let mut cursor = self.head;
      while let Some(id) = cursor {
        match self.nodes[id].next {
          Some(next) if boundary != Some(next) => {
            if self.nodes[id].line > self.nodes[next].line {
              self.swap_lines(id, next);
              swapped = true;
            }
            cursor = Some(next);
          },
          _ => break,
        }
      }
      if !swapped {
        break;
      }
      boundary = cursor;
    }
  }

  /// True when no adjacent pair is out of ascending byte order. Empty
  /// and single-element lists count as sorted.
  pub fn is_sorted(&self) -> bool {
    let mut iter = self.iter();
    let Some(mut prev) = iter.next() else {
      return true;
    };
    for line in iter {
      if prev > line {
        return false;
      }
      prev = line;
    }
    true
  }

  /// Iterates over the lines front to back. The reverse direction
  /// walks the prev links.
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      nodes:     &self.nodes,
      front:     self.head,
      back:      self.tail,
      remaining: self.len,
    }
  }

  /// Verifies the link structure: `len` matches the node count walking
  /// from either end, head and tail are absent exactly when the list
  /// is empty, and every prev/next pair is symmetric.
  ///
  /// Every public operation keeps this true; exposed so tests can
  /// check it after arbitrary mutation sequences.
  pub fn check_invariants(&self) -> bool {
    if self.head.is_none() != self.tail.is_none() {
      return false;
    }
    if self.head.is_none() != (self.len == 0) {
      return false;
    }
    if self.nodes.len() != self.len {
      return false;
    }

    // Forward walk: count nodes and check link symmetry.
    let mut forward = 0;
    let mut prev = None;
    let mut cursor = self.head;
    while let Some(id) = cursor {
      let Some(node) = self.nodes.get(id) else {
        return false;
      };
      if node.prev != prev {
        return false;
      }
      prev = Some(id);
      cursor = node.next;
      forward += 1;
      if forward > self.len {
        // Cycle.
        return false;
      }
    }
    if forward != self.len || prev != self.tail {
      return false;
    }

    // Backward walk from the tail must see the same count.
    let mut backward = 0;
    let mut cursor = self.tail;
    while let Some(id) = cursor {
      let Some(node) = self.nodes.get(id) else {
        return false;
      };
      cursor = node.prev;
      backward += 1;
      if backward > self.len {
        return false;
      }
    }
    backward == self.len
  }

  /// Handle of the node at `index`, walking `index` steps from the
  /// head.
  fn node_at(&self, index: usize) -> Option<NodeId> {
    if index >= self.len {
      return None;
    }
    let mut cursor = self.head;
    for _ in 0..index {
      cursor = self.nodes[cursor?].next;
    }
    cursor
  }

  /// Detaches `id` from the chain, patching its neighbors and the
  /// head/tail caches, and returns the owned line.
  fn unlink(&mut self, id: NodeId) -> String {
    let node = match self.nodes.remove(id) {
      Some(node) => node,
      // Callers only pass handles obtained from this arena.
      None => unreachable!("stale node handle"),
    };
    match node.prev {
      Some(prev) => self.nodes[prev].next = node.next,
      None => self.head = node.next,
    }
    match node.next {
      Some(next) => self.nodes[next].prev = node.prev,
      None => self.tail = node.prev,
    }
    self.len -= 1;
    node.line
  }

  // Swap the text of two nodes, leaving the link structure untouched.
  fn swap_lines(&mut self, a: NodeId, b: NodeId) {
    let line = std::mem::take(&mut self.nodes[a].line);
    self.nodes[a].line = std::mem::replace(&mut self.nodes[b].line, line);
  }
}

/// Renders the lines space-separated, in order. An empty list renders
/// as the empty string.
impl fmt::Display for LineList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for line in self.iter() {
      if !first {
        f.write_str(" ")?;
      }
      f.write_str(line)?;
      first = false;
    }
    Ok(())
  }
}

impl PartialEq for LineList {
  fn eq(&self, other: &Self) -> bool {
    self.len == other.len && self.iter().eq(other.iter())
  }
}

impl Eq for LineList {}

impl<S: Into<String>> FromIterator<S> for LineList {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut list = LineList::new();
    list.extend(iter);
    list
  }
}

impl<S: Into<String>> Extend<S> for LineList {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    for line in iter {
      self.push_back(line);
    }
  }
}

impl<'a> IntoIterator for &'a LineList {
  type Item = &'a str;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Iter<'a> {
    self.iter()
  }
}

/// Borrowing iterator over the lines of a [`LineList`].
pub struct Iter<'a> {
  nodes:     &'a SlotMap<NodeId, Node>,
  front:     Option<NodeId>,
  back:      Option<NodeId>,
  remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<&'a str> {
    if self.remaining == 0 {
      return None;
    }
    let node = &self.nodes[self.front?];
    self.front = node.next;
    self.remaining -= 1;
    Some(node.line.as_str())
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl DoubleEndedIterator for Iter<'_> {
  fn next_back(&mut self) -> Option<Self::Item> {
    if self.remaining == 0 {
      return None;
    }
    let node = &self.nodes[self.back?];
    self.back = node.prev;
    self.remaining -= 1;
    Some(node.line.as_str())
  }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
  use super::*;

  fn list_of(lines: &[&str]) -> LineList {
    lines.iter().copied().collect()
  }

  fn lines(list: &LineList) -> Vec<&str> {
    list.iter().collect()
  }

  #[test]
  fn starts_empty() {
    let list = LineList::new();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert_eq!(list.front(), None);
    assert_eq!(list.back(), None);
    assert!(list.check_invariants());
  }

  #[test]
  fn append_sort_display() {
    let mut list = list_of(&["b", "a", "c"]);
    assert_eq!(list.to_string(), "b a c");
    list.sort();
    assert_eq!(list.to_string(), "a b c");
    assert!(list.is_sorted());
    assert!(list.check_invariants());
  }

  #[test]
  fn display_of_empty_list_is_empty() {
    assert_eq!(LineList::new().to_string(), "");
  }

  #[test]
  fn insert_at_zero_then_remove_at_zero() {
    let mut list = list_of(&["a", "b"]);
    list.insert_at("x", 0);
    assert_eq!(lines(&list), ["x", "a", "b"]);
    assert_eq!(list.front(), Some("x"));
    assert_eq!(list.remove_at(0), Some("x".to_string()));
    assert_eq!(lines(&list), ["a", "b"]);
    assert!(list.check_invariants());
  }

  #[test]
  fn insert_at_len_appends() {
    let mut list = list_of(&["a", "b"]);
    list.insert_at("c", 2);
    assert_eq!(lines(&list), ["a", "b", "c"]);
    assert_eq!(list.back(), Some("c"));
  }

  #[test]
  fn insert_interior() {
    let mut list = list_of(&["a", "c"]);
    list.insert_at("b", 1);
    assert_eq!(lines(&list), ["a", "b", "c"]);
    assert!(list.check_invariants());
  }

  #[test]
  fn out_of_range_insert_is_silent_noop() {
    let mut list = list_of(&["a", "b"]);
    list.insert_at("x", 3);
    assert_eq!(lines(&list), ["a", "b"]);
    assert_eq!(
      list.try_insert_at("x", 5),
      Err(ListError::IndexOutOfBounds { index: 5, len: 2 })
    );
  }

  #[test]
  fn remove_all_keeps_non_matches() {
    let mut list = list_of(&["a", "b", "a"]);
    assert_eq!(list.remove_all("a"), 2);
    assert_eq!(lines(&list), ["b"]);
    assert_eq!(list.len(), 1);
    assert_eq!(list.count("a"), 0);
    assert!(list.check_invariants());
  }

  #[test]
  fn remove_all_handles_head_and_consecutive_matches() {
    let mut list = list_of(&["a", "a", "b", "a", "a"]);
    assert_eq!(list.remove_all("a"), 4);
    assert_eq!(lines(&list), ["b"]);
    assert_eq!(list.front(), Some("b"));
    assert_eq!(list.back(), Some("b"));
    assert!(list.check_invariants());
  }

  #[test]
  fn remove_all_can_empty_the_list() {
    let mut list = list_of(&["x", "x"]);
    assert_eq!(list.remove_all("x"), 2);
    assert!(list.is_empty());
    assert!(list.check_invariants());
  }

  #[test]
  fn remove_at_tail_updates_back() {
    let mut list = list_of(&["a", "b", "c"]);
    assert_eq!(list.remove_at(2), Some("c".to_string()));
    assert_eq!(list.back(), Some("b"));
    assert!(list.check_invariants());
  }

  #[test]
  fn remove_at_out_of_range_is_silent_noop() {
    let mut list = list_of(&["a"]);
    assert_eq!(list.remove_at(1), None);
    assert_eq!(list.len(), 1);
    assert_eq!(
      list.try_remove_at(9),
      Err(ListError::IndexOutOfBounds { index: 9, len: 1 })
    );
  }

  #[test]
  fn get_out_of_range_is_none() {
    let list = list_of(&["a"]);
    assert_eq!(list.get(0), Some("a"));
    assert_eq!(list.get(1), None);
    assert_eq!(LineList::new().get(0), None);
  }

  #[test]
  fn total_len_sums_bytes() {
    assert_eq!(LineList::new().total_len(), 0);
    assert_eq!(list_of(&["ab", "c"]).total_len(), 3);
  }

  #[test]
  fn reverse_three_elements() {
    let mut list = list_of(&["a", "b", "c"]);
    list.reverse();
    assert_eq!(lines(&list), ["c", "b", "a"]);
    assert_eq!(list.front(), Some("c"));
    assert_eq!(list.back(), Some("a"));
    assert!(list.check_invariants());
  }

  #[test]
  fn reverse_short_lists_is_noop() {
    let mut empty = LineList::new();
    empty.reverse();
    assert!(empty.is_empty());

    let mut single = list_of(&["a"]);
    single.reverse();
    assert_eq!(lines(&single), ["a"]);
    assert!(single.check_invariants());
  }

  #[test]
  fn sort_with_duplicates() {
    let mut list = list_of(&["b", "a", "b", "a"]);
    list.sort();
    assert_eq!(lines(&list), ["a", "a", "b", "b"]);
    assert!(list.is_sorted());
    assert!(list.check_invariants());
  }

  #[test]
  fn short_lists_are_sorted() {
    assert!(LineList::new().is_sorted());
    assert!(list_of(&["z"]).is_sorted());
  }

  #[test]
  fn equality_is_size_then_pairwise() {
    assert_eq!(LineList::new(), LineList::new());
    assert_eq!(list_of(&["a", "b"]), list_of(&["a", "b"]));
    assert_ne!(list_of(&["a", "b"]), list_of(&["a"]));
    assert_ne!(list_of(&["a", "b"]), list_of(&["a", "c"]));
  }

  #[test]
  fn clone_is_equal_but_independent() {
    let original = list_of(&["a", "b"]);
    let mut copy = original.clone();
    assert_eq!(copy, original);
    copy.push_back("c");
    copy.remove_all("a");
    assert_eq!(lines(&original), ["a", "b"]);
    assert!(copy.check_invariants());
  }

  #[test]
  fn clear_resets_everything() {
    let mut list = list_of(&["a", "b"]);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.front(), None);
    assert!(list.check_invariants());
    list.push_back("fresh");
    assert_eq!(lines(&list), ["fresh"]);
  }

  #[test]
  fn iteration_is_double_ended() {
    let list = list_of(&["a", "b", "c"]);
    let backward: Vec<_> = list.iter().rev().collect();
    assert_eq!(backward, ["c", "b", "a"]);

    let mut iter = list.iter();
    assert_eq!(iter.next(), Some("a"));
    assert_eq!(iter.next_back(), Some("c"));
    assert_eq!(iter.next(), Some("b"));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
  }

  quickcheck::quickcheck! {
    fn prop_reverse_twice_is_identity(input: Vec<String>) -> bool {
      let mut list: LineList = input.iter().cloned().collect();
      list.reverse();
      list.reverse();
      list.check_invariants() && list.iter().eq(input.iter().map(String::as_str))
    }

    fn prop_sort_is_idempotent_and_sorted(input: Vec<String>) -> bool {
      let mut once: LineList = input.iter().cloned().collect();
      once.sort();
      let mut twice = once.clone();
      twice.sort();
      once.check_invariants() && once.is_sorted() && once == twice
    }

    fn prop_sort_matches_std_sort(input: Vec<String>) -> bool {
      let mut list: LineList = input.iter().cloned().collect();
      list.sort();
      let mut expected = input;
      expected.sort();
      list.iter().eq(expected.iter().map(String::as_str))
    }

    fn prop_insert_at_len_is_push_back(input: Vec<String>, extra: String) -> bool {
      let mut positional: LineList = input.iter().cloned().collect();
      let mut appended = positional.clone();
      let index = positional.len();
      positional.insert_at(extra.clone(), index);
      appended.push_back(extra);
      positional == appended && positional.check_invariants()
    }

    fn prop_out_of_range_insert_is_identity(input: Vec<String>, extra: String) -> bool {
      let mut list: LineList = input.iter().cloned().collect();
      let before = list.clone();
      list.insert_at(extra, list.len() + 1);
      list == before
    }

    fn prop_remove_all_zeroes_count(input: Vec<String>, needle: String) -> bool {
      let mut list: LineList = input.iter().cloned().collect();
      let matches = list.count(&needle);
      let removed = list.remove_all(&needle);
      removed == matches && list.count(&needle) == 0 && list.check_invariants()
    }

    fn prop_len_tracks_removals(input: Vec<String>, index: usize) -> bool {
      let mut list: LineList = input.iter().cloned().collect();
      let before = list.len();
      let removed = list.remove_at(index).is_some();
      let expected = if removed { before - 1 } else { before };
      list.len() == expected && list.check_invariants()
    }

    fn prop_clone_never_aliases(input: Vec<String>) -> bool {
      let original: LineList = input.iter().cloned().collect();
      let mut copy = original.clone();
      let equal_before = copy == original;
      copy.push_back("mutated");
      equal_before && copy != original && original.len() == input.len()
    }

    fn prop_total_len_matches_sum(input: Vec<String>) -> bool {
      let list: LineList = input.iter().cloned().collect();
      list.total_len() == input.iter().map(|l| l.len()).sum::<usize>()
    }

    fn prop_forward_and_backward_walks_agree(input: Vec<String>) -> bool {
      let list: LineList = input.iter().cloned().collect();
      let forward: Vec<_> = list.iter().collect();
      let mut backward: Vec<_> = list.iter().rev().collect();
      backward.reverse();
      forward == backward && list.check_invariants()
    }
  }
}
