//! Singly linked registry list
//!
//! Entries live in a contiguous arena and link to their successor by index,
//! so appending is O(1) and a cursor into the list is just a copyable
//! [`Cursor`]. The quadtree keeps two of these per node.

/// Position of an entry inside a [`LinkedList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(usize);

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    next: Option<usize>,
}

/// Append-only singly linked list of copyable values
#[derive(Debug, Clone)]
pub struct LinkedList<T: Copy> {
    entries: Vec<Entry<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T: Copy> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> LinkedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Append a value at the tail
    pub fn push(&mut self, value: T) -> Cursor {
        let index = self.entries.len();
        self.entries.push(Entry { value, next: None });

        match self.tail {
            Some(tail) => self.entries[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);

        Cursor(index)
    }

    /// Append copies of every value in `other`, preserving order
    pub fn extend_from(&mut self, other: &LinkedList<T>) {
        self.entries.reserve(other.len());
        for (_, value) in other.iter() {
            self.push(value);
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the list holds nothing
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = None;
        self.tail = None;
    }

    /// Value at `cursor`, if the cursor belongs to this list
    pub fn get(&self, cursor: Cursor) -> Option<T> {
        self.entries.get(cursor.0).map(|entry| entry.value)
    }

    /// Iterate from the head
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { list: self, next: self.head }
    }

    /// Iterate over every entry after `cursor`
    pub fn iter_after(&self, cursor: Cursor) -> Iter<'_, T> {
        let next = self.entries.get(cursor.0).and_then(|entry| entry.next);
        Iter { list: self, next }
    }
}

/// Iterator over `(cursor, value)` pairs of a [`LinkedList`]
pub struct Iter<'a, T: Copy> {
    list: &'a LinkedList<T>,
    next: Option<usize>,
}

impl<'a, T: Copy> Iterator for Iter<'a, T> {
    type Item = (Cursor, T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let entry = &self.list.entries[index];
        self.next = entry.next;
        Some((Cursor(index), entry.value))
    }
}
