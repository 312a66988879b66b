//! Bounded in-memory store of recently emitted lines.
//!
//! Lines are numbered with a sequence number that starts at 1 and never
//! repeats. The buffer keeps the newest `capacity` lines in a fixed ring of
//! slots, so the retained sequence numbers are always a contiguous range
//! ending at [`LineBuffer::last_seq`].

use std::collections::BTreeMap;

/// Lines keyed by sequence number, oldest first.
pub type Lines = BTreeMap<u64, String>;

/// A fixed-capacity ring of numbered lines.
///
/// The buffer itself is not synchronized; the owning logger keeps it behind
/// its mutex.
#[derive(Debug, Default)]
pub struct LineBuffer {
    slots: Vec<Option<String>>,
    /// Slot index of the oldest retained line.
    head: usize,
    len: usize,
    last_seq: u64,
}

impl LineBuffer {
    /// Create a buffer holding at most `capacity` lines. Zero disables retention.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
            last_seq: 0,
        }
    }

    /// Maximum number of retained lines.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of lines currently retained.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no lines are retained.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest sequence number assigned so far, 0 before the first append.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Sequence number of the oldest retained line.
    pub fn first_seq(&self) -> Option<u64> {
        (self.len > 0).then(|| self.last_seq - self.len as u64 + 1)
    }

    /// Store `line` under the next sequence number and return it.
    ///
    /// When the ring is full the oldest line is overwritten. With zero
    /// capacity the number is still consumed but nothing is kept.
    pub fn append(&mut self, line: String) -> u64 {
        self.last_seq += 1;
        let capacity = self.capacity();
        if capacity == 0 {
            return self.last_seq;
        }

        if self.len == capacity {
            self.slots[self.head] = Some(line);
            self.head = (self.head + 1) % capacity;
        } else {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(line);
            self.len += 1;
        }
        self.last_seq
    }

    /// Change the capacity, dropping the oldest lines that no longer fit.
    pub fn resize(&mut self, capacity: usize) {
        if capacity == self.capacity() {
            return;
        }

        let keep = self.len.min(capacity);
        let skip = self.len - keep;
        let mut slots = vec![None; capacity];
        for (i, slot) in slots.iter_mut().enumerate().take(keep) {
            let old = (self.head + skip + i) % self.capacity();
            *slot = self.slots[old].take();
        }

        self.slots = slots;
        self.head = 0;
        self.len = keep;
    }

    /// Line stored under `seq`, if it is still retained.
    pub fn get(&self, seq: u64) -> Option<&str> {
        let first = self.first_seq()?;
        if seq < first || seq > self.last_seq {
            return None;
        }
        let offset = (seq - first) as usize;
        self.slots[(self.head + offset) % self.capacity()].as_deref()
    }

    /// The newest `max_lines` lines, or fewer if not that many are retained.
    pub fn get_range(&self, max_lines: usize) -> Lines {
        let count = max_lines.min(self.len) as u64;
        self.collect_from(self.last_seq - count + 1)
    }

    /// Every retained line numbered `from_seq` or later.
    ///
    /// A start that has already been evicted is moved up to the oldest
    /// retained line.
    pub fn get_since(&self, from_seq: u64) -> Lines {
        match self.first_seq() {
            Some(first) => self.collect_from(from_seq.max(first)),
            None => Lines::new(),
        }
    }

    fn collect_from(&self, start: u64) -> Lines {
        (start..=self.last_seq)
            .filter_map(|seq| self.get(seq).map(|line| (seq, line.to_string())))
            .collect()
    }
}

/// Render lines as a JSON object keyed by decimal sequence numbers.
pub fn lines_to_json(lines: &Lines) -> String {
    serde_json::to_string(lines).unwrap_or_else(|_| "{}".to_string())
}
