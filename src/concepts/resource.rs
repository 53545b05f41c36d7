use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

fn default_nr_resources() -> usize {
    1
}

/// A resource of limited capacity.  Requests are made by holders, which
/// are served first in, first out.  A holder already using the resource is
/// granted again without queueing, so activities sharing a holder key can
/// pass a resource between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default = "default_nr_resources")]
    capacity: usize,
    #[serde(skip)]
    users: Vec<String>,
    #[serde(skip)]
    queue: VecDeque<String>,
}

impl Default for Resource {
    fn default() -> Self {
        Self::new(default_nr_resources())
    }
}

impl Resource {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            users: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Requests the resource for `holder`, returning whether the holder is
    /// now using the resource.  Ungranted requests are queued, and repeating
    /// the request reports on the queued request.
    pub fn request(&mut self, holder: &str) -> bool {
        if self.is_granted(holder) {
            return true;
        }
        if !self.queue.iter().any(|queued| queued == holder) {
            self.queue.push_back(holder.to_string());
        }
        self.promote();
        self.is_granted(holder)
    }

    /// Releases the resource, or withdraws the queued request, of `holder`.
    /// Returns whether anything changed.
    pub fn release(&mut self, holder: &str) -> bool {
        let users = self.users.len();
        let queue = self.queue.len();
        self.users.retain(|user| user != holder);
        self.queue.retain(|queued| queued != holder);
        self.promote();
        users != self.users.len() || queue != self.queue.len()
    }

    fn promote(&mut self) {
        while self.users.len() < self.capacity {
            match self.queue.pop_front() {
                Some(holder) => self.users.push(holder),
                None => break,
            }
        }
    }

    pub fn is_granted(&self, holder: &str) -> bool {
        self.users.iter().any(|user| user == holder)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
