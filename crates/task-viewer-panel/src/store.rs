/*
[INPUT]:  Task collections from successful fetches, sort toggle events
[OUTPUT]: Ordered read-only view of the last fetched tasks, lookup by id
[POS]:    Panel core - authoritative in-memory task collection
[UPDATE]: When changing sort behaviour or lookup semantics
*/

use std::cmp::Ordering;

use task_viewer_adapter::Task;

/// Last fetched task set plus its sort order.
///
/// The collection is only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    sort_ascending: bool,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            sort_ascending: true,
        }
    }

    /// Swap in a new collection, ordered by the current sort direction
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.apply_sort();
    }

    /// Stable sort with a caller-supplied comparator
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Task, &Task) -> Ordering,
    {
        self.tasks.sort_by(compare);
    }

    /// Flip the created-date direction and re-sort in place
    pub fn toggle_sort(&mut self) -> bool {
        self.sort_ascending = !self.sort_ascending;
        self.apply_sort();
        self.sort_ascending
    }

    pub fn set_sort_ascending(&mut self, ascending: bool) {
        self.sort_ascending = ascending;
        self.apply_sort();
    }

    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn apply_sort(&mut self) {
        let ascending = self.sort_ascending;
        self.sort_by(|a, b| {
            let ordering = by_created_date(a, b);
            if ascending { ordering } else { ordering.reverse() }
        });
    }
}

/// Ascending by creation time; tasks without a date come first
pub fn by_created_date(a: &Task, b: &Task) -> Ordering {
    a.created_date.cmp(&b.created_date)
}
