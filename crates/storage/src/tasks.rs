use shared::domain::{NewTask, Priority, StatusFilter, Task, TaskId, TaskUpdate};
use tracing::debug;

use crate::{contains_ignore_case, Collection};

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Collection<Task>,
}

impl TaskStore {
    pub fn new(seed: Vec<Task>) -> Self {
        Self {
            tasks: Collection::new(seed),
        }
    }

    /// The three starter tasks shown on the tasks page.
    pub fn seeded() -> Self {
        Self::new(vec![
            seed_task(1, "Learn HTMX", Priority::High),
            seed_task(2, "Build Axum App", Priority::Medium),
            seed_task(3, "Deploy to Production", Priority::Low),
        ])
    }

    pub fn list(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Appends a task with id `max + 1`, or 1 when the store is empty.
    pub fn add(&mut self, new_task: NewTask) -> Task {
        let id = self
            .tasks
            .max_id()
            .map_or(TaskId(1), |TaskId(max)| TaskId(max + 1));
        let task = Task {
            id,
            title: new_task.title,
            completed: false,
            priority: new_task.priority,
        };
        self.tasks.push(task.clone());
        debug!(task_id = %id, "task added");
        task
    }

    pub fn update(&mut self, id: TaskId, update: TaskUpdate) -> Option<Task> {
        self.tasks.update(id, |task| {
            task.title = update.title;
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
        })
    }

    pub fn toggle(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.update(id, |task| task.completed = !task.completed)
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id)
    }

    pub fn find(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks.find(predicate)
    }

    pub fn filter(&self, status: StatusFilter) -> Vec<Task> {
        self.find(|task| status.matches(task))
    }

    /// Tasks matching `status` whose title contains `query`, ignoring case.
    pub fn search(&self, status: StatusFilter, query: &str) -> Vec<Task> {
        let needle = query.trim().to_lowercase();
        self.find(|task| status.matches(task) && contains_ignore_case(&task.title, &needle))
    }
}

fn seed_task(id: i64, title: &str, priority: Priority) -> Task {
    Task {
        id: TaskId(id),
        title: title.to_string(),
        completed: false,
        priority,
    }
}

#[cfg(test)]
#[path = "tests/tasks_tests.rs"]
mod tests;
