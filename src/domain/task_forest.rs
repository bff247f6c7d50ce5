use crate::domain::models::TaskNode;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct TaskForest {
    by_id: HashMap<i64, TaskNode>,
    by_parent: HashMap<i64, HashMap<String, Vec<i64>>>,
}

impl TaskForest {
    pub fn new(tasks: impl IntoIterator<Item = TaskNode>) -> Self {
        let mut forest = Self::default();
        for task in tasks {
            if forest.by_id.contains_key(&task.task_id) {
                warn!(task_id = task.task_id, name = %task.name, "ignoring duplicate task id");
                continue;
            }
            forest
                .by_parent
                .entry(task.parent_id)
                .or_default()
                .entry(task.name.clone())
                .or_default()
                .push(task.task_id);
            forest.by_id.insert(task.task_id, task);
        }
        forest
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, task_id: i64) -> Option<&TaskNode> {
        self.by_id.get(&task_id)
    }

    pub fn children_named(&self, parent_id: i64, name: &str) -> &[i64] {
        self.by_parent
            .get(&parent_id)
            .and_then(|children| children.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
