use crate::domain::models::{ROOT_PARENT_ID, join_task_path, split_task_path};
use crate::domain::task_forest::TaskForest;
use crate::infrastructure::entry_mapper::TimeCampEntry;
use crate::infrastructure::error::SyncError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ServiceMapping {
    to_remote: HashMap<String, String>,
    to_local: HashMap<String, String>,
}

impl ServiceMapping {
    pub fn new<I, L, P>(pairs: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: Into<String>,
    {
        let mut mapping = Self::default();
        for (label, path) in pairs {
            let label = label.into();
            let path = path.into();
            if mapping.to_remote.contains_key(&label) {
                return Err(SyncError::InvalidConfig(format!(
                    "service '{label}' is mapped more than once"
                )));
            }
            if mapping.to_local.contains_key(&path) {
                return Err(SyncError::InvalidConfig(format!(
                    "task path '{path}' is mapped more than once"
                )));
            }
            mapping.to_local.insert(path.clone(), label.clone());
            mapping.to_remote.insert(label, path);
        }
        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.to_remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_remote.is_empty()
    }

    pub fn remote_path<'a>(&'a self, label: &'a str) -> &'a str {
        self.to_remote.get(label).map_or(label, String::as_str)
    }

    pub fn local_label<'a>(&'a self, path: &'a str) -> &'a str {
        self.to_local.get(path).map_or(path, String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskResolver {
    mapping: ServiceMapping,
}

impl TaskResolver {
    pub fn new(mapping: ServiceMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &ServiceMapping {
        &self.mapping
    }

    pub fn resolve_task_id(&self, forest: &TaskForest, service: &str) -> Result<i64, SyncError> {
        let path = self.mapping.remote_path(service);
        let mut parent_id = ROOT_PARENT_ID;

        for segment in split_task_path(path) {
            parent_id = match forest.children_named(parent_id, segment) {
                [task_id] => *task_id,
                matches => {
                    return Err(SyncError::UnresolvedTask {
                        path: path.to_string(),
                        segment: segment.to_string(),
                        parent_id,
                        matches: matches.len(),
                    });
                }
            };
        }

        Ok(parent_id)
    }

    pub fn resolve_service_name(
        &self,
        forest: &TaskForest,
        entry: &TimeCampEntry,
    ) -> Result<String, SyncError> {
        let leaf_id = entry.task_number()?;
        let mut task_id = leaf_id;
        let mut names = Vec::new();

        while task_id != ROOT_PARENT_ID {
            let task = forest.get(task_id).ok_or_else(|| SyncError::DanglingTask {
                task_id: task_id.to_string(),
            })?;
            names.push(task.name.as_str());
            // An acyclic chain visits each task at most once.
            if names.len() > forest.len() {
                return Err(SyncError::CyclicTask { task_id: leaf_id });
            }
            task_id = task.parent_id;
        }

        names.reverse();
        let path = join_task_path(&names);
        Ok(self.mapping.local_label(&path).to_string())
    }
}
