//! Dependency-ordered task execution.
//!
//! Tasks are grouped into waves by dependency depth. Each wave runs in
//! parallel on the rayon pool once every earlier wave has finished:
//!
//! ```text
//! wave 0:  transpile  copy-manifests  sass  extra-css  html  fonts
//! wave 1:  bundle                     styles
//! wave 2:  scripts
//! ```
//!
//! A wave starts only when the whole previous wave is done, so `styles`
//! also waits for unrelated wave-0 tasks such as `html` or `fonts`.
//!
//! A failed task never stops its siblings; it only marks the tasks that
//! depend on it (directly or transitively) as skipped.

use crate::log;
use anyhow::{Result, bail};
use rayon::prelude::*;
use std::collections::HashMap;

type TaskFn<'a> = Box<dyn Fn() -> Result<()> + Send + Sync + 'a>;

struct Task<'a> {
    name: &'static str,
    deps: Vec<&'static str>,
    run: TaskFn<'a>,
}

/// How a single task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Failed(String),
    /// Not run because a prerequisite did not succeed.
    Skipped { blocked_by: &'static str },
}

/// Outcome of every task, in declaration order.
#[derive(Debug)]
pub struct GraphReport {
    pub outcomes: Vec<(&'static str, TaskOutcome)>,
}

impl GraphReport {
    pub fn failed(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, TaskOutcome::Failed(_)))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Tasks that never ran because a prerequisite failed.
    pub fn skipped(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, TaskOutcome::Skipped { .. }))
            .map(|(name, _)| *name)
            .collect()
    }

    #[cfg(test)]
    pub fn outcome(&self, name: &str) -> Option<&TaskOutcome> {
        self.outcomes
            .iter()
            .find(|(task, _)| *task == name)
            .map(|(_, outcome)| outcome)
    }

    /// `Err` listing the failed tasks, if any.
    pub fn into_result(self) -> Result<()> {
        let failed = self.failed();
        if !failed.is_empty() {
            bail!("{} task(s) failed: {}", failed.len(), failed.join(", "));
        }
        Ok(())
    }
}

/// A set of named tasks with declared prerequisites.
#[derive(Default)]
pub struct TaskGraph<'a> {
    tasks: Vec<Task<'a>>,
}

impl<'a> TaskGraph<'a> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Declare a task running `run` after every task in `deps` succeeded.
    pub fn task(
        &mut self,
        name: &'static str,
        deps: &[&'static str],
        run: impl Fn() -> Result<()> + Send + Sync + 'a,
    ) -> &mut Self {
        self.tasks.push(Task {
            name,
            deps: deps.to_vec(),
            run: Box::new(run),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Group task indices into waves; rejects duplicates, unknown
    /// dependencies and cycles.
    fn waves(&self) -> Result<Vec<Vec<usize>>> {
        let mut index = HashMap::with_capacity(self.tasks.len());
        for (i, task) in self.tasks.iter().enumerate() {
            if index.insert(task.name, i).is_some() {
                bail!("task `{}` declared twice", task.name);
            }
        }

        let mut deps = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let mut resolved = Vec::with_capacity(task.deps.len());
            for dep in &task.deps {
                match index.get(dep) {
                    Some(&i) => resolved.push(i),
                    None => bail!("task `{}` depends on unknown task `{}`", task.name, dep),
                }
            }
            deps.push(resolved);
        }

        // Kahn's algorithm, one level at a time.
        let mut level: Vec<Option<usize>> = vec![None; self.tasks.len()];
        let mut waves: Vec<Vec<usize>> = Vec::new();
        let mut placed = 0;
        while placed < self.tasks.len() {
            let wave: Vec<usize> = (0..self.tasks.len())
                .filter(|&i| level[i].is_none())
                .filter(|&i| deps[i].iter().all(|&d| level[d].is_some()))
                .collect();
            if wave.is_empty() {
                let stuck: Vec<_> = (0..self.tasks.len())
                    .filter(|&i| level[i].is_none())
                    .map(|i| self.tasks[i].name)
                    .collect();
                bail!("dependency cycle between tasks: {}", stuck.join(", "));
            }
            for &i in &wave {
                level[i] = Some(waves.len());
            }
            placed += wave.len();
            waves.push(wave);
        }

        Ok(waves)
    }

    /// Run every task; `on_finish` is called once per task, whatever its
    /// outcome. Only structural problems return `Err`.
    pub fn run(&self, on_finish: impl Fn(&'static str) + Sync) -> Result<GraphReport> {
        let waves = self.waves()?;
        let mut outcomes: Vec<Option<TaskOutcome>> = vec![None; self.tasks.len()];

        for wave in waves {
            let results: Vec<(usize, TaskOutcome)> = wave
                .par_iter()
                .map(|&i| {
                    let task = &self.tasks[i];
                    let outcome = match self.blocker(task, &outcomes) {
                        Some(blocked_by) => {
                            log!("warn"; "{}: skipped, `{}` did not succeed", task.name, blocked_by);
                            TaskOutcome::Skipped { blocked_by }
                        }
                        None => match (task.run)() {
                            Ok(()) => TaskOutcome::Succeeded,
                            Err(err) => {
                                log!("error"; "{}: {:#}", task.name, err);
                                TaskOutcome::Failed(format!("{err:#}"))
                            }
                        },
                    };
                    on_finish(task.name);
                    (i, outcome)
                })
                .collect();

            for (i, outcome) in results {
                outcomes[i] = Some(outcome);
            }
        }

        Ok(GraphReport {
            outcomes: self
                .tasks
                .iter()
                .zip(outcomes)
                .map(|(task, outcome)| {
                    (task.name, outcome.unwrap_or(TaskOutcome::Skipped { blocked_by: task.name }))
                })
                .collect(),
        })
    }

    /// First prerequisite of `task` that did not succeed.
    fn blocker(&self, task: &Task<'_>, outcomes: &[Option<TaskOutcome>]) -> Option<&'static str> {
        task.deps.iter().copied().find(|dep| {
            let done = self
                .tasks
                .iter()
                .position(|t| t.name == *dep)
                .and_then(|i| outcomes[i].as_ref());
            !matches!(done, Some(TaskOutcome::Succeeded))
        })
    }
}
