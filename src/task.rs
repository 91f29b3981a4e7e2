use crate::error::{Result, TowerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskType {
    Away,
    Land,
    Wait,
    Load,
    Takeoff,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Away,
        TaskType::Land,
        TaskType::Wait,
        TaskType::Load,
        TaskType::Takeoff,
    ];

    /// Legal successor table for the circular task list.
    pub fn allows(self, next: TaskType) -> bool {
        use TaskType::*;
        matches!(
            (self, next),
            (Takeoff, Away) | (Load, Takeoff) | (Wait | Land, Load | Wait) | (Away, Away | Land)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Away => "AWAY",
            TaskType::Land => "LAND",
            TaskType::Wait => "WAIT",
            TaskType::Load => "LOAD",
            TaskType::Takeoff => "TAKEOFF",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TowerError::malformed(format!("unknown task type '{s}'")))
    }
}

/// One scripted phase. Only `Load` carries a target percentage of cargo capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Away,
    Land,
    Wait,
    Load { percent: u8 },
    Takeoff,
}

impl Task {
    pub fn kind(self) -> TaskType {
        match self {
            Task::Away => TaskType::Away,
            Task::Land => TaskType::Land,
            Task::Wait => TaskType::Wait,
            Task::Load { .. } => TaskType::Load,
            Task::Takeoff => TaskType::Takeoff,
        }
    }

    pub fn load_percent(self) -> Option<u8> {
        match self {
            Task::Load { percent } => Some(percent),
            _ => None,
        }
    }

    pub fn encode(self) -> String {
        match self {
            Task::Load { percent } => format!("{}@{}", TaskType::Load, percent),
            other => other.kind().to_string(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Task::Load { percent } => write!(f, "LOAD at {percent}%"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl FromStr for Task {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('@') {
            None => match s.parse::<TaskType>()? {
                TaskType::Load => Err(TowerError::malformed("LOAD task without a load percentage")),
                TaskType::Away => Ok(Task::Away),
                TaskType::Land => Ok(Task::Land),
                TaskType::Wait => Ok(Task::Wait),
                TaskType::Takeoff => Ok(Task::Takeoff),
            },
            Some((kind, percent)) => {
                if kind.parse::<TaskType>()? != TaskType::Load {
                    return Err(TowerError::malformed(format!("only LOAD takes a percentage, got '{s}'")));
                }
                let percent = percent
                    .parse::<u8>()
                    .ok()
                    .filter(|p| *p <= 100)
                    .ok_or_else(|| TowerError::malformed(format!("invalid load percentage in '{s}'")))?;
                Ok(Task::Load { percent })
            }
        }
    }
}

/// Circular script of tasks with a pointer to the active one.
#[derive(Debug, Clone)]
pub struct TaskList {
    tasks: Vec<Task>,
    current: usize,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Result<TaskList> {
        if tasks.is_empty() {
            return Err(TowerError::InvalidTaskSequence("task list is empty".to_string()));
        }
        if let Some(task) = tasks.iter().find(|t| t.load_percent().is_some_and(|p| p > 100)) {
            return Err(TowerError::InvalidTaskSequence(format!("{task} exceeds 100%")));
        }
        for (i, task) in tasks.iter().enumerate() {
            let next = tasks[(i + 1) % tasks.len()];
            if !task.kind().allows(next.kind()) {
                return Err(TowerError::InvalidTaskSequence(format!(
                    "{} cannot be followed by {} (position {})",
                    task.kind(),
                    next.kind(),
                    i + 1
                )));
            }
        }
        Ok(TaskList { tasks, current: 0 })
    }

    pub fn current(&self) -> Task {
        self.tasks[self.current]
    }

    pub fn peek_next(&self) -> Task {
        self.tasks[(self.current + 1) % self.tasks.len()]
    }

    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.tasks.len();
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Every task exactly once, starting at the current one.
    pub fn iter_from_current(&self) -> impl Iterator<Item = Task> + '_ {
        self.tasks
            .iter()
            .cycle()
            .skip(self.current)
            .take(self.tasks.len())
            .copied()
    }

    pub fn encode(&self) -> String {
        self.iter_from_current()
            .map(Task::encode)
            .collect::<Vec<_>>()
            .join(",")
    }
}

// Two lists are equal when they run the same cycle from their current task,
// which is what survives an encode/decode pass.
impl PartialEq for TaskList {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter_from_current().eq(other.iter_from_current())
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TaskList currently on {} [{}/{}]",
            self.current(),
            self.current + 1,
            self.tasks.len()
        )
    }
}

impl FromStr for TaskList {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        let tasks = s.split(',').map(str::parse).collect::<Result<Vec<Task>>>()?;
        TaskList::new(tasks)
    }
}
