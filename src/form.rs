use chrono::NaiveDate;

use crate::model::{CreateTaskInput, TaskPriority, TaskStatus};
use crate::validate::{validate_deadline, validate_title};

/// The local calendar date deadlines are checked against.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Status,
    Priority,
    Deadline,
}

impl Field {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::Deadline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Task Name *",
            Self::Description => "Description",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::Deadline => "Deadline",
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, Self::Status | Self::Priority)
    }
}

/// Per-field validation messages. Description has no rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Description => None,
            Field::Status => self.status.as_deref(),
            Field::Priority => self.priority.as_deref(),
            Field::Deadline => self.deadline.as_deref(),
        }
    }

    /// Messages in field order.
    pub fn messages(&self) -> Vec<&str> {
        Field::ALL.iter().filter_map(|f| self.get(*f)).collect()
    }
}

/// The create form's raw text, validated as a whole on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub deadline: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::default().as_str().to_string(),
            priority: TaskPriority::default().as_str().to_string(),
            deadline: String::new(),
        }
    }
}

impl TaskForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Status => &self.status,
            Field::Priority => &self.priority,
            Field::Deadline => &self.deadline,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Status => &mut self.status,
            Field::Priority => &mut self.priority,
            Field::Deadline => &mut self.deadline,
        }
    }

    /// Step a choice field through its enum, wrapping at both ends.
    /// Values outside the enum restart from the first choice.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        fn step<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> T {
            let n = all.len();
            match current.and_then(|c| all.iter().position(|x| *x == c)) {
                Some(i) if forward => all[(i + 1) % n],
                Some(i) => all[(i + n - 1) % n],
                None => all[0],
            }
        }

        match field {
            Field::Status => {
                let next = step(&TaskStatus::ALL, TaskStatus::parse(&self.status).ok(), forward);
                self.status = next.as_str().to_string();
            }
            Field::Priority => {
                let next = step(
                    &TaskPriority::ALL,
                    TaskPriority::parse(&self.priority).ok(),
                    forward,
                );
                self.priority = next.as_str().to_string();
            }
            _ => {}
        }
    }

    pub fn validate(&self, today: NaiveDate) -> FormErrors {
        match self.to_input(today) {
            Ok(_) => FormErrors::default(),
            Err(errors) => errors,
        }
    }

    /// The exact values entered, or every failing rule's message.
    pub fn to_input(&self, today: NaiveDate) -> Result<CreateTaskInput, FormErrors> {
        let title = validate_title(&self.title);
        let status = TaskStatus::parse(&self.status).map_err(|e| e.to_string());
        let priority = TaskPriority::parse(&self.priority).map_err(|e| e.to_string());
        let deadline = validate_deadline(&self.deadline, today);

        match (title, status, priority, deadline) {
            (Ok(()), Ok(status), Ok(priority), Ok(deadline)) => Ok(CreateTaskInput {
                title: self.title.clone(),
                description: if self.description.is_empty() {
                    None
                } else {
                    Some(self.description.clone())
                },
                status,
                priority,
                deadline,
            }),
            (title, status, priority, deadline) => Err(FormErrors {
                title: title.err(),
                status: status.err(),
                priority: priority.err(),
                deadline: deadline.err(),
            }),
        }
    }
}
