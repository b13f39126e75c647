use crate::model::{display_date, Task};

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    let mark = if task.is_done() { " ✓" } else { "" };
    out.push_str(&format!("Title:       {}{}\n", task.title, mark));
    out.push_str(&format!("Id:          {}\n", task.id));
    out.push_str(&format!("Status:      {}\n", task.status.label()));
    out.push_str(&format!("Priority:    {}\n", task.priority));
    if let Some(ref deadline) = task.deadline {
        out.push_str(&format!("Deadline:    {}\n", display_date(deadline)));
    }
    if let Some(ref created) = task.created_at {
        out.push_str(&format!("Created:     {}\n", display_date(created)));
    }
    if let Some(ref desc) = task.description {
        out.push_str(&format!("Description: {}\n", desc));
    }
    out
}

pub fn format_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let mark = if task.is_done() { "✓" } else { " " };
        let desc = task
            .description
            .as_ref()
            .map(|d| format!("  {d}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} [{}] {} ({}/{}){}\n",
            mark, task.id, task.title, task.status, task.priority, desc
        ));
    }
    out
}
