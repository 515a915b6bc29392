use serde::Serialize;

use crate::model::Task;

#[derive(Serialize)]
pub struct StatusJson<'a> {
    pub logged_in: bool,
    pub base_url: &'a str,
    pub cookie_file: String,
}

/// `[x] 3  title`, then the description indented on its own line
pub fn format_task(task: &Task) -> Vec<String> {
    let check = if task.completed { 'x' } else { ' ' };
    let mut lines = vec![format!("[{}] {}  {}", check, task.id, task.title)];
    let description = task.description.trim();
    if !description.is_empty() {
        for line in description.lines() {
            lines.push(format!("      {}", line));
        }
    }
    lines
}

pub fn format_task_list(tasks: &[Task]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["no tasks".to_string()];
    }
    tasks.iter().flat_map(format_task).collect()
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use pretty_assertions::assert_eq;

    fn task(id: u64, title: &str, description: &str, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    #[test]
    fn task_lines() {
        assert_eq!(format_task(&task(3, "Buy milk", "", false)), vec!["[ ] 3  Buy milk"]);
        assert_eq!(
            format_task(&task(4, "Call mom", "about\nthe order", true)),
            vec!["[x] 4  Call mom", "      about", "      the order"]
        );
    }

    #[test]
    fn empty_list() {
        assert_eq!(format_task_list(&[]), vec!["no tasks"]);
    }

    #[test]
    fn json_uses_wire_field_names() {
        let out = to_json(&[task(1, "a", "", true)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["completed"], true);
        assert_eq!(value[0]["description"], "");
    }
}
