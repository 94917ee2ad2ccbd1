//! Usage instructions and canned prompts served next to the todo list.

use serde::Serialize;

pub const SERVER_INSTRUCTIONS: &str = "\
Task Management

Use todo_read and todo_write to manage work items. Read first, then modify as needed, \
and finally write back the updated list in markdown.

Workflow:
1. Read: retrieve the current TODO list
2. Select: choose the next incomplete task to work on
3. Update: modify the list, removing completed tasks
4. Write: save the revised list

IMPORTANT: todo_write replaces the entire list. Always read first; writing without reading may lose data.

Guidelines:
- Keep entries concise and actionable
- Break complex tasks into smaller subtasks when needed
- Remove completed tasks promptly to avoid confusion

Template:
- [ ] Implement feature X
  - [ ] Update API
  - [ ] Write tests
  - [ ] Run tests
  - [ ] Run lint
- [ ] Blocked: waiting on credentials";

pub const TODO_TASK_PROMPT: &str = "todo-task";

const TODO_TASK_MESSAGE: &str = "Review the TODO list below and implement the first incomplete task. \
When complete, remove it from the list by reading the current state with todo_read, then updating \
with todo_write. Feel free to add subtasks if needed.";

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Prompt {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub fn prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: TODO_TASK_PROMPT,
        title: "Process next todo item",
        description: "Automatically process the next pending todo item from the TODO list",
    }]
}

pub fn todo_task_message(content: &str) -> String {
    format!("{TODO_TASK_MESSAGE}\n\nCurrent TODO list:\n{content}")
}
