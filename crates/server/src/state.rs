use std::sync::Arc;

use service::todo::TodoService;

#[derive(Clone)]
pub struct ServerState {
    pub todo: Arc<TodoService>,
}

impl ServerState {
    pub fn new(todo: Arc<TodoService>) -> Self {
        Self { todo }
    }
}
