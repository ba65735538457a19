use tera::{Context, Tera};

use crate::core::{Todo, TodoError, TodoView};

const BASE_TEMPLATE: &str = "base.html";
const TODO_TEMPLATE: &str = "todo.html";

/// Compiled page and fragment templates. Both are embedded in the binary and
/// autoescaped.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, TodoError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (BASE_TEMPLATE, include_str!("../../../templates/base.html")),
            (TODO_TEMPLATE, include_str!("../../../templates/todo.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Full page listing `todos` in the order given.
    pub fn render_page(&self, todos: &[Todo]) -> Result<String, TodoError> {
        let views: Vec<TodoView> = todos.iter().map(TodoView::from).collect();
        let mut ctx = Context::new();
        ctx.insert("todos", &views);
        Ok(self.tera.render(BASE_TEMPLATE, &ctx)?)
    }

    /// Single `<li>` fragment for htmx swaps.
    pub fn render_todo(&self, todo: &Todo) -> Result<String, TodoError> {
        let mut ctx = Context::new();
        ctx.insert("todo", &TodoView::from(todo));
        Ok(self.tera.render(TODO_TEMPLATE, &ctx)?)
    }
}
