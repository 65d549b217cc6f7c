/// How a class name is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Controller,
    Model,
    Tool,
}

impl ClassKind {
    /// Classifies a class name by convention.
    ///
    /// Checked in order: a name containing `Controller` and longer than 10
    /// characters is a controller, one containing `Model` and longer than 5 is
    /// a model, anything else is a tool.
    pub fn classify(name: &str) -> Self {
        if name.contains("Controller") && name.len() > 10 {
            ClassKind::Controller
        } else if name.contains("Model") && name.len() > 5 {
            ClassKind::Model
        } else {
            ClassKind::Tool
        }
    }
}
