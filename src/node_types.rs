use serde::{Deserialize, Serialize};

/// What a node box stands for. Selects the default header colour.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    #[default]
    Function,
    Event,
}

impl NodeKind {
    /// Key used in `EditorStyle::header_colors`.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Function => "Function",
            NodeKind::Event => "Event",
        }
    }
}
