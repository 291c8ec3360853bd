use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Title,
    Planning,
    Feature,
    Idea,
    Technical,
    Api,
    Database,
}

impl NodeType {
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Title => "Title",
            NodeType::Planning => "Planning",
            NodeType::Feature => "Feature",
            NodeType::Idea => "Idea",
            NodeType::Technical => "Technical",
            NodeType::Api => "API",
            NodeType::Database => "Database",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Title => "🚀",
            NodeType::Planning => "📋",
            NodeType::Feature => "✨",
            NodeType::Idea => "💡",
            NodeType::Technical => "⚙️",
            NodeType::Api => "🔌",
            NodeType::Database => "🗄️",
        }
    }
}

/// A shape on the canvas. Position is carried through but never rendered here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProject {
    pub title: String,
    pub summary: String,
    pub platform: String,
    pub node_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub icon: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub exported_at: String,
    pub project: ExportProject,
    pub nodes: Vec<ExportNode>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub content: &'static str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub default_title: &'static str,
    pub default_summary: &'static str,
    pub nodes: Vec<TemplateNode>,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub prompt: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}
