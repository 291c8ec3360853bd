use crate::models::blueprint::FlowNode;

/// System context handed to the model so it can reason about the user's plan.
pub fn generate_ai_context(title: &str, summary: &str, nodes: &[FlowNode]) -> String {
    let node_lines = nodes
        .iter()
        .map(|node| {
            let content = if node.content.is_empty() { "(empty)" } else { node.content.as_str() };
            format!("- {} {}: {}", node.node_type.icon(), node.node_type.label(), content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
You are the AI Planning Assistant for BlueprintOS.
You help users plan digital projects in a friendly, professional way.

## Current Project
**Title:** {title}
**Summary:** {summary}

## Project Nodes ({count} nodes)
{nodes}

## Your Tasks
1. Understand the user's project thoroughly
2. Give practical suggestions for improvement
3. Suggest features that may have been missed
4. Lay out clear next steps
5. Answer in the same language as the user

## Communication Style
- Friendly, like a teammate
- Brief but informative
- Use emoji for clarity
- Give concrete examples when needed
"#,
        title = if title.is_empty() { "Untitled" } else { title },
        summary = if summary.is_empty() { "No summary" } else { summary },
        count = nodes.len(),
        nodes = if node_lines.is_empty() { "No nodes yet".to_string() } else { node_lines }
    )
}
