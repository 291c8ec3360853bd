use chrono::{ DateTime, SecondsFormat, Utc };
use std::fmt::Write;

use crate::models::blueprint::{ ExportData, ExportNode, ExportProject, NodeType, Project };

pub const EXPORT_VERSION: &str = "1.0.0";
pub const EXPORT_PLATFORM: &str = "web";

pub fn generate_export_json(project: &Project, now: DateTime<Utc>) -> ExportData {
    ExportData {
        version: EXPORT_VERSION.to_string(),
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        project: ExportProject {
            title: non_empty_or(&project.title, "Untitled Project"),
            summary: non_empty_or(&project.summary, "No summary"),
            platform: EXPORT_PLATFORM.to_string(),
            node_count: project.nodes.len(),
        },
        nodes: project.nodes
            .iter()
            .map(|node| ExportNode {
                id: node.id.clone(),
                node_type: node.node_type,
                label: node.node_type.label().to_string(),
                icon: node.node_type.icon().to_string(),
                content: node.content.clone(),
            })
            .collect(),
    }
}

/// Markdown report meant to be pasted into another AI tool. Embeds the JSON
/// export so the structure survives the round trip.
pub fn generate_blueprint_markdown(project: &Project, now: DateTime<Utc>) -> String {
    let data = generate_export_json(project, now);
    let date_str = now.format("%-d %B %Y, %H:%M UTC");

    // group by type, keeping first-appearance order
    let mut groups: Vec<(NodeType, Vec<&ExportNode>)> = Vec::new();
    for node in &data.nodes {
        match groups.iter_mut().find(|(t, _)| *t == node.node_type) {
            Some((_, members)) => members.push(node),
            None => groups.push((node.node_type, vec![node])),
        }
    }

    // writing into a String cannot fail
    let mut md = String::new();
    let _ = write!(
        md,
        "# 🎯 {title}\n\n\
         > **Project Blueprint** - Generated by AI FlowChart Builder\n\
         > 📅 {date}\n\n\
         ---\n\n\
         ## 📋 Executive Summary\n\n\
         {summary}\n\n\
         **Project Statistics:**\n\
         - 📊 Total Nodes: {count}\n\
         - 🌐 Platform: {platform}\n\n\
         ---\n\n\
         ## 🏗️ Project Structure\n\n",
        title = data.project.title,
        date = date_str,
        summary = data.project.summary,
        count = data.project.node_count,
        platform = data.project.platform
    );

    if groups.is_empty() {
        md.push_str("> ⚠️ This project has no nodes.\n\n");
    } else {
        md.push_str("### All Components\n\n");
        for (node_type, members) in &groups {
            let _ = write!(md, "#### {} {}\n\n", node_type.icon(), node_type.label());
            for (idx, node) in members.iter().enumerate() {
                let content = if node.content.is_empty() { "(Not filled in)" } else { node.content.as_str() };
                let _ = write!(md, "**{}. {}**\n\n", idx + 1, content);
            }
        }
    }

    md.push_str("---\n\n## 💡 Node Details\n\n");
    for (idx, node) in data.nodes.iter().enumerate() {
        let content = if node.content.is_empty() { "(No content)" } else { node.content.as_str() };
        let _ = write!(md, "### {}. {} {}\n\n```\n{}\n```\n\n", idx + 1, node.icon, node.label, content);
    }

    let json = serde_json::to_string_pretty(&data).unwrap_or_default();
    let _ = write!(
        md,
        "---\n\n\
         ## 📦 Blueprint Data (JSON)\n\n\
         Structured data for AI processing:\n\n\
         ```json\n{json}\n```\n\n\
         ---\n\n\
         ## 🤖 Instructions for AI\n\n\
         This is a project blueprint generated by AI FlowChart Builder.\n\
         Please analyse the project structure and provide:\n\n\
         1. **Feasibility Analysis** - Can this project be delivered?\n\
         2. **Improvement Suggestions** - What could be added?\n\
         3. **Next Steps** - What are the development steps?\n\
         4. **Time Estimate** - How long will it take?\n\
         5. **Recommended Technology** - Which stack fits?\n\n\
         ---\n\n\
         *Generated by BlueprintOS v1.0 • AI FlowChart Builder*\n",
        json = json
    );

    md
}

/// Download name for a Markdown export, e.g. `My App-1700000000000.blueprint.md`.
pub fn blueprint_filename(title: &str, now: DateTime<Utc>) -> String {
    let stem = if title.is_empty() { "blueprint" } else { title };
    format!("{}-{}.blueprint.md", stem, now.timestamp_millis())
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() { fallback.to_string() } else { value.to_string() }
}
