use std::collections::HashSet;
use std::fs::File;

use anyhow::{Context, Result, anyhow};

use super::parse::{parse_links, parse_nodes};
use super::table::{GraphData, NodeKind, NodeRecord};

#[derive(Clone, Debug)]
pub struct DataSources {
    pub nodes_path: String,
    pub edges_path: String,
}

pub fn load_graph_data(sources: &DataSources) -> Result<GraphData> {
    let nodes_file = File::open(&sources.nodes_path)
        .with_context(|| format!("failed to open node table {}", sources.nodes_path))?;
    let nodes = parse_nodes(nodes_file)
        .with_context(|| format!("failed to parse node table {}", sources.nodes_path))?;

    let edges_file = File::open(&sources.edges_path)
        .with_context(|| format!("failed to open edge table {}", sources.edges_path))?;
    let links = parse_links(edges_file)
        .with_context(|| format!("failed to parse edge table {}", sources.edges_path))?;

    let nodes = validate_nodes(nodes)?;

    for link in &links {
        log::debug!(
            "loaded edge {} -> {} (strength {}, {:?})",
            link.source,
            link.target,
            link.strength,
            link.kind
        );
    }

    Ok(GraphData { nodes, links })
}

/// Loads both tables; any failure degrades to the single-node substitute
/// dataset so the renderer always has something to draw. No retry.
pub fn load_or_fallback(sources: &DataSources) -> GraphData {
    match load_graph_data(sources) {
        Ok(data) => {
            log::debug!(
                "loaded {} nodes and {} links",
                data.node_count(),
                data.link_count()
            );
            data
        }
        Err(error) => {
            log::warn!("falling back to substitute dataset: {error:#}");
            GraphData::fallback()
        }
    }
}

fn validate_nodes(mut nodes: Vec<NodeRecord>) -> Result<Vec<NodeRecord>> {
    let mut seen = HashSet::new();
    for node in &nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(anyhow!("duplicate node id '{}'", node.id));
        }
    }

    let mut center_seen = false;
    for node in &mut nodes {
        if node.kind != NodeKind::Center {
            continue;
        }
        if center_seen {
            log::warn!("extra center node '{}' demoted to outer", node.id);
            node.kind = NodeKind::Outer;
        } else {
            center_seen = true;
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::*;

    fn node(id: &str, kind: NodeKind) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            name: id.to_owned(),
            connections: 0,
            size: 10.0,
            color: Color32::GRAY,
            kind,
        }
    }

    #[test]
    fn missing_file_falls_back_to_single_error_node() {
        let sources = DataSources {
            nodes_path: "/nonexistent/nodes.csv".to_owned(),
            edges_path: "/nonexistent/edges.csv".to_owned(),
        };

        let data = load_or_fallback(&sources);
        assert_eq!(data.node_count(), 1);
        assert_eq!(data.link_count(), 0);
        assert_eq!(data.nodes[0].id, "error");
        assert_eq!(data.nodes[0].kind, NodeKind::Center);
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let nodes = vec![node("a", NodeKind::Outer), node("a", NodeKind::Outer)];
        assert!(validate_nodes(nodes).is_err());
    }

    #[test]
    fn extra_center_nodes_demote_to_outer() {
        let nodes = vec![
            node("a", NodeKind::Center),
            node("b", NodeKind::Center),
            node("c", NodeKind::Outer),
        ];

        let nodes = validate_nodes(nodes).unwrap();
        assert_eq!(nodes[0].kind, NodeKind::Center);
        assert_eq!(nodes[1].kind, NodeKind::Outer);
        assert_eq!(nodes[2].kind, NodeKind::Outer);
    }

    #[test]
    fn zero_center_nodes_are_allowed() {
        let nodes = vec![node("a", NodeKind::Outer), node("b", NodeKind::Floating)];
        assert_eq!(validate_nodes(nodes).unwrap().len(), 2);
    }
}
