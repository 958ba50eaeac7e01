use std::io::Read;

use anyhow::{Context, Result, anyhow};
use eframe::egui::Color32;
use serde::Deserialize;

use super::table::{LinkKind, LinkRecord, NodeKind, NodeRecord};

#[derive(Debug, Deserialize)]
struct RawNodeRow {
    id: String,
    name: String,
    connections: u32,
    size: f32,
    color: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawLinkRow {
    source: String,
    target: String,
    strength: f32,
    #[serde(rename = "type")]
    kind: String,
}

pub(super) fn parse_nodes(input: impl Read) -> Result<Vec<NodeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut nodes = Vec::new();
    for (index, row) in reader.deserialize::<RawNodeRow>().enumerate() {
        let row = row.with_context(|| format!("invalid node row {}", index + 1))?;
        if row.id.is_empty() {
            return Err(anyhow!("node row {} has an empty id", index + 1));
        }

        let kind = parse_node_kind(&row.kind)
            .with_context(|| format!("node '{}' has unknown type '{}'", row.id, row.kind))?;
        let color = parse_css_color(&row.color).unwrap_or_else(|| {
            log::warn!("node '{}' has unparseable color '{}'", row.id, row.color);
            Color32::GRAY
        });

        nodes.push(NodeRecord {
            id: row.id,
            name: row.name,
            connections: row.connections,
            size: row.size,
            color,
            kind,
        });
    }

    Ok(nodes)
}

pub(super) fn parse_links(input: impl Read) -> Result<Vec<LinkRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut links = Vec::new();
    for (index, row) in reader.deserialize::<RawLinkRow>().enumerate() {
        let row = row.with_context(|| format!("invalid edge row {}", index + 1))?;
        if row.source.is_empty() || row.target.is_empty() {
            return Err(anyhow!("edge row {} has an empty endpoint", index + 1));
        }

        links.push(LinkRecord {
            source: row.source,
            target: row.target,
            strength: row.strength,
            kind: parse_link_kind(&row.kind),
        });
    }

    Ok(links)
}

fn parse_node_kind(value: &str) -> Result<NodeKind> {
    match value {
        "center" => Ok(NodeKind::Center),
        "outer" => Ok(NodeKind::Outer),
        "floating" => Ok(NodeKind::Floating),
        other => Err(anyhow!("unknown node type '{other}'")),
    }
}

fn parse_link_kind(value: &str) -> LinkKind {
    match value {
        "directed" => LinkKind::Directed,
        "bidirectional" => LinkKind::Bidirectional,
        _ => LinkKind::Plain,
    }
}

pub(super) fn parse_css_color(value: &str) -> Option<Color32> {
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    match value.to_ascii_lowercase().as_str() {
        "black" => Some(Color32::BLACK),
        "white" => Some(Color32::WHITE),
        "red" => Some(Color32::from_rgb(0xff, 0x00, 0x00)),
        "green" => Some(Color32::from_rgb(0x00, 0x80, 0x00)),
        "blue" => Some(Color32::from_rgb(0x00, 0x00, 0xff)),
        "yellow" => Some(Color32::from_rgb(0xff, 0xff, 0x00)),
        "orange" => Some(Color32::from_rgb(0xff, 0xa5, 0x00)),
        "purple" => Some(Color32::from_rgb(0x80, 0x00, 0x80)),
        "teal" => Some(Color32::from_rgb(0x00, 0x80, 0x80)),
        "gray" | "grey" => Some(Color32::from_rgb(0x80, 0x80, 0x80)),
        _ => None,
    }
}

fn parse_hex_color(hex: &str) -> Option<Color32> {
    let expand = |nibble: u8| (nibble << 4) | nibble;

    match hex.len() {
        3 | 4 => {
            let mut parts = [0u8; 4];
            for (slot, digit) in parts.iter_mut().zip(hex.chars()) {
                *slot = expand(digit.to_digit(16)? as u8);
            }
            if hex.len() == 3 {
                parts[3] = 0xff;
            }
            Some(Color32::from_rgba_unmultiplied(
                parts[0], parts[1], parts[2], parts[3],
            ))
        }
        6 | 8 => {
            let mut parts = [0u8; 4];
            for (slot, pair) in parts.iter_mut().zip(hex.as_bytes().chunks(2)) {
                let pair = std::str::from_utf8(pair).ok()?;
                *slot = u8::from_str_radix(pair, 16).ok()?;
            }
            if hex.len() == 6 {
                parts[3] = 0xff;
            }
            Some(Color32::from_rgba_unmultiplied(
                parts[0], parts[1], parts[2], parts[3],
            ))
        }
        _ => None,
    }
}
