use eframe::egui::Color32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Center,
    Outer,
    Floating,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Outer => "outer",
            Self::Floating => "floating",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Directed,
    Bidirectional,
    Plain,
}

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub connections: u32,
    pub size: f32,
    pub color: Color32,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    pub strength: f32,
    pub kind: LinkKind,
}

#[derive(Clone, Debug)]
pub struct GraphData {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

impl GraphData {
    /// Substitute dataset rendered when either table fails to load. The
    /// window always shows something; the placeholder label is the only
    /// user-visible trace of the failure.
    pub fn fallback() -> Self {
        Self {
            nodes: vec![NodeRecord {
                id: "error".to_owned(),
                name: "CSV Load Error".to_owned(),
                connections: 0,
                size: 20.0,
                color: Color32::from_rgb(0xff, 0x00, 0x00),
                kind: NodeKind::Center,
            }],
            links: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
