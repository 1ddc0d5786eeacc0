//! Markers and arrows drawn over the board

use shakmaty::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Frame,
    Circle,
    Square,
    /// Legal move hint
    Dot,
    Bevel,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Frame => "frame",
            MarkerKind::Circle => "circle",
            MarkerKind::Square => "square",
            MarkerKind::Dot => "dot",
            MarkerKind::Bevel => "bevel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKind {
    Default,
    Info,
    Warning,
    Danger,
}

impl ArrowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowKind::Default => "default",
            ArrowKind::Info => "info",
            ArrowKind::Warning => "warning",
            ArrowKind::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub square: Square,
}

impl Marker {
    pub fn new(kind: MarkerKind, square: Square) -> Self {
        Self { kind, square }
    }

    pub fn matches(&self, kind: Option<MarkerKind>, square: Option<Square>) -> bool {
        kind.map_or(true, |k| k == self.kind) && square.map_or(true, |s| s == self.square)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrow {
    pub kind: ArrowKind,
    pub from: Square,
    pub to: Square,
}

impl Arrow {
    pub fn new(kind: ArrowKind, from: Square, to: Square) -> Self {
        Self { kind, from, to }
    }

    pub fn matches(&self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) -> bool {
        kind.map_or(true, |k| k == self.kind)
            && from.map_or(true, |s| s == self.from)
            && to.map_or(true, |s| s == self.to)
    }
}

/// Markers and arrows with set semantics: adding an existing one is a no-op
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    markers: Vec<Marker>,
    arrows: Vec<Arrow>,
}

impl Annotations {
    pub fn add_marker(&mut self, marker: Marker) {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
    }

    pub fn markers(&self, kind: Option<MarkerKind>, square: Option<Square>) -> Vec<Marker> {
        self.markers.iter().filter(|m| m.matches(kind, square)).copied().collect()
    }

    pub fn remove_markers(&mut self, kind: Option<MarkerKind>, square: Option<Square>) {
        self.markers.retain(|m| !m.matches(kind, square));
    }

    pub fn add_arrow(&mut self, arrow: Arrow) {
        if !self.arrows.contains(&arrow) {
            self.arrows.push(arrow);
        }
    }

    pub fn arrows(&self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) -> Vec<Arrow> {
        self.arrows.iter().filter(|a| a.matches(kind, from, to)).copied().collect()
    }

    pub fn remove_arrows(&mut self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) {
        self.arrows.retain(|a| !a.matches(kind, from, to));
    }
}
