//! Headless SVG board

use shakmaty::{Color, Piece, Square};
use std::fmt::Write as _;

use super::annotations::{Annotations, Arrow, ArrowKind, Marker, MarkerKind};
use super::placement::Placement;
use super::{BoardGeometry, BoardView, Point, Rect, RedrawHook};
use crate::piece::piece_code;

/// One node of the rendered document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub name: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<SvgElement>,
    /// Area that receives pointer events, if any
    pub bounds: Option<Rect>,
}

impl SvgElement {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
            bounds: None,
        }
    }

    pub fn group(class: &str) -> Self {
        Self::new("g").attr("class", class)
    }

    /// A `rect` that also takes part in hit testing
    pub fn rect(rect: Rect) -> Self {
        let mut element = Self::new("rect")
            .attr("x", rect.x)
            .attr("y", rect.y)
            .attr("width", rect.width)
            .attr("height", rect.height);
        element.bounds = Some(rect);
        element
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn push(&mut self, child: SvgElement) {
        self.children.push(child);
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Deepest, last-drawn element whose bounds contain `point`
    pub fn hit(&self, point: Point) -> Option<&SvgElement> {
        for child in self.children.iter().rev() {
            if let Some(found) = child.hit(point) {
                return Some(found);
            }
        }
        match self.bounds {
            Some(bounds) if bounds.contains(point) => Some(self),
            _ => None,
        }
    }

    /// Descendants (and self) carrying `class`
    pub fn find_by_class(&self, class: &str) -> Vec<&SvgElement> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a SvgElement>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    pub fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.name);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub struct SvgBoard {
    placement: Placement,
    geometry: BoardGeometry,
    annotations: Annotations,
    assets_url: String,
    css_class: String,
    hooks: Vec<RedrawHook>,
    document: SvgElement,
    interactive: SvgElement,
}

impl SvgBoard {
    pub fn new(fen: &str, orientation: Color, square_size: f32) -> Self {
        let mut board = Self {
            placement: Placement::parse(fen),
            geometry: BoardGeometry { square_size, orientation },
            annotations: Annotations::default(),
            assets_url: "./dist/assets/".to_string(),
            css_class: "default".to_string(),
            hooks: Vec::new(),
            document: SvgElement::new("svg"),
            interactive: SvgElement::group("interactive-top-layer"),
        };
        board.redraw();
        board
    }

    pub fn with_assets(mut self, assets_url: &str, css_class: &str) -> Self {
        self.assets_url = assets_url.to_string();
        self.css_class = css_class.to_string();
        self.redraw();
        self
    }

    /// Last rendered document, including the interactive layer
    pub fn document(&self) -> SvgElement {
        let mut document = self.document.clone();
        document.push(self.interactive.clone());
        document
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.document().write_markup(&mut out);
        out
    }

    fn draw_squares(&self) -> SvgElement {
        let mut group = SvgElement::group("board");
        for square in Square::ALL {
            let shade = if square.is_light() { "white" } else { "black" };
            group.push(
                SvgElement::rect(self.geometry.square_rect(square))
                    .attr("class", format!("square {}", shade))
                    .attr("data-square", square),
            );
        }
        group
    }

    fn draw_markers(&self) -> SvgElement {
        let mut group = SvgElement::group("markers");
        let size = self.geometry.square_size;
        for marker in self.annotations.markers(None, None) {
            let point = self.geometry.square_to_point(marker.square);
            let (cx, cy) = (point.x + size / 2.0, point.y + size / 2.0);
            let element = match marker.kind {
                MarkerKind::Dot => SvgElement::new("circle")
                    .attr("cx", cx)
                    .attr("cy", cy)
                    .attr("r", size / 8.0),
                MarkerKind::Circle => SvgElement::new("circle")
                    .attr("cx", cx)
                    .attr("cy", cy)
                    .attr("r", size * 0.45),
                _ => SvgElement::new("rect")
                    .attr("x", point.x)
                    .attr("y", point.y)
                    .attr("width", size)
                    .attr("height", size),
            };
            group.push(
                element
                    .attr("class", format!("marker marker-{}", marker.kind.as_str()))
                    .attr("data-square", marker.square),
            );
        }
        group
    }

    fn draw_pieces(&self) -> SvgElement {
        let mut group = SvgElement::group("pieces");
        let size = self.geometry.square_size;
        for (square, piece) in self.placement.pieces() {
            group.push(piece_element(&self.assets_url, piece, self.geometry.square_to_point(square), size)
                .attr("data-square", square));
        }
        group
    }

    fn draw_arrows(&self) -> SvgElement {
        let mut group = SvgElement::group("arrows");
        let half = self.geometry.square_size / 2.0;
        for arrow in self.annotations.arrows(None, None, None) {
            let from = self.geometry.square_to_point(arrow.from);
            let to = self.geometry.square_to_point(arrow.to);
            group.push(
                SvgElement::new("line")
                    .attr("x1", from.x + half)
                    .attr("y1", from.y + half)
                    .attr("x2", to.x + half)
                    .attr("y2", to.y + half)
                    .attr("class", format!("arrow arrow-{}", arrow.kind.as_str())),
            );
        }
        group
    }
}

/// Piece glyph referencing the sprite sheet under `assets_url`
pub fn piece_element(assets_url: &str, piece: Piece, point: Point, size: f32) -> SvgElement {
    let code = piece_code(piece);
    SvgElement::new("use")
        .attr("href", format!("{}pieces/standard.svg#{}", assets_url, code))
        .attr("x", point.x)
        .attr("y", point.y)
        .attr("width", size)
        .attr("height", size)
        .attr("class", format!("piece {}", code))
}

impl BoardView for SvgBoard {
    fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    fn position(&self) -> String {
        self.placement.board_fen()
    }

    fn set_position(&mut self, fen: &str, _animate: bool) {
        self.placement = Placement::parse(fen);
        self.redraw();
    }

    fn piece(&self, square: Square) -> Option<Piece> {
        self.placement.get(square)
    }

    fn set_piece(&mut self, square: Square, piece: Option<Piece>, _animate: bool) {
        self.placement.set(square, piece);
        self.redraw();
    }

    fn orientation(&self) -> Color {
        self.geometry.orientation
    }

    fn set_orientation(&mut self, color: Color, _animate: bool) {
        self.geometry.orientation = color;
        self.redraw();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.annotations.add_marker(marker);
        self.redraw();
    }

    fn markers(&self, kind: Option<MarkerKind>, square: Option<Square>) -> Vec<Marker> {
        self.annotations.markers(kind, square)
    }

    fn remove_markers(&mut self, kind: Option<MarkerKind>, square: Option<Square>) {
        self.annotations.remove_markers(kind, square);
        self.redraw();
    }

    fn add_arrow(&mut self, arrow: Arrow) {
        self.annotations.add_arrow(arrow);
        self.redraw();
    }

    fn arrows(&self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) -> Vec<Arrow> {
        self.annotations.arrows(kind, from, to)
    }

    fn remove_arrows(&mut self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) {
        self.annotations.remove_arrows(kind, from, to);
        self.redraw();
    }

    fn on_after_redraw(&mut self, hook: RedrawHook) {
        self.hooks.push(hook);
    }

    fn redraw(&mut self) {
        let width = self.geometry.width();
        let height = self.geometry.height();
        let mut document = SvgElement::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("class", format!("cm-chessboard {}", self.css_class))
            .attr("viewBox", format!("0 0 {} {}", width, height))
            .attr("width", width)
            .attr("height", height)
            .attr("data-orientation", self.geometry.orientation.char());
        document.push(self.draw_squares());
        document.push(self.draw_markers());
        document.push(self.draw_pieces());
        document.push(self.draw_arrows());
        self.document = document;

        let mut interactive = SvgElement::group("interactive-top-layer");
        for hook in &self.hooks {
            hook(&self.geometry, &mut interactive);
        }
        self.interactive = interactive;
    }

    fn hit_test(&self, point: Point) -> Option<&SvgElement> {
        self.interactive.hit(point)
    }
}
