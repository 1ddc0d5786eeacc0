//! The chess widget: a board view driven in edit or play mode
//!
//! All state lives on one thread. Dialog callbacks never touch the board
//! directly; they post continuations that run once the pointer handler that
//! resolved them has returned. `Change` notifications wait one further step in
//! a deferred queue drained by [`EgChess::tick`].

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use shakmaty::{Color, Piece, Role, Square};
use tracing::{debug, info, warn};

use crate::board::{
    Arrow, ArrowKind, BoardGeometry, BoardView, Marker, MarkerKind, MoveInput, MoveInputEvent, Point,
    RightClickAnnotator, SvgBoard, SvgElement,
};
use crate::config::{Mode, WidgetConfig, START_FEN};
use crate::dialog::{
    ClickOutcome, DialogAction, DialogResult, PieceSelectionDialog, PromotionDialog, BUTTON_RIGHT,
};
use crate::editor::{fen, gesture, EditorSession, Gesture};
use crate::error::{Error, Result};
use crate::events::{Event, EventBus, EventKind};
use crate::game::{Game, MoveDescriptor, MoveRecord};
use crate::prompt::{FenPrompt, NoPrompt};
use crate::scheduler::TaskQueue;

pub const BUTTON_LEFT: i16 = 0;

const EMPTY_PLACEMENT: &str = "8/8/8/8/8/8/8/8";

/// Raw pointer input in board coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { point: Point, button: i16, timestamp_ms: u64 },
    Up { point: Point, button: i16 },
    ContextMenu { point: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// The host must not show its native context menu
    pub suppress_context_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    Place { square: Square, piece: Piece },
    Promote { from: Square, to: Square, role: Role },
    /// Put the board back on the game position after an abandoned promotion
    Resync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Change,
}

pub struct EgChess<B: BoardView = SvgBoard> {
    config: WidgetConfig,
    board: B,
    game: Game,
    session: EditorSession,
    picker: Rc<RefCell<PieceSelectionDialog>>,
    promotion: Rc<RefCell<PromotionDialog>>,
    input: MoveInput,
    annotator: RightClickAnnotator,
    events: EventBus,
    continuations: TaskQueue<Continuation>,
    deferred: TaskQueue<Deferred>,
    prompt: Box<dyn FenPrompt>,
}

impl EgChess<SvgBoard> {
    /// Builds the widget on the headless SVG board
    pub fn new(config: WidgetConfig) -> Result<Self> {
        let board = SvgBoard::new(EMPTY_PLACEMENT, config.orientation.into(), config.square_size)
            .with_assets(&config.assets_url, &config.css_class);
        Self::with_board(config, board)
    }

    pub fn to_svg(&self) -> String {
        self.board.to_markup()
    }
}

impl<B: BoardView> EgChess<B> {
    /// Fails with [`Error::MissingMode`] when the config names no mode, and with
    /// [`Error::InvalidFen`] when a play-mode start position is rejected.
    pub fn with_board(config: WidgetConfig, mut board: B) -> Result<Self> {
        let mode = config.mode.ok_or(Error::MissingMode)?;
        let mut session = EditorSession::new(mode).with_double_click_ms(config.double_click_ms);
        let mut game = Game::new();

        let position = config.position_or_start();
        match mode {
            Mode::Edit => {
                let split = fen::split(position);
                board.set_position(&split.placement, false);
                session.set_metadata(split.metadata);
            }
            Mode::Play => {
                game.load(position)?;
                board.set_position(&game.fen(), false);
            }
        }
        board.set_orientation(config.orientation.into(), false);

        let picker = Rc::new(RefCell::new(PieceSelectionDialog::new(&config.assets_url)));
        let promotion = Rc::new(RefCell::new(PromotionDialog::new(&config.assets_url)));

        let picker_hook = Rc::clone(&picker);
        board.on_after_redraw(Rc::new(move |geometry: &BoardGeometry, layer: &mut SvgElement| {
            picker_hook.borrow().draw(geometry, layer)
        }));
        let promotion_hook = Rc::clone(&promotion);
        board.on_after_redraw(Rc::new(move |geometry: &BoardGeometry, layer: &mut SvgElement| {
            promotion_hook.borrow().draw(geometry, layer)
        }));
        board.redraw();

        info!(?mode, position, "chess widget created");
        Ok(Self {
            config,
            board,
            game,
            session,
            picker,
            promotion,
            input: MoveInput::new(),
            annotator: RightClickAnnotator::default(),
            events: EventBus::new(),
            continuations: TaskQueue::new(),
            deferred: TaskQueue::new(),
            prompt: Box::new(NoPrompt),
        })
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Play-mode rules state; stays at the start position in edit mode
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn set_prompt<P: FenPrompt + 'static>(&mut self, prompt: P) {
        self.prompt = Box::new(prompt);
    }

    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.events.on(kind, callback);
    }

    pub fn set_move_input_enabled(&mut self, enabled: bool) {
        self.config.draggable = enabled;
        if !enabled {
            self.input.reset();
        }
    }

    // ---- position ----

    pub fn fen(&self) -> String {
        match self.mode() {
            Mode::Edit => {
                let board = &self.board;
                fen::compose(
                    &board.position(),
                    board.orientation(),
                    |square| board.piece(square),
                    self.session.metadata(),
                )
            }
            Mode::Play => self.game.fen(),
        }
    }

    /// Edit mode accepts any string; play mode leaves everything untouched and
    /// returns false when the rules engine rejects the FEN.
    pub fn load(&mut self, fen: &str) -> bool {
        let loaded = self.apply_fen(fen);
        if loaded {
            self.schedule_change();
        }
        loaded
    }

    pub fn reset(&mut self) {
        self.restart();
        self.schedule_change();
    }

    fn apply_fen(&mut self, fen: &str) -> bool {
        match self.mode() {
            Mode::Edit => {
                let split = fen::split(fen);
                self.board.set_position(&split.placement, true);
                self.board.set_orientation(split.orientation, false);
                self.session.set_metadata(split.metadata);
                true
            }
            Mode::Play => match self.game.load(fen) {
                Ok(()) => {
                    self.board.remove_markers(Some(MarkerKind::Dot), None);
                    self.board.set_position(&self.game.fen(), true);
                    true
                }
                Err(err) => {
                    warn!(%err, "load rejected");
                    false
                }
            },
        }
    }

    fn restart(&mut self) {
        match self.mode() {
            Mode::Edit => {
                self.apply_fen(START_FEN);
            }
            Mode::Play => {
                self.game.reset();
                self.board.set_position(&self.game.fen(), true);
            }
        }
    }

    pub fn orientation(&self) -> Color {
        self.board.orientation()
    }

    /// In edit mode the orientation is also the side to move
    pub fn set_orientation(&mut self, color: Color) {
        self.board.set_orientation(color, true);
        if self.mode() == Mode::Edit {
            self.schedule_change();
        }
    }

    pub fn turn(&self) -> Color {
        match self.mode() {
            Mode::Edit => self.board.orientation(),
            Mode::Play => self.game.turn(),
        }
    }

    pub fn set_turn(&mut self, color: Color) -> bool {
        match self.mode() {
            Mode::Edit => {
                self.set_orientation(color);
                true
            }
            Mode::Play => match self.game.set_turn(color) {
                Ok(()) => {
                    self.schedule_change();
                    true
                }
                Err(err) => {
                    warn!(%err, "turn change rejected");
                    false
                }
            },
        }
    }

    pub fn piece(&self, square: Square) -> Option<Piece> {
        match self.mode() {
            Mode::Play => self.game.piece_at(square),
            Mode::Edit => self.board.piece(square),
        }
    }

    // ---- play mode ----

    pub fn moves(&self, square: Option<Square>) -> Vec<MoveDescriptor> {
        match self.mode() {
            Mode::Play => self.game.moves(square),
            Mode::Edit => Vec::new(),
        }
    }

    /// Plays a move through the rules engine. `None` for illegal moves and in edit mode.
    pub fn move_piece(&mut self, from: Square, to: Square, promotion: Option<Role>) -> Option<MoveRecord> {
        if self.mode() != Mode::Play {
            warn!(%from, %to, "moves are only validated in play mode");
            return None;
        }
        self.play_move(from, to, promotion)
    }

    pub fn move_san(&mut self, san: &str) -> Option<MoveRecord> {
        if self.mode() != Mode::Play {
            warn!(san, "moves are only validated in play mode");
            return None;
        }
        let record = self.game.play_san(san).ok()?;
        self.board.set_position(&self.game.fen(), true);
        self.announce_move(&record);
        Some(record)
    }

    pub fn undo(&mut self) -> Option<MoveRecord> {
        if self.mode() != Mode::Play {
            return None;
        }
        let record = self.game.undo()?;
        self.board.set_position(&self.game.fen(), true);
        self.schedule_change();
        Some(record)
    }

    pub fn history(&self) -> Vec<MoveRecord> {
        self.game.history()
    }

    pub fn is_check(&self) -> bool {
        self.mode() == Mode::Play && self.game.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.mode() == Mode::Play && self.game.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.mode() == Mode::Play && self.game.is_stalemate()
    }

    pub fn is_draw(&self) -> bool {
        self.mode() == Mode::Play && self.game.is_draw()
    }

    pub fn is_game_over(&self) -> bool {
        self.mode() == Mode::Play && self.game.is_game_over()
    }

    fn play_move(&mut self, from: Square, to: Square, promotion: Option<Role>) -> Option<MoveRecord> {
        let record = self.game.play(from, to, promotion).ok()?;
        self.board.set_position(&self.game.fen(), true);
        self.announce_move(&record);
        Some(record)
    }

    fn announce_move(&mut self, record: &MoveRecord) {
        self.events.emit(Event::Move(record.clone()));
        if self.game.is_check() {
            self.events.emit(Event::Check);
        }
        if self.game.is_checkmate() {
            self.events.emit(Event::Checkmate);
        }
        if self.game.is_draw() {
            self.events.emit(Event::Draw);
        }
        if let Some(outcome) = self.game.outcome() {
            info!(?outcome, "game over");
            self.events.emit(Event::GameOver(outcome));
        }
        self.schedule_change();
    }

    // ---- annotations ----

    pub fn add_arrow(&mut self, kind: ArrowKind, from: Square, to: Square) {
        self.board.add_arrow(Arrow::new(kind, from, to));
    }

    pub fn arrows(&self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) -> Vec<Arrow> {
        self.board.arrows(kind, from, to)
    }

    pub fn remove_arrows(&mut self, kind: Option<ArrowKind>, from: Option<Square>, to: Option<Square>) {
        self.board.remove_arrows(kind, from, to);
    }

    pub fn add_marker(&mut self, kind: MarkerKind, square: Square) {
        self.board.add_marker(Marker::new(kind, square));
    }

    pub fn markers(&self, kind: Option<MarkerKind>, square: Option<Square>) -> Vec<Marker> {
        self.board.markers(kind, square)
    }

    pub fn remove_markers(&mut self, kind: Option<MarkerKind>, square: Option<Square>) {
        self.board.remove_markers(kind, square);
    }

    // ---- dialogs ----

    pub fn is_dialog_active(&self) -> bool {
        self.picker.borrow().is_active() || self.promotion.borrow().is_active()
    }

    pub fn piece_picker_target(&self) -> Option<Square> {
        self.picker.borrow().target()
    }

    pub fn promotion_target(&self) -> Option<Square> {
        self.promotion.borrow().target()
    }

    /// Opens the piece picker with a caller-owned callback. Silently ignored
    /// while a picker is already shown.
    pub fn show_piece_selection_dialog<F>(&mut self, square: Square, callback: F)
    where
        F: FnOnce(DialogResult) + 'static,
    {
        self.picker.borrow_mut().open(square, Box::new(callback));
        self.board.redraw();
    }

    /// Dismisses both dialogs without resolving their callbacks
    pub fn close_dialogs(&mut self) {
        self.picker.borrow_mut().close();
        self.promotion.borrow_mut().close();
        self.board.redraw();
    }

    fn request_piece(&mut self, square: Square) {
        if self.picker.borrow().is_active() {
            debug!(%square, "piece picker already shown");
            return;
        }
        let queue = self.continuations.clone();
        self.picker.borrow_mut().open(
            square,
            Box::new(move |result: DialogResult| {
                if let DialogResult::PieceSelected { square, piece } = result {
                    queue.post(Continuation::Place { square, piece });
                }
            }),
        );
        self.board.redraw();
    }

    fn request_promotion(&mut self, from: Square, to: Square) {
        let color = self.game.turn();
        let queue = self.continuations.clone();
        self.promotion.borrow_mut().open(
            to,
            color,
            Box::new(move |result: DialogResult| match result {
                DialogResult::PieceSelected { piece, .. } => {
                    queue.post(Continuation::Promote { from, to, role: piece.role })
                }
                DialogResult::Canceled => queue.post(Continuation::Resync),
            }),
        );
        self.board.redraw();
    }

    fn dialog_pointer_down(&mut self, point: Point, button: i16) {
        let target = self.board.hit_test(point).cloned();
        if self.promotion.borrow().is_active() {
            let outcome = self.promotion.borrow_mut().handle_pointer_down(button, target.as_ref());
            debug!(?outcome, "promotion dialog click");
        } else {
            let outcome = self.picker.borrow_mut().handle_pointer_down(button, target.as_ref());
            debug!(?outcome, "piece picker click");
            if let ClickOutcome::Action(action) = outcome {
                self.perform_action(action);
                self.picker.borrow_mut().finish_action();
            }
        }
        self.board.redraw();
    }

    fn dialog_context_menu(&mut self) -> bool {
        let suppress = if self.promotion.borrow().is_active() {
            self.promotion.borrow_mut().handle_context_menu()
        } else {
            self.picker.borrow_mut().handle_context_menu()
        };
        self.board.redraw();
        suppress
    }

    fn perform_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::RotateBoard => {
                let flipped = self.board.orientation().other();
                self.board.set_orientation(flipped, true);
            }
            DialogAction::LoadFen => {
                let current = self.fen();
                match self.prompt.ask_fen(&current) {
                    Some(answer) => {
                        self.apply_fen(answer.trim());
                    }
                    None => debug!("fen prompt dismissed"),
                }
            }
            DialogAction::ClearBoard => {
                if self.mode() == Mode::Edit {
                    self.board.set_position(EMPTY_PLACEMENT, true);
                }
            }
            DialogAction::ResetBoard => self.restart(),
        }
        self.schedule_change();
    }

    // ---- input ----

    fn square_at(&self, point: Point) -> Option<Square> {
        self.board.geometry().point_to_square(point)
    }

    /// Entry point for raw pointer input from the host
    pub fn handle_pointer(&mut self, input: PointerInput) -> PointerResponse {
        let mut response = PointerResponse::default();
        match input {
            PointerInput::Down { point, button, timestamp_ms } => {
                if self.is_dialog_active() {
                    self.dialog_pointer_down(point, button);
                } else if button == BUTTON_RIGHT {
                    let square = self.square_at(point);
                    self.annotator.pointer_down(square);
                } else if button == BUTTON_LEFT && self.config.draggable {
                    let square = self.square_at(point);
                    let mut driver = mem::take(&mut self.input);
                    driver.pointer_down(square, timestamp_ms, &mut |event: MoveInputEvent| {
                        self.handle_move_input(event)
                    });
                    self.input = driver;
                }
            }
            PointerInput::Up { point, button } => {
                if self.is_dialog_active() {
                    // the press that opened or resolved a dialog owns this release
                } else if button == BUTTON_RIGHT {
                    let square = self.square_at(point);
                    self.annotator.pointer_up(square, &mut self.board);
                } else if button == BUTTON_LEFT {
                    let square = self.square_at(point);
                    let mut driver = mem::take(&mut self.input);
                    driver.pointer_up(square, &mut |event: MoveInputEvent| self.handle_move_input(event));
                    self.input = driver;
                }
            }
            PointerInput::ContextMenu { point } => {
                response.suppress_context_menu = if self.is_dialog_active() {
                    self.dialog_context_menu()
                } else {
                    self.square_at(point).is_some()
                };
            }
        }
        self.run_continuations();
        response
    }

    /// Move-input handler; the return value permits or vetoes the step
    pub fn handle_move_input(&mut self, event: MoveInputEvent) -> bool {
        if let MoveInputEvent::Finished { from, to } = event {
            self.board.relocate(from, to);
        }
        match self.mode() {
            Mode::Edit => self.edit_input(event),
            Mode::Play => self.play_input(event),
        }
    }

    fn edit_input(&mut self, event: MoveInputEvent) -> bool {
        let board = &self.board;
        let gesture = gesture::classify(&mut self.session, event, |square| board.piece(square).is_some());
        match gesture {
            Gesture::PickPiece(square) => self.request_piece(square),
            Gesture::Remove(square) => self.board.set_piece(square, None, true),
            _ => {}
        }
        if gesture.changes_board() {
            self.schedule_change();
        }
        gesture.permits()
    }

    fn play_input(&mut self, event: MoveInputEvent) -> bool {
        match event {
            MoveInputEvent::Started { square, .. } => {
                if self.game.is_game_over() {
                    return false;
                }
                let moves = self.game.moves(Some(square));
                if moves.is_empty() {
                    return false;
                }
                if self.config.legal_move_markers {
                    for mv in &moves {
                        self.board.add_marker(Marker::new(MarkerKind::Dot, mv.to));
                    }
                }
                true
            }
            MoveInputEvent::Validate { from, to } => {
                self.board.remove_markers(Some(MarkerKind::Dot), None);
                if self.game.is_promotion(from, to) {
                    self.request_promotion(from, to);
                    return false;
                }
                self.play_move(from, to, None).is_some()
            }
            MoveInputEvent::Finished { .. } => true,
            MoveInputEvent::Canceled { .. } => {
                self.board.remove_markers(Some(MarkerKind::Dot), None);
                true
            }
        }
    }

    // ---- scheduling ----

    fn schedule_change(&mut self) {
        self.deferred.post(Deferred::Change);
    }

    fn run_continuations(&mut self) {
        loop {
            let tasks = self.continuations.take_all();
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                debug!(?task, "continuation");
                match task {
                    Continuation::Place { square, piece } => {
                        self.board.set_piece(square, Some(piece), true);
                        self.schedule_change();
                    }
                    Continuation::Promote { from, to, role } => {
                        self.play_move(from, to, Some(role));
                    }
                    Continuation::Resync => self.board.set_position(&self.game.fen(), true),
                }
            }
        }
    }

    /// Number of deferred notifications waiting for the next tick
    pub fn pending_notifications(&self) -> usize {
        self.deferred.len()
    }

    /// Emits the notifications queued before this call. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        self.run_continuations();
        let tasks = self.deferred.take_all();
        let count = tasks.len();
        for task in tasks {
            match task {
                Deferred::Change => {
                    let fen = self.fen();
                    self.events.emit(Event::Change { fen });
                }
            }
        }
        count
    }

    pub fn run_until_idle(&mut self) {
        while self.tick() > 0 {}
    }
}
