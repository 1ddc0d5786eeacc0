//! Owns the widget on a dedicated thread
//!
//! `EgChess` is single-threaded, so handlers talk to it through a channel and
//! get a [`Snapshot`] back once the scheduler has run until idle.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::thread;

use serde::Serialize;
use shakmaty::{Color, Role, Square};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use egchess_core::piece::color_name;
use egchess_core::{
    EgChess, Event, EventKind, GameOutcome, Mode, NoPrompt, PointerInput, PresetPrompt, WidgetConfig,
};

const QUEUE_DEPTH: usize = 64;

#[derive(Debug)]
pub enum Op {
    Snapshot,
    Pointer { input: PointerInput, prompt_answer: Option<String> },
    Load(String),
    Reset,
    Undo,
    Orientation(Color),
    Move { from: Square, to: Square, promotion: Option<Role> },
}

struct Command {
    op: Op,
    reply: oneshot::Sender<Snapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventView {
    Move { color: &'static str, uci: String, fen: String },
    Check,
    Checkmate,
    Draw,
    GameOver { outcome: String },
    Change { fen: String },
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        match event {
            Event::Move(record) => EventView::Move {
                color: color_name(record.color),
                uci: record.mv.uci.clone(),
                fen: record.fen_after.clone(),
            },
            Event::Check => EventView::Check,
            Event::Checkmate => EventView::Checkmate,
            Event::Draw => EventView::Draw,
            Event::GameOver(outcome) => EventView::GameOver {
                outcome: describe_outcome(*outcome),
            },
            Event::Change { fen } => EventView::Change { fen: fen.clone() },
        }
    }
}

fn describe_outcome(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Checkmate { winner } => format!("{} wins by checkmate", color_name(winner)),
        GameOutcome::Stalemate => "stalemate".to_string(),
        GameOutcome::InsufficientMaterial => "insufficient material".to_string(),
        GameOutcome::FiftyMoves => "fifty-move rule".to_string(),
        GameOutcome::ThreefoldRepetition => "threefold repetition".to_string(),
    }
}

/// Widget state after a command, plus what it emitted along the way
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub fen: String,
    pub orientation: &'static str,
    pub turn: &'static str,
    pub accepted: bool,
    pub dialog_active: bool,
    pub suppress_context_menu: bool,
    pub game_over: bool,
    pub history: Vec<String>,
    pub events: Vec<EventView>,
    pub svg: String,
}

#[derive(Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<Command>,
}

impl BoardHandle {
    /// Starts the board thread; fails if the widget rejects `config`
    pub async fn spawn(config: WidgetConfig) -> Result<Self, egchess_core::Error> {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::spawn(move || match EgChess::new(config) {
            Ok(widget) => {
                let _ = ready_tx.send(Ok(()));
                run(widget, rx);
            }
            Err(err) => {
                let _ = ready_tx.send(Err(err));
            }
        });

        match ready_rx.await {
            Ok(Ok(())) => Ok(Self { tx }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(egchess_core::Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "board thread exited during startup",
            ))),
        }
    }

    /// `None` when the board thread is gone
    pub async fn send(&self, op: Op) -> Option<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.tx.send(Command { op, reply }).await.ok()?;
        response.await.ok()
    }
}

fn run(mut widget: EgChess, mut rx: mpsc::Receiver<Command>) {
    let log: Rc<RefCell<Vec<EventView>>> = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::Move,
        EventKind::Check,
        EventKind::Checkmate,
        EventKind::Draw,
        EventKind::GameOver,
        EventKind::Change,
    ] {
        let sink = Rc::clone(&log);
        widget.on(kind, move |event: &Event| sink.borrow_mut().push(EventView::from(event)));
    }
    info!(mode = ?widget.mode(), "board thread started");

    while let Some(Command { op, reply }) = rx.blocking_recv() {
        debug!(?op, "board command");
        let mut suppress_context_menu = false;
        let accepted = match op {
            Op::Snapshot => true,
            Op::Pointer { input, prompt_answer } => {
                match prompt_answer {
                    Some(answer) => {
                        let mut prompt = PresetPrompt::new();
                        prompt.set_answer(answer);
                        widget.set_prompt(prompt);
                    }
                    None => widget.set_prompt(NoPrompt),
                }
                suppress_context_menu = widget.handle_pointer(input).suppress_context_menu;
                true
            }
            Op::Load(fen) => widget.load(&fen),
            Op::Reset => {
                widget.reset();
                true
            }
            Op::Undo => widget.undo().is_some(),
            Op::Orientation(color) => {
                widget.set_orientation(color);
                true
            }
            Op::Move { from, to, promotion } => widget.move_piece(from, to, promotion).is_some(),
        };
        widget.run_until_idle();

        let snapshot = Snapshot {
            mode: widget.mode(),
            fen: widget.fen(),
            orientation: color_name(widget.orientation()),
            turn: color_name(widget.turn()),
            accepted,
            dialog_active: widget.is_dialog_active(),
            suppress_context_menu,
            game_over: widget.is_game_over(),
            history: widget.history().into_iter().map(|r| r.mv.uci).collect(),
            events: log.borrow_mut().drain(..).collect(),
            svg: widget.to_svg(),
        };
        if reply.send(snapshot).is_err() {
            error!("client went away before the reply");
        }
    }
    info!("board thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use egchess_core::Point;

    #[tokio::test]
    async fn test_load_reports_change() {
        let board = BoardHandle::spawn(WidgetConfig::new(Mode::Edit)).await.unwrap();
        let snapshot = board.send(Op::Load("8/8/8/8/8/8/8/4K3 b - - 0 1".to_string())).await.unwrap();

        assert!(snapshot.accepted);
        assert_eq!(snapshot.fen, "8/8/8/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(snapshot.orientation, "black");
        assert!(matches!(snapshot.events.as_slice(), [EventView::Change { .. }]));
    }

    #[tokio::test]
    async fn test_missing_mode_fails_spawn() {
        assert!(BoardHandle::spawn(WidgetConfig::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_pointer_opens_picker() {
        let board = BoardHandle::spawn(WidgetConfig::new(Mode::Edit)).await.unwrap();
        let input = PointerInput::Down { point: Point::new(180.0, 180.0), button: 0, timestamp_ms: 0 };
        let snapshot = board.send(Op::Pointer { input, prompt_answer: None }).await.unwrap();

        assert!(snapshot.dialog_active);
        assert!(snapshot.svg.contains("piece-selection-dialog-button"));
        assert!(snapshot.events.is_empty());
    }
}
