//! End-to-end pointer scenarios against the headless board (40px squares, white at the bottom)

use std::cell::RefCell;
use std::rc::Rc;

use egchess_core::board::BoardGeometry;
use egchess_core::dialog::DialogResult;
use egchess_core::{
    EgChess, Error, Event, EventKind, Mode, Point, PointerInput, PresetPrompt, WidgetConfig, START_FEN,
};
use shakmaty::{Color, Piece, Role, Square};

const EMPTY: &str = "8/8/8/8/8/8/8/8 w - - 0 1";

fn widget(mode: Mode, position: &str) -> EgChess {
    EgChess::new(WidgetConfig::new(mode).with_position(position)).unwrap()
}

fn record(widget: &mut EgChess, kinds: &[EventKind]) -> Rc<RefCell<Vec<Event>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in kinds {
        let sink = seen.clone();
        widget.on(*kind, move |event: &Event| sink.borrow_mut().push(event.clone()));
    }
    seen
}

fn center(square: Square) -> Point {
    let geometry = BoardGeometry { square_size: 40.0, orientation: Color::White };
    let corner = geometry.square_to_point(square);
    Point::new(corner.x + 20.0, corner.y + 20.0)
}

fn down(widget: &mut EgChess, point: Point, timestamp_ms: u64) {
    widget.handle_pointer(PointerInput::Down { point, button: 0, timestamp_ms });
}

fn up(widget: &mut EgChess, point: Point) {
    widget.handle_pointer(PointerInput::Up { point, button: 0 });
}

fn click(widget: &mut EgChess, square: Square, timestamp_ms: u64) {
    down(widget, center(square), timestamp_ms);
    up(widget, center(square));
}

fn change_fens(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Change { fen } => Some(fen.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_missing_mode_fails_construction() {
    let config = WidgetConfig::from_json(r#"{"position": "8/8/8/8/8/8/8/8 w - - 0 1"}"#).unwrap();
    assert!(matches!(EgChess::new(config), Err(Error::MissingMode)));
}

#[test]
fn test_place_white_king_on_empty_board() {
    let mut board = widget(Mode::Edit, EMPTY);
    let events = record(&mut board, &[EventKind::Change]);

    click(&mut board, Square::E1, 0);
    assert!(board.is_dialog_active());
    assert_eq!(board.piece_picker_target(), Some(Square::E1));
    assert_eq!(board.piece(Square::E1), None);

    // dialog flips up from e1: top-left at (160, 0), king in the sixth row
    down(&mut board, Point::new(170.0, 210.0), 500);
    assert!(!board.is_dialog_active());
    assert_eq!(board.piece(Square::E1), Some(Piece { color: Color::White, role: Role::King }));

    board.run_until_idle();
    assert_eq!(change_fens(&events.borrow()), vec!["8/8/8/8/8/8/8/4K3 w - - 0 1".to_string()]);
}

#[test]
fn test_caller_callback_receives_selection() {
    let mut board = widget(Mode::Edit, EMPTY);
    let result = Rc::new(RefCell::new(Vec::new()));
    let sink = result.clone();
    board.show_piece_selection_dialog(Square::E1, move |r| sink.borrow_mut().push(r));

    down(&mut board, Point::new(170.0, 210.0), 0);
    assert_eq!(
        *result.borrow(),
        vec![DialogResult::PieceSelected {
            square: Square::E1,
            piece: Piece { color: Color::White, role: Role::King },
        }]
    );
}

#[test]
fn test_double_click_removes_piece() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);

    click(&mut board, Square::E2, 1_000);
    down(&mut board, center(Square::E2), 1_200);
    up(&mut board, center(Square::E2));

    assert_eq!(board.piece(Square::E2), None);
    assert!(!board.is_dialog_active());
    board.run_until_idle();
    assert_eq!(
        change_fens(&events.borrow()),
        vec!["rnbqkbnr/pppppppp/8/8/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1".to_string()]
    );
}

#[test]
fn test_slow_second_press_keeps_piece() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);

    click(&mut board, Square::E2, 1_000);
    click(&mut board, Square::E2, 1_400);

    assert!(board.piece(Square::E2).is_some());
    board.run_until_idle();
    assert!(events.borrow().is_empty());
    assert_eq!(board.fen(), START_FEN);
}

#[test]
fn test_drag_off_board_clears_origin_once() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);

    down(&mut board, center(Square::B1), 0);
    up(&mut board, Point::new(400.0, 300.0));
    assert_eq!(board.piece(Square::B1), None);

    board.run_until_idle();
    assert_eq!(
        change_fens(&events.borrow()),
        vec!["rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/R1BQKBNR w KQkq - 0 1".to_string()]
    );
}

#[test]
fn test_drag_moves_piece_without_legality() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);

    down(&mut board, center(Square::D1), 0);
    up(&mut board, center(Square::D5));
    board.run_until_idle();

    assert_eq!(
        change_fens(&events.borrow()),
        vec!["rnbqkbnr/pppppppp/8/3Q4/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".to_string()]
    );
}

#[test]
fn test_moving_king_drops_castling_rights() {
    let mut board = widget(Mode::Edit, "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    down(&mut board, center(Square::E1), 0);
    up(&mut board, center(Square::F1));
    assert_eq!(board.fen(), "r3k2r/8/8/8/8/8/8/R4K1R w kq - 0 1");
}

#[test]
fn test_right_click_cancels_dialog() {
    let mut board = widget(Mode::Edit, START_FEN);
    click(&mut board, Square::E4, 0);
    assert!(board.is_dialog_active());

    let response = board.handle_pointer(PointerInput::ContextMenu { point: center(Square::A1) });
    assert!(response.suppress_context_menu);
    assert!(!board.is_dialog_active());
    assert_eq!(board.fen(), START_FEN);

    click(&mut board, Square::E4, 100);
    board.handle_pointer(PointerInput::Down { point: center(Square::H8), button: 2, timestamp_ms: 200 });
    assert!(!board.is_dialog_active());
    assert_eq!(board.piece(Square::E4), None);
}

#[test]
fn test_second_open_keeps_first_target() {
    let mut board = widget(Mode::Edit, EMPTY);
    click(&mut board, Square::E4, 0);

    let fired = Rc::new(RefCell::new(false));
    let sink = fired.clone();
    board.show_piece_selection_dialog(Square::A8, move |_| *sink.borrow_mut() = true);
    assert_eq!(board.piece_picker_target(), Some(Square::E4));

    board.handle_pointer(PointerInput::ContextMenu { point: center(Square::A1) });
    assert!(!*fired.borrow());
}

#[test]
fn test_outside_click_cancels_without_change() {
    let mut board = widget(Mode::Edit, EMPTY);
    let events = record(&mut board, &[EventKind::Change]);
    click(&mut board, Square::A1, 0);

    // dialog spans x 0..80; h1 is well outside it
    down(&mut board, center(Square::H1), 100);
    assert!(!board.is_dialog_active());
    board.run_until_idle();
    assert!(events.borrow().is_empty());
}

#[test]
fn test_dialog_actions() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);

    // picker on e4 is clamped to the top: actions sit in rows 6 and 7 at x 160..240
    click(&mut board, Square::E4, 0);
    down(&mut board, Point::new(170.0, 250.0), 10);
    assert!(!board.is_dialog_active());
    assert_eq!(board.orientation(), Color::Black);
    board.run_until_idle();
    assert_eq!(
        change_fens(&events.borrow()),
        vec!["rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1".to_string()]
    );

    board.set_orientation(Color::White);
    click(&mut board, Square::E4, 1_000);
    down(&mut board, Point::new(170.0, 290.0), 1_010);
    assert_eq!(board.fen(), EMPTY);
}

#[test]
fn test_load_fen_action_uses_prompt() {
    let mut board = widget(Mode::Edit, START_FEN);
    let events = record(&mut board, &[EventKind::Change]);
    let mut prompt = PresetPrompt::new();
    prompt.set_answer("4k3/8/8/8/8/8/8/4K2R b K - 3 20");
    board.set_prompt(prompt);

    click(&mut board, Square::E4, 0);
    down(&mut board, Point::new(210.0, 250.0), 10);
    board.run_until_idle();

    assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/4K2R b K - 3 20");
    assert_eq!(change_fens(&events.borrow()).len(), 1);
}

#[test]
fn test_right_button_annotations() {
    let mut board = widget(Mode::Edit, START_FEN);
    board.handle_pointer(PointerInput::Down { point: center(Square::G1), button: 2, timestamp_ms: 0 });
    board.handle_pointer(PointerInput::Up { point: center(Square::F3), button: 2 });
    assert_eq!(board.arrows(None, Some(Square::G1), Some(Square::F3)).len(), 1);

    let response = board.handle_pointer(PointerInput::ContextMenu { point: center(Square::F3) });
    assert!(response.suppress_context_menu);
    let outside = board.handle_pointer(PointerInput::ContextMenu { point: Point::new(500.0, 10.0) });
    assert!(!outside.suppress_context_menu);
    assert_eq!(board.fen(), START_FEN);
}

#[test]
fn test_play_click_move() {
    let mut board = widget(Mode::Play, START_FEN);
    let events = record(&mut board, &[EventKind::Move, EventKind::Change]);

    click(&mut board, Square::E2, 0);
    assert_eq!(board.markers(None, None).len(), 2);
    click(&mut board, Square::E4, 100);
    board.run_until_idle();

    assert!(board.markers(None, None).is_empty());
    assert_eq!(board.turn(), Color::Black);
    let events = events.borrow();
    assert!(matches!(&events[0], Event::Move(record) if record.mv.uci == "e2e4"));
    assert_eq!(
        change_fens(&events),
        vec!["rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string()]
    );
}

#[test]
fn test_play_rejects_illegal_drop() {
    let mut board = widget(Mode::Play, START_FEN);
    down(&mut board, center(Square::E2), 0);
    up(&mut board, center(Square::E5));
    assert!(board.piece(Square::E2).is_some());
    assert!(board.piece(Square::E5).is_none());
    assert!(board.history().is_empty());
}

#[test]
fn test_promotion_dialog() {
    let mut board = widget(Mode::Play, "8/P7/8/8/8/8/8/k6K w - - 0 1");
    let events = record(&mut board, &[EventKind::Move]);

    down(&mut board, center(Square::A7), 0);
    up(&mut board, center(Square::A8));
    assert_eq!(board.promotion_target(), Some(Square::A8));
    assert!(board.piece(Square::A7).is_some());

    // queen, knight, rook, bishop from the top
    down(&mut board, Point::new(20.0, 60.0), 50);
    up(&mut board, Point::new(20.0, 60.0));
    assert!(!board.is_dialog_active());
    assert_eq!(board.piece(Square::A8), Some(Piece { color: Color::White, role: Role::Knight }));
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn test_promotion_cancel_restores_board() {
    let mut board = widget(Mode::Play, "8/P7/8/8/8/8/8/k6K w - - 0 1");
    down(&mut board, center(Square::A7), 0);
    up(&mut board, center(Square::A8));

    board.handle_pointer(PointerInput::ContextMenu { point: center(Square::A8) });
    assert!(!board.is_dialog_active());
    assert_eq!(board.piece(Square::A7), Some(Piece { color: Color::White, role: Role::Pawn }));
    assert!(board.history().is_empty());
}

#[test]
fn test_check_without_mate() {
    let mut board = widget(Mode::Play, START_FEN);
    for san in ["e4", "f6"] {
        assert!(board.move_san(san).is_some(), "{} should be legal", san);
    }
    board.run_until_idle();

    let events = record(
        &mut board,
        &[EventKind::Move, EventKind::Check, EventKind::Checkmate, EventKind::Change],
    );
    assert!(board.move_san("Qh5").is_some());
    assert!(board.is_check());
    assert!(!board.is_checkmate());

    let kinds: Vec<EventKind> = events.borrow().iter().map(Event::kind).collect();
    assert_eq!(kinds, vec![EventKind::Move, EventKind::Check]);
    assert_eq!(board.pending_notifications(), 1);

    assert_eq!(board.tick(), 1);
    assert_eq!(
        change_fens(&events.borrow()),
        vec!["rnbqkbnr/ppppp1pp/5p2/7Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2".to_string()]
    );
}

#[test]
fn test_checkmate_events() {
    let mut board = widget(Mode::Play, START_FEN);
    let events = record(
        &mut board,
        &[EventKind::Move, EventKind::Check, EventKind::Checkmate, EventKind::GameOver],
    );

    for san in ["f3", "e5", "g4", "Qh4"] {
        assert!(board.move_san(san).is_some(), "{} should be legal", san);
    }
    assert!(board.is_checkmate());
    assert!(board.is_game_over());

    let kinds: Vec<EventKind> = events.borrow().iter().map(Event::kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Move,
            EventKind::Move,
            EventKind::Move,
            EventKind::Move,
            EventKind::Check,
            EventKind::Checkmate,
            EventKind::GameOver,
        ]
    );

    // no input once the game is over
    down(&mut board, center(Square::A2), 0);
    assert!(board.markers(None, None).is_empty());
}

#[test]
fn test_undo_and_invalid_load() {
    let mut board = widget(Mode::Play, START_FEN);
    board.move_san("e4").unwrap();
    assert!(board.undo().is_some());
    assert_eq!(board.fen(), START_FEN);
    assert!(board.undo().is_none());

    assert!(!board.load("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"));
    assert_eq!(board.fen(), START_FEN);
}
