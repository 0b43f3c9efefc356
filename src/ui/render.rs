//! Text rendering of a session view
//!
//! All styling decisions come from the `DisplayConfig` passed in; nothing here
//! keeps state between calls.

use std::fmt::Write;

use crate::config::DisplayConfig;
use crate::game::{Cell, Player, BOARD_SIZE};
use crate::session::{EndReason, SessionPhase, SessionView};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GREY: &str = "\x1b[90m";

fn paint(text: &str, color: &str, display: &DisplayConfig) -> String {
    if display.color {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

fn player_color(player: Player) -> &'static str {
    match player {
        Player::X => GREEN,
        Player::O => CYAN,
    }
}

fn cell_text(cell: Cell, display: &DisplayConfig) -> String {
    match cell {
        Cell::Empty => " ".to_string(),
        Cell::Marked(player) => paint(&player.mark().to_string(), player_color(player), display),
    }
}

/// Draw just the grid
pub fn render_board(view: &SessionView, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let margin = if display.show_coordinates { "   " } else { "" };

    if display.show_coordinates {
        let header: Vec<String> = (0..BOARD_SIZE).map(|c| format!(" {} ", c)).collect();
        let _ = writeln!(out, "{}{}", margin, header.join(" "));
    }

    for (r, row) in view.board.rows().iter().enumerate() {
        if r > 0 {
            let _ = writeln!(out, "{}{}", margin, vec!["---"; BOARD_SIZE].join("+"));
        }

        let cells: Vec<String> = row
            .iter()
            .map(|&cell| format!(" {} ", cell_text(cell, display)))
            .collect();

        if display.show_coordinates {
            let _ = writeln!(out, " {} {}", r, cells.join("|"));
        } else {
            let _ = writeln!(out, "{}", cells.join("|"));
        }
    }

    out
}

/// Draw the full screen for one view
pub fn render(view: &SessionView, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let me = view.local_player();

    let header = format!("You are player {} ({})", me, view.local_role);
    let _ = writeln!(out, "{}\n", paint(&header, BOLD, display));
    out.push_str(&render_board(view, display));
    out.push('\n');

    if let Some(mv) = view.last_move {
        let _ = writeln!(out, "{} marked cell [{}, {}]", mv.actor, mv.row, mv.col);
    }

    match &view.phase {
        SessionPhase::AwaitingConnection => {
            let _ = writeln!(out, "Waiting for the other player to connect...");
        }
        SessionPhase::Playing => {
            if view.is_local_turn() {
                let _ = writeln!(out, "It's {}'s turn. Your move.", view.whose_turn);
            } else {
                let _ = writeln!(
                    out,
                    "It's {}'s turn. Waiting for your opponent...",
                    view.whose_turn
                );
            }
        }
        SessionPhase::Ended(reason) => {
            let color = match reason {
                EndReason::Victory(_) => GREEN,
                EndReason::Draw => YELLOW,
                EndReason::Quit => GREY,
                EndReason::Defeat(_) | EndReason::ConnectionLost(_) => RED,
            };
            let _ = writeln!(out, "{}", paint(&reason.to_string(), color, display));
        }
    }

    if let Some(advisory) = &view.last_advisory {
        let _ = writeln!(out, "{}", paint(advisory, YELLOW, display));
    }

    if view.phase == SessionPhase::Playing {
        let _ = writeln!(out, "{}", paint(super::HELP, GREY, display));
    }

    out
}
