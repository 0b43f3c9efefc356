//! Terminal front end
//!
//! A line-oriented presentation layer over a `Session`:
//! - Rendering a `SessionView` as text
//! - Parsing typed commands into session events

mod input;
mod render;

pub use input::*;
pub use render::*;

use crate::config::DisplayConfig;
use crate::session::{EndReason, Session};

/// Drive a connected session until it ends, redrawing after every event
pub async fn run(mut session: Session, display: &DisplayConfig) -> Option<EndReason> {
    spawn_stdin_reader(session.event_sender());

    println!("{}", render(&session.current_view(), display));

    while !session.is_ended() {
        let Some(event) = session.next_event().await else {
            break;
        };
        session.handle_event(event).await;
        println!("{}", render(&session.current_view(), display));
    }

    session.current_view().end_reason().cloned()
}
