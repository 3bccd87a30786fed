mod action;
mod dispatch;

pub use action::{Action, HELP, Target, parse_action};
pub use dispatch::execute;

use crate::{MusicManager, REFRESH_RATE, app_core::LibraryEvent};
use anyhow::Result;
use crossbeam_channel::{Receiver, select, unbounded};
use std::{
    io::{self, BufRead, Write},
    thread,
};
use tracing::debug;

/// Interactive loop over stdin. Player events are drained between
/// inputs, so the next song starts while the prompt is idle.
pub fn run(manager: &mut MusicManager) -> Result<()> {
    manager.subscribe(|event| match event {
        LibraryEvent::NowPlaying(title) => println!("\nNow playing: {title}"),
        LibraryEvent::Error(e) => println!("\nError: {e}"),
        _ => (),
    });

    let input = spawn_stdin_reader();
    println!("Type `help` for a list of commands.");
    prompt();

    loop {
        let received = select! {
            recv(input) -> line => Some(line),
            default(REFRESH_RATE) => None,
        };

        if let Some(line) = received {
            let Ok(line) = line else {
                debug!("stdin closed");
                break;
            };

            match parse_action(&line) {
                Ok(Some(Action::Quit)) => break,
                Ok(Some(action)) => match execute(manager, action) {
                    Ok(lines) => lines.iter().for_each(|l| println!("{l}")),
                    Err(e) => println!("{e}"),
                },
                Ok(None) => (),
                Err(e) => println!("{e}"),
            }
            prompt();
        }

        if let Err(e) = manager.handle_player_events() {
            println!("{e}");
            prompt();
        }
    }

    println!("Saving state...");
    manager.shutdown()?;
    println!("Bye!");
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
