//! Blocking console prompts for the interactive flow.
//!
//! The operator is typically a player who double-clicked the reporter, so
//! every fatal path pauses before the console window closes. Reads block
//! with no timeout; cancellation is the operator closing the window.

use std::io::{self, BufRead, Write};

use crate::models::Game;

/// Read one trimmed line from stdin. EOF yields an empty string.
pub fn read_line() -> String {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

/// Print `message` and wait for ENTER.
pub fn pause(message: &str) {
    println!("{}", message);
    let _ = io::stdout().flush();
    let _ = read_line();
}

/// Numbered menu over the distinct incident session keys. Empty input means
/// "my crash is not listed" and yields `None`.
pub fn select_session(keys: &[&str]) -> Option<String> {
    println!(
        "Input a number representing the crash that occurred and then press ENTER. \
         If the crash is not on the list, just press ENTER"
    );
    for (index, key) in keys.iter().enumerate() {
        println!("{} - {}", index + 1, key);
    }

    loop {
        let line = read_line();
        if line.is_empty() {
            return None;
        }
        if let Ok(choice) = line.parse::<usize>() {
            if (1..=keys.len()).contains(&choice) {
                return Some(keys[choice - 1].to_string());
            }
        }
        println!(
            "Incorrect input. Enter one of the numbers from the list above, \
             or nothing if your crash is not on the list"
        );
    }
}

/// Numbered menu over the supported titles; re-prompts until a valid choice
/// is made.
pub fn select_game() -> Game {
    println!("Select in which game the problem/crash occurred");
    for (index, game) in Game::ALL.iter().enumerate() {
        println!("{} - {}", index + 1, game.title());
    }

    loop {
        match read_line().parse::<usize>() {
            Ok(choice) if (1..=Game::ALL.len()).contains(&choice) => {
                return Game::ALL[choice - 1];
            }
            _ => println!(
                "Incorrect selection, you must specify one of the {} options listed above.",
                Game::ALL.len()
            ),
        }
    }
}
