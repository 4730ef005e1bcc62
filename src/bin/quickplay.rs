//! A bare-bones prompt loop over the library, for trying the engine out
//! without the full terminal interface.

use sapper::{Difficulty, Game, RevealOutcome};

enum PromptAction {
    Reveal((u8, u8)),
    Flag((u8, u8)),
}

fn read_action() -> Option<PromptAction> {
    println!("Enter an action and a cell (`o 3,5` opens row 3 column 5, `f 3,5` flags it):");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok()?;

    let mut parts = input.split_whitespace();
    let action = parts.next()?;
    let position = parts.next()?;

    let mut coordinates = position.split(',').filter_map(|part| part.trim().parse().ok());
    let position = (coordinates.next()?, coordinates.next()?);

    match action {
        "o" => Some(PromptAction::Reveal(position)),
        "f" => Some(PromptAction::Flag(position)),
        _ => None,
    }
}

fn main() {
    let mut game = Game::new(Difficulty::Medium).expect("the medium preset is a valid board");

    println!("{}", game.board());

    loop {
        let Some(action) = read_action() else {
            println!("Couldn't parse that. Try again.");
            continue;
        };

        match action {
            PromptAction::Reveal(position) => match game.reveal(position) {
                Ok(RevealOutcome::Win) => {
                    println!("{}", game.board());
                    println!("You won in {}s!", game.elapsed_seconds());
                    break;
                }
                Ok(RevealOutcome::Loss) => {
                    println!("{}", game.board());
                    println!("Boom. {}s played.", game.elapsed_seconds());
                    break;
                }
                Ok(_) => {}
                Err(error) => {
                    println!("{error}");
                    continue;
                }
            },
            PromptAction::Flag(position) => {
                if let Err(error) = game.toggle_flag(position) {
                    println!("{error}");
                    continue;
                }
            }
        }

        println!("{} mines left to flag", game.remaining_mines());
        println!("{}", game.board());
    }
}
