use clap::{Args, ValueEnum};
use dataset::label::label_move;
use dataset::oracle::{MoveOracle, ShakmatyOracle};
use dataset::position::square_name;
use dataset::replay::replay;
use dataset::Side;
use std::error::Error;
use std::fs;

#[derive(ValueEnum, Clone, Copy)]
pub enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

#[derive(Args)]
pub struct InspectCommand {
    /// .pgn file with the game to inspect (only the first game is read)
    #[arg(long, value_name = "input")]
    input: String,

    /// Side played by the user
    #[arg(long, value_enum)]
    side: SideArg,
}

pub fn inspect(cmd: InspectCommand) -> Result<(), Box<dyn Error>> {
    let pgn = fs::read_to_string(&cmd.input)?;
    let side: Side = cmd.side.into();

    let oracle = ShakmatyOracle;
    let game = oracle.read_game(&pgn)?;
    let positions = replay(&oracle, &game, side)?;

    println!("{} plies, {} user positions", game.plies(), positions.len());

    for (index, position) in positions.iter().enumerate() {
        println!();
        println!("Position {}", index);
        print!("{}", position);

        match positions.get(index + 1).and_then(|next| label_move(position, next)) {
            Some(moved) => println!(
                "Label: {} ({} {:?})",
                moved.square,
                square_name(moved.square as usize, side),
                moved.piece
            ),
            None => println!("Label: none"),
        }
    }

    Ok(())
}
