use std::path::PathBuf;

use arbiter::play::{
    console::Console,
    game::{Game, GameConfig},
    player::PlayerKind,
};
#[cfg(feature = "save")]
use arbiter::play::{commands::Message, console::Terminal};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plays a game in the terminal (DEFAULT)
    Play(PlayArgs),
    /// Shows the board of a saved game
    Show {
        /// Save file to read
        file: PathBuf,
    },
    /// Lists the saved games of a directory
    Saves {
        /// Directory holding the saves
        #[arg(default_value = "saves")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Who plays White
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    white: PlayerKind,
    /// Who plays Black
    #[arg(long, value_enum, default_value_t = PlayerKind::Computer)]
    black: PlayerKind,
    /// Name shown for the White player
    #[arg(long, default_value = "White")]
    white_name: String,
    /// Name shown for the Black player
    #[arg(long, default_value = "Black")]
    black_name: String,
    /// Seed for the computer players
    #[arg(long)]
    seed: Option<u64>,
    /// Resumes a saved game
    #[arg(short, long)]
    load: Option<PathBuf>,
    /// Directory where games are saved
    #[arg(long, default_value = "saves")]
    saves: PathBuf,
    /// Stops the game after this many turns
    #[arg(long)]
    max_turns: Option<u32>,
}
impl Default for PlayArgs {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            white: config.white,
            black: config.black,
            white_name: config.white_name,
            black_name: config.black_name,
            seed: config.seed,
            load: None,
            saves: config.save_dir,
            max_turns: config.max_turns,
        }
    }
}
impl PlayArgs {
    fn config(&self) -> GameConfig {
        GameConfig {
            white: self.white,
            black: self.black,
            white_name: self.white_name.clone(),
            black_name: self.black_name.clone(),
            seed: self.seed,
            save_dir: self.saves.clone(),
            max_turns: self.max_turns,
        }
    }
}

fn play(args: PlayArgs) {
    let mut console = Console::new(std::io::stdin(), std::io::stdout());
    let mut game = match &args.load {
        #[cfg(feature = "save")]
        Some(path) => match Game::load(path, args.config()) {
            Ok(game) => {
                if let Err(e) = console.send_message(Message::Loaded(path.clone())) {
                    eprintln!("{e}");
                }
                game
            }
            Err(e) => {
                eprintln!("Could not load {}: {e}", path.display());
                return;
            }
        },
        #[cfg(not(feature = "save"))]
        Some(_) => {
            eprintln!("Arbiter has not been compiled with feature `save`");
            return;
        }
        None => Game::new(args.config()),
    };

    match game.play(&mut console) {
        Ok(outcome) => log::info!("Game over: {outcome:?}"),
        Err(e) => eprintln!("{e}"),
    }
}

pub fn main() {
    let args = Arguments::parse();
    env_logger::init();

    match args.command.unwrap_or_else(|| Command::Play(PlayArgs::default())) {
        Command::Play(args) => play(args),
        #[cfg(feature = "save")]
        Command::Show { file } => match Game::load(&file, GameConfig::default()) {
            Ok(game) => {
                println!("{}", game.board());
                let colour = game.to_move();
                match game.board().status(colour) {
                    Some(status) => println!("{status}"),
                    None => println!("{colour} to move."),
                }
            }
            Err(e) => eprintln!("Could not load {}: {e}", file.display()),
        },
        #[cfg(feature = "save")]
        Command::Saves { dir } => {
            for path in arbiter::game::save::list_saves(&dir) {
                println!("{}", path.display());
            }
        }
        #[cfg(not(feature = "save"))]
        Command::Show { .. } | Command::Saves { .. } => {
            eprintln!("Arbiter has not been compiled with feature `save`");
        }
    }
}
