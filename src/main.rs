use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use agent_2048::engine::BoardState;
use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
use agent_2048::grid::Grid;

/// Self-play driver: the expectimax agent plays full games of 2048.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Search depth for the expectimax policy.
    #[arg(long, default_value_t = 4)]
    depth: u64,

    /// RNG seed for tile spawns (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves.
    #[arg(long)]
    max_moves: Option<u64>,

    /// Only print the final summary line.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::thread_rng().gen()),
    };

    let agent = Expectimax::with_config(ExpectimaxConfig { depth: args.depth });
    let mut game = BoardState::from_grid(&Grid::new());
    game.add_random_tile(&mut rng);
    game.add_random_tile(&mut rng);

    if !args.quiet {
        println!("{}", game.grid());
    }
    let mut move_count = 0u64;
    while game.has_legal_move() {
        if args.max_moves.is_some_and(|cap| move_count >= cap) {
            break;
        }
        let direction = agent.select_move(&game);
        if !game.make_move(direction, &mut rng) {
            break;
        }
        move_count += 1;
        if !args.quiet {
            println!("Move {}: {}", move_count, direction);
            println!("{}", game.grid());
        }
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}",
        move_count,
        game.score(),
        game.grid().highest_tile()
    );
}
