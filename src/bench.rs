use std::time::Instant;

use log::error;
use num_format::{Locale, ToFormattedString};
use rand::{SeedableRng, rngs::StdRng};

use crate::{board::Board, moves::parse_move_list, piece::Color, search::Searcher};

pub const DEFAULT_BENCH_DEPTH: u8 = 3;

const BENCH_DIAGRAMS: [&str; 4] = [
    "
    ..b.....
    ........
    w...b...
    ...w....
    .b....w.
    ...w....
    w.....b.
    ........",
    "
    ...bb.b.
    .w...w..
    w.b..wb.
    ........
    ..wbb...
    .b...wbw
    wwb..w..
    ........",
    "
    .....b..
    .w.w..w.
    ..b.....
    w..b...w
    ....w...
    .b..b.w.
    ........
    ...b....",
    "
    ..bb..b.
    ........
    ......w.
    ww.....w
    ..b.....
    .wbw.b.w
    .w.....w
    ..b.b...",
];

const BENCH_MOVE_LISTS: [&str; 3] = [
    "add 03, add 30, add 73, add 37",
    "add 22, add 55, add 25, add 52, add 44, add 33",
    "add 01, add 10, add 16, add 61, add 03, add 40, add 74, add 47",
];

pub fn bench(depth: u8) {
    let mut positions = Vec::new();
    for diagram in BENCH_DIAGRAMS {
        match Board::from_diagram(diagram) {
            Ok(board) => positions.push(board),
            Err(e) => error!("Bad bench diagram: {e}"),
        }
    }
    for list in BENCH_MOVE_LISTS {
        let mut board = Board::new();
        match parse_move_list(list).and_then(|moves| board.play_moves(&moves)) {
            Ok(_) => positions.push(board),
            Err(e) => error!("Bad bench move list: {e}"),
        }
    }

    let mut nodes = 0;
    let start_time = Instant::now();

    for mut board in positions {
        for color in Color::ALL {
            let mut rng = StdRng::seed_from_u64(0);
            let mut searcher = Searcher::new(&mut board, color, depth, &mut rng);
            searcher.search();

            nodes += searcher.stats.total_nodes;
        }
    }

    let elapsed = start_time.elapsed();

    let nps = nodes as f64 / elapsed.as_secs_f64();

    println!(
        "Nodes: {} NPS: {} Time: {elapsed:#?}",
        nodes.to_formatted_string(&Locale::en),
        (nps as u64).to_formatted_string(&Locale::en)
    );
}
