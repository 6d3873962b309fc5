pub mod bench;
pub mod board;
pub mod evaluate;
pub mod move_generator;
pub mod moves;
pub mod network;
pub mod perft;
pub mod piece;
pub mod player;
pub mod search;
