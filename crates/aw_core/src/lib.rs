pub mod animation;
pub mod assets;
pub mod game_loop;
pub mod input;
pub mod movement;
pub mod replay;
pub mod time;
pub mod world;
