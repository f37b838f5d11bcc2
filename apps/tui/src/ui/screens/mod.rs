pub mod failed;
pub mod loading;
pub mod map;
