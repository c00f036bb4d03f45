pub mod jwt;
pub mod navigation;
pub mod storage;
pub mod time;
