pub mod courses;
pub mod diff;
pub mod error;
pub mod grades;
pub mod normalize;
pub mod selector;
pub mod session;
pub mod snapshot;
pub mod storage;
pub mod telegram;
