pub mod inspect;
pub mod replay;
pub mod search;
