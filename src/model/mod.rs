mod event;
mod page;

pub use event::*;
pub use page::*;
