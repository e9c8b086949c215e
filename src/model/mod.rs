pub mod conversion;
pub mod element;
pub mod graph;
pub mod resource;
pub mod step;
pub mod tags;

pub use conversion::*;
pub use element::*;
pub use graph::*;
pub use resource::*;
pub use step::*;
pub use tags::*;
