pub mod content;
pub mod response;
pub mod wardrobe;

pub use content::*;
pub use response::*;
pub use wardrobe::*;
