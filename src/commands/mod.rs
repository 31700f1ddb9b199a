mod analyze;
mod factor;
mod matrices;
mod optimize;
mod util;

pub use analyze::Analyze;
pub use factor::Factor;
pub use matrices::{Ddg, Norm, Sym};
pub use optimize::Optimize;
