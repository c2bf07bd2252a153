mod claims;
mod extractors;

pub use claims::{Claims, Role};
pub use extractors::AuthUser;
