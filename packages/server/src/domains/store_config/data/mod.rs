pub mod display;

pub use display::{PlatformSnapshot, SocialData, StoreDisplay};
