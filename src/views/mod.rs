pub mod chat;
pub mod landing;

pub use chat::ChatScreen;
pub use landing::LandingScreen;
