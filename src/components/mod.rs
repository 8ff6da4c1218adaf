mod account;
mod gallery;
mod navigation;

pub use account::AccountScreen;
pub use gallery::GalleryScreen;
pub use navigation::NavigationBar;
