pub mod audio_asset_repo;
pub mod image_asset_repo;
pub mod progress_repo;
pub mod tour_repo;

pub use audio_asset_repo::AudioAssetRepo;
pub use image_asset_repo::ImageAssetRepo;
pub use progress_repo::ProgressRepo;
pub use tour_repo::TourRepo;
