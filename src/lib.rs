use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{cms, utils};

use cms::{image::ImageUrlBuilder, sanity::{SanityClient, SanityConfig}};
use errors::ContentError;
use repositories::content_store::ContentStore;
use use_cases::content::ContentHandler;

pub struct AppState {
    pub content_handler: AppContentHandler,
    pub images: ImageUrlBuilder,
}

pub type AppContentHandler = ContentHandler<Arc<dyn ContentStore>>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Result<Self, ContentError> {
        let store = SanityClient::new(&SanityConfig::from(config))?;
        let images = ImageUrlBuilder::new(&config.sanity_project_id, &config.sanity_dataset)?;

        Ok(AppState::with_store(Arc::new(store), images))
    }

    /// Wires an already constructed store, e.g. an in-memory one in tests.
    pub fn with_store(store: Arc<dyn ContentStore>, images: ImageUrlBuilder) -> Self {
        AppState {
            content_handler: ContentHandler::new(store),
            images,
        }
    }
}
