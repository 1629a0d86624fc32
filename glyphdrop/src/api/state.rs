use std::sync::Arc;

use crate::config::Config;
use crate::ocr::{RecognitionAdapter, TextRecognizer};
use crate::store::TransientStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: TransientStore,
    pub scanner: RecognitionAdapter,
}

impl AppState {
    pub fn new(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        let store = TransientStore::new(config.storage.upload_dir.clone());
        let scanner = RecognitionAdapter::new(recognizer, config.ocr.clone());

        Self {
            config: Arc::new(config),
            store,
            scanner,
        }
    }
}
