use dioxus::prelude::*;
use std::path::Path;
use std::sync::Arc;

mod components;
mod config;
mod database;
mod error;
mod models;
mod services;

use components::{AccountScreen, GalleryScreen, NavigationBar};
use config::{AppConfig, StorageConfig};
use error::AppError;
use photo_upload::{
    FsStorage, PhotoUploadService, SqliteMetadataStore, StorageClient, UploadContext,
    WebDavStorage,
};
use services::AccountSession;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Everything the screens share
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: AccountSession,
    pub metadata: Arc<SqliteMetadataStore>,
    pub uploads: Arc<PhotoUploadService>,
}

impl AppState {
    pub fn open_database(&self) -> Result<rusqlite::Connection, AppError> {
        database::init_database(&self.config.database_path())
    }
}

fn build_storage(config: &AppConfig) -> Result<Arc<dyn StorageClient>, AppError> {
    match &config.storage {
        StorageConfig::Local { .. } => {
            let root = config.local_storage_root();
            std::fs::create_dir_all(&root)?;
            log::info!("Storing photos in {}", root.display());
            Ok(Arc::new(FsStorage::new(root)))
        }
        StorageConfig::Webdav(webdav) => {
            log::info!("Storing photos on {} via WebDAV", webdav.server_url);
            Ok(Arc::new(WebDavStorage::new(webdav.clone())?))
        }
    }
}

fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let db_path = config.database_path();
    let conn = database::init_database(&db_path)?;
    let session = AccountSession::restore(&conn)?;

    let metadata = Arc::new(SqliteMetadataStore::open(&db_path)?);
    let storage = build_storage(&config)?;

    let uploads = Arc::new(PhotoUploadService::new(
        config.upload_config(),
        Arc::new(session.clone()),
        storage,
        metadata.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        session,
        metadata,
        uploads,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load(Path::new(config::CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}; falling back to defaults", e);
            AppConfig::default()
        }
    };

    match build_state(config) {
        Ok(state) => {
            dioxus::LaunchBuilder::new()
                .with_context(UploadContext::new(state.uploads.clone()))
                .with_context(state)
                .launch(App);
        }
        Err(e) => {
            log::error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Screen navigation
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Gallery,
    Account,
}

#[component]
fn App() -> Element {
    let mut current_screen = use_signal(|| Screen::Gallery);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",

            // Main Content
            div { style: "flex: 1; overflow-y: auto;",
                match current_screen() {
                    Screen::Gallery => rsx! {
                        GalleryScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                    Screen::Account => rsx! {
                        AccountScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                }
            }

            // Bottom Navigation Bar
            NavigationBar {
                current_screen: current_screen(),
                on_navigate: move |screen| current_screen.set(screen),
            }
        }
    }
}
