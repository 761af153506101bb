use alloc::sync::Arc;

use crate::cmds::parser::StoreTarget;
use crate::directory::UserDirectory;
use crate::interactors::FeedManager;
use crate::repositories::file::JsonFileKeyValueStore;
use crate::repositories::mock::InMemoryKeyValueStore;
use crate::repositories::mongo::MongoKeyValueStore;

const DEFAULT_MONGO_DB: &str = "feed";

pub fn in_memory() -> FeedManager {
    FeedManager::new(
        Arc::new(InMemoryKeyValueStore::new()),
        UserDirectory::seeded(),
    )
}

pub fn json_file(path: impl Into<::std::path::PathBuf>) -> FeedManager {
    FeedManager::new(
        Arc::new(JsonFileKeyValueStore::new(path)),
        UserDirectory::seeded(),
    )
}

pub async fn mongo(uri_str: impl AsRef<str>) -> ::anyhow::Result<FeedManager> {
    let c = ::mongodb::Client::with_uri_str(uri_str).await?;
    let db = c
        .default_database()
        .unwrap_or_else(|| c.database(DEFAULT_MONGO_DB));

    let store = MongoKeyValueStore::new_with(db).await?;

    Ok(FeedManager::new(Arc::new(store), UserDirectory::seeded()))
}

pub async fn from_target(target: &StoreTarget) -> ::anyhow::Result<FeedManager> {
    Ok(match target {
        StoreTarget::Memory => {
            tracing::info!("using in-memory store; nothing will be kept");
            in_memory()
        },
        StoreTarget::File(path) => {
            tracing::info!("using json file store at {}", path);
            json_file(path)
        },
        StoreTarget::Mongo(uri) => {
            tracing::info!("using mongodb store");
            mongo(uri).await?
        },
    })
}
