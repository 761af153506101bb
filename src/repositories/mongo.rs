use anyhow::anyhow;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, RepositoryError, Result, StdResult};

const COLLECTION: &str = "feed#entries";

pub struct MongoKeyValueStore {
    coll: Collection<MongoEntryModel>,
}

impl MongoKeyValueStore {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        db.run_command(
            doc! {
                "createIndexes": COLLECTION,
                "indexes": [{
                    "name": "unique_key",
                    "key": {
                        "key": 1
                    },
                    "unique": true
                }],
            },
            None,
        )
        .await
        .map_err(::anyhow::Error::new)?;

        Ok(Self {
            coll: db.collection(COLLECTION),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MongoEntryModel {
    key: String,
    value: String,
}

#[async_trait]
impl KeyValueStore for MongoKeyValueStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .coll
            .find_one(doc! { "key": key }, None)
            .await
            .cvt()?
            .map(|MongoEntryModel { value, .. }| value))
    }

    async fn store(&self, key: &str, value: String) -> Result<()> {
        let model = MongoEntryModel {
            key: key.to_string(),
            value,
        };

        self.coll
            .replace_one(
                doc! { "key": key },
                model,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .cvt()?;

        Ok(())
    }
}

trait Convert<T> {
    fn cvt(self) -> T;
}
impl<T, E: Sync + Send + ::std::error::Error + 'static> Convert<Result<T>> for StdResult<T, E> {
    fn cvt(self) -> Result<T> { self.map_err(|e| RepositoryError::Internal(anyhow!(e))) }
}
