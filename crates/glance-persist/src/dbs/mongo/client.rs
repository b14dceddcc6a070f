use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, ClientSession, Database};

use crate::dbs::mongo::repositories::{MongoPostRepository, MongoSummaryRepository};
use crate::error::{PersistError, Result};
use crate::models::{normalize_key, prepare_posts, SourcePost, SummaryFields, SummaryRecord};
use crate::store::CacheStore;

/// MongoDB-backed cache.
///
/// Multi-document writes run inside a transaction, which requires the server
/// to be a replica set member (a single-node replica set is enough).
pub struct MongoCacheStore {
    client: Client,
    database: Database,
    summaries: MongoSummaryRepository,
    posts: MongoPostRepository,
}

impl MongoCacheStore {
    /// Connect to MongoDB and make sure the unique indexes exist
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        let database = client.database(database);

        let store = Self {
            summaries: MongoSummaryRepository::new(&database),
            posts: MongoPostRepository::new(&database),
            client,
            database,
        };
        store.summaries.ensure_indexes().await?;
        store.posts.ensure_indexes().await?;

        tracing::info!(database = %store.database.name(), "Connected to MongoDB cache");
        Ok(store)
    }

    async fn begin(&self) -> Result<ClientSession> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(session)
    }
}

/// Commit on success, abort on failure
async fn finish<T>(mut session: ClientSession, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            session.commit_transaction().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(abort_err) = session.abort_transaction().await {
                tracing::warn!(error = %abort_err, "Failed to abort transaction");
            }
            Err(err)
        }
    }
}

fn parse_id(summary_id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(summary_id).map_err(|e| PersistError::InvalidId(e.to_string()))
}

#[async_trait]
impl CacheStore for MongoCacheStore {
    async fn get(&self, handle: &str) -> Result<Option<SummaryRecord>> {
        let summary = self.summaries.find_by_handle(&normalize_key(handle)).await?;
        Ok(summary.map(Into::into))
    }

    async fn upsert(&self, handle: &str, fields: SummaryFields) -> Result<SummaryRecord> {
        let key = normalize_key(handle);
        let mut session = self.client.start_session().await?;
        let summary = self.summaries.upsert(&key, &fields, &mut session).await?;
        Ok(summary.into())
    }

    async fn replace_posts(&self, summary_id: &str, posts: Vec<SourcePost>) -> Result<()> {
        let id = parse_id(summary_id)?;
        let posts = prepare_posts(posts);

        let mut session = self.begin().await?;
        let result: Result<()> = async {
            if !self.summaries.exists_in(id, &mut session).await? {
                return Err(PersistError::SummaryNotFound(summary_id.to_string()));
            }
            self.posts.replace_for(id, posts, &mut session).await
        }
        .await;
        finish(session, result).await
    }

    async fn get_posts(&self, summary_id: &str) -> Result<Vec<SourcePost>> {
        let id = parse_id(summary_id)?;
        let posts = self.posts.list_for(id).await?;
        Ok(posts.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, handle: &str) -> Result<bool> {
        let key = normalize_key(handle);

        let mut session = self.begin().await?;
        let result: Result<bool> = async {
            let Some(summary) = self.summaries.find_by_handle_in(&key, &mut session).await? else {
                return Ok(false);
            };
            self.posts.delete_for(summary.id, &mut session).await?;
            self.summaries.delete(summary.id, &mut session).await?;
            Ok(true)
        }
        .await;
        finish(session, result).await
    }

    async fn save_summary(
        &self,
        handle: &str,
        fields: SummaryFields,
        posts: Vec<SourcePost>,
    ) -> Result<SummaryRecord> {
        let key = normalize_key(handle);
        let posts = prepare_posts(posts);

        let mut session = self.begin().await?;
        let result: Result<SummaryRecord> = async {
            let summary = self.summaries.upsert(&key, &fields, &mut session).await?;
            self.posts.replace_for(summary.id, posts, &mut session).await?;
            Ok(summary.into())
        }
        .await;
        finish(session, result).await
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
