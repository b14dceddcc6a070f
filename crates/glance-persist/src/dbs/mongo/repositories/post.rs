use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::dbs::mongo::models::MongoPost;
use crate::error::Result;
use crate::models::SourcePost;

#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<MongoPost>,
}

impl MongoPostRepository {
    pub fn new(database: &Database) -> Self {
        let collection = database.collection("posts");
        Self { collection }
    }

    /// A post id appears at most once per summary
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "summary_id": 1, "post_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Posts for a summary, newest first
    pub async fn list_for(&self, summary_id: ObjectId) -> Result<Vec<MongoPost>> {
        let posts = self
            .collection
            .find(doc! { "summary_id": summary_id })
            .sort(doc! { "posted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(posts)
    }

    pub async fn delete_for(&self, summary_id: ObjectId, session: &mut ClientSession) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "summary_id": summary_id })
            .session(&mut *session)
            .await?;
        Ok(result.deleted_count)
    }

    /// Delete-all-then-insert; `posts` must already be free of duplicate ids
    pub async fn replace_for(
        &self,
        summary_id: ObjectId,
        posts: Vec<SourcePost>,
        session: &mut ClientSession,
    ) -> Result<()> {
        let removed = self.delete_for(summary_id, session).await?;

        let docs: Vec<MongoPost> = posts
            .into_iter()
            .map(|post| MongoPost::new(summary_id, post))
            .collect();
        let inserted = docs.len();

        if !docs.is_empty() {
            self.collection
                .insert_many(docs)
                .session(&mut *session)
                .await?;
        }

        tracing::debug!(%summary_id, removed, inserted, "Replaced summary posts");
        Ok(())
    }
}
