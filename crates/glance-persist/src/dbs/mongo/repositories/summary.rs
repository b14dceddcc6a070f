use chrono::Utc;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{ClientSession, Collection, Database, IndexModel};

use crate::dbs::mongo::models::MongoSummary;
use crate::error::{PersistError, Result};
use crate::models::SummaryFields;

#[derive(Clone)]
pub struct MongoSummaryRepository {
    collection: Collection<MongoSummary>,
}

impl MongoSummaryRepository {
    pub fn new(database: &Database) -> Self {
        let collection = database.collection("summaries");
        Self { collection }
    }

    /// One summary per handle
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "handle": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<Option<MongoSummary>> {
        Ok(self.collection.find_one(doc! { "handle": handle }).await?)
    }

    pub async fn find_by_handle_in(
        &self,
        handle: &str,
        session: &mut ClientSession,
    ) -> Result<Option<MongoSummary>> {
        Ok(self
            .collection
            .find_one(doc! { "handle": handle })
            .session(&mut *session)
            .await?)
    }

    pub async fn exists_in(&self, id: ObjectId, session: &mut ClientSession) -> Result<bool> {
        let found = self
            .collection
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(found.is_some())
    }

    /// Insert or update by handle; `created_at` is only set on insert
    pub async fn upsert(
        &self,
        handle: &str,
        fields: &SummaryFields,
        session: &mut ClientSession,
    ) -> Result<MongoSummary> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let filter = doc! { "handle": handle };
        let update = doc! {
            "$set": {
                "display_name": fields.display_name.clone(),
                "summary_text": fields.summary_text.as_str(),
                "tags": fields.tags.clone(),
                "detail": bson::to_bson(&fields.detail)?,
                "raw_model_response": bson::to_bson(&fields.raw_model_response)?,
                "source_post_count": i64::from(fields.source_post_count),
                "updated_at": now,
            },
            "$setOnInsert": {
                "created_at": now,
            }
        };

        self.collection
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await?
            .ok_or_else(|| PersistError::Internal(format!("upsert of {} returned no document", handle)))
    }

    pub async fn delete(&self, id: ObjectId, session: &mut ClientSession) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
