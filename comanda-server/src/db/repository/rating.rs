//! Rating repository

use redb::TableDefinition;

use crate::db::{Db, DbResult};
use shared::models::Rating;

const RATINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("ratings");

pub struct RatingRepository {
    db: Db,
}

impl RatingRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Store a rating. Ratings are immutable: there is deliberately no
    /// update path.
    pub fn create(&self, rating: &Rating) -> DbResult<()> {
        self.db.insert_json(RATINGS_TABLE, &rating.id, rating)
    }

    pub fn find_by_order(&self, order_id: &str) -> DbResult<Option<Rating>> {
        let all: Vec<Rating> = self.db.scan_json(RATINGS_TABLE)?;
        Ok(all.into_iter().find(|r| r.order_id == order_id))
    }

    pub fn find_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Rating>> {
        let mut ratings: Vec<Rating> = self
            .db
            .scan_json(RATINGS_TABLE)?
            .into_iter()
            .filter(|r: &Rating| r.restaurant_id == restaurant_id)
            .collect();
        ratings.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(ratings)
    }
}
