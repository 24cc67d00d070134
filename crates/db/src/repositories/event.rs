//! Event repository.

use std::sync::Arc;

use crate::entities::{event, event_attendee, Event, EventAttendee};
use agora_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Page of events plus pagination totals.
#[derive(Debug, Clone)]
pub struct EventPage {
    /// Events on this page.
    pub items: Vec<event::Model>,
    /// Total matching events.
    pub total: u64,
    /// Total page count.
    pub pages: u64,
}

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<event::Model>> {
        Event::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an event by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<event::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(id.to_string()))
    }

    /// Create a new event.
    pub async fn create(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an event.
    pub async fn update(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Event::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List events (newest first), optionally restricted to active ones.
    pub async fn list(
        &self,
        active_only: bool,
        page: u64,
        page_size: u64,
    ) -> AppResult<EventPage> {
        let mut query = Event::find().order_by_desc(event::Column::Date);

        if active_only {
            query = query.filter(event::Column::IsActive.eq(true));
        }

        let paginator = query.paginate(self.db.as_ref(), page_size);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(EventPage {
            items,
            total: totals.number_of_items,
            pages: totals.number_of_pages,
        })
    }

    /// List events owned by a user (newest first).
    pub async fn find_by_owner(&self, user_id: &str) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(event::Column::UserId.eq(user_id))
            .order_by_desc(event::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment comment count atomically (single UPDATE query, no fetch).
    pub async fn increment_comment_count(&self, event_id: &str) -> AppResult<()> {
        Event::update_many()
            .col_expr(
                event::Column::CommentCount,
                Expr::col(event::Column::CommentCount).add(1),
            )
            .filter(event::Column::Id.eq(event_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement comment count atomically (single UPDATE query, no fetch).
    pub async fn decrement_comment_count(&self, event_id: &str) -> AppResult<()> {
        Event::update_many()
            .col_expr(
                event::Column::CommentCount,
                Expr::cust("GREATEST(comment_count - 1, 0)"),
            )
            .filter(event::Column::Id.eq(event_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment view count atomically.
    pub async fn increment_view_count(&self, event_id: &str) -> AppResult<()> {
        Event::update_many()
            .col_expr(
                event::Column::ViewCount,
                Expr::col(event::Column::ViewCount).add(1),
            )
            .filter(event::Column::Id.eq(event_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Status Sweep ====================

    /// Deactivate every active event whose date is strictly before `today`.
    ///
    /// Returns the number of events flipped.
    pub async fn deactivate_past(&self, today: NaiveDate) -> AppResult<u64> {
        let result = Event::update_many()
            .col_expr(event::Column::IsActive, Expr::value(false))
            .filter(event::Column::Date.lt(today))
            .filter(event::Column::IsActive.eq(true))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Re-activate every inactive event whose date is `today` or later.
    ///
    /// Returns the number of events flipped.
    pub async fn activate_future(&self, today: NaiveDate) -> AppResult<u64> {
        let result = Event::update_many()
            .col_expr(event::Column::IsActive, Expr::value(true))
            .filter(event::Column::Date.gte(today))
            .filter(event::Column::IsActive.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    // ==================== Attendees ====================

    /// Find an attendee record by event and user.
    pub async fn find_attendee(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> AppResult<Option<event_attendee::Model>> {
        EventAttendee::find()
            .filter(event_attendee::Column::EventId.eq(event_id))
            .filter(event_attendee::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an attendee record.
    pub async fn create_attendee(
        &self,
        model: event_attendee::ActiveModel,
    ) -> AppResult<event_attendee::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an attendee record.
    pub async fn update_attendee(
        &self,
        model: event_attendee::ActiveModel,
    ) -> AppResult<event_attendee::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an attendee record.
    pub async fn delete_attendee(&self, event_id: &str, user_id: &str) -> AppResult<()> {
        let attendee = self.find_attendee(event_id, user_id).await?;
        if let Some(a) = attendee {
            a.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List attendees of an event (oldest first).
    pub async fn list_attendees(&self, event_id: &str) -> AppResult<Vec<event_attendee::Model>> {
        EventAttendee::find()
            .filter(event_attendee::Column::EventId.eq(event_id))
            .order_by_asc(event_attendee::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count attendees with RSVP status "going".
    pub async fn count_going(&self, event_id: &str) -> AppResult<u64> {
        EventAttendee::find()
            .filter(event_attendee::Column::EventId.eq(event_id))
            .filter(event_attendee::Column::RsvpStatus.eq(event_attendee::RsvpStatus::Going))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_event(id: &str, user_id: &str, date: NaiveDate, is_active: bool) -> event::Model {
        event::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Test event".to_string(),
            description: "A test event".to_string(),
            location: None,
            date,
            is_active,
            ticket_price_cents: None,
            capacity: None,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let event = create_test_event("e1", "u1", date, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event.clone()]])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo.find_by_id("e1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Test event");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn test_deactivate_past_returns_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let flipped = repo.deactivate_past(today).await.unwrap();

        assert_eq!(flipped, 3);
    }

    #[tokio::test]
    async fn test_activate_future_returns_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let flipped = repo.activate_future(today).await.unwrap();

        assert_eq!(flipped, 1);
    }

    #[tokio::test]
    async fn test_find_attendee_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event_attendee::Model>::new()])
                .into_connection(),
        );

        let repo = EventRepository::new(db);
        let result = repo.find_attendee("e1", "u1").await.unwrap();

        assert!(result.is_none());
    }
}
