//! Event service.
//!
//! An event stays active through 23:59:59.999 UTC on its calendar date.
//! `is_active` is recomputed on creation and whenever the date changes;
//! the batch sweep reconciles the rest of the table on a schedule.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{
        event,
        event_attendee::{self, PaymentStatus, RsvpStatus},
        reaction::TargetType,
        user,
    },
    repositories::{EventPage, EventRepository, ReactionRepository},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// The instant an event's date stops being "today or later": end of day UTC.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc())
}

/// Derive the active flag for an event date relative to `now`.
#[must_use]
pub fn derive_is_active(date: NaiveDate, now: DateTime<Utc>) -> bool {
    end_of_day(date).is_some_and(|eod| eod >= now)
}

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    /// Event title.
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    /// Event description.
    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    /// Venue or address.
    #[validate(length(max = 512))]
    pub location: Option<String>,

    /// Calendar date of the event.
    pub date: NaiveDate,

    /// Ticket price in cents; omit for a free event.
    #[validate(range(min = 0))]
    pub ticket_price_cents: Option<i32>,

    /// Maximum number of "going" attendees.
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Input for updating an event.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventInput {
    /// New title.
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    /// New description.
    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,

    /// New location.
    pub location: Option<Option<String>>,

    /// New date. Changing the date re-derives `is_active`.
    pub date: Option<NaiveDate>,

    /// Explicit active override. Applied after any date-derived value.
    pub is_active: Option<bool>,

    /// New ticket price in cents.
    pub ticket_price_cents: Option<Option<i32>>,

    /// New capacity.
    pub capacity: Option<Option<i32>>,
}

/// Input for an RSVP.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RsvpInput {
    /// RSVP status.
    pub status: RsvpStatus,

    /// Requested ticket type.
    #[validate(length(max = 64))]
    pub ticket_type: Option<String>,
}

/// Result of a batch status sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepOutcome {
    /// Events flipped from active to inactive.
    pub deactivated: u64,
    /// Events flipped from inactive to active.
    pub activated: u64,
}

/// Event service for business logic.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    reaction_repo: ReactionRepository,
    id_gen: IdGenerator,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(event_repo: EventRepository, reaction_repo: ReactionRepository) -> Self {
        Self {
            event_repo,
            reaction_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new event owned by `owner`.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateEventInput,
    ) -> AppResult<event::Model> {
        input.validate()?;

        let model = event::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id.clone()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            date: Set(input.date),
            is_active: Set(derive_is_active(input.date, Utc::now())),
            ticket_price_cents: Set(input.ticket_price_cents),
            capacity: Set(input.capacity),
            comment_count: Set(0),
            view_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.event_repo.create(model).await
    }

    /// Get an event by ID.
    pub async fn get(&self, id: &str) -> AppResult<event::Model> {
        self.event_repo.get_by_id(id).await
    }

    /// Record a view on an event.
    pub async fn track_view(&self, id: &str) -> AppResult<()> {
        self.event_repo.increment_view_count(id).await
    }

    /// List events, optionally active-only.
    pub async fn list(&self, active_only: bool, page: u64, page_size: u64) -> AppResult<EventPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        self.event_repo.list(active_only, page, page_size).await
    }

    /// Update an event. Owner or admin only.
    pub async fn update(
        &self,
        id: &str,
        acting_user: &user::Model,
        input: UpdateEventInput,
    ) -> AppResult<event::Model> {
        input.validate()?;

        let event = self.event_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&event.user_id, acting_user)?;

        let mut active: event::ActiveModel = event.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
            // A date change re-derives the active flag
            active.is_active = Set(derive_is_active(date, Utc::now()));
        }
        if let Some(is_active) = input.is_active {
            // Explicit override wins over the derived value; the batch
            // sweep will still reconcile it on its next run.
            active.is_active = Set(is_active);
        }
        if let Some(price) = input.ticket_price_cents {
            active.ticket_price_cents = Set(price);
        }
        if let Some(capacity) = input.capacity {
            active.capacity = Set(capacity);
        }

        active.updated_at = Set(Some(Utc::now().into()));

        self.event_repo.update(active).await
    }

    /// Delete an event. Owner or admin only.
    pub async fn delete(&self, id: &str, acting_user: &user::Model) -> AppResult<()> {
        let event = self.event_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&event.user_id, acting_user)?;

        self.event_repo.delete(id).await?;
        self.reaction_repo
            .delete_for_target(TargetType::Event, id)
            .await?;

        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }

    /// RSVP to an event. Re-RSVP replaces the prior record.
    pub async fn rsvp(
        &self,
        event_id: &str,
        user_id: &str,
        input: RsvpInput,
    ) -> AppResult<event_attendee::Model> {
        input.validate()?;

        let event = self.event_repo.get_by_id(event_id).await?;

        let now = Utc::now();
        if !event.is_active || !derive_is_active(event.date, now) {
            return Err(AppError::BadRequest(
                "This event is no longer accepting RSVPs".to_string(),
            ));
        }

        let existing = self.event_repo.find_attendee(event_id, user_id).await?;

        // Capacity bounds "going" attendees only
        if input.status == RsvpStatus::Going
            && existing.as_ref().map(|a| a.rsvp_status) != Some(RsvpStatus::Going)
        {
            if let Some(capacity) = event.capacity {
                let going = self.event_repo.count_going(event_id).await?;
                if going >= capacity as u64 {
                    return Err(AppError::Conflict("Event is at capacity".to_string()));
                }
            }
        }

        let is_paid_event = event.ticket_price_cents.is_some_and(|p| p > 0);

        match existing {
            Some(attendee) => {
                // A settled payment survives RSVP changes
                let payment = if is_paid_event {
                    match attendee.payment_status {
                        PaymentStatus::Paid => PaymentStatus::Paid,
                        _ => PaymentStatus::Pending,
                    }
                } else {
                    PaymentStatus::Free
                };

                let mut active: event_attendee::ActiveModel = attendee.into();
                active.rsvp_status = Set(input.status);
                active.payment_status = Set(payment);
                active.ticket_type = Set(input.ticket_type);
                active.updated_at = Set(Some(now.into()));
                self.event_repo.update_attendee(active).await
            }
            None => {
                let payment = if is_paid_event {
                    PaymentStatus::Pending
                } else {
                    PaymentStatus::Free
                };

                let model = event_attendee::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    event_id: Set(event_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    rsvp_status: Set(input.status),
                    payment_status: Set(payment),
                    ticket_type: Set(input.ticket_type),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                };
                self.event_repo.create_attendee(model).await
            }
        }
    }

    /// Cancel an RSVP.
    pub async fn cancel_rsvp(&self, event_id: &str, user_id: &str) -> AppResult<()> {
        self.event_repo.get_by_id(event_id).await?;
        self.event_repo.delete_attendee(event_id, user_id).await
    }

    /// List attendees of an event.
    pub async fn attendees(&self, event_id: &str) -> AppResult<Vec<event_attendee::Model>> {
        self.event_repo.get_by_id(event_id).await?;
        self.event_repo.list_attendees(event_id).await
    }

    /// Record the outcome of a payment for an attendee (admin only).
    pub async fn set_payment_status(
        &self,
        event_id: &str,
        attendee_user_id: &str,
        status: PaymentStatus,
        acting_user: &user::Model,
    ) -> AppResult<event_attendee::Model> {
        super::access::ensure_admin(acting_user)?;

        let attendee = self
            .event_repo
            .find_attendee(event_id, attendee_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attendee record not found".to_string()))?;

        let mut active: event_attendee::ActiveModel = attendee.into();
        active.payment_status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));
        self.event_repo.update_attendee(active).await
    }

    /// Batch reconciliation of the active flag across all events.
    ///
    /// Past events still marked active are deactivated; future events
    /// marked inactive are re-activated. Note the second half reverts any
    /// manual deactivation of a future event.
    pub async fn update_active_status(&self) -> AppResult<SweepOutcome> {
        let today = Utc::now().date_naive();

        let deactivated = self.event_repo.deactivate_past(today).await?;
        let activated = self.event_repo.activate_future(today).await?;

        tracing::info!(deactivated, activated, "Event status sweep completed");

        Ok(SweepOutcome {
            deactivated,
            activated,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    // Unit tests for the lifecycle rule

    #[test]
    fn test_event_active_through_its_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        // Late evening on the event date: still active
        let now = date.and_hms_opt(23, 0, 0).unwrap().and_utc();
        assert!(derive_is_active(date, now));
    }

    #[test]
    fn test_event_inactive_after_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let next_morning = date
            .succ_opt()
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap()
            .and_utc();
        assert!(!derive_is_active(date, next_morning));
    }

    #[test]
    fn test_future_event_is_active() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        assert!(derive_is_active(date, now));
    }

    // Service tests

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            username_lower: format!("user-{id}"),
            email: format!("{id}@example.com"),
            name: None,
            password_hash: "hash".to_string(),
            token: None,
            avatar_url: None,
            bio: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_event_model(
        id: &str,
        owner: &str,
        date: NaiveDate,
        is_active: bool,
    ) -> event::Model {
        event::Model {
            id: id.to_string(),
            user_id: owner.to_string(),
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

    fn service_with(db: Arc<DatabaseConnection>) -> EventService {
        EventService::new(
            EventRepository::new(Arc::clone(&db)),
            ReactionRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_rsvp_rejected_on_inactive_event() {
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let event = test_event_model("e1", "owner", yesterday, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .rsvp(
                "e1",
                "u1",
                RsvpInput {
                    status: RsvpStatus::Going,
                    ticket_type: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rsvp_rejected_on_past_date_even_if_flag_stale() {
        // The sweep has not run yet: is_active is stale true, date is past
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let event = test_event_model("e1", "owner", yesterday, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .rsvp(
                "e1",
                "u1",
                RsvpInput {
                    status: RsvpStatus::Going,
                    ticket_type: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rsvp_creates_attendee_for_free_event() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        let event = test_event_model("e1", "owner", tomorrow, true);
        let attendee = event_attendee::Model {
            id: "a1".to_string(),
            event_id: "e1".to_string(),
            user_id: "u1".to_string(),
            rsvp_status: RsvpStatus::Going,
            payment_status: PaymentStatus::Free,
            ticket_type: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                // no existing attendee
                .append_query_results([Vec::<event_attendee::Model>::new()])
                // insert returning
                .append_query_results([[attendee]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .rsvp(
                "e1",
                "u1",
                RsvpInput {
                    status: RsvpStatus::Going,
                    ticket_type: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.payment_status, PaymentStatus::Free);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_forbidden() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        let event = test_event_model("e1", "owner", tomorrow, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[event]])
                .into_connection(),
        );

        let service = service_with(db);
        let other = test_user("u2", false);
        let result = service
            .update("e1", &other, UpdateEventInput::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_sweep_reports_flips_both_ways() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.update_active_status().await.unwrap();

        assert_eq!(outcome.deactivated, 2);
        // A manually deactivated future event is among the re-activated:
        // the sweep does not preserve manual overrides.
        assert_eq!(outcome.activated, 1);
    }

    #[tokio::test]
    async fn test_set_payment_status_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let user = test_user("u1", false);
        let result = service
            .set_payment_status("e1", "u2", PaymentStatus::Paid, &user)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
