use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor};
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{already_reserved, name_taken, EventRepository};
use crate::{
    database::Database,
    error::AppError,
    models::{Event, Rating, Spot, SpotStatus, Ticket, TicketKind},
};

const EVENT_COLUMNS: &str =
    "id, name, location, organization, rating, date, image_url, capacity, price, partner_id";
const SPOT_COLUMNS: &str = "id, event_id, name, status, ticket_id";
const TICKET_COLUMNS: &str = "id, event_id, spot_id, kind, price";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    location: String,
    organization: String,
    rating: String,
    date: DateTime<Utc>,
    image_url: String,
    capacity: i32,
    price: Decimal,
    partner_id: i32,
}

#[derive(Debug, FromRow)]
struct SpotRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    status: String,
    ticket_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct TicketRow {
    id: Uuid,
    event_id: Uuid,
    spot_id: Uuid,
    kind: String,
    price: Decimal,
}

fn decode_error(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("unexpected {column} value '{value}'").into())
}

impl EventRow {
    fn into_event(self, spots: Vec<Spot>, tickets: Vec<Ticket>) -> Result<Event, sqlx::Error> {
        let rating: Rating = self
            .rating
            .parse()
            .map_err(|_| decode_error("rating", &self.rating))?;

        Ok(Event {
            id: self.id,
            name: self.name,
            location: self.location,
            organization: self.organization,
            rating,
            date: self.date,
            image_url: self.image_url,
            capacity: self.capacity,
            price: self.price,
            partner_id: self.partner_id,
            spots,
            tickets,
        })
    }
}

impl TryFrom<SpotRow> for Spot {
    type Error = sqlx::Error;

    fn try_from(row: SpotRow) -> Result<Self, Self::Error> {
        let status: SpotStatus = row
            .status
            .parse()
            .map_err(|_| decode_error("spot status", &row.status))?;

        Ok(Spot {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            status,
            ticket_id: row.ticket_id,
        })
    }
}

impl TryFrom<TicketRow> for Ticket {
    type Error = sqlx::Error;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let kind: TicketKind = row
            .kind
            .parse()
            .map_err(|_| decode_error("ticket kind", &row.kind))?;

        Ok(Ticket {
            id: row.id,
            event_id: row.event_id,
            spot_id: row.spot_id,
            kind,
            price: row.price,
        })
    }
}

/// A unique violation on spots means another writer took the name first.
fn spot_insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => name_taken(),
        _ => AppError::Database(e),
    }
}

/* ---------- statements shared by pool and transaction ---------- */

async fn insert_spot<'e>(executor: impl PgExecutor<'e>, spot: &Spot) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO spots (id, event_id, name, status, ticket_id) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(spot.id)
    .bind(spot.event_id)
    .bind(&spot.name)
    .bind(spot.status.as_str())
    .bind(spot.ticket_id)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_ticket<'e>(executor: impl PgExecutor<'e>, ticket: &Ticket) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO tickets (id, event_id, spot_id, kind, price) VALUES ($1, $2, $3, $4, $5)")
        .bind(ticket.id)
        .bind(ticket.event_id)
        .bind(ticket.spot_id)
        .bind(ticket.kind.as_str())
        .bind(ticket.price)
        .execute(executor)
        .await?;
    Ok(())
}

/// Returns false when the spot was not available any more.
async fn mark_reserved<'e>(
    executor: impl PgExecutor<'e>,
    spot_id: Uuid,
    ticket_id: Uuid,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE spots SET status = 'reserved', ticket_id = $1
         WHERE id = $2 AND status = 'available'",
    )
    .bind(ticket_id)
    .bind(spot_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub struct PgEventRepository {
    db: Database,
}

impl PgEventRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn tickets_by_event(&self, event_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE event_id = $1 ORDER BY position"
        ))
        .bind(event_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Ticket::try_from)
            .collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date, name"
        ))
        .fetch_all(&self.db.pool)
        .await?;

        let spot_rows = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots ORDER BY name"
        ))
        .fetch_all(&self.db.pool)
        .await?;
        let ticket_rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY position"
        ))
        .fetch_all(&self.db.pool)
        .await?;

        let mut spots: HashMap<Uuid, Vec<Spot>> = HashMap::new();
        for row in spot_rows {
            let spot = Spot::try_from(row)?;
            spots.entry(spot.event_id).or_default().push(spot);
        }
        let mut tickets: HashMap<Uuid, Vec<Ticket>> = HashMap::new();
        for row in ticket_rows {
            let ticket = Ticket::try_from(row)?;
            tickets.entry(ticket.event_id).or_default().push(ticket);
        }

        let events = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_event(
                    spots.remove(&id).unwrap_or_default(),
                    tickets.remove(&id).unwrap_or_default(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = events.len(), "Loaded events");
        Ok(events)
    }

    async fn get_event_by_id(&self, event_id: Uuid) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or(AppError::EventNotFound(event_id))?;

        let spots = self.find_spots_by_event(event_id).await?;
        let tickets = self.tickets_by_event(event_id).await?;

        Ok(row.into_event(spots, tickets)?)
    }

    async fn find_spots_by_event(&self, event_id: Uuid) -> Result<Vec<Spot>, AppError> {
        let rows = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE event_id = $1 ORDER BY name"
        ))
        .bind(event_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Spot::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn find_spot_by_name(&self, event_id: Uuid, name: &str) -> Result<Spot, AppError> {
        let row = sqlx::query_as::<_, SpotRow>(&format!(
            "SELECT {SPOT_COLUMNS} FROM spots WHERE event_id = $1 AND name = $2"
        ))
        .bind(event_id)
        .bind(name)
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or_else(|| AppError::SpotNotFound {
            event_id,
            name: name.to_string(),
        })?;

        Ok(Spot::try_from(row)?)
    }

    async fn create_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO events
                 (id, name, location, organization, rating, date, image_url, capacity, price, partner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.location)
        .bind(&event.organization)
        .bind(event.rating.as_str())
        .bind(event.date)
        .bind(&event.image_url)
        .bind(event.capacity)
        .bind(event.price)
        .bind(event.partner_id)
        .execute(&self.db.pool)
        .await?;
        Ok(())
    }

    async fn create_spot(&self, spot: &Spot) -> Result<(), AppError> {
        insert_spot(&self.db.pool, spot)
            .await
            .map_err(spot_insert_error)
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), AppError> {
        insert_ticket(&self.db.pool, ticket).await?;
        Ok(())
    }

    async fn reserve_spot(&self, spot_id: Uuid, ticket_id: Uuid) -> Result<(), AppError> {
        if mark_reserved(&self.db.pool, spot_id, ticket_id).await? {
            Ok(())
        } else {
            Err(already_reserved())
        }
    }

    async fn create_spots(&self, spots: &[Spot]) -> Result<(), AppError> {
        let mut tx = self.db.pool.begin().await?;
        for spot in spots {
            // dropping the transaction on error rolls the batch back
            insert_spot(&mut *tx, spot)
                .await
                .map_err(spot_insert_error)?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn save_purchase(&self, tickets: &[Ticket]) -> Result<(), AppError> {
        let mut tx = self.db.pool.begin().await?;

        for ticket in tickets {
            // spot first: its ticket_id FK is only checked at commit
            if !mark_reserved(&mut *tx, ticket.spot_id, ticket.id).await? {
                warn!(spot_id = %ticket.spot_id, "Spot taken by a concurrent purchase");
                tx.rollback().await?;
                return Err(already_reserved());
            }
            insert_ticket(&mut *tx, ticket).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
