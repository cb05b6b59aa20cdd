// Postgres store
// Schema is ensured at startup; every two-sided balance mutation runs in
// one transaction with row locks so a reader never observes half a
// transfer.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use backend_domain::ports::{
    BinEventRepository,
    CollectorRepository,
    LedgerRepository,
    RequestRepository,
    ReviewRepository,
    SensorRepository,
};
use backend_domain::{
    Balance,
    BinEvent,
    CollectorProfile,
    CompanyBalance,
    DbConfig,
    PickupRequest,
    RequestStatus,
    Review,
    Sensor,
    TransferOutcome,
};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(db: &DbConfig) -> Result<Self> {
        let url = db
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow!("database_url not configured"))?;
        let pool = PgPoolOptions::new()
            .max_connections(db.db_max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let statements = [
            r#"
CREATE TABLE IF NOT EXISTS sensors (
    sensor_id TEXT PRIMARY KEY,
    sensor_name TEXT NOT NULL,
    location TEXT NOT NULL,
    company_id BIGINT,
    sensor_status BOOLEAN NOT NULL DEFAULT FALSE
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS sensor_logs (
    id UUID PRIMARY KEY,
    sensor_id TEXT NOT NULL REFERENCES sensors(sensor_id),
    sensor_status BOOLEAN NOT NULL,
    rfid TEXT,
    "timestamp" TIMESTAMPTZ NOT NULL
)
"#,
            r#"
CREATE INDEX IF NOT EXISTS sensor_logs_sensor_idx
    ON sensor_logs (sensor_id, "timestamp" DESC)
"#,
            r#"
CREATE TABLE IF NOT EXISTS ragpicker_details (
    clerk_id TEXT PRIMARY KEY,
    rfid TEXT UNIQUE,
    average_rating DOUBLE PRECISION NOT NULL DEFAULT 0
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS balances (
    clerk_id TEXT PRIMARY KEY,
    balance BIGINT NOT NULL DEFAULT 0
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS company_balances (
    id BIGSERIAL PRIMARY KEY,
    company_name TEXT NOT NULL,
    balance BIGINT NOT NULL DEFAULT 0
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS requests (
    id BIGSERIAL PRIMARY KEY,
    customer_clerk_id TEXT NOT NULL,
    ragpicker_clerk_id TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ
)
"#,
            r#"
CREATE TABLE IF NOT EXISTS reviews (
    id BIGSERIAL PRIMARY KEY,
    customer_clerk_id TEXT NOT NULL,
    ragpicker_clerk_id TEXT NOT NULL,
    rating DOUBLE PRECISION NOT NULL,
    review TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL
)
"#,
        ];
        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn row_to_sensor(row: &PgRow) -> Result<Sensor> {
    Ok(Sensor {
        sensor_id: row.try_get("sensor_id")?,
        sensor_name: row.try_get("sensor_name")?,
        location: row.try_get("location")?,
        company_id: row.try_get("company_id")?,
        sensor_status: row.try_get("sensor_status")?,
    })
}

fn row_to_event(row: &PgRow) -> Result<BinEvent> {
    Ok(BinEvent {
        id: row.try_get("id")?,
        sensor_id: row.try_get("sensor_id")?,
        sensor_status: row.try_get("sensor_status")?,
        rfid: row.try_get("rfid")?,
        timestamp: row.try_get("timestamp")?,
    })
}

fn row_to_collector(row: &PgRow) -> Result<CollectorProfile> {
    Ok(CollectorProfile {
        clerk_id: row.try_get("clerk_id")?,
        rfid: row.try_get("rfid")?,
        average_rating: row.try_get("average_rating")?,
    })
}

fn row_to_request(row: &PgRow) -> Result<PickupRequest> {
    let status: String = row.try_get("status")?;
    Ok(PickupRequest {
        id: row.try_get("id")?,
        customer_clerk_id: row.try_get("customer_clerk_id")?,
        ragpicker_clerk_id: row.try_get("ragpicker_clerk_id")?,
        status: RequestStatus::parse(&status)
            .ok_or_else(|| anyhow!("unknown request status '{}'", status))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl SensorRepository for PostgresStore {
    async fn insert_sensor(&self, sensor: &Sensor) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO sensors (sensor_id, sensor_name, location, company_id, sensor_status) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (sensor_id) DO NOTHING",
        )
        .bind(&sensor.sensor_id)
        .bind(&sensor.sensor_name)
        .bind(&sensor.location)
        .bind(sensor.company_id)
        .bind(sensor.sensor_status)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn fetch_sensor(&self, sensor_id: &str) -> Result<Option<Sensor>> {
        let row = sqlx::query("SELECT * FROM sensors WHERE sensor_id = $1")
            .bind(sensor_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_sensor).transpose()
    }

    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        let rows = sqlx::query("SELECT * FROM sensors ORDER BY sensor_id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_sensor).collect()
    }

    async fn set_sensor_status(&self, sensor_id: &str, status: bool) -> Result<()> {
        sqlx::query("UPDATE sensors SET sensor_status = $2 WHERE sensor_id = $1")
            .bind(sensor_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BinEventRepository for PostgresStore {
    async fn append_event(&self, sensor_id: &str, status: bool) -> Result<BinEvent> {
        let event = BinEvent {
            id: Uuid::new_v4(),
            sensor_id: sensor_id.to_string(),
            sensor_status: status,
            rfid: None,
            timestamp: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO sensor_logs (id, sensor_id, sensor_status, rfid, \"timestamp\") \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.id)
        .bind(&event.sensor_id)
        .bind(event.sensor_status)
        .bind(&event.rfid)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(event)
    }

    async fn find_active_event(&self, sensor_id: &str) -> Result<Option<BinEvent>> {
        let row = sqlx::query(
            "SELECT * FROM sensor_logs WHERE sensor_id = $1 AND sensor_status \
             ORDER BY \"timestamp\" DESC LIMIT 1",
        )
        .bind(sensor_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_event).transpose()
    }

    async fn attach_rfid(&self, event_id: Uuid, rfid: &str) -> Result<()> {
        sqlx::query("UPDATE sensor_logs SET rfid = $2 WHERE id = $1")
            .bind(event_id)
            .bind(rfid)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn close_event(&self, event_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE sensor_logs SET sensor_status = FALSE, \"timestamp\" = $2 WHERE id = $1",
        )
        .bind(event_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_events(&self, sensor_id: &str, limit: usize) -> Result<Vec<BinEvent>> {
        let rows = sqlx::query(
            "SELECT * FROM sensor_logs WHERE sensor_id = $1 \
             ORDER BY \"timestamp\" DESC LIMIT $2",
        )
        .bind(sensor_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_event).collect()
    }
}

#[async_trait]
impl CollectorRepository for PostgresStore {
    async fn insert_collector(&self, collector: &CollectorProfile) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO ragpicker_details (clerk_id, rfid, average_rating) \
             VALUES ($1, $2, $3) ON CONFLICT (clerk_id) DO NOTHING",
        )
        .bind(&collector.clerk_id)
        .bind(&collector.rfid)
        .bind(collector.average_rating)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn fetch_collector(&self, clerk_id: &str) -> Result<Option<CollectorProfile>> {
        let row = sqlx::query("SELECT * FROM ragpicker_details WHERE clerk_id = $1")
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_collector).transpose()
    }

    async fn find_by_rfid(&self, rfid: &str) -> Result<Option<CollectorProfile>> {
        let row = sqlx::query("SELECT * FROM ragpicker_details WHERE rfid = $1")
            .bind(rfid)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_collector).transpose()
    }

    async fn bind_rfid(&self, clerk_id: &str, rfid: &str) -> Result<()> {
        sqlx::query("UPDATE ragpicker_details SET rfid = $2 WHERE clerk_id = $1")
            .bind(clerk_id)
            .bind(rfid)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_average_rating(&self, clerk_id: &str, rating: f64) -> Result<()> {
        sqlx::query("UPDATE ragpicker_details SET average_rating = $2 WHERE clerk_id = $1")
            .bind(clerk_id)
            .bind(rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for PostgresStore {
    async fn fetch_balance(&self, clerk_id: &str) -> Result<Balance> {
        let row = sqlx::query("SELECT balance FROM balances WHERE clerk_id = $1")
            .bind(clerk_id)
            .fetch_optional(&self.pool)
            .await?;
        let balance = match row {
            Some(row) => row.try_get("balance")?,
            None => 0,
        };
        Ok(Balance {
            clerk_id: clerk_id.to_string(),
            balance,
        })
    }

    async fn credit(&self, clerk_id: &str, amount: i64) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO balances (clerk_id, balance) VALUES ($1, $2) \
             ON CONFLICT (clerk_id) DO UPDATE SET balance = balances.balance + EXCLUDED.balance \
             RETURNING balance",
        )
        .bind(clerk_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("balance")?)
    }

    async fn payout(
        &self,
        company_id: i64,
        clerk_id: &str,
        amount: i64,
    ) -> Result<TransferOutcome> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT balance FROM company_balances WHERE id = $1 FOR UPDATE")
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(TransferOutcome::MissingAccount);
        };
        let available: i64 = row.try_get("balance")?;
        if available < amount {
            return Ok(TransferOutcome::InsufficientFunds { available });
        }

        sqlx::query("UPDATE company_balances SET balance = balance - $2 WHERE id = $1")
            .bind(company_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;
        let to_balance: i64 = sqlx::query(
            "INSERT INTO balances (clerk_id, balance) VALUES ($1, $2) \
             ON CONFLICT (clerk_id) DO UPDATE SET balance = balances.balance + EXCLUDED.balance \
             RETURNING balance",
        )
        .bind(clerk_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?
        .try_get("balance")?;

        tx.commit().await?;
        Ok(TransferOutcome::Completed {
            from_balance: available - amount,
            to_balance,
        })
    }

    async fn transfer(
        &self,
        from_clerk_id: &str,
        to_clerk_id: &str,
        amount: i64,
        allow_negative: bool,
    ) -> Result<TransferOutcome> {
        let mut tx = self.pool.begin().await?;

        // Both rows exist before locking; locks are taken in key order so
        // two opposite transfers cannot deadlock.
        for clerk_id in [from_clerk_id, to_clerk_id] {
            sqlx::query(
                "INSERT INTO balances (clerk_id, balance) VALUES ($1, 0) \
                 ON CONFLICT (clerk_id) DO NOTHING",
            )
            .bind(clerk_id)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query(
            "SELECT clerk_id FROM balances WHERE clerk_id IN ($1, $2) \
             ORDER BY clerk_id FOR UPDATE",
        )
        .bind(from_clerk_id)
        .bind(to_clerk_id)
        .fetch_all(&mut *tx)
        .await?;

        let available: i64 = sqlx::query("SELECT balance FROM balances WHERE clerk_id = $1")
            .bind(from_clerk_id)
            .fetch_one(&mut *tx)
            .await?
            .try_get("balance")?;
        if !allow_negative && available < amount {
            return Ok(TransferOutcome::InsufficientFunds { available });
        }

        let from_balance: i64 = sqlx::query(
            "UPDATE balances SET balance = balance - $2 WHERE clerk_id = $1 RETURNING balance",
        )
        .bind(from_clerk_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?
        .try_get("balance")?;
        let to_balance: i64 = sqlx::query(
            "UPDATE balances SET balance = balance + $2 WHERE clerk_id = $1 RETURNING balance",
        )
        .bind(to_clerk_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?
        .try_get("balance")?;

        tx.commit().await?;
        Ok(TransferOutcome::Completed {
            from_balance,
            to_balance,
        })
    }

    async fn insert_company(
        &self,
        company_name: &str,
        opening_balance: i64,
    ) -> Result<CompanyBalance> {
        let row = sqlx::query(
            "INSERT INTO company_balances (company_name, balance) VALUES ($1, $2) RETURNING id",
        )
        .bind(company_name)
        .bind(opening_balance)
        .fetch_one(&self.pool)
        .await?;
        Ok(CompanyBalance {
            id: row.try_get("id")?,
            company_name: company_name.to_string(),
            balance: opening_balance,
        })
    }

    async fn fetch_company(&self, company_id: i64) -> Result<Option<CompanyBalance>> {
        let row = sqlx::query("SELECT * FROM company_balances WHERE id = $1")
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| {
            Ok(CompanyBalance {
                id: row.try_get("id")?,
                company_name: row.try_get("company_name")?,
                balance: row.try_get("balance")?,
            })
        })
        .transpose()
    }

    async fn credit_company(&self, company_id: i64, amount: i64) -> Result<Option<i64>> {
        let row = sqlx::query(
            "UPDATE company_balances SET balance = balance + $2 WHERE id = $1 RETURNING balance",
        )
        .bind(company_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| Ok(row.try_get("balance")?)).transpose()
    }
}

#[async_trait]
impl RequestRepository for PostgresStore {
    async fn insert_request(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
    ) -> Result<PickupRequest> {
        let created_at: DateTime<Utc> = Utc::now();
        let row = sqlx::query(
            "INSERT INTO requests (customer_clerk_id, ragpicker_clerk_id, status, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(customer_clerk_id)
        .bind(ragpicker_clerk_id)
        .bind(RequestStatus::PENDING.as_str())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(PickupRequest {
            id: row.try_get("id")?,
            customer_clerk_id: customer_clerk_id.to_string(),
            ragpicker_clerk_id: ragpicker_clerk_id.to_string(),
            status: RequestStatus::PENDING,
            created_at,
            updated_at: None,
        })
    }

    async fn fetch_request(&self, id: i64) -> Result<Option<PickupRequest>> {
        let row = sqlx::query("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_request).transpose()
    }

    async fn list_by_customer(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM requests WHERE customer_clerk_id = $1 AND status = $2 \
                     ORDER BY id DESC",
                )
                .bind(clerk_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM requests WHERE customer_clerk_id = $1 ORDER BY id DESC")
                    .bind(clerk_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(row_to_request).collect()
    }

    async fn list_by_collector(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM requests WHERE ragpicker_clerk_id = $1 AND status = $2 \
                     ORDER BY id DESC",
                )
                .bind(clerk_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM requests WHERE ragpicker_clerk_id = $1 ORDER BY id DESC",
                )
                .bind(clerk_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.iter().map(row_to_request).collect()
    }

    async fn set_request_status(&self, id: i64, status: RequestStatus) -> Result<()> {
        sqlx::query("UPDATE requests SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for PostgresStore {
    async fn insert_review(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
        rating: f64,
        review: &str,
    ) -> Result<Review> {
        let created_at: DateTime<Utc> = Utc::now();
        let row = sqlx::query(
            "INSERT INTO reviews (customer_clerk_id, ragpicker_clerk_id, rating, review, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(customer_clerk_id)
        .bind(ragpicker_clerk_id)
        .bind(rating)
        .bind(review)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(Review {
            id: row.try_get("id")?,
            customer_clerk_id: customer_clerk_id.to_string(),
            ragpicker_clerk_id: ragpicker_clerk_id.to_string(),
            rating,
            review: review.to_string(),
            created_at,
        })
    }

    async fn ratings_for_collector(&self, clerk_id: &str) -> Result<Vec<f64>> {
        let rows = sqlx::query("SELECT rating FROM reviews WHERE ragpicker_clerk_id = $1")
            .bind(clerk_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| Ok(row.try_get("rating")?))
            .collect()
    }
}
