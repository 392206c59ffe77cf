//! Alert service and evaluation engine
//!
//! The engine consumes one new satellite reading, evaluates the alert rules
//! against the reading, the owning farm, and a freshly fetched climate
//! outlook, persists the fired alerts (plus their remediation tasks), and
//! notifies the farm's owner with one consolidated e-mail per evaluation.
//!
//! All collaborators are treated as fallible, best-effort services: a failed
//! forecast disables the forecast rules, a failed row write is logged and the
//! remaining alerts still persist, and a failed send never rolls anything
//! back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use shared::models::ClimateSummary;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::mailer::{Mailer, OutboundEmail};
use crate::external::weather::ForecastProvider;
use crate::services::farms::{Farm, FarmService, UpdateFarmInput};
use crate::services::readings::Reading;
use crate::services::rules::{self, RuleContext};
use crate::services::tasks::{FarmTask, NewTask, TaskService};
use crate::services::users::{User, UserService};

/// A persisted record of a rule firing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub alert_type: String,
    pub message: String,
    pub sent_to: String,
    pub read: bool,
    pub date: DateTime<Utc>,
}

/// Alert service for the persisted alert feed
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Write one alert-log row
    pub async fn log_alert(
        &self,
        farm_id: Uuid,
        alert_type: &str,
        message: &str,
        sent_to: &str,
    ) -> AppResult<Alert> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (farm_id, alert_type, message, sent_to)
            VALUES ($1, $2, $3, $4)
            RETURNING id, farm_id, alert_type, message, sent_to, read, date
            "#,
        )
        .bind(farm_id)
        .bind(alert_type)
        .bind(message)
        .bind(sent_to)
        .fetch_one(&self.db)
        .await?;

        Ok(alert)
    }

    /// Get alerts for a farm, newest first
    pub async fn list(
        &self,
        farm_id: Uuid,
        unread_only: bool,
        limit: i32,
    ) -> AppResult<Vec<Alert>> {
        let alerts = if unread_only {
            sqlx::query_as::<_, Alert>(
                r#"
                SELECT id, farm_id, alert_type, message, sent_to, read, date
                FROM alerts
                WHERE farm_id = $1 AND read = false
                ORDER BY date DESC
                LIMIT $2
                "#,
            )
            .bind(farm_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, Alert>(
                r#"
                SELECT id, farm_id, alert_type, message, sent_to, read, date
                FROM alerts
                WHERE farm_id = $1
                ORDER BY date DESC
                LIMIT $2
                "#,
            )
            .bind(farm_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?
        };

        Ok(alerts)
    }

    /// Get unread alert count for a farm
    pub async fn unread_count(&self, farm_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM alerts WHERE farm_id = $1 AND read = false",
        )
        .bind(farm_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Mark an alert as read
    pub async fn mark_as_read(&self, alert_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE alerts SET read = true
            FROM farms
            WHERE alerts.id = $1 AND farms.id = alerts.farm_id AND farms.owner_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Alert".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// Engine collaborator seams
// ============================================================================

/// Persistence operations the engine needs
#[async_trait]
pub trait EngineStore: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn get_farm(&self, farm_id: Uuid) -> AppResult<Option<Farm>>;
    async fn update_farm(&self, farm_id: Uuid, patch: UpdateFarmInput) -> AppResult<Farm>;
    async fn log_alert(
        &self,
        farm_id: Uuid,
        alert_type: &str,
        message: &str,
        sent_to: &str,
    ) -> AppResult<Alert>;
    async fn create_task(&self, task: NewTask) -> AppResult<FarmTask>;
}

/// Postgres-backed engine store delegating to the entity services
pub struct PgEngineStore {
    users: UserService,
    farms: FarmService,
    alerts: AlertService,
    tasks: TaskService,
}

impl PgEngineStore {
    pub fn new(db: PgPool) -> Self {
        Self {
            users: UserService::new(db.clone()),
            farms: FarmService::new(db.clone()),
            alerts: AlertService::new(db.clone()),
            tasks: TaskService::new(db),
        }
    }
}

#[async_trait]
impl EngineStore for PgEngineStore {
    async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.users.find(user_id).await
    }

    async fn get_farm(&self, farm_id: Uuid) -> AppResult<Option<Farm>> {
        self.farms.find(farm_id).await
    }

    async fn update_farm(&self, farm_id: Uuid, patch: UpdateFarmInput) -> AppResult<Farm> {
        self.farms.update(farm_id, patch).await
    }

    async fn log_alert(
        &self,
        farm_id: Uuid,
        alert_type: &str,
        message: &str,
        sent_to: &str,
    ) -> AppResult<Alert> {
        self.alerts.log_alert(farm_id, alert_type, message, sent_to).await
    }

    async fn create_task(&self, task: NewTask) -> AppResult<FarmTask> {
        self.tasks.create(task).await
    }
}

/// Source of the uniform draw for the deforestation-risk rule
pub trait RiskSampler: Send + Sync {
    /// Uniform draw in [0, 1)
    fn sample(&self) -> f64;
}

/// Thread-local RNG sampler used in production
pub struct ThreadRngSampler;

impl RiskSampler for ThreadRngSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

// ============================================================================
// Evaluation engine
// ============================================================================

/// Outcome of one reading evaluation, for logging and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSummary {
    /// Evaluation ended before the rules ran (no user, or opted out)
    pub skipped: bool,
    pub fired: usize,
    pub alerts_logged: usize,
    pub tasks_created: usize,
    pub notified: bool,
}

impl EvaluationSummary {
    fn skipped() -> Self {
        Self {
            skipped: true,
            fired: 0,
            alerts_logged: 0,
            tasks_created: 0,
            notified: false,
        }
    }
}

/// The alert evaluation engine
#[derive(Clone)]
pub struct AlertEngine {
    store: Arc<dyn EngineStore>,
    forecast: Arc<dyn ForecastProvider>,
    mailer: Arc<dyn Mailer>,
    sampler: Arc<dyn RiskSampler>,
    forecast_timeout: Duration,
    deforestation_probability: f64,
}

impl AlertEngine {
    pub fn new(
        store: Arc<dyn EngineStore>,
        forecast: Arc<dyn ForecastProvider>,
        mailer: Arc<dyn Mailer>,
        sampler: Arc<dyn RiskSampler>,
        forecast_timeout: Duration,
        deforestation_probability: f64,
    ) -> Self {
        Self {
            store,
            forecast,
            mailer,
            sampler,
            forecast_timeout,
            deforestation_probability,
        }
    }

    /// Evaluate a reading in a detached task. The caller's request-response
    /// cycle never waits on the engine; failures land in the log only.
    pub fn spawn_evaluation(&self, reading: Reading) {
        let engine = self.clone();
        tokio::spawn(async move {
            let farm_id = reading.farm_id;
            match engine.process_reading(&reading).await {
                Ok(summary) if summary.skipped => {
                    tracing::debug!(farm_id = %farm_id, "evaluation skipped: owner absent or opted out");
                }
                Ok(summary) => {
                    tracing::info!(
                        farm_id = %farm_id,
                        fired = summary.fired,
                        alerts_logged = summary.alerts_logged,
                        tasks_created = summary.tasks_created,
                        notified = summary.notified,
                        "reading evaluated"
                    );
                }
                Err(e) => {
                    tracing::error!(farm_id = %farm_id, error = %e, "reading evaluation failed");
                }
            }
        });
    }

    /// Run one full evaluation cycle for a reading
    pub async fn process_reading(&self, reading: &Reading) -> AppResult<EvaluationSummary> {
        let farm = match self.store.get_farm(reading.farm_id).await? {
            Some(farm) => farm,
            None => {
                tracing::warn!(farm_id = %reading.farm_id, "reading for unknown farm, skipping evaluation");
                return Ok(EvaluationSummary::skipped());
            }
        };

        // The recipient is always the farm's owner; no owner or an opt-out
        // means the engine performs no work at all.
        let user = match self.store.get_user(farm.owner_id).await? {
            Some(user) if user.receive_alerts => user,
            _ => return Ok(EvaluationSummary::skipped()),
        };

        let forecast = self.fetch_forecast(&farm).await;

        let ctx = RuleContext {
            reading,
            farm: &farm,
            forecast: forecast.as_ref(),
            risk_draw: self.sampler.sample(),
            risk_probability: self.deforestation_probability,
        };
        let fired = rules::evaluate(&ctx);

        let mut summary = EvaluationSummary {
            skipped: false,
            fired: fired.len(),
            alerts_logged: 0,
            tasks_created: 0,
            notified: false,
        };

        // Each alert persists as its own unit of work; one failure never
        // aborts the rest.
        for alert in &fired {
            match self
                .store
                .log_alert(farm.id, alert.alert_type, &alert.message, &user.email)
                .await
            {
                Ok(_) => summary.alerts_logged += 1,
                Err(e) => {
                    tracing::error!(
                        farm_id = %farm.id,
                        alert_type = alert.alert_type,
                        error = %e,
                        "failed to log alert"
                    );
                }
            }

            if let Some(template) = &alert.task {
                let task = NewTask {
                    farm_id: farm.id,
                    title: template.title.to_string(),
                    description: template.description.clone(),
                    priority: template.priority,
                    due_date: Utc::now() + chrono::Duration::hours(48),
                };
                match self.store.create_task(task).await {
                    Ok(_) => summary.tasks_created += 1,
                    Err(e) => {
                        tracing::error!(
                            farm_id = %farm.id,
                            task_title = template.title,
                            error = %e,
                            "failed to create task"
                        );
                    }
                }
            }

            if alert.latches_deforestation {
                let patch = UpdateFarmInput {
                    is_deforested: Some(true),
                    ..Default::default()
                };
                if let Err(e) = self.store.update_farm(farm.id, patch).await {
                    tracing::error!(farm_id = %farm.id, error = %e, "failed to latch deforestation flag");
                }
            }
        }

        if !fired.is_empty() {
            let email = build_notification(&farm, &user, &fired);
            match self.mailer.send(&email).await {
                Ok(()) => summary.notified = true,
                Err(e) => {
                    tracing::error!(farm_id = %farm.id, error = %e, "failed to send alert notification");
                }
            }
        }

        Ok(summary)
    }

    /// Fetch the climate outlook within the configured budget. Any failure or
    /// timeout means "no forecast" and the forecast rules are skipped.
    async fn fetch_forecast(&self, farm: &Farm) -> Option<ClimateSummary> {
        let fetch = self.forecast.climate_summary(farm.latitude, farm.longitude);
        match tokio::time::timeout(self.forecast_timeout, fetch).await {
            Ok(Ok(summary)) => Some(summary),
            Ok(Err(e)) => {
                tracing::warn!(farm_id = %farm.id, error = %e, "forecast unavailable, skipping forecast rules");
                None
            }
            Err(_) => {
                tracing::warn!(farm_id = %farm.id, "forecast fetch timed out, skipping forecast rules");
                None
            }
        }
    }
}

/// Build the consolidated notification for one evaluation's fired alerts
fn build_notification(farm: &Farm, user: &User, fired: &[rules::FiredAlert]) -> OutboundEmail {
    let mut items_html = String::new();
    let mut items_text = String::new();
    for alert in fired {
        items_html.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>",
            alert.alert_type, alert.message
        ));
        items_text.push_str(&format!("- {}: {}\n", alert.alert_type, alert.message));
    }

    OutboundEmail {
        to: user.email.clone(),
        subject: format!("AgroSat | Novos alertas para {}", farm.name),
        text: format!(
            "Novos alertas de monitoramento para a fazenda {}:\n{}",
            farm.name, items_text
        ),
        html: format!(
            "<p>Novos alertas de monitoramento para a fazenda <strong>{}</strong>:</p><ul>{}</ul>",
            farm.name, items_html
        ),
    }
}
