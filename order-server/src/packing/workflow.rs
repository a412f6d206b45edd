//! Packing Assignment Workflow
//!
//! Every order status write here is compare-and-set against the status read
//! in the same transaction. Unknown, expired and consumed tokens all surface
//! as the same [`AppError::invalid_token`].

use std::sync::Arc;

use shared::message::RealtimeEvent;
use shared::models::{
    AssignPackerResponse, AssignmentDetail, AssignmentStatus, ConfirmPackedResponse, OrderStatus,
    PackerAssignmentsResponse, PackerStats, PackingAssignment, PackingConfirmed,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::links::PackingLinks;
use super::{qr, token};
use crate::core::Config;
use crate::db::repository::{self, RepoError, customer, order, packer, packing};
use crate::events::EventHub;
use crate::notify::{self, Mailer};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Workflow knobs taken from [`Config`]
#[derive(Debug, Clone)]
pub struct PackingSettings {
    pub public_base_url: String,
    pub token_ttl_ms: i64,
    pub qr_enabled: bool,
}

impl From<&Config> for PackingSettings {
    fn from(config: &Config) -> Self {
        Self {
            public_base_url: config.public_base_url.clone(),
            token_ttl_ms: config.packing_token_ttl_ms(),
            qr_enabled: config.qr_enabled,
        }
    }
}

/// 打包分配服务
#[derive(Clone)]
pub struct PackingService {
    pool: SqlitePool,
    events: EventHub,
    mailer: Arc<dyn Mailer>,
    settings: PackingSettings,
}

impl PackingService {
    pub fn new(
        pool: SqlitePool,
        events: EventHub,
        mailer: Arc<dyn Mailer>,
        settings: PackingSettings,
    ) -> Self {
        Self {
            pool,
            events,
            mailer,
            settings,
        }
    }

    /// Assign a packer to an order and mint a fresh token.
    ///
    /// Allowed from `Pending`, and from `Packing` to re-assign, in which case
    /// the previous open assignment is revoked.
    pub async fn assign_packer(&self, order_id: i64, packer_id: i64) -> AppResult<AssignPackerResponse> {
        let now = now_millis();
        let mut tx = repository::begin_write(&self.pool).await?;

        let current = order::find_by_id(&mut tx, order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;
        if !matches!(current.status, OrderStatus::Pending | OrderStatus::Packing) {
            return Err(AppError::with_message(
                ErrorCode::OrderTerminal,
                format!("Order {order_id} is {} and cannot be assigned", current.status),
            )
            .with_detail("orderId", order_id)
            .with_detail("status", current.status.as_str()));
        }

        let assignee = packer::find_by_id(&mut *tx, packer_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::PackerNotFound).with_detail("packerId", packer_id)
            })?;
        if !assignee.is_active {
            return Err(AppError::new(ErrorCode::PackerInactive).with_detail("packerId", packer_id));
        }

        let revoked = packing::revoke_open_for_order(&mut tx, order_id, now).await?;

        let assignment = PackingAssignment {
            id: snowflake_id(),
            order_id,
            packer_id,
            token: token::generate_token(),
            status: AssignmentStatus::Assigned,
            expires_at: now + self.settings.token_ttl_ms,
            created_at: now,
            updated_at: now,
        };
        packing::insert(&mut tx, &assignment).await?;

        let started =
            order::start_packing(&mut tx, order_id, current.status, packer_id, assignment.id, now)
                .await?;
        if !started {
            // tx dropped here, nothing written
            return Err(status_conflict(order_id, current.status));
        }

        let updated = order::find_by_id(&mut tx, order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            packer_id,
            assignment_id = assignment.id,
            revoked,
            "Packer assigned"
        );

        let links = PackingLinks::new(&self.settings.public_base_url, &assignment.token);
        let qr_base64 = self.render_qr(order_id, &links.packer_link);

        self.events.publish(RealtimeEvent::order_updated(updated));
        self.events
            .publish(RealtimeEvent::PackingAssignmentCreated(assignment.clone()));

        Ok(AssignPackerResponse {
            success: true,
            packing_token: assignment.token,
            qr_base64,
            packer_link: links.packer_link,
            pc_link: links.pc_link,
            assignment_id: assignment.id,
            expires_at: assignment.expires_at,
        })
    }

    fn render_qr(&self, order_id: i64, link: &str) -> Option<String> {
        if !self.settings.qr_enabled {
            return None;
        }
        match qr::render_data_url(link) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(order_id, error = %e, "QR rendering failed, returning links only");
                None
            }
        }
    }

    /// Full internal view of the open assignment behind `token`
    pub async fn get_assignment_detail(&self, token: &str) -> AppResult<AssignmentDetail> {
        let now = now_millis();
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;

        let assignment = packing::find_open_by_token(&mut *conn, token, now)
            .await?
            .ok_or_else(AppError::invalid_token)?;
        let order = order::find_by_id(&mut conn, assignment.order_id)
            .await?
            .ok_or_else(AppError::invalid_token)?;
        let customer = customer::find_by_id(&mut *conn, order.customer_id)
            .await?
            .ok_or_else(AppError::invalid_token)?;
        let packer = packer::find_by_id(&mut *conn, assignment.packer_id)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        Ok(AssignmentDetail {
            assignment,
            order,
            customer,
            packer,
        })
    }

    /// Sanitized packer view. A token only ever yields its own assignment.
    pub async fn get_packer_view(&self, token: &str) -> AppResult<PackerAssignmentsResponse> {
        let detail = self.get_assignment_detail(token).await?;
        Ok(PackerAssignmentsResponse {
            assignments: vec![detail.packer_view()],
        })
    }

    /// `assigned → packed` and `Packing → Packed`, atomically. Succeeds once
    /// per assignment.
    pub async fn confirm_packed(&self, token: &str, order_id: i64) -> AppResult<ConfirmPackedResponse> {
        let now = now_millis();
        let mut tx = repository::begin_write(&self.pool).await?;

        let assignment = packing::mark_packed(&mut tx, token, order_id, now)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        let moved =
            order::update_status(&mut tx, order_id, OrderStatus::Packing, OrderStatus::Packed, now)
                .await?;
        if !moved {
            let actual = order::find_status(&mut *tx, order_id).await?;
            tracing::warn!(
                order_id,
                assignment_id = assignment.id,
                status = ?actual,
                "Confirm rejected, order no longer packing"
            );
            return Err(AppError::with_message(
                ErrorCode::OrderStatusConflict,
                format!("Order {order_id} is no longer being packed"),
            )
            .with_detail("orderId", order_id));
        }

        let packed = order::find_by_id(&mut tx, order_id)
            .await?
            .ok_or_else(|| order_not_found(order_id))?;
        let owner = customer::find_by_id(&mut *tx, packed.customer_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            packer_id = assignment.packer_id,
            assignment_id = assignment.id,
            "Order packed"
        );

        if let Some(message) = owner
            .as_ref()
            .and_then(|customer| notify::templates::order_packed(&packed, customer))
        {
            notify::spawn_send(self.mailer.clone(), message);
        }

        self.events.publish(RealtimeEvent::order_updated(packed));
        self.events
            .publish(RealtimeEvent::PackingAssignmentUpdated(assignment));
        self.events
            .publish(RealtimeEvent::PackingConfirmed(PackingConfirmed {
                order_id,
                status: OrderStatus::Packed,
            }));

        Ok(ConfirmPackedResponse {
            success: true,
            message: "Order marked as packed".to_string(),
            order_id,
        })
    }

    /// Completion statistics for a packer
    pub async fn packer_stats(&self, packer_id: i64) -> AppResult<PackerStats> {
        self.require_packer(packer_id).await?;
        let (completed, pending) = packing::count_by_status(&self.pool, packer_id).await?;
        Ok(PackerStats::from_counts(completed, pending))
    }

    /// Assignment history of a packer, newest first
    pub async fn packer_assignments(&self, packer_id: i64) -> AppResult<Vec<PackingAssignment>> {
        self.require_packer(packer_id).await?;
        Ok(packing::find_by_packer(&self.pool, packer_id).await?)
    }

    async fn require_packer(&self, packer_id: i64) -> AppResult<()> {
        packer::find_by_id(&self.pool, packer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PackerNotFound).with_detail("packerId", packer_id))?;
        Ok(())
    }
}

fn order_not_found(order_id: i64) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", order_id)
}

fn status_conflict(order_id: i64, expected: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::OrderStatusConflict,
        format!("Order {order_id} changed status concurrently (expected {expected})"),
    )
    .with_detail("orderId", order_id)
    .with_detail("expected", expected.as_str())
}
