use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
};
use uuid::Uuid;

use storefront_domain::email::Email;
use storefront_orders_schema::{orders, passcode_challenges, site_settings};

use crate::domain::repository::{OrderRepository, PasscodeRepository, SettingsProvider};
use crate::domain::types::{
    Customer, IssueSlot, MAX_VERIFY_ATTEMPTS, OrderLine, PasscodeChallenge, ProductSnapshot,
    SiteSettings, StatusChange,
};
use crate::error::OrdersServiceError;

// ── Passcode repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPasscodeRepository {
    pub db: DatabaseConnection,
}

impl PasscodeRepository for DbPasscodeRepository {
    async fn insert_unless_recent(
        &self,
        challenge: &PasscodeChallenge,
        window_start: DateTime<Utc>,
    ) -> Result<IssueSlot, OrdersServiceError> {
        let challenge = challenge.clone();
        let slot = self
            .db
            .transaction::<_, IssueSlot, DbErr>(move |txn| {
                Box::pin(async move {
                    // Serializes concurrent issuers for one email until commit.
                    txn.execute(Statement::from_sql_and_values(
                        txn.get_database_backend(),
                        "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
                        [challenge.email.to_string().into()],
                    ))
                    .await?;

                    let last = passcode_challenges::Entity::find()
                        .filter(passcode_challenges::Column::Email.eq(challenge.email.as_str()))
                        .filter(passcode_challenges::Column::CreatedAt.gt(window_start))
                        .order_by_desc(passcode_challenges::Column::CreatedAt)
                        .one(txn)
                        .await?;
                    if let Some(last) = last {
                        return Ok(IssueSlot::CoolingDown {
                            last_created_at: last.created_at,
                        });
                    }

                    passcode_challenges::ActiveModel {
                        id: Set(challenge.id),
                        email: Set(challenge.email.to_string()),
                        phone: Set(challenge.phone.clone()),
                        code: Set(challenge.code.clone()),
                        attempts: Set(challenge.attempts),
                        verified: Set(challenge.verified),
                        expires_at: Set(challenge.expires_at),
                        created_at: Set(challenge.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(IssueSlot::Issued)
                })
            })
            .await
            .context("insert passcode challenge unless recent")?;
        Ok(slot)
    }

    async fn find_active(
        &self,
        email: &Email,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasscodeChallenge>, OrdersServiceError> {
        let model = passcode_challenges::Entity::find()
            .filter(passcode_challenges::Column::Email.eq(email.as_str()))
            .filter(passcode_challenges::Column::Code.eq(code))
            .filter(passcode_challenges::Column::Verified.eq(false))
            .filter(passcode_challenges::Column::ExpiresAt.gt(now))
            .filter(passcode_challenges::Column::Attempts.lt(MAX_VERIFY_ATTEMPTS))
            .order_by_desc(passcode_challenges::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find active passcode challenge")?;
        Ok(model.map(challenge_from_model).transpose()?)
    }

    async fn record_failed_attempt(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<(), OrdersServiceError> {
        passcode_challenges::Entity::update_many()
            .col_expr(
                passcode_challenges::Column::Attempts,
                Expr::col(passcode_challenges::Column::Attempts).add(1),
            )
            .filter(passcode_challenges::Column::Email.eq(email.as_str()))
            .filter(passcode_challenges::Column::Verified.eq(false))
            .filter(passcode_challenges::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .context("record failed passcode attempt")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, OrdersServiceError> {
        let result = passcode_challenges::Entity::update_many()
            .col_expr(passcode_challenges::Column::Verified, Expr::value(true))
            .filter(passcode_challenges::Column::Id.eq(id))
            .filter(passcode_challenges::Column::Verified.eq(false))
            .exec(&self.db)
            .await
            .context("mark passcode challenge verified")?;
        Ok(result.rows_affected == 1)
    }

    async fn has_verified_since(
        &self,
        email: &Email,
        since: DateTime<Utc>,
    ) -> Result<bool, OrdersServiceError> {
        let count = passcode_challenges::Entity::find()
            .filter(passcode_challenges::Column::Email.eq(email.as_str()))
            .filter(passcode_challenges::Column::Verified.eq(true))
            .filter(passcode_challenges::Column::CreatedAt.gt(since))
            .count(&self.db)
            .await
            .context("count verified passcode challenges")?;
        Ok(count > 0)
    }
}

fn challenge_from_model(
    model: passcode_challenges::Model,
) -> Result<PasscodeChallenge, anyhow::Error> {
    let email = Email::parse(&model.email)
        .with_context(|| format!("passcode challenge {} has a malformed email", model.id))?;
    Ok(PasscodeChallenge {
        id: model.id,
        email,
        phone: model.phone,
        code: model.code,
        attempts: model.attempts,
        verified: model.verified,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn insert_batch(&self, lines: &[OrderLine]) -> Result<(), OrdersServiceError> {
        // One multi-row INSERT: either every line lands or none does.
        orders::Entity::insert_many(lines.iter().map(order_to_active_model))
            .exec_without_returning(&self.db)
            .await
            .context("insert order batch")?;
        Ok(())
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<OrderLine>, OrdersServiceError> {
        let model = orders::Entity::find()
            .filter(orders::Column::TrackingId.eq(tracking_id))
            .one(&self.db)
            .await
            .context("find order by tracking id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn list_by_email(&self, email: &Email) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let models = orders::Entity::find()
            .filter(orders::Column::CustomerEmail.eq(email.as_str()))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_asc(orders::Column::LineNo)
            .all(&self.db)
            .await
            .context("list orders by email")?;
        Ok(models
            .into_iter()
            .map(order_from_model)
            .collect::<Result<_, _>>()?)
    }

    async fn list_by_checkout_key(
        &self,
        email: &Email,
        checkout_key: &str,
    ) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let models = orders::Entity::find()
            .filter(orders::Column::CustomerEmail.eq(email.as_str()))
            .filter(orders::Column::CheckoutKey.eq(checkout_key))
            .order_by_asc(orders::Column::LineNo)
            .all(&self.db)
            .await
            .context("list orders by checkout key")?;
        Ok(models
            .into_iter()
            .map(order_from_model)
            .collect::<Result<_, _>>()?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        change: StatusChange,
        now: DateTime<Utc>,
    ) -> Result<Option<OrderLine>, OrdersServiceError> {
        let Some(model) = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order for status update")?
        else {
            return Ok(None);
        };

        let mut active: orders::ActiveModel = model.into();
        if let Some(status) = change.status {
            active.status = Set(status.as_str().to_owned());
        }
        if let Some(payment_status) = change.payment_status {
            active.payment_status = Set(payment_status.as_str().to_owned());
        }
        active.updated_at = Set(now);

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(order_from_model(model)?)),
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("update order status").into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, OrdersServiceError> {
        let result = orders::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete order")?;
        Ok(result.rows_affected > 0)
    }
}

fn order_to_active_model(line: &OrderLine) -> orders::ActiveModel {
    orders::ActiveModel {
        id: Set(line.id),
        tracking_id: Set(line.tracking_id.clone()),
        checkout_key: Set(line.checkout_key.clone()),
        line_no: Set(line.line_no),
        customer_name: Set(line.customer.name.clone()),
        customer_email: Set(line.customer.email.to_string()),
        customer_phone: Set(line.customer.phone.clone()),
        customer_address: Set(line.customer.address.clone()),
        product_id: Set(line.product.product_id.clone()),
        product_name: Set(line.product.name.clone()),
        product_price: Set(line.product.unit_price),
        product_image_url: Set(line.product.image_url.clone()),
        quantity: Set(line.quantity),
        total_amount: Set(line.total_amount),
        status: Set(line.status.as_str().to_owned()),
        payment_method: Set(line.payment_method.as_str().to_owned()),
        payment_status: Set(line.payment_status.as_str().to_owned()),
        notes: Set(line.notes.clone()),
        created_at: Set(line.created_at),
        updated_at: Set(line.updated_at),
    }
}

fn order_from_model(model: orders::Model) -> Result<OrderLine, anyhow::Error> {
    let id = model.id;
    let email = Email::parse(&model.customer_email)
        .with_context(|| format!("order {id} has a malformed customer email"))?;
    Ok(OrderLine {
        id,
        tracking_id: model.tracking_id,
        checkout_key: model.checkout_key,
        line_no: model.line_no,
        customer: Customer {
            name: model.customer_name,
            email,
            phone: model.customer_phone,
            address: model.customer_address,
        },
        product: ProductSnapshot {
            product_id: model.product_id,
            name: model.product_name,
            unit_price: model.product_price,
            image_url: model.product_image_url,
        },
        quantity: model.quantity,
        total_amount: model.total_amount,
        status: model
            .status
            .parse()
            .with_context(|| format!("order {id}"))?,
        payment_method: model
            .payment_method
            .parse()
            .with_context(|| format!("order {id}"))?,
        payment_status: model
            .payment_status
            .parse()
            .with_context(|| format!("order {id}"))?,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Site settings ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsProvider {
    pub db: DatabaseConnection,
}

impl SettingsProvider for DbSettingsProvider {
    async fn snapshot(&self) -> Result<SiteSettings, OrdersServiceError> {
        let rows = site_settings::Entity::find()
            .all(&self.db)
            .await
            .context("load site settings")?;
        Ok(SiteSettings::from_entries(
            rows.into_iter().map(|row| (row.key, row.value)),
        ))
    }
}
