use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain::{
    repositories::{payments::PaymentRepository, users::UserRepository},
    value_objects::stats::{SalesSummary, TariffPopularity},
};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct BotStats {
    pub users_total: i64,
    pub active_subscriptions: i64,
    pub today: SalesSummary,
    pub last_week: SalesSummary,
    pub last_month: SalesSummary,
    pub all_time: SalesSummary,
    pub most_popular_tariff: Option<TariffPopularity>,
}

pub struct StatsUseCase<U, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    payment_repo: Arc<Pay>,
}

impl<U, Pay> StatsUseCase<U, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, payment_repo: Arc<Pay>) -> Self {
        Self {
            user_repo,
            payment_repo,
        }
    }

    pub async fn overview(&self) -> Result<BotStats, StatsError> {
        let now = Utc::now();

        let load = async {
            anyhow::Ok(BotStats {
                users_total: self.user_repo.count_users().await?,
                active_subscriptions: self.user_repo.count_active(now).await?,
                today: self.payment_repo.sales_since(Some(now - Duration::days(1))).await?,
                last_week: self
                    .payment_repo
                    .sales_since(Some(now - Duration::days(7)))
                    .await?,
                last_month: self
                    .payment_repo
                    .sales_since(Some(now - Duration::days(30)))
                    .await?,
                all_time: self.payment_repo.sales_since(None).await?,
                most_popular_tariff: self.payment_repo.most_popular_tariff().await?,
            })
        };

        load.await.map_err(|err| {
            error!(db_error = ?err, "stats: failed to build overview");
            StatsError::Internal(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::repositories::{
        payments::MockPaymentRepository, users::MockUserRepository,
    };

    #[tokio::test]
    async fn overview_aggregates_all_periods() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_count_users().returning(|| Ok(10));
        user_repo.expect_count_active().returning(|_| Ok(4));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_sales_since()
            .times(4)
            .returning(|since| {
                Ok(match since {
                    Some(_) => SalesSummary {
                        revenue_minor: 500,
                        sales: 1,
                    },
                    None => SalesSummary {
                        revenue_minor: 5000,
                        sales: 10,
                    },
                })
            });
        payment_repo.expect_most_popular_tariff().returning(|| {
            Ok(Some(TariffPopularity {
                tariff_name: "Monthly".to_string(),
                sales: 7,
            }))
        });

        let usecase = StatsUseCase::new(Arc::new(user_repo), Arc::new(payment_repo));
        let stats = usecase.overview().await.unwrap();

        assert_eq!(stats.users_total, 10);
        assert_eq!(stats.active_subscriptions, 4);
        assert_eq!(stats.all_time.revenue_minor, 5000);
        assert_eq!(stats.today.sales, 1);
        assert_eq!(
            stats.most_popular_tariff.unwrap().tariff_name,
            "Monthly"
        );
    }
}
