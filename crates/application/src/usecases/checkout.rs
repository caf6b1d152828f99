use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use domain::{
    repositories::{
        channel::ChannelGateway,
        checkout::{CheckoutOutcome, CheckoutRepository, ConfirmedCheckout},
        promo_codes::PromoCodeRepository,
        settings::SettingRepository,
        tariffs::TariffRepository,
        users::UserRepository,
    },
    value_objects::{
        pricing::discounted_price_minor,
        purchase_reference::PurchaseReference,
        quotes::{AppliedPromo, PurchaseQuote},
        settings::SettingKey,
    },
};

/// Invite links are short-lived so the credential cannot be hoarded or
/// resold.
const INVITE_LINK_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("tariff not found")]
    TariffNotFound,
    #[error("invalid purchase reference: {0}")]
    InvalidReference(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CheckoutResult<T> = std::result::Result<T, CheckoutError>;

#[derive(Debug, Clone)]
pub struct ConfirmedPurchase {
    pub end_date: Option<DateTime<Utc>>,
    pub duplicate: bool,
}

/// Builds purchase quotes and reconciles asynchronous payment
/// confirmations. Quoting only previews a discount; the promo counter
/// moves inside the confirmation commit, exactly once per sale.
pub struct CheckoutUseCase<C, T, P, U, S, G>
where
    C: CheckoutRepository + Send + Sync + 'static,
    T: TariffRepository + Send + Sync + 'static,
    P: PromoCodeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SettingRepository + Send + Sync + 'static,
    G: ChannelGateway + Send + Sync + 'static,
{
    checkout_repo: Arc<C>,
    tariff_repo: Arc<T>,
    promo_repo: Arc<P>,
    user_repo: Arc<U>,
    setting_repo: Arc<S>,
    channel: Arc<G>,
}

impl<C, T, P, U, S, G> CheckoutUseCase<C, T, P, U, S, G>
where
    C: CheckoutRepository + Send + Sync + 'static,
    T: TariffRepository + Send + Sync + 'static,
    P: PromoCodeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SettingRepository + Send + Sync + 'static,
    G: ChannelGateway + Send + Sync + 'static,
{
    pub fn new(
        checkout_repo: Arc<C>,
        tariff_repo: Arc<T>,
        promo_repo: Arc<P>,
        user_repo: Arc<U>,
        setting_repo: Arc<S>,
        channel: Arc<G>,
    ) -> Self {
        Self {
            checkout_repo,
            tariff_repo,
            promo_repo,
            user_repo,
            setting_repo,
            channel,
        }
    }

    pub async fn quote(
        &self,
        user_id: i64,
        username: Option<String>,
        tariff_id: i32,
        promo_code: Option<&str>,
    ) -> CheckoutResult<PurchaseQuote> {
        self.user_repo
            .ensure_user(user_id, username)
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "checkout: failed to register user");
                CheckoutError::Internal(err)
            })?;

        let tariff = self
            .tariff_repo
            .find(tariff_id)
            .await
            .map_err(|err| {
                error!(user_id, tariff_id, db_error = ?err, "checkout: failed to load tariff");
                CheckoutError::Internal(err)
            })?
            .ok_or(CheckoutError::TariffNotFound)?;

        let promo = match promo_code {
            Some(code) => match self.promo_repo.find_by_code(code).await.map_err(|err| {
                error!(user_id, db_error = ?err, "checkout: failed to look up promo code");
                CheckoutError::Internal(err)
            })? {
                Some(promo) if promo.is_redeemable() => Some(promo),
                Some(promo) => {
                    info!(
                        user_id,
                        code = %promo.code,
                        "checkout: promo code not redeemable; quoting full price"
                    );
                    None
                }
                None => {
                    info!(user_id, "checkout: unknown promo code; quoting full price");
                    None
                }
            },
            None => None,
        };

        let final_price = promo
            .as_ref()
            .map(|promo| discounted_price_minor(tariff.price_minor, promo.discount_percent))
            .unwrap_or(tariff.price_minor);

        let reference = PurchaseReference::new(
            user_id,
            tariff.id,
            final_price,
            tariff.duration_days,
            promo.as_ref().map(|promo| promo.code.as_str()),
        )?;

        info!(
            user_id,
            tariff_id = tariff.id,
            final_price,
            promo_applied = promo.is_some(),
            "checkout: quote built"
        );

        Ok(PurchaseQuote {
            tariff_id: tariff.id,
            tariff_name: tariff.name,
            duration_days: tariff.duration_days,
            base_price_minor: tariff.price_minor,
            final_price_minor: final_price,
            promo: promo.map(|promo| AppliedPromo {
                code: promo.code,
                discount_percent: promo.discount_percent,
            }),
            reference: reference.to_string(),
        })
    }

    pub async fn confirm(
        &self,
        reference: &str,
        provider_payment_id: &str,
    ) -> CheckoutResult<ConfirmedPurchase> {
        let reference: PurchaseReference = reference.parse().map_err(|err: anyhow::Error| {
            warn!(provider_payment_id, error = %err, "checkout: malformed purchase reference");
            CheckoutError::InvalidReference(err.to_string())
        })?;

        let user_id = reference.user_id;
        let had_promo = reference.promo_code.is_some();

        let outcome = self
            .checkout_repo
            .apply_confirmed(ConfirmedCheckout {
                user_id,
                tariff_id: reference.tariff_id,
                amount_minor: reference.final_price_minor,
                duration_days: reference.duration_days,
                promo_code: reference.promo_code.clone(),
                provider_payment_id: provider_payment_id.to_string(),
            })
            .await
            .map_err(|err| {
                error!(
                    user_id,
                    provider_payment_id,
                    db_error = ?err,
                    "checkout: failed to commit confirmed payment"
                );
                CheckoutError::Internal(err)
            })?;

        match outcome {
            CheckoutOutcome::Duplicate { current_end } => {
                info!(
                    user_id,
                    provider_payment_id, "checkout: duplicate confirmation ignored"
                );
                Ok(ConfirmedPurchase {
                    end_date: current_end,
                    duplicate: true,
                })
            }
            CheckoutOutcome::Applied {
                new_end,
                promo_redeemed,
            } => {
                if had_promo && !promo_redeemed {
                    warn!(
                        user_id,
                        "checkout: promo exhausted between preview and confirmation; sale kept at the agreed price"
                    );
                }

                // A committed extension always lands in the future; if
                // this ever fires the transaction boundary is broken
                // and a human needs to look at it.
                if new_end <= Utc::now() {
                    error!(
                        user_id,
                        provider_payment_id,
                        new_end = %new_end,
                        "checkout: committed extension did not produce a future end date"
                    );
                }

                info!(
                    user_id,
                    amount_minor = reference.final_price_minor,
                    new_end = %new_end,
                    "checkout: payment applied"
                );

                self.fulfill(user_id, new_end).await;

                Ok(ConfirmedPurchase {
                    end_date: Some(new_end),
                    duplicate: false,
                })
            }
        }
    }

    // Delivery is best effort: the payment is already committed, so
    // nothing here may fail the confirmation.
    async fn fulfill(&self, user_id: i64, new_end: DateTime<Utc>) {
        let success_text = format!(
            "Payment received! Your subscription is active until {}.",
            new_end.format("%d.%m.%Y %H:%M UTC")
        );
        if let Err(err) = self.channel.send_text(user_id, &success_text).await {
            warn!(user_id, error = ?err, "checkout: failed to deliver confirmation message");
        }

        let Some(channel_id) = self.configured_channel_id().await else {
            error!(
                user_id,
                "checkout: channel id is not configured; cannot send invite link"
            );
            self.apologize(user_id).await;
            return;
        };

        match self
            .channel
            .create_invite_link(channel_id, INVITE_LINK_TTL_SECS)
            .await
        {
            Ok(link) => {
                let invite_text = format!(
                    "Here is your single-use invite link (valid for one hour):\n{link}"
                );
                if let Err(err) = self.channel.send_text(user_id, &invite_text).await {
                    warn!(user_id, error = ?err, "checkout: failed to deliver invite link");
                }
            }
            Err(err) => {
                error!(user_id, error = ?err, "checkout: failed to mint invite link");
                self.apologize(user_id).await;
            }
        }
    }

    async fn configured_channel_id(&self) -> Option<i64> {
        match self.setting_repo.get(SettingKey::ChannelId).await {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(err) => {
                error!(db_error = ?err, "checkout: failed to load channel id setting");
                None
            }
        }
    }

    async fn apologize(&self, user_id: i64) {
        let text = "Your subscription is active, but sending the invite link failed. \
                    Please contact the administrator.";
        if let Err(err) = self.channel.send_text(user_id, text).await {
            warn!(user_id, error = ?err, "checkout: failed to deliver apology message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Duration;
    use domain::entities::promo_codes::PromoCodeEntity;
    use domain::entities::tariffs::TariffEntity;
    use domain::repositories::channel::MockChannelGateway;
    use domain::repositories::checkout::MockCheckoutRepository;
    use domain::repositories::promo_codes::MockPromoCodeRepository;
    use domain::repositories::settings::MockSettingRepository;
    use domain::repositories::tariffs::MockTariffRepository;
    use domain::repositories::users::MockUserRepository;

    struct Fixture {
        checkout_repo: MockCheckoutRepository,
        tariff_repo: MockTariffRepository,
        promo_repo: MockPromoCodeRepository,
        user_repo: MockUserRepository,
        setting_repo: MockSettingRepository,
        channel: MockChannelGateway,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                checkout_repo: MockCheckoutRepository::new(),
                tariff_repo: MockTariffRepository::new(),
                promo_repo: MockPromoCodeRepository::new(),
                user_repo: MockUserRepository::new(),
                setting_repo: MockSettingRepository::new(),
                channel: MockChannelGateway::new(),
            }
        }

        fn build(
            self,
        ) -> CheckoutUseCase<
            MockCheckoutRepository,
            MockTariffRepository,
            MockPromoCodeRepository,
            MockUserRepository,
            MockSettingRepository,
            MockChannelGateway,
        > {
            CheckoutUseCase::new(
                Arc::new(self.checkout_repo),
                Arc::new(self.tariff_repo),
                Arc::new(self.promo_repo),
                Arc::new(self.user_repo),
                Arc::new(self.setting_repo),
                Arc::new(self.channel),
            )
        }
    }

    fn monthly_tariff() -> TariffEntity {
        TariffEntity {
            id: 1,
            name: "Monthly".to_string(),
            price_minor: 500,
            duration_days: 30,
            created_at: Utc::now(),
        }
    }

    fn sale10(uses_count: i32) -> PromoCodeEntity {
        PromoCodeEntity {
            id: 7,
            code: "SALE10".to_string(),
            discount_percent: 10,
            max_uses: 5,
            uses_count,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn quote_without_promo_uses_the_full_price() {
        let mut fixture = Fixture::new();
        fixture.user_repo.expect_ensure_user().returning(|_, _| Ok(()));
        fixture
            .tariff_repo
            .expect_find()
            .returning(|_| Ok(Some(monthly_tariff())));

        let quote = fixture.build().quote(42, None, 1, None).await.unwrap();
        assert_eq!(quote.final_price_minor, 500);
        assert_eq!(quote.reference, "sub:42:1:500:30:none");
        assert!(quote.promo.is_none());
    }

    #[tokio::test]
    async fn quote_applies_a_redeemable_promo() {
        let mut fixture = Fixture::new();
        fixture.user_repo.expect_ensure_user().returning(|_, _| Ok(()));
        fixture
            .tariff_repo
            .expect_find()
            .returning(|_| Ok(Some(monthly_tariff())));
        fixture
            .promo_repo
            .expect_find_by_code()
            .withf(|code| code == "sale10")
            .returning(|_| Ok(Some(sale10(4))));

        let quote = fixture
            .build()
            .quote(42, None, 1, Some("sale10"))
            .await
            .unwrap();
        assert_eq!(quote.final_price_minor, 450);
        assert_eq!(quote.reference, "sub:42:1:450:30:SALE10");
        assert_eq!(quote.promo.as_ref().unwrap().discount_percent, 10);
    }

    #[tokio::test]
    async fn quote_falls_back_to_full_price_when_promo_is_exhausted() {
        let mut fixture = Fixture::new();
        fixture.user_repo.expect_ensure_user().returning(|_, _| Ok(()));
        fixture
            .tariff_repo
            .expect_find()
            .returning(|_| Ok(Some(monthly_tariff())));
        fixture
            .promo_repo
            .expect_find_by_code()
            .returning(|_| Ok(Some(sale10(5))));

        let quote = fixture
            .build()
            .quote(42, None, 1, Some("SALE10"))
            .await
            .unwrap();
        assert_eq!(quote.final_price_minor, 500);
        assert!(quote.promo.is_none());
    }

    #[tokio::test]
    async fn quote_surfaces_unknown_tariffs() {
        let mut fixture = Fixture::new();
        fixture.user_repo.expect_ensure_user().returning(|_, _| Ok(()));
        fixture.tariff_repo.expect_find().returning(|_| Ok(None));

        let result = fixture.build().quote(42, None, 99, None).await;
        assert!(matches!(result, Err(CheckoutError::TariffNotFound)));
    }

    #[tokio::test]
    async fn confirm_applies_the_sale_and_delivers_the_invite() {
        let new_end = Utc::now() + Duration::days(30);
        let mut fixture = Fixture::new();
        fixture
            .checkout_repo
            .expect_apply_confirmed()
            .withf(|checkout| {
                checkout.user_id == 42
                    && checkout.amount_minor == 500
                    && checkout.duration_days == 30
                    && checkout.promo_code.is_none()
                    && checkout.provider_payment_id == "tx-1"
            })
            .returning(move |_| {
                Ok(CheckoutOutcome::Applied {
                    new_end,
                    promo_redeemed: false,
                })
            });
        fixture
            .setting_repo
            .expect_get()
            .returning(|_| Ok(Some("-1001234".to_string())));
        fixture
            .channel
            .expect_create_invite_link()
            .withf(|channel_id, ttl| *channel_id == -1001234 && *ttl == 3600)
            .returning(|_, _| Ok("https://t.me/+invite".to_string()));
        fixture
            .channel
            .expect_send_text()
            .times(2)
            .returning(|_, _| Ok(()));

        let confirmed = fixture
            .build()
            .confirm("sub:42:1:500:30:none", "tx-1")
            .await
            .unwrap();
        assert!(!confirmed.duplicate);
        assert_eq!(confirmed.end_date, Some(new_end));
    }

    #[tokio::test]
    async fn confirm_is_a_no_op_for_duplicate_confirmations() {
        let current_end = Utc::now() + Duration::days(12);
        let mut fixture = Fixture::new();
        fixture
            .checkout_repo
            .expect_apply_confirmed()
            .returning(move |_| Ok(CheckoutOutcome::Duplicate { current_end: Some(current_end) }));
        // No gateway or settings expectations: a duplicate must not
        // trigger fulfillment again.

        let confirmed = fixture
            .build()
            .confirm("sub:42:1:500:30:none", "tx-1")
            .await
            .unwrap();
        assert!(confirmed.duplicate);
        assert_eq!(confirmed.end_date, Some(current_end));
    }

    #[tokio::test]
    async fn confirm_keeps_the_sale_when_the_promo_lost_the_race() {
        let new_end = Utc::now() + Duration::days(30);
        let mut fixture = Fixture::new();
        fixture.checkout_repo.expect_apply_confirmed().returning(move |_| {
            Ok(CheckoutOutcome::Applied {
                new_end,
                promo_redeemed: false,
            })
        });
        fixture
            .setting_repo
            .expect_get()
            .returning(|_| Ok(Some("-1001234".to_string())));
        fixture
            .channel
            .expect_create_invite_link()
            .returning(|_, _| Ok("https://t.me/+invite".to_string()));
        fixture
            .channel
            .expect_send_text()
            .times(2)
            .returning(|_, _| Ok(()));

        let confirmed = fixture
            .build()
            .confirm("sub:42:1:450:30:SALE10", "tx-2")
            .await
            .unwrap();
        assert!(!confirmed.duplicate);
        assert_eq!(confirmed.end_date, Some(new_end));
    }

    #[tokio::test]
    async fn confirm_sends_an_apology_when_the_invite_cannot_be_minted() {
        let new_end = Utc::now() + Duration::days(30);
        let mut fixture = Fixture::new();
        fixture.checkout_repo.expect_apply_confirmed().returning(move |_| {
            Ok(CheckoutOutcome::Applied {
                new_end,
                promo_redeemed: false,
            })
        });
        fixture
            .setting_repo
            .expect_get()
            .returning(|_| Ok(Some("-1001234".to_string())));
        fixture
            .channel
            .expect_create_invite_link()
            .returning(|_, _| Err(anyhow!("chat not found")));
        fixture
            .channel
            .expect_send_text()
            .withf(|_, text| text.starts_with("Payment received!"))
            .times(1)
            .returning(|_, _| Ok(()));
        fixture
            .channel
            .expect_send_text()
            .withf(|_, text| text.contains("contact the administrator"))
            .times(1)
            .returning(|_, _| Ok(()));

        let confirmed = fixture
            .build()
            .confirm("sub:42:1:500:30:none", "tx-3")
            .await
            .unwrap();
        assert!(!confirmed.duplicate);
    }

    #[tokio::test]
    async fn confirm_rejects_malformed_references() {
        let fixture = Fixture::new();
        // The commit path must never run for garbage input.

        let result = fixture.build().confirm("not-a-reference", "tx-4").await;
        assert!(matches!(result, Err(CheckoutError::InvalidReference(_))));
    }
}
