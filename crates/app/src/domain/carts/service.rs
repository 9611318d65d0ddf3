//! Carts service.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use pitstop::{
    cart::{Cart, QuantityChange},
    coupons::CouponCode,
    pricing::{PricingRules, Totals},
    products::{CatalogEntry, ProductId},
};
use rusty_money::{Money, iso::Currency};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::domain::{
    carts::{
        errors::{CartsServiceError, Collaborator},
        locks::OwnerLocks,
        models::{CartOwner, CartRecord, CartView},
        repository::{CartsRepository, RepositoryError},
    },
    catalog::{CatalogError, CatalogService},
    checkout::{self, OrderDraft},
    coupons::{CouponGrant, CouponRejection, CouponValidationError, CouponValidator},
};

/// Default bound on a single catalog or coupon call.
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(3);

/// Default lifetime of an untouched cart.
pub const DEFAULT_CART_TTL: SignedDuration = SignedDuration::from_hours(72);

/// Runtime settings for [`DefaultCartsService`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Bound on each catalog lookup and coupon validation
    pub collaborator_timeout: Duration,

    /// How long a cart lives after its last change
    pub cart_ttl: SignedDuration,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            cart_ttl: DEFAULT_CART_TTL,
        }
    }
}

/// Carts service over a repository, a catalog and a coupon validator.
///
/// Operations on one owner run one at a time. Each mutation works on a copy
/// of the stored cart and only saves it once totals have been computed, so a
/// failed operation leaves the stored cart as it was.
#[derive(Clone)]
pub struct DefaultCartsService {
    repository: Arc<dyn CartsRepository>,
    catalog: Arc<dyn CatalogService>,
    coupons: Arc<dyn CouponValidator>,
    rules: PricingRules,
    settings: CartSettings,
    locks: OwnerLocks,
}

impl DefaultCartsService {
    /// Create a service pricing every cart with `rules`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CartsRepository>,
        catalog: Arc<dyn CatalogService>,
        coupons: Arc<dyn CouponValidator>,
        rules: PricingRules,
        settings: CartSettings,
    ) -> Self {
        Self {
            repository,
            catalog,
            coupons,
            rules,
            settings,
            locks: OwnerLocks::new(),
        }
    }

    /// Rules used to price carts.
    #[must_use]
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    async fn load_or_create(
        &self,
        owner: CartOwner,
        now: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let loaded = match self.repository.load(owner).await {
            Ok(loaded) => loaded,
            Err(source) => {
                if matches!(source, RepositoryError::Corrupted { .. }) {
                    error!(owner = %owner, error = %source, "stored cart is corrupted");
                } else {
                    error!(owner = %owner, error = %source, "failed to load cart");
                }

                return Err(source.into());
            }
        };

        match loaded {
            Some(record) if !record.is_expired(now) => Ok(record),
            Some(record) => {
                info!(owner = %owner, expired_at = %record.expires_at, "cart expired, starting fresh");

                self.repository.delete(owner).await?;

                self.fresh(owner, now)
            }
            None => self.fresh(owner, now),
        }
    }

    fn fresh(&self, owner: CartOwner, now: Timestamp) -> Result<CartRecord, CartsServiceError> {
        Ok(CartRecord::new(
            owner,
            self.rules.currency(),
            now,
            self.settings.cart_ttl,
        )?)
    }

    fn view(&self, record: CartRecord) -> Result<CartView, CartsServiceError> {
        let totals = record.cart.totals(&self.rules)?;

        Ok(CartView {
            owner: record.owner,
            cart: record.cart,
            totals,
            expires_at: record.expires_at,
        })
    }

    /// Price `cart`, then store it in place of the record's cart.
    async fn commit(
        &self,
        mut record: CartRecord,
        cart: Cart,
        now: Timestamp,
    ) -> Result<CartView, CartsServiceError> {
        let totals = cart.totals(&self.rules)?;

        record.cart = cart;
        record.touch(now, self.settings.cart_ttl)?;

        let view = CartView {
            owner: record.owner,
            cart: record.cart.clone(),
            totals,
            expires_at: record.expires_at,
        };

        self.repository.save(record).await?;

        Ok(view)
    }

    async fn lookup(&self, product: &ProductId) -> Result<CatalogEntry, CartsServiceError> {
        let result = timeout(
            self.settings.collaborator_timeout,
            self.catalog.lookup(product),
        )
        .await;

        match result {
            Ok(Ok(entry)) => Ok(entry),
            Ok(Err(CatalogError::NotFound(product))) => {
                Err(CartsServiceError::ProductNotFound(product))
            }
            Ok(Err(CatalogError::Unavailable(reason))) => {
                Err(unavailable(Collaborator::Catalog, reason))
            }
            Err(_elapsed) => Err(self.timed_out(Collaborator::Catalog)),
        }
    }

    async fn validate(
        &self,
        code: &CouponCode,
        subtotal: Money<'static, Currency>,
    ) -> Result<CouponGrant, CartsServiceError> {
        let result = timeout(
            self.settings.collaborator_timeout,
            self.coupons.validate(code, subtotal),
        )
        .await;

        match result {
            Ok(Ok(grant)) => Ok(grant),
            Ok(Err(CouponValidationError::Rejected(rejection))) => {
                Err(CartsServiceError::CouponRejected(rejection))
            }
            Ok(Err(CouponValidationError::Unavailable(reason))) => {
                Err(unavailable(Collaborator::Coupons, reason))
            }
            Err(_elapsed) => Err(self.timed_out(Collaborator::Coupons)),
        }
    }

    fn timed_out(&self, collaborator: Collaborator) -> CartsServiceError {
        unavailable(
            collaborator,
            format!(
                "no response within {}ms",
                self.settings.collaborator_timeout.as_millis()
            ),
        )
    }
}

impl fmt::Debug for DefaultCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCartsService")
            .field("rules", &self.rules)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn unavailable(collaborator: Collaborator, reason: String) -> CartsServiceError {
    warn!(%collaborator, %reason, "collaborator unavailable");

    CartsServiceError::CollaboratorUnavailable {
        collaborator,
        reason,
    }
}

#[async_trait]
impl CartsService for DefaultCartsService {
    #[tracing::instrument(name = "carts.service.get_cart", skip(self), fields(owner = %owner), err)]
    async fn get_cart(&self, owner: CartOwner) -> Result<CartView, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let record = self.load_or_create(owner, Timestamp::now()).await?;

        self.view(record)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, product),
        fields(owner = %owner, product_id = %product, quantity = quantity),
        err
    )]
    async fn add_item(
        &self,
        owner: CartOwner,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity(0));
        }

        let _guard = self.locks.acquire(owner).await;

        let now = Timestamp::now();
        let record = self.load_or_create(owner, now).await?;

        let entry = self.lookup(&product).await?;

        if !entry.in_stock {
            return Err(CartsServiceError::OutOfStock(product));
        }

        let mut cart = record.cart.clone();
        cart.add_item(product, &entry, quantity)?;

        let view = self.commit(record, cart, now).await?;

        info!(item_count = view.cart.item_count(), "added item");

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self, product),
        fields(owner = %owner, product_id = %product, quantity = quantity),
        err
    )]
    async fn update_quantity(
        &self,
        owner: CartOwner,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartView, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let now = Timestamp::now();
        let record = self.load_or_create(owner, now).await?;

        let mut cart = record.cart.clone();

        match cart.update_quantity(&product, quantity)? {
            QuantityChange::Unchanged => self.view(record),
            change => {
                let view = self.commit(record, cart, now).await?;

                info!(?change, item_count = view.cart.item_count(), "updated quantity");

                Ok(view)
            }
        }
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self, product),
        fields(owner = %owner, product_id = %product),
        err
    )]
    async fn remove_item(
        &self,
        owner: CartOwner,
        product: ProductId,
    ) -> Result<CartView, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let now = Timestamp::now();
        let record = self.load_or_create(owner, now).await?;

        let mut cart = record.cart.clone();

        if cart.remove_item(&product).is_none() {
            return self.view(record);
        }

        let view = self.commit(record, cart, now).await?;

        info!(item_count = view.cart.item_count(), "removed item");

        Ok(view)
    }

    #[tracing::instrument(
        name = "carts.service.apply_coupon",
        skip(self, code),
        fields(owner = %owner, coupon_code = tracing::field::Empty),
        err
    )]
    async fn apply_coupon(
        &self,
        owner: CartOwner,
        code: String,
    ) -> Result<CartView, CartsServiceError> {
        let code = CouponCode::new(&code).map_err(|_err| CouponRejection::EmptyCode)?;

        tracing::Span::current().record("coupon_code", tracing::field::display(&code));

        let _guard = self.locks.acquire(owner).await;

        let now = Timestamp::now();
        let record = self.load_or_create(owner, now).await?;

        let grant = self.validate(&code, record.cart.subtotal()?).await?;

        let mut cart = record.cart.clone();
        let replaced = cart.apply_coupon(grant.applied_as(code));

        let view = self.commit(record, cart, now).await?;

        info!(
            discount_kind = grant.discount.kind(),
            replaced = replaced.as_ref().map(|coupon| coupon.code.as_str()),
            "applied coupon"
        );

        Ok(view)
    }

    #[tracing::instrument(name = "carts.service.remove_coupon", skip(self), fields(owner = %owner), err)]
    async fn remove_coupon(&self, owner: CartOwner) -> Result<CartView, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let now = Timestamp::now();
        let record = self.load_or_create(owner, now).await?;

        let mut cart = record.cart.clone();

        if cart.remove_coupon().is_none() {
            return self.view(record);
        }

        self.commit(record, cart, now).await
    }

    #[tracing::instrument(name = "carts.service.totals", skip(self), fields(owner = %owner), err)]
    async fn totals(&self, owner: CartOwner) -> Result<Totals, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let record = self.load_or_create(owner, Timestamp::now()).await?;

        Ok(record.cart.totals(&self.rules)?)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), fields(owner = %owner), err)]
    async fn clear_cart(&self, owner: CartOwner) -> Result<CartView, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let existed = self.repository.delete(owner).await?;

        info!(existed, "cleared cart");

        self.view(self.fresh(owner, Timestamp::now())?)
    }

    #[tracing::instrument(name = "carts.service.draft_order", skip(self), fields(owner = %owner), err)]
    async fn draft_order(&self, owner: CartOwner) -> Result<OrderDraft, CartsServiceError> {
        let _guard = self.locks.acquire(owner).await;

        let record = self.load_or_create(owner, Timestamp::now()).await?;

        let draft = checkout::draft_order(&record.cart, &self.rules)?;

        info!(order_number = %draft.order_number, "drafted order");

        Ok(draft)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The owner's cart with its totals; a new owner gets an empty cart.
    async fn get_cart(&self, owner: CartOwner) -> Result<CartView, CartsServiceError>;

    /// Add units of a catalog product, accumulating onto an existing line.
    async fn add_item(
        &self,
        owner: CartOwner,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartsServiceError>;

    /// Set a line's quantity; zero or less removes the line.
    async fn update_quantity(
        &self,
        owner: CartOwner,
        product: ProductId,
        quantity: i64,
    ) -> Result<CartView, CartsServiceError>;

    /// Remove a line if present.
    async fn remove_item(
        &self,
        owner: CartOwner,
        product: ProductId,
    ) -> Result<CartView, CartsServiceError>;

    /// Validate a coupon code and make it the single active coupon.
    async fn apply_coupon(
        &self,
        owner: CartOwner,
        code: String,
    ) -> Result<CartView, CartsServiceError>;

    async fn remove_coupon(&self, owner: CartOwner) -> Result<CartView, CartsServiceError>;

    async fn totals(&self, owner: CartOwner) -> Result<Totals, CartsServiceError>;

    /// Empty the owner's cart, typically after an order was placed.
    async fn clear_cart(&self, owner: CartOwner) -> Result<CartView, CartsServiceError>;

    /// Draft an order from the owner's cart without clearing it.
    async fn draft_order(&self, owner: CartOwner) -> Result<OrderDraft, CartsServiceError>;
}
