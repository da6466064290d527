//! Order placement workflow.
//!
//! Placing an order is the one irreversible transition in the shop:
//! the cart is cleared first, unconditionally, and only then are the
//! durable write and the confirmation notifications attempted. Both are
//! fire-and-forget - a failed write or send is logged and never
//! surfaces to the buyer, and nothing rolls the cart back.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use spicejar_core::Username;

use crate::catalog::Catalog;
use crate::models::{Cart, CheckoutDetails, OrderSnapshot};
use crate::services::notify::Notifier;
use crate::stores::RecordStore;

/// Subject line on order confirmation emails.
const CONFIRMATION_SUBJECT: &str = "Your Order Confirmation";

/// Orchestrates checkout, order placement, and downstream side effects.
#[derive(Clone)]
pub struct OrderService {
    records: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    sms_number: Option<String>,
    topic: Option<String>,
}

impl OrderService {
    /// Create the order workflow over its collaborators.
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        sms_number: Option<String>,
        topic: Option<String>,
    ) -> Self {
        Self {
            records,
            notifier,
            sms_number,
            topic,
        }
    }

    /// Compute the read-only checkout snapshot for the current cart.
    ///
    /// Pure function of cart and catalog; recomputable any number of
    /// times without side effects.
    #[must_use]
    pub fn review(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        username: &Username,
        customer: CheckoutDetails,
    ) -> OrderSnapshot {
        let totals = cart.totals(catalog);
        OrderSnapshot {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            username: username.to_string(),
            customer,
            lines: totals.items,
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
        }
    }

    /// Place an order: snapshot the cart, clear it, dispatch the side
    /// effects in the background, and return the snapshot.
    ///
    /// The clear happens before anything that can fail. An empty cart
    /// is not special-cased: the snapshot simply has no lines and the
    /// collaborators are still invoked.
    pub fn place(
        &self,
        cart: &mut Cart,
        catalog: &Catalog,
        username: &Username,
        customer: CheckoutDetails,
    ) -> OrderSnapshot {
        let snapshot = self.review(cart, catalog, username, customer);

        *cart = Cart::new();

        let service = self.clone();
        let order = snapshot.clone();
        tokio::spawn(async move {
            service.dispatch(order).await;
        });

        tracing::info!(order_id = %snapshot.order_id, username = %snapshot.username, "Order placed and cart cleared");
        snapshot
    }

    /// Persist the order and send the confirmation notifications.
    ///
    /// Every step is best-effort: failures are logged at error level
    /// and the remaining steps still run.
    pub async fn dispatch(&self, order: OrderSnapshot) {
        if let Err(e) = self.records.put_order(&order).await {
            tracing::error!(order_id = %order.order_id, error = %e, "Failed to persist order");
        } else {
            tracing::info!(order_id = %order.order_id, "Order saved");
        }

        let summary = order.summary();
        if let Err(e) = self
            .notifier
            .send_email(&order.customer.email, CONFIRMATION_SUBJECT, &summary)
            .await
        {
            tracing::error!(order_id = %order.order_id, error = %e, "Failed to send confirmation email");
        } else {
            tracing::info!(order_id = %order.order_id, to = %order.customer.email, "Order email sent");
        }

        let alert = format!("New order received: {}", order.order_id);
        if let Some(number) = &self.sms_number {
            if let Err(e) = self.notifier.send_sms(number, &alert).await {
                tracing::error!(order_id = %order.order_id, error = %e, "Failed to send order SMS");
            }
        } else if let Some(topic) = &self.topic {
            if let Err(e) = self.notifier.publish_topic(topic, &alert).await {
                tracing::error!(order_id = %order.order_id, error = %e, "Failed to publish order topic message");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::services::notify::NotifyError;
    use crate::stores::{MemoryRecordStore, RecordKind, StoreError, StoredRecord};

    struct FailingRecordStore;

    #[async_trait]
    impl RecordStore for FailingRecordStore {
        async fn put_order(&self, _order: &OrderSnapshot) -> Result<(), StoreError> {
            Err(StoreError::Conflict("store down".to_string()))
        }

        async fn append(
            &self,
            _kind: RecordKind,
            _record: &StoredRecord,
        ) -> Result<(), StoreError> {
            Err(StoreError::Conflict("store down".to_string()))
        }

        async fn scan(&self, _kind: RecordKind) -> Result<Vec<StoredRecord>, StoreError> {
            Err(StoreError::Conflict("store down".to_string()))
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_email(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<(), NotifyError> {
            Err(NotifyError::NotConfigured)
        }

        async fn send_sms(&self, _number: &str, _message: &str) -> Result<(), NotifyError> {
            Err(NotifyError::NotConfigured)
        }

        async fn publish_topic(&self, _topic: &str, _message: &str) -> Result<(), NotifyError> {
            Err(NotifyError::NotConfigured)
        }
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            name: "Priya".to_string(),
            address: "12 MG Road, Vijayawada".to_string(),
            email: "priya@example.com".to_string(),
            phone: "+911234567890".to_string(),
        }
    }

    fn username() -> Username {
        Username::parse("priya").unwrap()
    }

    #[tokio::test]
    async fn test_place_clears_cart_with_failing_collaborators() {
        let service = OrderService::new(
            Arc::new(FailingRecordStore),
            Arc::new(FailingNotifier),
            Some("+911234567890".to_string()),
            None,
        );

        let catalog = Catalog::seed();
        let mut cart = Cart::new();
        cart.add(&catalog, spicejar_core::ProductId::new(5)).unwrap();

        let snapshot = service.place(&mut cart, &catalog, &username(), details());

        // The cart is emptied regardless of collaborator outcome.
        assert!(cart.is_empty());
        assert_eq!(snapshot.lines.len(), 1);

        // Dispatch swallows every failure.
        service.dispatch(snapshot).await;
    }

    #[tokio::test]
    async fn test_dispatch_persists_order() {
        let records = Arc::new(MemoryRecordStore::new());
        let service = OrderService::new(
            Arc::clone(&records) as Arc<dyn RecordStore>,
            Arc::new(crate::services::DisabledNotifier),
            None,
            None,
        );

        let catalog = Catalog::seed();
        let mut cart = Cart::new();
        cart.add(&catalog, spicejar_core::ProductId::new(5)).unwrap();
        cart.add(&catalog, spicejar_core::ProductId::new(5)).unwrap();

        let snapshot = service.review(&cart, &catalog, &username(), details());
        service.dispatch(snapshot.clone()).await;

        let orders = records.orders().await;
        assert_eq!(orders.len(), 1);
        let stored = orders.first().unwrap();
        assert_eq!(stored.order_id, snapshot.order_id);
        assert_eq!(stored.total, spicejar_core::Rupees::new(610));
    }

    #[tokio::test]
    async fn test_review_is_idempotent_and_does_not_touch_cart() {
        let service = OrderService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(crate::services::DisabledNotifier),
            None,
            None,
        );

        let catalog = Catalog::seed();
        let mut cart = Cart::new();
        cart.add(&catalog, spicejar_core::ProductId::new(1)).unwrap();
        let before = cart.clone();

        let first = service.review(&cart, &catalog, &username(), details());
        let second = service.review(&cart, &catalog, &username(), details());

        assert_eq!(cart, before);
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.total, second.total);
    }

    #[tokio::test]
    async fn test_place_with_empty_cart_is_not_special_cased() {
        let service = OrderService::new(
            Arc::new(FailingRecordStore),
            Arc::new(FailingNotifier),
            None,
            Some("orders".to_string()),
        );

        let catalog = Catalog::seed();
        let mut cart = Cart::new();

        let snapshot = service.place(&mut cart, &catalog, &username(), details());
        assert!(snapshot.lines.is_empty());
        assert!(snapshot.total.is_zero());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_still_dispatches() {
        let records = Arc::new(MemoryRecordStore::new());
        let service = OrderService::new(
            Arc::clone(&records) as Arc<dyn RecordStore>,
            Arc::new(crate::services::DisabledNotifier),
            None,
            None,
        );

        let catalog = Catalog::seed();
        let cart = Cart::new();

        let snapshot = service.review(&cart, &catalog, &username(), details());
        service.dispatch(snapshot).await;
        assert_eq!(records.orders().await.len(), 1);
    }
}
