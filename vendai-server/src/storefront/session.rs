//! Storefront session
//!
//! One session per shopper page visit. It exclusively owns the cart ledger,
//! the Vi transcript and the engagement timer; nothing in it is persisted.
//! Abandoned sessions are reclaimed by the manager's idle sweeper.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use shared::client::CartView;
use shared::models::ChatMessage;
use surrealdb::RecordId;

use crate::db::models::Store;
use crate::storefront::cart::{CartLedger, CartLine};
use crate::storefront::inactivity::EngagementMonitor;
use crate::utils::AppResult;

/// Live state of one shopper's visit
#[derive(Debug)]
pub struct StorefrontSession {
    pub id: String,
    pub store_id: RecordId,
    pub store_slug: String,
    /// Digits-only WhatsApp of the store (handoff links)
    pub store_whatsapp: String,
    cart: Mutex<CartLedger>,
    transcript: Mutex<Vec<ChatMessage>>,
    /// True while an assistant reply is being streamed into the transcript
    assistant_in_progress: Mutex<bool>,
    pub engagement: EngagementMonitor,
    /// Unix millis of the last interaction (idle sweeper)
    last_activity: AtomicI64,
    pub created_at: i64,
}

impl StorefrontSession {
    pub fn new(id: String, store: &Store, inactivity_window: Duration) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id,
            store_id: store
                .id
                .clone()
                .expect("session opened for an unpersisted store"),
            store_slug: store.slug.clone(),
            store_whatsapp: store.whatsapp.clone(),
            cart: Mutex::new(CartLedger::new()),
            transcript: Mutex::new(Vec::new()),
            assistant_in_progress: Mutex::new(false),
            engagement: EngagementMonitor::new(inactivity_window),
            last_activity: AtomicI64::new(now),
            created_at: now,
        }
    }

    /// Interaction signal: refreshes both the idle clock and the
    /// engagement timer
    pub fn touch(&self) {
        self.last_activity
            .store(chrono::Utc::now().timestamp_millis(), Ordering::Relaxed);
        self.engagement.touch();
    }

    /// Millis since the last interaction
    pub fn idle_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis() - self.last_activity.load(Ordering::Relaxed)
    }

    // ========== Cart ==========

    pub fn add_line(&self, line: CartLine) -> AppResult<()> {
        self.cart.lock().add(line)
    }

    pub fn change_qty(&self, index: usize, delta: i32) -> AppResult<()> {
        self.cart.lock().change_qty(index, delta)
    }

    pub fn remove_line(&self, index: usize) -> AppResult<()> {
        self.cart.lock().remove(index)
    }

    pub fn clear_cart(&self) {
        self.cart.lock().clear();
    }

    pub fn cart_is_empty(&self) -> bool {
        self.cart.lock().is_empty()
    }

    pub fn cart_view(&self) -> CartView {
        let cart = self.cart.lock();
        CartView {
            items: cart.views(),
            total: cart.total(),
            total_qty: cart.total_qty(),
        }
    }

    /// Run a closure against the locked ledger (checkout snapshotting)
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut CartLedger) -> R) -> R {
        f(&mut self.cart.lock())
    }

    // ========== Transcript ==========

    pub fn push_user_message(&self, content: impl Into<String>) {
        self.transcript.lock().push(ChatMessage::user(content));
    }

    pub fn transcript_snapshot(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }

    /// Open the single growing assistant message the stream appends into
    pub fn begin_assistant_reply(&self) {
        let mut transcript = self.transcript.lock();
        transcript.push(ChatMessage::assistant(""));
        *self.assistant_in_progress.lock() = true;
    }

    /// Append one chunk, strictly in arrival order
    pub fn append_assistant_chunk(&self, chunk: &str) {
        let mut transcript = self.transcript.lock();
        if !*self.assistant_in_progress.lock() {
            return;
        }
        if let Some(last) = transcript.last_mut() {
            last.content.push_str(chunk);
        }
    }

    /// Stream closed normally
    pub fn complete_assistant_reply(&self) {
        *self.assistant_in_progress.lock() = false;
    }

    /// Transport failure mid-stream: the partial reply is replaced with a
    /// static apology pointing to the human channel
    pub fn fail_assistant_reply(&self, apology: &str) {
        let mut transcript = self.transcript.lock();
        if let Some(last) = transcript.last_mut() {
            last.content = apology.to_string();
        }
        *self.assistant_in_progress.lock() = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storefront::inactivity::DEFAULT_INACTIVITY_WINDOW;
    use shared::models::ChatRole;

    fn store() -> Store {
        let mut store = Store::new(
            "merchant:m1".parse().unwrap(),
            "bella-moda".to_string(),
            "Bella Moda".to_string(),
            "5511988887777".to_string(),
            0,
        );
        store.id = Some("store:s1".parse().unwrap());
        store
    }

    fn line(product: &str, price: f64) -> CartLine {
        CartLine {
            product_id: product.to_string(),
            variant_id: "v1".to_string(),
            name: "Vestido".to_string(),
            size: "M".to_string(),
            color: "Azul".to_string(),
            qty: 1,
            price,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_cart_view_reflects_ledger() {
        let session = StorefrontSession::new("s".into(), &store(), DEFAULT_INACTIVITY_WINDOW);
        session.add_line(line("a", 50.0)).unwrap();
        session.add_line(line("a", 50.0)).unwrap();

        let view = session.cart_view();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total, 100.0);
        assert_eq!(view.total_qty, 2);
    }

    #[tokio::test]
    async fn test_assistant_reply_grows_one_message() {
        let session = StorefrontSession::new("s".into(), &store(), DEFAULT_INACTIVITY_WINDOW);
        session.push_user_message("Tem vestido M?");
        session.begin_assistant_reply();
        session.append_assistant_chunk("Temos ");
        session.append_assistant_chunk("sim! ");
        session.append_assistant_chunk("Quer ver?");
        session.complete_assistant_reply();

        let transcript = session.transcript_snapshot();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
        assert_eq!(transcript[1].content, "Temos sim! Quer ver?");
    }

    #[tokio::test]
    async fn test_failed_reply_becomes_apology() {
        let session = StorefrontSession::new("s".into(), &store(), DEFAULT_INACTIVITY_WINDOW);
        session.push_user_message("Oi");
        session.begin_assistant_reply();
        session.append_assistant_chunk("Tem");
        session.fail_assistant_reply("Desculpe, tive um problema.");

        let transcript = session.transcript_snapshot();
        assert_eq!(transcript[1].content, "Desculpe, tive um problema.");
        // Late chunks after the failure are dropped
        session.append_assistant_chunk("pos!");
        assert_eq!(
            session.transcript_snapshot()[1].content,
            "Desculpe, tive um problema."
        );
    }
}
