//! In-memory gateway for tests.
//!
//! Records every call and hands out `cs_test_{n}` sessions. Sessions start
//! unpaid; tests flip them with [`MockGateway::mark_paid`] or replace them
//! with [`MockGateway::set_session`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentStatus, SessionStatus};
use crate::error::{PaymentError, PaymentResult};

#[derive(Default)]
struct MockState {
    sessions: HashMap<String, SessionStatus>,
    checkout_calls: Vec<CheckoutRequest>,
    status_calls: Vec<String>,
    failure: Option<String>,
    next_id: u32,
}

#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call answers with a provider error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        MockGateway {
            state: Mutex::new(MockState {
                failure: Some(message.into()),
                ..MockState::default()
            }),
        }
    }

    pub async fn set_session(&self, status: SessionStatus) {
        self.state
            .lock()
            .await
            .sessions
            .insert(status.session_id.clone(), status);
    }

    pub async fn mark_paid(&self, session_id: &str) {
        if let Some(session) = self.state.lock().await.sessions.get_mut(session_id) {
            session.status = PaymentStatus::Paid;
        }
    }

    pub async fn checkout_calls(&self) -> Vec<CheckoutRequest> {
        self.state.lock().await.checkout_calls.clone()
    }

    pub async fn status_calls(&self) -> Vec<String> {
        self.state.lock().await.status_calls.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession> {
        request.validate()?;

        let mut state = self.state.lock().await;
        state.checkout_calls.push(request.clone());
        if let Some(message) = &state.failure {
            return Err(PaymentError::Gateway {
                status: Some(500),
                message: message.clone(),
            });
        }

        state.next_id += 1;
        let session_id = format!("cs_test_{}", state.next_id);
        state.sessions.insert(
            session_id.clone(),
            SessionStatus {
                session_id: session_id.clone(),
                status: PaymentStatus::Unpaid,
                order_id: Some(request.order_id.to_string()),
            },
        );

        Ok(CheckoutSession {
            url: format!("https://checkout.test/pay/{}", session_id),
            session_id,
        })
    }

    async fn retrieve_status(&self, session_id: &str) -> PaymentResult<SessionStatus> {
        let mut state = self.state.lock().await;
        state.status_calls.push(session_id.to_string());
        if let Some(message) = &state.failure {
            return Err(PaymentError::Gateway {
                status: Some(500),
                message: message.clone(),
            });
        }

        state.sessions.get(session_id).cloned().ok_or_else(|| PaymentError::Gateway {
            status: Some(404),
            message: format!("No such checkout.session: '{}'", session_id),
        })
    }
}
