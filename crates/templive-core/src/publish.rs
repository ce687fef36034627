//! Publish request/result values and the one-in-flight publish affordance
//!
//! The HTTP side lives in `templive-publish`; this module holds what the
//! session needs to hand a publish off and to know whether one is running.

use crate::document::Credential;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Message shown to the user for any failed publish
pub const PUBLISH_FAILED_MESSAGE: &str = "Publishing failed. Check your API key and try again.";

/// Message shown when publishing without a credential
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Enter an API key before publishing.";

/// Everything a publish sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub markup: String,
    pub stylesheet: String,
    pub credential: Credential,
}

/// Outcome of a publish, as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    Success { template_id: String },
    MissingCredential,
    Failure { reason: String },
}

impl PublishResult {
    pub fn failure() -> Self {
        PublishResult::Failure {
            reason: PUBLISH_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn template_id(&self) -> Option<&str> {
        match self {
            PublishResult::Success { template_id } => Some(template_id),
            _ => None,
        }
    }

    /// Text for the user
    pub fn message(&self) -> String {
        match self {
            PublishResult::Success { template_id } => format!("Published. Template ID: {}", template_id),
            PublishResult::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            PublishResult::Failure { reason } => reason.clone(),
        }
    }
}

/// Something that can carry out a publish
pub trait Publisher {
    fn publish(&self, request: &PublishRequest) -> impl Future<Output = PublishResult> + Send;
}

/// Shared enabled/disabled flag for the publish affordance
#[derive(Debug, Clone, Default)]
pub(crate) struct PublishGate {
    in_flight: Arc<AtomicBool>,
}

impl PublishGate {
    pub(crate) fn is_open(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Close the gate; `None` if a publish already holds it
    pub(crate) fn try_acquire(&self) -> Option<PublishTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PublishTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }
}

/// Keeps the publish affordance disabled until dropped
#[derive(Debug)]
pub struct PublishTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for PublishTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// A publish captured at click time
///
/// The request is a copy of the documents when the user clicked, so edits
/// made while it is in flight do not change what gets sent.
#[derive(Debug)]
pub struct PublishJob {
    request: PublishRequest,
    _ticket: PublishTicket,
}

impl PublishJob {
    pub(crate) fn new(request: PublishRequest, ticket: PublishTicket) -> Self {
        Self {
            request,
            _ticket: ticket,
        }
    }

    pub fn request(&self) -> &PublishRequest {
        &self.request
    }

    /// Run the publish; the affordance re-enables when this returns
    pub async fn run<P: Publisher>(self, publisher: &P) -> PublishResult {
        publisher.publish(&self.request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_allows_one_ticket_at_a_time() {
        let gate = PublishGate::default();
        assert!(gate.is_open());

        let ticket = gate.try_acquire().expect("first acquire succeeds");
        assert!(!gate.is_open());
        assert!(gate.try_acquire().is_none());

        drop(ticket);
        assert!(gate.is_open());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_result_messages() {
        let success = PublishResult::Success {
            template_id: "tpl_123".to_string(),
        };
        assert_eq!(success.template_id(), Some("tpl_123"));
        assert!(success.message().contains("tpl_123"));

        assert_eq!(PublishResult::failure().message(), PUBLISH_FAILED_MESSAGE);
        assert_eq!(PublishResult::failure().template_id(), None);
        assert_eq!(
            PublishResult::MissingCredential.message(),
            MISSING_CREDENTIAL_MESSAGE
        );
    }
}
