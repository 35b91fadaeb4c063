// ============================================================================
// eMenu Core - Digest Service
// File: crates/emenu-core/src/services/digest_service.rs
// ============================================================================
//! Daily "what changed since yesterday" digest.
//!
//! [`DigestService::compute_digest`] only reads and renders; sending is a separate
//! step ([`DigestService::deliver`]) driven through the [`Mailer`] port.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use emenu_shared::utils::mask_email;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{preparation_time, Dish, DishId};
use crate::error::DomainError;
use crate::repositories::{DishRepository, UserRepository};
use crate::services::mailer::Mailer;

pub const DIGEST_TEMPLATE_NAME: &str = "new-dishes-mail";
const DIGEST_TEMPLATE: &str = include_str!("../../templates/new-dishes-mail.hbs");

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DigestWindow {
    /// The 24 hours ending at midnight (UTC) of `reference_date`.
    pub fn ending_at(reference_date: NaiveDate) -> Self {
        let end = reference_date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start: end - Duration::days(1),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Dishes that changed inside one window. A dish both added and modified in the
/// window is reported as added only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishChangeSet {
    pub newly_added: Vec<Dish>,
    pub newly_modified: Vec<Dish>,
}

impl DishChangeSet {
    pub fn new(newly_added: Vec<Dish>, modified: Vec<Dish>) -> Self {
        let added_ids: HashSet<DishId> = newly_added.iter().map(|d| d.id).collect();
        let newly_modified = modified
            .into_iter()
            .filter(|d| !added_ids.contains(&d.id))
            .collect();
        Self {
            newly_added,
            newly_modified,
        }
    }

    pub fn len(&self) -> usize {
        self.newly_added.len() + self.newly_modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One rendered notification for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMessage {
    pub contact: String,
    pub greeting_name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub contact: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: Vec<DeliveryFailure>,
}

#[derive(Serialize)]
struct DigestContext<'a> {
    user_greeting_name: &'a str,
    newly_added_dishes: Vec<DishLine<'a>>,
    newly_modified_dishes: Vec<DishLine<'a>>,
}

#[derive(Serialize)]
struct DishLine<'a> {
    name: &'a str,
    description: &'a str,
    price: String,
    preparation_time: String,
    is_vegan: bool,
}

impl<'a> From<&'a Dish> for DishLine<'a> {
    fn from(dish: &'a Dish) -> Self {
        Self {
            name: &dish.name,
            description: &dish.description,
            price: dish.price.to_string(),
            preparation_time: preparation_time::format(&dish.preparation_time),
            is_vegan: dish.is_vegan,
        }
    }
}

/// Renders the digest body from the embedded handlebars template.
pub struct DigestRenderer {
    registry: Handlebars<'static>,
}

impl DigestRenderer {
    pub fn new() -> Result<Self, DomainError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(DIGEST_TEMPLATE_NAME, DIGEST_TEMPLATE)
            .map_err(|e| DomainError::TemplateError(e.to_string()))?;
        Ok(Self { registry })
    }

    pub fn render(&self, greeting_name: &str, changes: &DishChangeSet) -> Result<String, DomainError> {
        let context = DigestContext {
            user_greeting_name: greeting_name,
            newly_added_dishes: changes.newly_added.iter().map(DishLine::from).collect(),
            newly_modified_dishes: changes.newly_modified.iter().map(DishLine::from).collect(),
        };
        self.registry
            .render(DIGEST_TEMPLATE_NAME, &context)
            .map_err(|e| DomainError::TemplateError(e.to_string()))
    }
}

pub struct DigestService {
    dishes: Arc<dyn DishRepository>,
    users: Arc<dyn UserRepository>,
    renderer: DigestRenderer,
    subject: String,
}

impl DigestService {
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        users: Arc<dyn UserRepository>,
        subject: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            dishes,
            users,
            renderer: DigestRenderer::new()?,
            subject: subject.into(),
        })
    }

    pub async fn changes_in(&self, window: &DigestWindow) -> Result<DishChangeSet, DomainError> {
        let added = self.dishes.added_between(window.start, window.end).await?;
        let modified = self.dishes.modified_between(window.start, window.end).await?;
        Ok(DishChangeSet::new(added, modified))
    }

    /// One message per registered user, or nothing when no dish changed in the
    /// 24 hours before `reference_date`.
    pub async fn compute_digest(&self, reference_date: NaiveDate) -> Result<Vec<DigestMessage>, DomainError> {
        let window = DigestWindow::ending_at(reference_date);
        let changes = self.changes_in(&window).await?;

        if changes.is_empty() {
            info!("No dish updates between {} and {}", window.start, window.end);
            return Ok(Vec::new());
        }

        let users = self.users.list_all().await?;
        info!(
            "Digest for {}: {} added, {} modified, {} recipients",
            reference_date,
            changes.newly_added.len(),
            changes.newly_modified.len(),
            users.len()
        );

        users
            .iter()
            .map(|user| {
                let greeting_name = user.greeting_name().to_string();
                let body = self.renderer.render(&greeting_name, &changes)?;
                Ok(DigestMessage {
                    contact: user.email.clone(),
                    greeting_name,
                    subject: self.subject.clone(),
                    body,
                })
            })
            .collect()
    }

    /// Sends every message; a failed recipient never stops the others.
    pub async fn deliver(&self, messages: &[DigestMessage], mailer: &dyn Mailer) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for message in messages {
            match mailer.send(&message.contact, &message.subject, &message.body).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!("Failed to send digest to {}: {}", mask_email(&message.contact), e);
                    report.failed.push(DeliveryFailure {
                        contact: message.contact.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        info!("Digest delivery finished: {} sent, {} failed", report.sent, report.failed.len());
        report
    }

    pub async fn run(&self, reference_date: NaiveDate, mailer: &dyn Mailer) -> Result<DeliveryReport, DomainError> {
        let messages = self.compute_digest(reference_date).await?;
        Ok(self.deliver(&messages, mailer).await)
    }
}
