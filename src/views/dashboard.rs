//! Dashboard projection of the signed-in user's profile.

use serde::Serialize;
use time::Date;

use super::contact::ContactMessage;
use crate::services::identity::Identity;
use crate::services::profile_store::{Profile, Subscription, SubscriptionStatus};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long Spanish date, e.g. `15 de marzo de 2025`.
#[must_use]
pub fn format_long_date_es(date: Date) -> String {
    let month = MONTHS_ES[usize::from(u8::from(date.month())) - 1];
    format!("{} de {month} de {}", date.day(), date.year())
}

#[must_use]
pub fn status_label(status: SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Active => "Activa",
        SubscriptionStatus::Pending => "Pendiente",
        SubscriptionStatus::Expired => "Expirada",
    }
}

/// Numeric value of a display price such as `"$3.99"`.
#[must_use]
pub fn parse_price(price: &str) -> Option<f64> {
    price
        .trim()
        .trim_start_matches('$')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

/// Estimated savings are the monthly cost times this factor.
pub const SAVINGS_FACTOR: f64 = 2.5;

/// Sum of active subscription prices. Unparseable prices count as zero.
#[must_use]
pub fn monthly_cost(subscriptions: &[Subscription]) -> f64 {
    subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .filter_map(|s| parse_price(&s.price))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionRow {
    pub id: String,
    pub service_name: String,
    pub price_label: String,
    pub status: SubscriptionStatus,
    pub status_label: &'static str,
    pub expiry_label: String,
    pub slot_label: String,
    pub support_link: String,
}

impl SubscriptionRow {
    fn new(subscription: &Subscription, whatsapp_number: &str) -> Self {
        let support = ContactMessage::Support {
            service: subscription.service_name.clone(),
            slot_number: subscription.slot_number,
        };
        Self {
            id: subscription.id.clone(),
            service_name: subscription.service_name.clone(),
            price_label: format!("{}/mes", subscription.price),
            status: subscription.status,
            status_label: status_label(subscription.status),
            expiry_label: format!("Vence: {}", format_long_date_es(subscription.expiry_date.date())),
            slot_label: format!("Slot #{}", subscription.slot_number),
            support_link: support.link(whatsapp_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    pub email: String,
    pub active_count: usize,
    pub total_count: usize,
    pub monthly_cost: f64,
    pub monthly_cost_label: String,
    /// Estimated savings versus original prices.
    pub estimated_savings: f64,
    pub estimated_savings_label: String,
    pub subscriptions: Vec<SubscriptionRow>,
    /// True when the empty-state call to action should be shown.
    pub empty: bool,
}

impl DashboardView {
    /// Build the dashboard. A missing profile renders as an empty list.
    #[must_use]
    pub fn build(identity: &Identity, profile: Option<&Profile>, whatsapp_number: &str) -> Self {
        let subscriptions = profile.map_or(&[][..], |p| p.subscriptions.as_slice());
        let name = profile
            .map(|p| p.display_name.as_str())
            .or(identity.display_name.as_deref())
            .unwrap_or_default();
        let email = profile.map_or(identity.email.as_str(), |p| p.email.as_str());
        let cost = monthly_cost(subscriptions);
        let savings = cost * SAVINGS_FACTOR;

        Self {
            greeting: format!("¡Hola, {name}!"),
            email: email.to_owned(),
            active_count: subscriptions
                .iter()
                .filter(|s| s.status == SubscriptionStatus::Active)
                .count(),
            total_count: subscriptions.len(),
            monthly_cost: cost,
            monthly_cost_label: format!("${cost:.2}"),
            estimated_savings: savings,
            estimated_savings_label: format!("${savings:.2}"),
            subscriptions: subscriptions
                .iter()
                .map(|s| SubscriptionRow::new(s, whatsapp_number))
                .collect(),
            empty: subscriptions.is_empty(),
        }
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
