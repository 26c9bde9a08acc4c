//! Subscription plans offered to hotel owners

const IOT_ROOMS: &str = "Access to room management with IoT technology";
const TWO_ADMINS: &str = "Collaborative administration for up to two people";
const DASHBOARDS: &str = "Access to interactive business management dashboards";
const SUPPORT: &str = "24/7 support and maintenance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionPlan {
    pub title: &'static str,
    /// English name used in scenario text
    pub alias: &'static str,
    pub price_cents: u32,
    pub icon: &'static str,
    pub features: &'static [&'static str],
    pub identifier: u8,
}

impl SubscriptionPlan {
    /// Price as shown on the card, e.g. `$29.99 al mes`
    pub fn price_label(&self) -> String {
        format!("${}.{:02} al mes", self.price_cents / 100, self.price_cents % 100)
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        name == self.title || name.eq_ignore_ascii_case(self.alias)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(&feature)
    }

    /// True if every feature of `other` is also in this plan
    pub fn includes_all_of(&self, other: &SubscriptionPlan) -> bool {
        other.features.iter().all(|f| self.has_feature(f))
    }
}

pub static PLANS: [SubscriptionPlan; 3] = [
    SubscriptionPlan {
        title: "BÁSICO",
        alias: "Basic",
        price_cents: 2999,
        icon: "bed_outlined",
        features: &[IOT_ROOMS, TWO_ADMINS],
        identifier: 1,
    },
    SubscriptionPlan {
        title: "REGULAR",
        alias: "Regular",
        price_cents: 5899,
        icon: "apartment_outlined",
        features: &[IOT_ROOMS, TWO_ADMINS, DASHBOARDS],
        identifier: 2,
    },
    SubscriptionPlan {
        title: "PREMIUM",
        alias: "Premium",
        price_cents: 11069,
        icon: "business_outlined",
        features: &[IOT_ROOMS, TWO_ADMINS, DASHBOARDS, SUPPORT],
        identifier: 3,
    },
];

pub fn find_plan(name: &str) -> Option<&'static SubscriptionPlan> {
    PLANS.iter().find(|p| p.matches(name))
}

pub fn plan_by_identifier(identifier: u8) -> Option<&'static SubscriptionPlan> {
    PLANS.iter().find(|p| p.identifier == identifier)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlansScreen {
    selected: Option<u8>,
}

impl PlansScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plans(&self) -> &'static [SubscriptionPlan] {
        &PLANS
    }

    /// Select a plan by title or alias, returning its identifier
    pub fn select(&mut self, name: &str) -> Option<u8> {
        let plan = find_plan(name)?;
        self.selected = Some(plan.identifier);
        Some(plan.identifier)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&'static SubscriptionPlan> {
        self.selected.and_then(plan_by_identifier)
    }

    pub fn cheapest(&self) -> Option<&'static SubscriptionPlan> {
        PLANS.iter().min_by_key(|p| p.price_cents)
    }

    pub fn most_expensive(&self) -> Option<&'static SubscriptionPlan> {
        PLANS.iter().max_by_key(|p| p.price_cents)
    }
}
