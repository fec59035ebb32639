//! The four entity shapes of the agency extracts.
//!
//! Header names follow the camelCase column names of the source files. Foreign keys are plain
//! ids and are not required to resolve.

use crate::record;

record! {
    /// An insurance agent.
    pub struct Agent keyed by id {
        id: i64 => "id",
        first_name: String => "firstName",
        last_name: String => "lastName",
        /// Two-letter state code.
        state: String => "state",
        region: String => "region",
        primary_language: String => "primaryLanguage",
        /// Empty when the agent speaks a single language.
        secondary_language: String => "secondaryLanguage",
    }
}

record! {
    /// A policy holder, assigned to one agent.
    pub struct Customer keyed by id {
        id: i64 => "id",
        first_name: String => "firstName",
        last_name: String => "lastName",
        age: i64 => "age",
        state: String => "state",
        region: String => "region",
        /// May reference an agent that does not exist.
        agent_id: i64 => "agentId",
        primary_language: String => "primaryLanguage",
        /// Empty when the customer speaks a single language.
        secondary_language: String => "secondaryLanguage",
    }
}

record! {
    /// A policy owned by a customer.
    pub struct Policy keyed by id, validate with check_premium {
        id: i64 => "id",
        customer_id: i64 => "customerId",
        policy_type: String => "policyType",
        start_date: String => "startDate",
        premium_per_month: f64 => "premiumPerMonth",
    }
}

record! {
    /// A claim filed against a policy.
    pub struct Claim keyed by id {
        id: i64 => "id",
        policy_id: i64 => "policyId",
        is_claim_open: bool => "isClaimOpen",
        claim_type: String => "claimType",
    }
}

fn check_premium(policy: &Policy) -> Result<(), String> {
    let premium = policy.premium_per_month;
    if premium.is_finite() && premium >= 0.0 {
        Ok(())
    } else {
        Err(format!("premiumPerMonth must be a non-negative number, got {premium}"))
    }
}

impl Customer {
    /// Whether the customer speaks a second language.
    pub fn has_secondary_language(&self) -> bool {
        !self.secondary_language.is_empty()
    }

    /// Non-empty languages in primary, secondary order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        [self.primary_language.as_str(), self.secondary_language.as_str()]
            .into_iter()
            .filter(|lang| !lang.is_empty())
    }
}
