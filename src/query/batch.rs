//! Serializable descriptions of the query operations, for batch evaluation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;
use crate::model::Customer;
use crate::sources::Snapshot;

use super::{claims, people, premiums};

/// One query operation together with its scalar parameters.
///
/// Deserializes from JSON objects tagged by `op`, e.g.
/// `{"op": "count_agents_for_state", "state": "AZ"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Query {
    CountOpenClaims,
    CountCustomersForAgent {
        agent_id: i64,
    },
    CountAgentsForState {
        state: String,
    },
    SumMonthlyPremiumForCustomer {
        customer_id: i64,
    },
    CountOpenClaimsForCustomerName {
        first_name: String,
        last_name: String,
    },
    MostSpokenSecondaryLanguage {
        state: String,
        #[serde(default = "default_excluded_language")]
        exclude: String,
    },
    CustomerWithHighestTotalPremium,
    CountOpenClaimsForState {
        state: String,
    },
    TotalPremiumByAgent,
}

fn default_excluded_language() -> String {
    people::DEFAULT_EXCLUDED_LANGUAGE.to_string()
}

/// Result of evaluating a [`Query`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryOutput {
    Count(usize),
    /// `None` when the looked-up customer does not exist.
    CountIfFound(Option<usize>),
    Premium(f64),
    Language(Option<String>),
    Customer(Option<Customer>),
    PremiumByAgent(BTreeMap<i64, f64>),
}

impl Query {
    /// Operation name, as used in the JSON `op` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CountOpenClaims => "count_open_claims",
            Self::CountCustomersForAgent { .. } => "count_customers_for_agent",
            Self::CountAgentsForState { .. } => "count_agents_for_state",
            Self::SumMonthlyPremiumForCustomer { .. } => "sum_monthly_premium_for_customer",
            Self::CountOpenClaimsForCustomerName { .. } => "count_open_claims_for_customer_name",
            Self::MostSpokenSecondaryLanguage { .. } => "most_spoken_secondary_language",
            Self::CustomerWithHighestTotalPremium => "customer_with_highest_total_premium",
            Self::CountOpenClaimsForState { .. } => "count_open_claims_for_state",
            Self::TotalPremiumByAgent => "total_premium_by_agent",
        }
    }

    /// Evaluate against one decoded snapshot.
    pub fn evaluate(&self, snapshot: &Snapshot) -> QueryOutput {
        let (agents, customers) = (&snapshot.agents, &snapshot.customers);
        let (policies, all_claims) = (&snapshot.policies, &snapshot.claims);

        match self {
            Self::CountOpenClaims => QueryOutput::Count(claims::count_open_claims(all_claims)),
            Self::CountCustomersForAgent { agent_id } => {
                QueryOutput::Count(people::count_customers_for_agent(customers, *agent_id))
            }
            Self::CountAgentsForState { state } => {
                QueryOutput::Count(people::count_agents_for_state(agents, state))
            }
            Self::SumMonthlyPremiumForCustomer { customer_id } => {
                QueryOutput::Premium(premiums::sum_monthly_premium_for_customer(policies, *customer_id))
            }
            Self::CountOpenClaimsForCustomerName {
                first_name,
                last_name,
            } => QueryOutput::CountIfFound(claims::count_open_claims_for_customer_name(
                customers, policies, all_claims, first_name, last_name,
            )),
            Self::MostSpokenSecondaryLanguage { state, exclude } => {
                QueryOutput::Language(people::most_spoken_secondary_language(customers, state, exclude))
            }
            Self::CustomerWithHighestTotalPremium => QueryOutput::Customer(
                premiums::customer_with_highest_total_premium(customers, policies).cloned(),
            ),
            Self::CountOpenClaimsForState { state } => {
                QueryOutput::Count(claims::count_open_claims_for_state(customers, policies, all_claims, state))
            }
            Self::TotalPremiumByAgent => {
                QueryOutput::PremiumByAgent(premiums::total_premium_by_agent(customers, policies))
            }
        }
    }

    /// Parse a JSON array of queries.
    pub fn parse_batch(json: &str) -> IngestionResult<Vec<Query>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON array of queries from a file.
    pub fn read_batch(path: impl AsRef<Path>) -> IngestionResult<Vec<Query>> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_batch(&text)
    }
}
