//! Join and aggregation queries over decoded entity collections.
//!
//! Every operation is a pure function over borrowed slices: inputs are never mutated, and calling
//! an operation twice with the same collections yields the same result.
//!
//! Lookups that find nothing return the identity of their aggregation (`0`, `0.0`, an empty
//! map). The two exceptions return `Option`: a customer name that matches nobody, and a state
//! with no language left after exclusion.
//!
//! ## Example
//!
//! ```rust
//! use simple_data_tool::ingestion::csv::read_records;
//! use simple_data_tool::model::{Customer, Policy};
//! use simple_data_tool::query::{sum_monthly_premium_for_customer, total_premium_by_agent};
//!
//! let customers: Vec<Customer> = read_records(
//!     "id,firstName,lastName,age,state,region,agentId,primaryLanguage,secondaryLanguage\n\
//!      1,Vyky,Hale,52,TX,South,13,German,\n"
//!         .as_bytes(),
//! )
//! .unwrap();
//! let policies: Vec<Policy> = read_records(
//!     "id,customerId,policyType,startDate,premiumPerMonth\n\
//!      7,1,Auto,01/02/2020,90.5\n\
//!      8,1,Home,03/04/2021,10\n"
//!         .as_bytes(),
//! )
//! .unwrap();
//!
//! assert_eq!(sum_monthly_premium_for_customer(&policies, 1), 100.5);
//! assert_eq!(total_premium_by_agent(&customers, &policies).get(&13), Some(&100.5));
//! ```

pub mod batch;
pub mod claims;
pub mod people;
pub mod premiums;

pub use batch::{Query, QueryOutput};
pub use claims::{count_open_claims, count_open_claims_for_customer_name, count_open_claims_for_state};
pub use people::{
    count_agents_for_state, count_customers_for_agent, most_spoken_secondary_language, DEFAULT_EXCLUDED_LANGUAGE,
};
pub use premiums::{
    customer_with_highest_total_premium, premium_by_customer, sum_monthly_premium_for_customer,
    total_premium_by_agent,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Agent, Claim, Customer, Policy};

    pub fn agent(id: i64, state: &str) -> Agent {
        Agent {
            id,
            first_name: format!("Agent{id}"),
            last_name: "Smith".to_string(),
            state: state.to_string(),
            region: "South".to_string(),
            primary_language: "English".to_string(),
            secondary_language: String::new(),
        }
    }

    pub fn customer(id: i64, first: &str, last: &str, state: &str, agent_id: i64) -> Customer {
        Customer {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            age: 30,
            state: state.to_string(),
            region: "South".to_string(),
            agent_id,
            primary_language: "English".to_string(),
            secondary_language: String::new(),
        }
    }

    pub fn customer_speaking(id: i64, state: &str, agent_id: i64, primary: &str, secondary: &str) -> Customer {
        Customer {
            primary_language: primary.to_string(),
            secondary_language: secondary.to_string(),
            ..customer(id, "First", "Last", state, agent_id)
        }
    }

    pub fn policy(id: i64, customer_id: i64, premium_per_month: f64) -> Policy {
        Policy {
            id,
            customer_id,
            policy_type: "Auto".to_string(),
            start_date: "01/01/2020".to_string(),
            premium_per_month,
        }
    }

    pub fn claim(id: i64, policy_id: i64, is_claim_open: bool) -> Claim {
        Claim {
            id,
            policy_id,
            is_claim_open,
            claim_type: "Collision".to_string(),
        }
    }
}
